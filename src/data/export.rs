use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::PegProduct;

/// File name offered when exporting the current results.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "peg_selector_filtered_results.csv";

/// Write products as CSV with the given columns, in order. Score and
/// explanation are never part of the output; nulls become empty cells.
pub fn write_csv<'a, W, I>(writer: W, columns: &[String], products: I) -> csv::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a PegProduct>,
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns)?;
    for product in products {
        out.write_record(columns.iter().map(|col| product.cell(col).to_string()))?;
    }
    out.flush()?;
    Ok(())
}

/// Export products to a CSV file, returning the number of rows written.
pub fn export_file<'a, I>(path: &Path, columns: &[String], products: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a PegProduct>,
{
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut count = 0;
    let counted = products.into_iter().inspect(|_| count += 1);
    write_csv(file, columns, counted).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {count} products to {}", path.display());
    Ok(count)
}
