use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataSourceError;
use super::model::{
    COL_APPLICATION, COL_ARCHITECTURE, COL_FUNCTIONAL_GROUP, COL_MOLECULAR_WEIGHT, COL_PARTNER,
    COL_PDI, COL_PRODUCT_NAME, COL_SOLUBILITY, COL_VENDOR_PAGE, Catalog, CellValue, PegProduct,
};

/// Catalog read by the viewer at startup when present in the working directory.
pub const DEFAULT_CATALOG_FILE: &str = "peg_products_v2.csv";

type Result<T> = std::result::Result<T, DataSourceError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a product catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one product per line (primary format)
/// * `.json`    – `[{ "Product Name": ..., "Molecular Weight (kDa)": ..., ... }, ...]`
/// * `.parquet` – flat columns of strings and numbers
///
/// Column names are trimmed of surrounding whitespace before they are matched
/// against the schema.
pub fn load_file(path: &Path) -> Result<Catalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let catalog = match ext.as_str() {
        "csv" => load_csv_reader(File::open(path)?),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataSourceError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!(
        "Loaded {} products from {} with columns {:?}",
        catalog.len(),
        path.display(),
        catalog.columns
    );
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Shared row → product conversion
// ---------------------------------------------------------------------------

/// Positions of the schema columns inside a source header.
struct ColumnMap {
    name: usize,
    molecular_weight: usize,
    functional_group: usize,
    architecture: usize,
    application: usize,
    solubility: usize,
    partner: usize,
    pdi: usize,
    vendor_page: Option<usize>,
}

impl ColumnMap {
    fn resolve(columns: &[String]) -> Result<Self> {
        let find = |name: &str| columns.iter().position(|c| c == name);
        let required = |name: &str| {
            find(name).ok_or_else(|| DataSourceError::MissingColumn(name.to_string()))
        };
        Ok(ColumnMap {
            name: required(COL_PRODUCT_NAME)?,
            molecular_weight: required(COL_MOLECULAR_WEIGHT)?,
            functional_group: required(COL_FUNCTIONAL_GROUP)?,
            architecture: required(COL_ARCHITECTURE)?,
            application: required(COL_APPLICATION)?,
            solubility: required(COL_SOLUBILITY)?,
            partner: required(COL_PARTNER)?,
            pdi: required(COL_PDI)?,
            vendor_page: COL_VENDOR_PAGE.iter().find_map(|c| find(*c)),
        })
    }

    fn is_schema_column(&self, idx: usize) -> bool {
        [
            self.name,
            self.molecular_weight,
            self.functional_group,
            self.architecture,
            self.application,
            self.solubility,
            self.partner,
            self.pdi,
        ]
        .contains(&idx)
            || self.vendor_page == Some(idx)
    }
}

/// Build a catalog from column names (untrimmed) and rows aligned with them.
///
/// Schema numerics must parse; other schema columns are text with empty as
/// null; non-schema columns are kept as typed cells.
pub fn catalog_from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Catalog> {
    let columns: Vec<String> = columns.iter().map(|c| c.trim().to_string()).collect();
    let map = ColumnMap::resolve(&columns)?;

    let mut products = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        // rows are reported 1-based, counting data rows after the header
        let row_no = idx + 1;
        if row.len() != columns.len() {
            return Err(DataSourceError::Malformed(format!(
                "row {row_no} has {} fields but the header has {}",
                row.len(),
                columns.len()
            )));
        }

        let number = |idx: usize| -> Result<f64> {
            let cell = &row[idx];
            cell.as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataSourceError::InvalidNumber {
                    row: row_no,
                    column: columns[idx].clone(),
                    value: cell.to_string(),
                })
        };
        let text = |idx: usize| row[idx].as_text().filter(|s| !s.is_empty());

        let extra: BTreeMap<String, CellValue> = row
            .iter()
            .enumerate()
            .filter(|(idx, _)| !map.is_schema_column(*idx))
            .map(|(idx, cell)| (columns[idx].clone(), normalize_extra(cell)))
            .collect();

        products.push(PegProduct {
            name: text(map.name).unwrap_or_default(),
            molecular_weight: number(map.molecular_weight)?,
            functional_group: text(map.functional_group),
            architecture: text(map.architecture),
            application: text(map.application),
            solubility: text(map.solubility),
            partner: text(map.partner),
            pdi: number(map.pdi)?,
            vendor_page: map.vendor_page.and_then(text),
            extra,
        });
    }

    Ok(Catalog::from_products(columns, products))
}

fn normalize_extra(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::String(s) => CellValue::guess(s),
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a comma-delimited catalog with a header row. Every cell is read as
/// text; empty cells are null.
pub fn load_csv_reader<R: Read>(source: R) -> Result<Catalog> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(text_cell).collect());
    }

    catalog_from_rows(headers, rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Product Name": "mPEG-NHS 5k",
///     "Molecular Weight (kDa)": 5,
///     "Functional Group / Reactivity": "NHS ester",
///     ...
///   },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen key order (serde_json is built with
/// `preserve_order`); a key missing from a record is null.
fn load_json(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)?;
    load_json_str(&text)
}

pub fn load_json_str(text: &str) -> Result<Catalog> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataSourceError::Malformed("expected top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| {
                DataSourceError::Malformed(format!("row {} is not a JSON object", i + 1))
            })?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    catalog_from_rows(columns, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per catalog attribute.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Catalog> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    catalog_from_rows(columns, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        _ => CellValue::String(array_value_to_string(col, row)?),
    };
    Ok(cell)
}

fn text_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Dimension;

    const HEADER: &str = " Product Name ,Molecular Weight (kDa), Functional Group / Reactivity,Polymer Architecture,Intended Application,Solubility ,Commercial Partner,Polydispersity Index (PDI),Vendor Product Page";

    fn csv(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    #[test]
    fn headers_are_trimmed_and_rows_typed() {
        let text = csv(&[
            "mPEG-NHS 5k,5,NHS ester,Linear,Bioconjugation,Water,Acme,1.03,https://acme.example/nhs",
            "4-arm PEG-Amine,10,Amine,4-arm,Hydrogel,Water,Biopeg,1.05,",
        ]);
        let catalog = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(catalog.columns[0], "Product Name");
        assert_eq!(catalog.columns[5], "Solubility");
        assert_eq!(catalog.len(), 2);
        let first = &catalog.products[0];
        assert_eq!(first.molecular_weight, 5.0);
        assert_eq!(first.pdi, 1.03);
        assert_eq!(first.vendor_page.as_deref(), Some("https://acme.example/nhs"));
        assert_eq!(catalog.products[1].vendor_page, None);
        assert_eq!(catalog.unique_values(Dimension::Partner).len(), 2);
    }

    #[test]
    fn empty_categorical_cell_is_null() {
        let text = csv(&["Bare PEG,2,,Linear,Hydrogel,Water,Acme,1.01,"]);
        let catalog = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(catalog.products[0].functional_group, None);
        assert!(catalog.unique_values(Dimension::FunctionalGroup).is_empty());
    }

    #[test]
    fn missing_required_column_is_reported() {
        let text = "Product Name,Molecular Weight (kDa)\nA,5\n";
        let err = load_csv_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn(ref c) if c == COL_FUNCTIONAL_GROUP));
    }

    #[test]
    fn vendor_page_column_is_optional() {
        let text = "Product Name,Molecular Weight (kDa),Functional Group / Reactivity,Polymer Architecture,Intended Application,Solubility,Commercial Partner,Polydispersity Index (PDI)\nA,5,Amine,Linear,Hydrogel,Water,Acme,1.02\n";
        let catalog = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(catalog.products[0].vendor_page, None);
        assert_eq!(catalog.columns.len(), 8);
    }

    #[test]
    fn malformed_molecular_weight_fails_at_load() {
        let text = csv(&["A,five,Amine,Linear,Hydrogel,Water,Acme,1.02,"]);
        let err = load_csv_reader(text.as_bytes()).unwrap_err();
        match err {
            DataSourceError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, COL_MOLECULAR_WEIGHT);
                assert_eq!(value, "five");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_pdi_fails_at_load() {
        let text = csv(&["A,5,Amine,Linear,Hydrogel,Water,Acme,,"]);
        let err = load_csv_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataSourceError::InvalidNumber { ref column, .. } if column == COL_PDI));
    }

    #[test]
    fn ragged_csv_row_is_an_error() {
        let text = csv(&["A,5,Amine"]);
        assert!(matches!(load_csv_reader(text.as_bytes()), Err(DataSourceError::Csv(_))));
    }

    #[test]
    fn extra_columns_are_kept_typed() {
        let text = "Product Name,Lot,Molecular Weight (kDa),Functional Group / Reactivity,Polymer Architecture,Intended Application,Solubility,Commercial Partner,Polydispersity Index (PDI),Notes\nA,17,5,Amine,Linear,Hydrogel,Water,Acme,1.02,store cold\n";
        let catalog = load_csv_reader(text.as_bytes()).unwrap();
        let p = &catalog.products[0];
        assert_eq!(p.extra.get("Lot"), Some(&CellValue::Integer(17)));
        assert_eq!(p.extra.get("Notes"), Some(&CellValue::String("store cold".into())));
        assert_eq!(catalog.columns[1], "Lot");
    }

    #[test]
    fn json_records_load() {
        let text = r#"[
            {"Product Name": "A", "Molecular Weight (kDa)": 5, "Functional Group / Reactivity": "Amine",
             "Polymer Architecture": "Linear", "Intended Application": "Hydrogel", "Solubility": "Water",
             "Commercial Partner": "Acme", "Polydispersity Index (PDI)": 1.02, "Vendor Product Page": null},
            {"Product Name": "B", "Molecular Weight (kDa)": 2.5, "Functional Group / Reactivity": "",
             "Polymer Architecture": "4-arm", "Intended Application": "Hydrogel", "Solubility": "Water",
             "Commercial Partner": "Acme", "Polydispersity Index (PDI)": "1.10"}
        ]"#;
        let catalog = load_json_str(text).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products[1].molecular_weight, 2.5);
        assert_eq!(catalog.products[1].pdi, 1.1);
        assert_eq!(catalog.products[1].functional_group, None);
        assert_eq!(catalog.products[0].vendor_page, None);
    }

    #[test]
    fn invalid_number_names_the_data_row() {
        let text = csv(&[
            "A,5,Amine,Linear,Hydrogel,Water,Acme,1.02,",
            "B,5,Amine,Linear,Hydrogel,Water,Acme,n/a,",
        ]);
        let err = load_csv_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataSourceError::InvalidNumber { row: 2, .. }));
        assert!(err.to_string().starts_with("row 2:"));
    }

    #[test]
    fn json_columns_keep_source_key_order() {
        let text = r#"[
            {"Product Name": "A", "Molecular Weight (kDa)": 5, "Functional Group / Reactivity": "Amine",
             "Polymer Architecture": "Linear", "Intended Application": "Hydrogel", "Solubility": "Water",
             "Commercial Partner": "Acme", "Polydispersity Index (PDI)": 1.02, "Batch": "L1"}
        ]"#;
        let catalog = load_json_str(text).unwrap();
        assert_eq!(catalog.columns[0], "Product Name");
        assert_eq!(
            catalog.columns,
            [
                COL_PRODUCT_NAME,
                COL_MOLECULAR_WEIGHT,
                COL_FUNCTIONAL_GROUP,
                "Polymer Architecture",
                "Intended Application",
                "Solubility",
                "Commercial Partner",
                COL_PDI,
                "Batch",
            ]
        );
    }

    #[test]
    fn json_must_be_an_array() {
        let err = load_json_str(r#"{"Product Name": "A"}"#).unwrap_err();
        assert!(matches!(err, DataSourceError::Malformed(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("catalog.xlsx")).unwrap_err();
        assert!(matches!(err, DataSourceError::UnsupportedFormat(ref e) if e == "xlsx"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/peg_products_v2.csv")).unwrap_err();
        assert!(matches!(err, DataSourceError::Io(_)));
    }
}
