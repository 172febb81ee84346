use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use peg_selector::data::loader::DEFAULT_CATALOG_FILE;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Header as exported from spreadsheets, incidental whitespace included.
const HEADERS: [&str; 9] = [
    "Product Name",
    "Molecular Weight (kDa) ",
    " Functional Group / Reactivity",
    "Polymer Architecture",
    "Intended Application",
    "Solubility ",
    "Commercial Partner",
    "Polydispersity Index (PDI)",
    "Vendor Product Page",
];

struct Row {
    name: String,
    mw: f64,
    functional_group: String,
    architecture: String,
    application: String,
    solubility: String,
    partner: String,
    pdi: f64,
    vendor_page: Option<String>,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let groups = [
        ("NHS ester", "NHS"),
        ("Amine", "NH2"),
        ("Maleimide", "MAL"),
        ("Thiol", "SH"),
        ("Azide", "N3"),
        ("Carboxylic acid", "COOH"),
    ];
    let architectures = ["Linear", "4-arm", "8-arm", "Branched"];
    let applications = ["Bioconjugation", "Hydrogel", "Drug delivery", "Surface modification"];
    let solubilities = ["Water", "DMSO", "Water / DMSO"];
    let partners = ["Acme Polymers", "Biopeg Labs", "Nanocs", "JenKem"];
    let weights = [1.0, 2.0, 3.4, 5.0, 10.0, 20.0, 40.0];

    let mut rows = Vec::new();
    for (group, abbrev) in groups {
        for &mw in &weights {
            let architecture = rng.pick(&architectures);
            let partner = rng.pick(&partners);
            let slug = format!("{}-{}-{}k", architecture, abbrev, mw).to_lowercase().replace(' ', "-");
            rows.push(Row {
                name: format!("{architecture} PEG-{abbrev} {mw} kDa"),
                mw,
                functional_group: group.to_string(),
                architecture: architecture.to_string(),
                application: rng.pick(&applications).to_string(),
                solubility: rng.pick(&solubilities).to_string(),
                partner: partner.to_string(),
                pdi: ((1.01 + rng.next_f64() * 0.09) * 1000.0).round() / 1000.0,
                // roughly a third of the catalog has no product page
                vendor_page: (rng.next_f64() > 0.33)
                    .then(|| format!("https://example.com/{}", slug)),
            });
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record([
            row.name.clone(),
            row.mw.to_string(),
            row.functional_group.clone(),
            row.architecture.clone(),
            row.application.clone(),
            row.solubility.clone(),
            row.partner.clone(),
            row.pdi.to_string(),
            row.vendor_page.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let text = |f: fn(&Row) -> &str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Utf8, false),
        Field::new(HEADERS[1], DataType::Float64, false),
        Field::new(HEADERS[2], DataType::Utf8, false),
        Field::new(HEADERS[3], DataType::Utf8, false),
        Field::new(HEADERS[4], DataType::Utf8, false),
        Field::new(HEADERS[5], DataType::Utf8, false),
        Field::new(HEADERS[6], DataType::Utf8, false),
        Field::new(HEADERS[7], DataType::Float64, false),
        Field::new(HEADERS[8], DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| r.name.as_str())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.mw).collect::<Vec<_>>())),
            Arc::new(text(|r| r.functional_group.as_str())),
            Arc::new(text(|r| r.architecture.as_str())),
            Arc::new(text(|r| r.application.as_str())),
            Arc::new(text(|r| r.solubility.as_str())),
            Arc::new(text(|r| r.partner.as_str())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.pdi).collect::<Vec<_>>())),
            Arc::new(StringArray::from(
                rows.iter()
                    .map(|r| r.vendor_page.as_deref())
                    .collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = DEFAULT_CATALOG_FILE;
    let parquet_path = "peg_products_v2.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} PEG products to {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
