/// Data layer: catalog types, loading, filtering, scoring and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Catalog (trimmed headers, typed numerics)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Catalog  │  Vec<PegProduct>, column order, domain values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  FilterSpec + EngineConfig → matching rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  score   │  per-row Recommendation (score, explanation)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   rank   │  score desc, MW asc, stable → Evaluation
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export  │  filtered rows → CSV, source column order
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod rank;
pub mod score;
