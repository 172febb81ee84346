//! PEG Selector core: catalog loading, filtering, rule-based scoring and
//! export. The egui viewer in `main.rs` is a thin layer over this crate.

pub mod config;
pub mod data;

pub use config::{DefaultSelection, EngineConfig};
pub use data::error::DataSourceError;
pub use data::filter::{FilterSpec, domain_values, filter, filtered_indices};
pub use data::model::{Catalog, CellValue, Dimension, PegProduct};
pub use data::rank::{Evaluation, evaluate, rank, top_score};
pub use data::score::{Recommendation, ScoredProduct, score};
