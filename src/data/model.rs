use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names of the catalog schema
// ---------------------------------------------------------------------------

pub const COL_PRODUCT_NAME: &str = "Product Name";
pub const COL_MOLECULAR_WEIGHT: &str = "Molecular Weight (kDa)";
pub const COL_FUNCTIONAL_GROUP: &str = "Functional Group / Reactivity";
pub const COL_ARCHITECTURE: &str = "Polymer Architecture";
pub const COL_APPLICATION: &str = "Intended Application";
pub const COL_SOLUBILITY: &str = "Solubility";
pub const COL_PARTNER: &str = "Commercial Partner";
pub const COL_PDI: &str = "Polydispersity Index (PDI)";
/// Accepted spellings of the optional vendor page column.
pub const COL_VENDOR_PAGE: [&str; 2] = ["Vendor Product Page", "Vendor/Product Page"];

/// Columns that must be present for a source to load.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_PRODUCT_NAME,
    COL_MOLECULAR_WEIGHT,
    COL_FUNCTIONAL_GROUP,
    COL_ARCHITECTURE,
    COL_APPLICATION,
    COL_SOLUBILITY,
    COL_PARTNER,
    COL_PDI,
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column outside the fixed schema
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common dtypes of tabular sources.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Keep a decimal point on whole floats so a reload reads a float again.
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret raw text the way a delimited reader sees it: empty is null,
    /// then integer, then finite float, otherwise string. Text such as "NaN"
    /// or "inf" stays a string so it is written back exactly as read.
    pub fn guess(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => CellValue::Float(f),
            _ => CellValue::String(s.to_string()),
        }
    }

    /// Cell for a schema number. Whole values become integers so that a
    /// source `5` is written back as `5`, not `5.0`.
    pub fn from_number(v: f64) -> CellValue {
        // 2^53: beyond this not every integer is representable as f64
        const EXACT: f64 = 9_007_199_254_740_992.0;
        if v.fract() == 0.0 && v.abs() <= EXACT {
            CellValue::Integer(v as i64)
        } else {
            CellValue::Float(v)
        }
    }

    /// Numeric view of the value, parsing strings when needed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse().ok(),
            CellValue::Null => None,
        }
    }

    /// Text view of the value; `None` for null.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Dimension – the categorical attributes a user can filter on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    FunctionalGroup,
    Architecture,
    Application,
    Solubility,
    Partner,
}

impl Dimension {
    pub const COUNT: usize = 5;

    /// All dimensions in control order (Commercial Partner last).
    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::FunctionalGroup,
        Dimension::Architecture,
        Dimension::Application,
        Dimension::Solubility,
        Dimension::Partner,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Source column holding this dimension.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::FunctionalGroup => COL_FUNCTIONAL_GROUP,
            Dimension::Architecture => COL_ARCHITECTURE,
            Dimension::Application => COL_APPLICATION,
            Dimension::Solubility => COL_SOLUBILITY,
            Dimension::Partner => COL_PARTNER,
        }
    }

    /// The product's value for this dimension, `None` when the cell was empty.
    pub fn value_of(self, product: &PegProduct) -> Option<&str> {
        let value = match self {
            Dimension::FunctionalGroup => &product.functional_group,
            Dimension::Architecture => &product.architecture,
            Dimension::Application => &product.application,
            Dimension::Solubility => &product.solubility,
            Dimension::Partner => &product.partner,
        };
        value.as_deref()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// PegProduct – one row of the catalog
// ---------------------------------------------------------------------------

/// A single catalog entry. Never modified after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct PegProduct {
    pub name: String,
    /// Molecular weight in kDa.
    pub molecular_weight: f64,
    pub functional_group: Option<String>,
    pub architecture: Option<String>,
    pub application: Option<String>,
    pub solubility: Option<String>,
    pub partner: Option<String>,
    /// Polydispersity index, display only.
    pub pdi: f64,
    pub vendor_page: Option<String>,
    /// Columns outside the fixed schema, kept for export.
    pub extra: BTreeMap<String, CellValue>,
}

impl PegProduct {
    /// Cell for a source column name, as it would be written back out.
    pub fn cell(&self, column: &str) -> CellValue {
        let text = |v: &Option<String>| match v {
            Some(s) => CellValue::String(s.clone()),
            None => CellValue::Null,
        };
        match column {
            COL_PRODUCT_NAME => CellValue::String(self.name.clone()),
            COL_MOLECULAR_WEIGHT => CellValue::from_number(self.molecular_weight),
            COL_FUNCTIONAL_GROUP => text(&self.functional_group),
            COL_ARCHITECTURE => text(&self.architecture),
            COL_APPLICATION => text(&self.application),
            COL_SOLUBILITY => text(&self.solubility),
            COL_PARTNER => text(&self.partner),
            COL_PDI => CellValue::from_number(self.pdi),
            c if COL_VENDOR_PAGE.contains(&c) => text(&self.vendor_page),
            other => self.extra.get(other).cloned().unwrap_or(CellValue::Null),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded product table with pre-computed column indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// All products, in source order.
    pub products: Vec<PegProduct>,
    /// Trimmed column names in source order.
    pub columns: Vec<String>,
    /// Sorted distinct non-null values per dimension, indexed by [`Dimension::index`].
    unique_values: [BTreeSet<String>; Dimension::COUNT],
    /// Observed (min, max) molecular weight.
    mw_bounds: Option<(f64, f64)>,
}

impl Catalog {
    /// Build column indices from the loaded products.
    pub fn from_products(columns: Vec<String>, products: Vec<PegProduct>) -> Self {
        let mut unique_values: [BTreeSet<String>; Dimension::COUNT] = Default::default();
        let mut mw_bounds: Option<(f64, f64)> = None;

        for product in &products {
            for dim in Dimension::ALL {
                if let Some(value) = dim.value_of(product) {
                    unique_values[dim.index()].insert(value.to_string());
                }
            }
            let mw = product.molecular_weight;
            mw_bounds = Some(match mw_bounds {
                Some((lo, hi)) => (lo.min(mw), hi.max(mw)),
                None => (mw, mw),
            });
        }

        Catalog {
            products,
            columns,
            unique_values,
            mw_bounds,
        }
    }

    /// A catalog with the same columns holding the rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Catalog {
        let products = indices
            .iter()
            .filter_map(|&i| self.products.get(i).cloned())
            .collect();
        Catalog::from_products(self.columns.clone(), products)
    }

    /// Sorted distinct non-null values of a dimension.
    pub fn unique_values(&self, dim: Dimension) -> &BTreeSet<String> {
        &self.unique_values[dim.index()]
    }

    /// Observed molecular weight range, `None` for an empty catalog.
    pub fn mw_bounds(&self) -> Option<(f64, f64)> {
        self.mw_bounds
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
