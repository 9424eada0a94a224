use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric columns of the cleaned dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Price,
    Marla,
    Bedrooms,
    Washrooms,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 4] = [
        NumericColumn::Price,
        NumericColumn::Marla,
        NumericColumn::Bedrooms,
        NumericColumn::Washrooms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericColumn::Price => "Price",
            NumericColumn::Marla => "Marla",
            NumericColumn::Bedrooms => "Bedrooms",
            NumericColumn::Washrooms => "Washrooms",
        }
    }
}

/// A listing row exactly as it appears in the source CSV, all fields text.
///
/// Derives Eq + Hash so exact duplicate rows can be dropped structurally
/// before any parsing happens.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Hash)]
pub struct RawListing {
    pub price: String,
    pub area: String,
    pub bedrooms: String,
    pub washrooms: String,
    pub location: String,
    /// Columns outside the known schema, carried through unchanged.
    pub extra: BTreeMap<String, String>,
}

impl RawListing {
    pub fn new(
        price: String,
        area: String,
        bedrooms: String,
        washrooms: String,
        location: String,
    ) -> Self {
        RawListing {
            price,
            area,
            bedrooms,
            washrooms,
            location,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: String, value: String) -> Self {
        self.extra.insert(key, value);
        self
    }
}

/// A cleaned listing: price in rupees, area in Marla, counts numeric.
///
/// After preprocessing none of the four numeric fields is NaN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub price: f64,
    pub marla: f64,
    pub bedrooms: f64,
    pub washrooms: f64,
    pub location: String,
    pub extra: BTreeMap<String, String>,
}

impl Listing {
    pub fn value(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::Price => self.price,
            NumericColumn::Marla => self.marla,
            NumericColumn::Bedrooms => self.bedrooms,
            NumericColumn::Washrooms => self.washrooms,
        }
    }
}
