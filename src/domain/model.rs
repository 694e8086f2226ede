use serde::{Deserialize, Serialize};

/// One (X, Y) observation. `Y` is a list; the upstream charts several
/// measures per point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Point {
    #[serde(rename = "X", default)]
    pub x: serde_json::Value,
    #[serde(rename = "Y", default)]
    pub y: Vec<serde_json::Value>,
}

/// A named group of points as returned by the market chart endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    #[serde(rename = "SeriesName", default)]
    pub series_name: Option<String>,
    #[serde(rename = "Points", default)]
    pub points: Vec<Point>,
}

impl Series {
    /// 名稱為空或僅有空白的序列不算分類
    pub fn category(&self) -> Option<&str> {
        self.series_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
}

/// Category name → value, in upstream order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryValues {
    pub label: String,
    pub entries: Vec<CategoryValue>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockRow {
    pub index: usize,
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockTable {
    pub category_column: String,
    pub value_column: String,
    pub rows: Vec<StockRow>,
}

impl StockTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|row| row.value)
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

/// Paths written by the load phase.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub csv_path: String,
    pub svg_path: Option<String>,
    pub rows: usize,
}
