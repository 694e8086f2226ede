use crate::core::{CategoryValue, CategoryValues, Series, StockRow, StockTable};
use crate::utils::error::{EtlError, Result};
use std::cmp::Ordering;

/// Which observation of each series carries the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSelector {
    pub point_index: usize,
    pub value_index: usize,
}

impl Default for PointSelector {
    fn default() -> Self {
        Self {
            point_index: 1,
            value_index: 0,
        }
    }
}

/// Reduces every named series to one value: `points[point_index].Y[value_index]`.
///
/// Unnamed series are skipped. A named series without the selected value is an
/// error; the upstream occasionally returns numbers as strings, those parse.
pub fn parse_series(series: &[Series], selector: PointSelector, label: &str) -> Result<CategoryValues> {
    let mut entries = Vec::with_capacity(series.len());

    for item in series {
        let Some(category) = item.category() else {
            tracing::debug!("Skipping series without a name");
            continue;
        };

        let raw = item
            .points
            .get(selector.point_index)
            .and_then(|point| point.y.get(selector.value_index))
            .ok_or_else(|| EtlError::ProcessingError {
                message: format!(
                    "series '{}' has no Y[{}] at point {} ({} points)",
                    category,
                    selector.value_index,
                    selector.point_index,
                    item.points.len()
                ),
            })?;

        let value = numeric_value(raw).ok_or_else(|| EtlError::ProcessingError {
            message: format!("series '{}' has non-numeric value {}", category, raw),
        })?;

        entries.push(CategoryValue {
            category: category.to_string(),
            value,
        });
    }

    Ok(CategoryValues {
        label: label.to_string(),
        entries,
    })
}

fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Sorts descending by value and numbers the rows from zero.
pub fn build_table(values: CategoryValues, category_column: &str, value_column: &str) -> StockTable {
    let mut entries = values.entries;
    // sort_by 為穩定排序，同值保留上游順序；NaN 排在最後
    entries.sort_by(|a, b| match (a.value.is_nan(), b.value.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.value.total_cmp(&a.value),
    });

    let rows = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| StockRow {
            index,
            category: entry.category,
            value: entry.value,
        })
        .collect();

    StockTable {
        category_column: category_column.to_string(),
        value_column: value_column.to_string(),
        rows,
    }
}
