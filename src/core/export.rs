use crate::core::StockTable;
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// CSV with a leading unnamed index column:
///
/// ```text
/// ,Product Type,Stock Amount
/// 0,企业ABS,3400.25
/// ```
pub fn write_csv(table: &StockTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(["", table.category_column.as_str(), table.value_column.as_str()])?;
    for row in &table.rows {
        writer.serialize((row.index, &row.category, row.value))?;
    }

    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

/// Expands `{type}` and `{timestamp}` in the configured file name.
pub fn resolve_file_name(template: &str, market_type: &str, now: DateTime<Utc>) -> String {
    template
        .replace("{type}", market_type)
        .replace("{timestamp}", &now.format("%Y%m%d_%H%M%S").to_string())
}

/// Terminal columns occupied by `text`; CJK characters count as two.
pub(crate) fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

pub(crate) fn pad_end(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn pad_start(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", " ".repeat(fill), text)
}

impl fmt::Display for StockTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let category_width = self
            .rows
            .iter()
            .map(|r| display_width(&r.category))
            .chain(std::iter::once(display_width(&self.category_column)))
            .max()
            .unwrap_or(0);
        let values: Vec<String> = self.rows.iter().map(|r| format!("{:.2}", r.value)).collect();
        let value_width = values
            .iter()
            .map(String::len)
            .chain(std::iter::once(display_width(&self.value_column)))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{}  {}  {}",
            " ".repeat(index_width),
            pad_end(&self.category_column, category_width),
            pad_start(&self.value_column, value_width)
        )?;
        for (row, value) in self.rows.iter().zip(&values) {
            writeln!(
                f,
                "{:>iw$}  {}  {:>vw$}",
                row.index,
                pad_end(&row.category, category_width),
                value,
                iw = index_width,
                vw = value_width
            )?;
        }
        Ok(())
    }
}
