//! Horizontal bar charts for a [`StockTable`].
//!
//! Rows are drawn in table order, so the largest value sits on top. Two
//! renderers share the same layout rules: an SVG document written next to
//! the CSV and a block-character chart for the terminal.

use crate::core::export::{display_width, pad_end};
use crate::core::StockTable;
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    pub grid: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Product stock scale".to_string(),
            x_label: "Value".to_string(),
            y_label: "Type".to_string(),
            width: 1400,
            height: 800,
            grid: true,
        }
    }
}

const GRID_TICKS: u32 = 5;
const BAR_COLOR: &str = "#1f77b4";

/// Renders a standalone SVG document.
pub fn render_svg(table: &StockTable, options: &ChartOptions) -> String {
    let label_columns = table
        .rows
        .iter()
        .map(|r| display_width(&r.category))
        .max()
        .unwrap_or(0) as f64;

    let margin_left = 60.0 + label_columns * 7.5;
    let margin_right = 40.0;
    let margin_top = 60.0;
    let margin_bottom = 70.0;
    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let plot_w = (width - margin_left - margin_right).max(1.0);
    let plot_h = (height - margin_top - margin_bottom).max(1.0);
    let max_value = axis_max(table.max_value().unwrap_or(0.0));

    let mut svg = String::new();
    // write! 到 String 不會失敗
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="SimHei, 'Microsoft YaHei', sans-serif">"#,
        w = options.width,
        h = options.height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="32" font-size="20" text-anchor="middle">{}</text>"#,
        width / 2.0,
        escape_xml(&options.title)
    );

    for tick in 0..=GRID_TICKS {
        let value = max_value * f64::from(tick) / f64::from(GRID_TICKS);
        let x = margin_left + plot_w * f64::from(tick) / f64::from(GRID_TICKS);
        if options.grid {
            let _ = writeln!(
                svg,
                r##"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#dddddd"/>"##,
                top = margin_top,
                bottom = margin_top + plot_h
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
            x,
            margin_top + plot_h + 18.0,
            format_tick(value)
        );
    }

    if !table.is_empty() {
        let slot = plot_h / table.len() as f64;
        let bar_h = slot * 0.8;
        for (i, row) in table.rows.iter().enumerate() {
            let y = margin_top + slot * i as f64 + (slot - bar_h) / 2.0;
            let bar_w = if max_value > 0.0 && row.value.is_finite() {
                (row.value.max(0.0) / max_value) * plot_w
            } else {
                0.0
            };
            let _ = writeln!(
                svg,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                margin_left,
                y,
                bar_w,
                bar_h,
                BAR_COLOR,
                escape_xml(&row.category),
                row.value
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                margin_left - 8.0,
                y + bar_h / 2.0,
                escape_xml(&row.category)
            );
        }
        if options.grid {
            for i in 0..=table.len() {
                let y = margin_top + slot * i as f64;
                let _ = writeln!(
                    svg,
                    r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#eeeeee"/>"##,
                    margin_left,
                    margin_left + plot_w
                );
            }
        }
    }

    let _ = writeln!(
        svg,
        r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/><line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
        l = margin_left,
        t = margin_top,
        b = margin_top + plot_h,
        r = margin_left + plot_w
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">{}</text>"#,
        margin_left + plot_w / 2.0,
        height - 20.0,
        escape_xml(&options.x_label)
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 20 {:.1})">{}</text>"#,
        margin_top + plot_h / 2.0,
        margin_top + plot_h / 2.0,
        escape_xml(&options.y_label)
    );
    let _ = writeln!(svg, "</svg>");
    svg
}

/// Renders one line per row: `label │████████ value`.
pub fn render_text(table: &StockTable, title: &str, bar_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(display_width(title).max(20)));

    if table.is_empty() {
        let _ = writeln!(out, "(no data)");
        return out;
    }

    let label_width = table
        .rows
        .iter()
        .map(|r| display_width(&r.category))
        .max()
        .unwrap_or(0);
    let max_value = table.max_value().unwrap_or(0.0);

    for row in &table.rows {
        let filled = if max_value > 0.0 && row.value.is_finite() && row.value > 0.0 {
            ((row.value / max_value) * bar_width as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{} │{} {:.2}",
            pad_end(&row.category, label_width),
            "█".repeat(filled.min(bar_width)),
            row.value
        );
    }
    out
}

/// Rounds the axis end up to 1, 2, 2.5 or 5 times a power of ten.
fn axis_max(max_value: f64) -> f64 {
    if !max_value.is_finite() || max_value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(max_value.log10().floor() as i32);
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|s| s * magnitude >= max_value)
        .unwrap_or(10.0);
    step * magnitude
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
