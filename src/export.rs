//! One-shot output: plain table, CSV, or JSON.
//!
//! Also home of the column layout and cell formatting that the interactive
//! table reuses, so both views print the same numbers.

use crate::cli::ExportFormat;
use crate::models::TickerRow;
use crate::signals::{Advisory, Verdict};
use anyhow::{Context, Result};
use serde::Serialize;

/// Column headers, in display order.
pub const HEADERS: [&str; 11] = [
    "TKR", "Low1y", "Low1d", "Bid", "Price", "Ask", "High1d", "High1y", "Change", "Change %",
    "Thoughts",
];

/// Placeholder for a value the provider did not send.
const MISSING: &str = "-";

/// Export rows in the specified format.
pub fn export_rows(rows: &[TickerRow], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(export_text(rows)),
        ExportFormat::Csv => Ok(export_csv(rows)),
        ExportFormat::Json => export_json(rows),
    }
}

/// Format an optional price.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.abs() >= 1.0 || p == 0.0 => format!("{:.2}", p),
        // Sub-dollar quotes need more precision to be useful.
        Some(p) => format!("{:.4}", p),
        None => MISSING.to_string(),
    }
}

/// Format an optional signed change.
pub fn format_change(change: Option<f64>) -> String {
    change.map_or_else(|| MISSING.to_string(), |c| format!("{:+.2}", c))
}

/// Format an optional percentage change.
pub fn format_percent(percent: Option<f64>) -> String {
    percent.map_or_else(|| MISSING.to_string(), |p| format!("{:+.2}%", p))
}

/// All display cells for a row, matching [`HEADERS`].
pub fn row_cells(row: &TickerRow) -> [String; 11] {
    [
        row.symbol.to_string(),
        format_price(row.year_low()),
        format_price(row.day_low()),
        format_price(row.bid()),
        format_price(row.price()),
        format_price(row.ask()),
        format_price(row.day_high()),
        format_price(row.year_high()),
        format_change(row.change()),
        format_percent(row.change_percent()),
        row.verdict.to_string(),
    ]
}

/// Export as an aligned table: first column left-aligned, numbers
/// right-aligned, the advisory column left-aligned and unpadded.
fn export_text(rows: &[TickerRow]) -> String {
    let cells: Vec<[String; 11]> = rows.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    output.push_str(&text_line(&HEADERS, &widths));
    output.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    output.push_str(&text_line(&rule_refs, &widths));
    output.push('\n');

    for row in &cells {
        let refs: Vec<&str> = row.iter().map(String::as_str).collect();
        output.push_str(&text_line(&refs, &widths));
        output.push('\n');
    }

    output
}

fn text_line(fields: &[&str], widths: &[usize]) -> String {
    let last = fields.len().saturating_sub(1);
    let mut out = String::new();
    for (i, (field, width)) in fields.iter().zip(widths).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        if i == 0 {
            out.push_str(&format!("{:<width$}", field, width = *width));
        } else if i == last {
            out.push_str(field);
        } else {
            out.push_str(&format!("{:>width$}", field, width = *width));
        }
    }
    out.trim_end().to_string()
}

/// Export as CSV (comma-separated values).
fn export_csv(rows: &[TickerRow]) -> String {
    let mut output = String::new();
    output.push_str(&HEADERS.map(csv_field).join(","));
    output.push('\n');

    for row in rows {
        let fields: Vec<String> = row_cells(row).iter().map(|c| csv_field(c)).collect();
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRow<'a> {
    symbol: &'a str,
    name: Option<&'a str>,
    fifty_two_week_low: Option<f64>,
    day_low: Option<f64>,
    bid: Option<f64>,
    price: Option<f64>,
    ask: Option<f64>,
    day_high: Option<f64>,
    fifty_two_week_high: Option<f64>,
    change: Option<f64>,
    change_percent: Option<f64>,
    /// Missing for rows that could not be classified.
    advisories: Option<&'a [Advisory]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a TickerRow> for JsonRow<'a> {
    fn from(row: &'a TickerRow) -> Self {
        let (advisories, error) = match &row.verdict {
            Verdict::Signals(advisories) => (Some(advisories.as_slice()), None),
            Verdict::Unclassifiable(e) => (None, Some(e.to_string())),
            Verdict::NoData => (None, Some("no data".to_string())),
        };
        Self {
            symbol: row.symbol.as_str(),
            name: row.name(),
            fifty_two_week_low: row.year_low(),
            day_low: row.day_low(),
            bid: row.bid(),
            price: row.price(),
            ask: row.ask(),
            day_high: row.day_high(),
            fifty_two_week_high: row.year_high(),
            change: row.change(),
            change_percent: row.change_percent(),
            advisories,
            error,
        }
    }
}

/// Export as JSON.
fn export_json(rows: &[TickerRow]) -> Result<String> {
    let json_rows: Vec<JsonRow<'_>> = rows.iter().map(JsonRow::from).collect();
    let mut output =
        serde_json::to_string_pretty(&json_rows).context("Failed to serialize rows as JSON")?;
    output.push('\n');
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use crate::tickers::Symbol;

    fn row(symbol: &str, quote: Option<Quote>) -> TickerRow {
        let mut row = TickerRow::pending(Symbol::new(symbol).unwrap());
        row.update(quote);
        row
    }

    fn near_high(symbol: &str) -> TickerRow {
        let quote = Quote {
            name: Some("Apple, Inc.".to_string()),
            year_high: Some(200.0),
            year_low: Some(100.0),
            day_high: Some(196.0),
            day_low: Some(190.0),
            bid: Some(195.0),
            ask: Some(195.1),
            price: Some(195.05),
            change: Some(2.5),
            change_percent: Some(1.3),
            ..Quote::new(Symbol::new(symbol).unwrap())
        };
        row(symbol, Some(quote))
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_price(Some(123.456)), "123.46");
        assert_eq!(format_price(Some(0.01234)), "0.0123");
        assert_eq!(format_price(None), "-");
        assert_eq!(format_change(Some(-1.5)), "-1.50");
        assert_eq!(format_change(Some(2.0)), "+2.00");
        assert_eq!(format_percent(Some(0.5)), "+0.50%");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn test_row_cells_order() {
        let cells = row_cells(&near_high("AAPL"));
        assert_eq!(cells[0], "AAPL");
        assert_eq!(cells[1], "100.00");
        assert_eq!(cells[3], "195.00");
        assert_eq!(cells[7], "200.00");
        assert_eq!(cells[10], "sell, close to high");
    }

    #[test]
    fn test_export_text() {
        let rows = vec![near_high("AAPL"), row("ZZZ", None)];
        let text = export_text(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("TKR"));
        assert!(lines[0].ends_with("Thoughts"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("AAPL"));
        assert!(lines[2].ends_with("sell, close to high"));
        assert!(lines[3].ends_with("no data"));
    }

    #[test]
    fn test_export_csv_quotes_fields() {
        let csv = export_csv(&[near_high("AAPL")]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "TKR,Low1y,Low1d,Bid,Price,Ask,High1d,High1y,Change,Change %,Thoughts"
        );
        let data = lines.next().unwrap();
        assert!(data.starts_with("AAPL,100.00,190.00,195.00,"));
        assert!(data.ends_with(",\"sell, close to high\""));
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_json() {
        let rows = vec![near_high("AAPL"), row("ZZZ", None)];
        let json = export_json(&rows).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["symbol"], "AAPL");
        assert_eq!(value[0]["name"], "Apple, Inc.");
        assert_eq!(value[0]["fiftyTwoWeekHigh"], 200.0);
        assert_eq!(value[0]["advisories"][0], "SELL_NEAR_HIGH");
        assert!(value[0].get("error").is_none());

        assert!(value[1]["advisories"].is_null());
        assert_eq!(value[1]["error"], "no data");
    }

    #[test]
    fn test_export_json_unclassifiable_carries_reason() {
        let rows = vec![row("NEW", Some(Quote::new(Symbol::new("NEW").unwrap())))];
        let json = export_rows(&rows, ExportFormat::Json).unwrap();
        assert!(json.contains("NEW: invalid 52-week range"));
    }
}
