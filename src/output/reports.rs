//! Console summaries of computed statistics

use prettytable::{Table, Row, Cell, format};
use super::chartable::BarChartValue;

/// Format a compact table with headers and rows using prettytable-rs clean format
pub fn format_compact_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);

    let header_cells: Vec<Cell> = headers.iter()
        .map(|header| Cell::new(header))
        .collect();
    table.add_row(Row::new(header_cells));

    for row in rows {
        let data_cells: Vec<Cell> = row.iter()
            .map(|cell| Cell::new(cell))
            .collect();
        table.add_row(Row::new(data_cells));
    }

    // 2-space indent under the chart title
    let table_output = table.to_string();
    let mut result = String::new();
    for line in table_output.lines() {
        result.push_str("  ");
        result.push_str(line);
        result.push('\n');
    }

    result
}

/// Title line followed by a label/value table, or a note when there is no data
pub fn format_chart_summary(title: &str, values: &[BarChartValue]) -> String {
    let rows: Vec<Vec<String>> = values
        .iter()
        .map(|v| vec![v.label.clone(), v.value.to_string()])
        .collect();

    let mut summary = format!("{}\n", title);
    if rows.is_empty() {
        summary.push_str("  (no data)\n");
    } else {
        summary.push_str(&format_compact_table(&["Label", "Pushes"], &rows));
    }
    summary
}
