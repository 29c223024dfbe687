//! Table rendering for the CLI and HTTP front ends
//!
//! Pure formatting over [`Table`] values: aligned plain text, CSV, and an
//! escaped HTML fragment mirroring the portal's own table markup.

use crate::models::{Candidate, GradeReport, Table};

/// Render a table as aligned plain text, one row per line
#[must_use]
pub fn to_text(table: &Table) -> String {
    if table.is_empty() {
        return String::new();
    }

    let mut widths = vec![0usize; table.column_count()];
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &table.rows {
        let padded: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = widths[i].saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect();
        out.push_str(padded.join(" | ").trim_end());
        out.push('\n');
    }

    out
}

/// Render a table as CSV with CRLF row endings
#[must_use]
pub fn to_csv(table: &Table) -> String {
    let mut out = String::new();
    for row in &table.rows {
        let fields: Vec<String> = row.iter().map(|cell| csv_field(cell)).collect();
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Quote a CSV field when it carries separators, quotes, or line breaks
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render a table as an escaped HTML fragment
///
/// The first row becomes a `<thead>` of header cells, mirroring the
/// portal's own `table table-bordered` markup.
#[must_use]
pub fn to_html(table: &Table) -> String {
    if table.is_empty() {
        return "<p>No data available.</p>".to_string();
    }

    let mut html = String::from("<table class=\"table table-bordered\">");

    if let Some(header) = table.header() {
        html.push_str("<thead><tr>");
        for cell in header {
            html.push_str(&format!("<th>{}</th>", html_escape::encode_text(cell)));
        }
        html.push_str("</tr></thead>");
    }

    html.push_str("<tbody>");
    for row in table.rows.iter().skip(1) {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", html_escape::encode_text(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    html
}

/// Compose the info and grades tables into the fragment served over HTTP
#[must_use]
pub fn report_to_html(report: &GradeReport) -> String {
    format!("{}<br><br>{}", to_html(&report.info), to_html(&report.grades))
}

/// Default CSV file name for a retrieved grade sheet
#[must_use]
pub fn default_csv_name(identifier: &str, birth_date: &Candidate) -> String {
    format!("grades_{identifier}_{}.csv", birth_date.wire().replace('/', "-"))
}
