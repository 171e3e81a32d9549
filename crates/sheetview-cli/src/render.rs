//! HTML page generator.
//!
//! Renders a loaded worksheet as a self-contained HTML document with a
//! title and a styled table.

use anyhow::{bail, Result};
use sheetview_data::NormalizedTable;

/// A worksheet ready to be served as HTML
///
/// Built once at startup and shared read-only with every request.
#[derive(Debug, Clone)]
pub struct TablePage {
    title: String,
    table: NormalizedTable,
    /// Column moved in front of the table as row labels
    row_label: Option<usize>,
}

impl TablePage {
    /// Create a page for `table`
    ///
    /// # Errors
    /// Fails if `row_label_column` names a column the table does not have.
    /// With duplicate labels the first matching column is used.
    pub fn new(
        table: NormalizedTable,
        title: impl Into<String>,
        row_label_column: Option<&str>,
    ) -> Result<Self> {
        let row_label = match row_label_column {
            Some(label) => match table.column_index(label) {
                Some(index) => Some(index),
                None => bail!(
                    "Row label column '{}' not found; available columns: {}",
                    label,
                    table.columns.join(", ")
                ),
            },
            None => None,
        };

        Ok(Self {
            title: title.into(),
            table,
            row_label,
        })
    }

    /// The table behind the page
    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    /// Page title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Generate the complete HTML document
    pub fn to_html(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            color: #333;
            margin: 0 auto;
            padding: 2rem;
            background: #f8f9fa;
        }}
        table {{
            border-collapse: collapse;
            background: white;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        caption {{
            font-size: 1.5rem;
            font-weight: bold;
            padding: 0.75rem;
            border-bottom: 2px solid #dee2e6;
        }}
        th, td {{
            padding: 0.5rem 0.75rem;
            border-bottom: 1px solid #dee2e6;
            text-align: left;
            vertical-align: top;
        }}
        thead th {{
            color: #495057;
            border-bottom: 2px solid #dee2e6;
        }}
        tbody th {{
            border-right: 2px solid #dee2e6;
        }}
        tbody tr:hover {{ background: #f1f3f5; }}
        .empty {{ color: #6c757d; text-align: center; }}
    </style>
</head>
<body>
    <table>
        <caption>{title}</caption>
        <thead>
            <tr>{head}</tr>
        </thead>
        <tbody>{body}
        </tbody>
    </table>
</body>
</html>"#,
            title = html_escape(&self.title),
            head = self.format_head(),
            body = self.format_body(),
        )
    }

    fn format_head(&self) -> String {
        let mut html = String::new();

        if self.row_label.is_some() {
            html.push_str("<th></th>");
        }

        for (i, label) in self.table.columns.iter().enumerate() {
            if Some(i) == self.row_label {
                continue;
            }
            html.push_str(&format!(r#"<th scope="col">{}</th>"#, html_escape(label)));
        }

        html
    }

    fn format_body(&self) -> String {
        if self.table.rows.is_empty() {
            let width = self.table.col_count().max(1);
            return format!(
                r#"
            <tr><td class="empty" colspan="{}">No rows</td></tr>"#,
                width
            );
        }

        let mut html = String::new();

        for row in &self.table.rows {
            html.push_str("\n            <tr>");

            if let Some(index) = self.row_label {
                let label = row.get(index).map(String::as_str).unwrap_or_default();
                html.push_str(&format!(r#"<th scope="row">{}</th>"#, html_escape(label)));
            }

            for (i, cell) in row.iter().enumerate() {
                if Some(i) == self.row_label {
                    continue;
                }
                html.push_str(&format!("<td>{}</td>", html_escape(cell)));
            }

            html.push_str("</tr>");
        }

        html
    }
}

/// Basic HTML escaping for security
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
