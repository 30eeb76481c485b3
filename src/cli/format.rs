//! Plain-text table rendering and value formatting for command output.

use chrono::NaiveDate;

use crate::cli::parser::INPUT_DATE_FORMAT;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::left(header)
        }
    }

    pub fn truncated(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width of every column, bounded by its `max_width`.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count();
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                match column.max_width {
                    Some(max_width) => width.min(max_width),
                    None => width,
                }
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let mut lines = vec![self.render_row(&header, &widths)];
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("  "),
        );
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

fn truncate_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    match alignment {
        Alignment::Left => format!("{:<width$}", fitted, width = width),
        Alignment::Right => format!("{:>width$}", fitted, width = width),
    }
}

/// Amounts are always shown with two decimals.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(INPUT_DATE_FORMAT).to_string()
}
