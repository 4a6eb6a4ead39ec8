use colored::Colorize;

use crate::cli::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub align: Align,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            align: Align::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            align: Align::Right,
        }
    }
}

/// Read-only table printed with padded columns sized to their content.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: Option<&str>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(str::to_string),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Header, rule and rows, one string per line, without colour.
    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        let headers = self.columns.iter().map(|column| column.header.as_str());
        lines.push(format_row(&self.columns, &widths, headers));
        let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2;
        lines.push("-".repeat(total.max(1)));
        for row in &self.rows {
            let cells = (0..self.columns.len())
                .map(|idx| row.get(idx).map(String::as_str).unwrap_or(""));
            lines.push(format_row(&self.columns, &widths, cells));
        }
        lines
    }
}

fn format_row<'a>(
    columns: &[TableColumn],
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> String {
    let mut line = String::new();
    for (idx, (column, cell)) in columns.iter().zip(cells).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let width = widths[idx];
        match column.align {
            Align::Left => line.push_str(&format!("{cell:<width$}")),
            Align::Right => line.push_str(&format!("{cell:>width$}")),
        }
    }
    line.trim_end().to_string()
}

pub struct TableRenderer;

impl TableRenderer {
    pub fn render(table: &Table) {
        if let Some(title) = &table.title {
            output::section(title);
        }
        for (idx, line) in table.lines().into_iter().enumerate() {
            if idx == 0 {
                println!("{}", line.bold());
            } else {
                println!("{line}");
            }
        }
    }
}
