use crate::cli::output;

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
        }
    }
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }

    /// Formats the table as padded lines: header, rule, rows.
    pub fn lines(&self) -> Vec<String> {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain([column.header.chars().count(), column.width])
                    .max()
                    .unwrap_or(column.width)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render_row(&widths, self.columns.iter().map(|col| col.header.as_str())));
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(rule_width.max(1)));
        for row in &self.rows {
            let cells = (0..self.columns.len())
                .map(|idx| row.get(idx).map(String::as_str).unwrap_or(""));
            lines.push(render_row(&widths, cells));
        }
        lines
    }

    pub fn render(&self) {
        if let Some(title) = &self.title {
            output::section(title);
        }
        for line in self.lines() {
            output::line(line);
        }
    }
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| format!("{:width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_grow_to_fit_cells() {
        let mut table = Table::new(
            None::<String>,
            vec![TableColumn::new("Field", 4), TableColumn::new("Value", 3)],
        );
        table.add_row(vec!["cash On Hand", "100"]);
        let lines = table.lines();
        assert_eq!(lines[0], "Field         Value");
        assert_eq!(lines[2], "cash On Hand  100");
        assert_eq!(lines[1].len(), 12 + 2 + 5);
    }
}
