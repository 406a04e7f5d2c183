use colored::{Color, Colorize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub title: &'static str,
    pub align: Align,
    pub color: Option<Color>,
}

impl Column {
    pub fn left(title: &'static str) -> Self {
        Self {
            title,
            align: Align::Left,
            color: None,
        }
    }

    pub fn right(title: &'static str) -> Self {
        Self {
            title,
            align: Align::Right,
            ..Self::left(title)
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Plain text table with columns sized to their widest cell.
///
/// Cells are padded before coloring so escape codes never skew the
/// alignment. Missing cells render empty.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain([column.title.chars().count()])
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render every line, header first
    pub fn render(&self, color: bool) -> String {
        let widths = self.widths();
        let last = self.columns.len().saturating_sub(1);
        let mut out = String::new();

        let header: Vec<&str> = self.columns.iter().map(|c| c.title).collect();
        let lines = std::iter::once(header)
            .chain(
            self.rows
                .iter()
                .map(|row| row.iter().map(String::as_str).collect::<Vec<_>>()),
        );

        for (line_no, cells) in lines.enumerate() {
            let mut line = String::new();
            for (index, column) in self.columns.iter().enumerate() {
                let cell = cells.get(index).copied().unwrap_or("");
                let width = widths[index];
                let padded = match column.align {
                    Align::Right => format!("{:>width$}", cell),
                    Align::Left if index == last => cell.to_string(),
                    Align::Left => format!("{:<width$}", cell),
                };

                if index > 0 {
                    line.push(' ');
                }
                if !color {
                    line.push_str(&padded);
                } else if line_no == 0 {
                    line.push_str(&padded.bold().to_string());
                } else if let Some(c) = column.color {
                    line.push_str(&padded.color(c).to_string());
                } else {
                    line.push_str(&padded);
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            Column::left("Name"),
            Column::right("Size").color(Color::Blue),
            Column::left("Mounted on"),
        ]);
        table.push_row(vec!["sda1".into(), "1.00K".into(), "/".into()]);
        table.push_row(vec!["nvme0n1p2".into(), "931.51G".into(), "/home".into()]);
        table
    }

    #[test]
    fn columns_fit_the_widest_cell() {
        assert_eq!(
            sample().to_string(),
            "Name         Size Mounted on\n\
             sda1        1.00K /\n\
             nvme0n1p2 931.51G /home\n"
        );
    }

    #[test]
    fn short_rows_leave_cells_empty() {
        let mut table = Table::new(vec![Column::left("A"), Column::right("B")]);
        table.push_row(vec!["x".into()]);

        assert_eq!(table.to_string(), "A B\nx\n");
    }

    #[test]
    fn color_does_not_change_plain_text_width() {
        colored::control::set_override(true);
        let rendered = sample().render(true);
        colored::control::unset_override();

        assert!(rendered.contains("\u{1b}["));
        assert_eq!(rendered.lines().count(), 3);
    }
}
