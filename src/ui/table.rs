use crossterm::style::Color;

use super::theme::Theme;
use super::util::truncate;

/// Widest a column may grow before cells are truncated.
const MAX_COLUMN_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone)]
pub(crate) struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    pub(crate) fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self { text, color: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

/// Boxed text table. Widths are measured on plain text and color is applied
/// after padding, so ANSI codes never skew the layout.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    title: Option<String>,
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub(crate) fn new(headers: &[&str]) -> Self {
        Self {
            title: None,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            aligns: vec![Align::Left; headers.len()],
            rows: Vec::new(),
        }
    }

    pub(crate) fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub(crate) fn align(mut self, aligns: &[Align]) -> Self {
        for (slot, align) in self.aligns.iter_mut().zip(aligns) {
            *slot = *align;
        }
        self
    }

    /// Missing trailing cells render empty; extra cells are dropped.
    pub(crate) fn row(&mut self, cells: Vec<Cell>) {
        let mut cells: Vec<Cell> = cells
            .into_iter()
            .take(self.headers.len())
            .map(|c| Cell {
                text: truncate(&c.text, MAX_COLUMN_WIDTH),
                color: c.color,
            })
            .collect();
        cells.resize_with(self.headers.len(), || Cell::from(""));
        self.rows.push(cells);
    }

    pub(crate) fn render(&self, theme: &Theme) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .map(|r| r[i].text.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&theme.heading(title));
            out.push('\n');
        }

        out.push_str(&border(&widths, '┌', '┬', '┐'));
        let header_cells: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| theme.heading(&pad(h, *w, Align::Center)))
            .collect();
        out.push_str(&line(&header_cells));

        out.push_str(&border(&widths, '├', '┼', '┤'));
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .zip(&self.aligns)
                .map(|((cell, w), align)| {
                    let padded = pad(&cell.text, *w, *align);
                    match cell.color {
                        Some(color) => theme.paint(&padded, color),
                        None => padded,
                    }
                })
                .collect();
            out.push_str(&line(&cells));
        }
        out.push_str(&border(&widths, '└', '┴', '┘'));
        out
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    let gap = width.saturating_sub(len);
    match align {
        Align::Left => format!("{text}{}", " ".repeat(gap)),
        Align::Right => format!("{}{text}", " ".repeat(gap)),
        Align::Center => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn line(cells: &[String]) -> String {
    let inner: Vec<String> = cells.iter().map(|c| format!(" {c} ")).collect();
    format!("│{}│\n", inner.join("│"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme;

    #[test]
    fn test_render_plain_table() {
        let mut table = Table::new(&["Type", "Total Amount"])
            .title("Monthly Financial Report")
            .align(&[Align::Center, Align::Right]);
        table.row(vec!["income".into(), "1,000.00".into()]);
        table.row(vec!["expense".into(), "200.00".into()]);

        let expected = "\
Monthly Financial Report
┌─────────┬──────────────┐
│  Type   │ Total Amount │
├─────────┼──────────────┤
│ income  │     1,000.00 │
│ expense │       200.00 │
└─────────┴──────────────┘
";
        assert_eq!(table.render(&Theme::plain()), expected);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(&["A", "B"]);
        table.row(vec!["x".into()]);
        let rendered = table.render(&Theme::plain());
        assert!(rendered.contains("│ x │   │"));
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let mut table = Table::new(&["Category"]);
        table.row(vec!["x".repeat(50).as_str().into()]);
        let rendered = table.render(&Theme::plain());
        assert!(rendered.contains(&format!("{}…", "x".repeat(MAX_COLUMN_WIDTH - 1))));
        assert!(!rendered.contains(&"x".repeat(MAX_COLUMN_WIDTH)));
    }

    #[test]
    fn test_colored_cells_keep_alignment_when_plain() {
        let mut table = Table::new(&["Balance"]).align(&[Align::Right]);
        table.row(vec![Cell::colored("-5.00", theme::RED)]);
        table.row(vec!["1,234.00".into()]);
        let rendered = table.render(&Theme::plain());
        assert!(rendered.contains("│    -5.00 │"));
        assert!(rendered.contains("│ 1,234.00 │"));
    }
}
