use itertools::Itertools;

use crate::error::Result;
use crate::layout::{CalendarLayout, Cell};

use super::Renderer;

const HEADER: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Plain-text rendition of the grid, mostly useful to check a layout in a
/// terminal before printing it.
pub struct TextPreview {
    cell_width: usize,
    weekend_symbol: Option<char>,
}

impl Default for TextPreview {
    fn default() -> Self {
        TextPreview {
            cell_width: 5,
            weekend_symbol: Some('*'),
        }
    }
}

impl TextPreview {
    pub fn cell_width(mut self, width: usize) -> Self {
        self.cell_width = width;
        self
    }

    pub fn weekend_symbol(mut self, symbol: char) -> Self {
        self.weekend_symbol = Some(symbol);
        self
    }

    pub fn no_weekend_symbol(mut self) -> Self {
        self.weekend_symbol = None;
        self
    }

    fn cell(&self, cell: &Cell) -> String {
        let content = match *cell {
            Cell::Day { day, weekend, .. } => match self.weekend_symbol {
                Some(symbol) if weekend => format!("{}{}", symbol, day),
                _ => day.to_string(),
            },
            Cell::Label { name, rotated: true } => name.to_owned(),
            Cell::Label { name, rotated: false } => {
                return format!("{:<width$}", name, width = self.cell_width)
            }
            Cell::Empty => String::new(),
        };
        format!("{:>width$}", content, width = self.cell_width)
    }
}

impl Renderer for TextPreview {
    fn render(&self, layout: &CalendarLayout) -> Result<String> {
        let mut output = HEADER
            .iter()
            .map(|name| format!("{:>width$}", name, width = self.cell_width))
            .join(" ");
        output.push('\n');

        for row in layout.rows() {
            let line = row.iter().map(|cell| self.cell(cell)).join(" ");
            output += line.trim_end();
            output.push('\n');
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_layout;

    #[test]
    fn february_2025() {
        let layout = generate_layout(2025, 2, 1).unwrap();
        let text = TextPreview::default().render(&layout).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "  Sun   Mon   Tue   Wed   Thu   Fri   Sat");
        assert_eq!(lines[1], "                                Feb    *1");
        assert_eq!(lines[2], "   *2     3     4     5     6     7    *8");
        assert_eq!(lines[5], "  *23    24    25    26    27    28");
    }

    #[test]
    fn dedicated_label_row() {
        let layout = generate_layout(2025, 6, 1).unwrap();
        let text = TextPreview::default()
            .no_weekend_symbol()
            .render(&layout)
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "Jun");
        assert_eq!(lines[2], "    1     2     3     4     5     6     7");
        assert_eq!(lines[6], "   29    30");
    }

    #[test]
    fn empty_layout_only_has_header() {
        let layout = generate_layout(2025, 6, 0).unwrap();
        let text = TextPreview::default().cell_width(3).render(&layout).unwrap();
        assert_eq!(text, "Sun Mon Tue Wed Thu Fri Sat\n");
    }
}
