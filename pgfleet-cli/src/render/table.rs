use console::measure_text_width;

/// Minimal tab-writer: collect rows, pad every column to its widest
/// cell, separate columns with two spaces. Cells may carry ANSI color
/// codes; widths are measured on the visible text.
#[derive(Debug, Default)]
pub struct Table {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_header(&mut self, cells: &[&str]) {
        self.header = Some(cells.iter().map(|c| c.to_string()).collect());
    }

    pub fn add_line<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.rows.push(cells.into_iter().collect());
    }

    pub fn print(&self) {
        for line in self.render_lines() {
            println!("{line}");
        }
    }

    fn render_lines(&self) -> Vec<String> {
        let mut widths: Vec<usize> = Vec::new();
        for row in self.header.iter().chain(self.rows.iter()) {
            for (idx, cell) in row.iter().enumerate() {
                let width = measure_text_width(cell);
                if idx == widths.len() {
                    widths.push(width);
                } else if width > widths[idx] {
                    widths[idx] = width;
                }
            }
        }

        let mut out = Vec::with_capacity(self.rows.len() + 1);
        for row in self.header.iter().chain(self.rows.iter()) {
            let mut line = String::new();
            for (idx, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if idx + 1 < row.len() {
                    let pad = widths[idx]
                        .saturating_sub(measure_text_width(cell))
                        + 2;
                    line.extend(std::iter::repeat_n(' ', pad));
                }
            }
            out.push(line);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_columns_to_widest_cell() {
        let mut table = Table::new();
        table.add_header(&["Name", "State"]);
        table.add_line(vec!["db-1".to_string(), "Primary".to_string()]);
        table.add_line(vec![
            "db-1-replica".to_string(),
            "Standby (sync)".to_string(),
        ]);

        let lines = table.render_lines();
        assert_eq!(lines[0], "Name          State");
        assert_eq!(lines[1], "db-1          Primary");
        assert_eq!(lines[2], "db-1-replica  Standby (sync)");
    }

    #[test]
    fn colored_cells_measure_visible_width() {
        let mut table = Table::new();
        table.add_line(vec![
            console::style("OK").green().force_styling(true).to_string(),
            "x".to_string(),
        ]);
        table.add_line(vec!["longer".to_string(), "y".to_string()]);

        let lines = table.render_lines();
        // Both rows end at the same visible column.
        assert!(lines[0].ends_with("  x"));
        assert!(lines[1].ends_with("  y"));
        assert_eq!(measure_text_width(&lines[0]), measure_text_width(&lines[1]));
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let mut table = Table::new();
        table.add_line(vec!["a".to_string()]);
        table.add_line(vec!["b".to_string(), "c".to_string()]);
        assert_eq!(table.render_lines().len(), 2);
    }
}
