/// Plain ASCII table with a header row.
#[derive(Debug, Default)]
pub(super) struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(super) fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub(super) fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub(super) fn render(&self) -> Vec<String> {
        let widths = self.widths();
        let border = border_line(&widths);
        let mut lines = Vec::with_capacity(self.rows.len().saturating_add(4));
        lines.push(border.clone());
        lines.push(row_line(&self.headers, &widths));
        lines.push(border.clone());
        for row in &self.rows {
            lines.push(row_line(row, &widths));
        }
        lines.push(border);
        lines
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|header| header.chars().count())
            .collect();
        for row in &self.rows {
            for (column, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(column) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }
}

fn border_line(widths: &[usize]) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|width| "-".repeat(width.saturating_add(2)))
        .collect();
    format!("+{}+", segments.join("+"))
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(column, width)| {
            let cell = cells.get(column).map_or("", String::as_str);
            format!(" {:<width$} ", cell, width = *width)
        })
        .collect();
    format!("|{}|", padded.join("|"))
}
