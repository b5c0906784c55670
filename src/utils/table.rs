//! Table rendering utilities for CLI outputs.

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Missing cells render empty; extra cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        push_line(&mut out, &widths, &self.headers);

        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        push_line(&mut out, &widths, &rule);

        for row in &self.rows {
            push_line(&mut out, &widths, row);
        }

        out
    }
}

fn push_line(out: &mut String, widths: &[usize], cells: &[String]) {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| format!("{:<w$}", cells.get(i).map(String::as_str).unwrap_or("")))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
