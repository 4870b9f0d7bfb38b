//! Markdown rendering of extracted table grids.

/// Renders a cell grid as a markdown table, treating the first row as the
/// header. Missing cells become empty strings; short rows are padded to
/// the header width. Returns `None` when no body rows remain after the
/// header is removed.
pub fn render_table(grid: &[Vec<Option<String>>]) -> Option<String> {
    let (header, body) = grid.split_first()?;
    if body.is_empty() {
        return None;
    }

    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return None;
    }

    let mut out = String::new();
    push_row(&mut out, header, columns);
    out.push('\n');
    out.push_str(&separator_row(columns));
    for row in body {
        out.push('\n');
        push_row(&mut out, row, columns);
    }
    Some(out)
}

fn push_row(out: &mut String, row: &[Option<String>], columns: usize) {
    out.push('|');
    for i in 0..columns {
        let cell = row.get(i).and_then(|c| c.as_deref()).unwrap_or("");
        // Inner newlines would break the table layout.
        let cell = cell.replace('\n', " ");
        out.push(' ');
        out.push_str(cell.trim());
        out.push_str(" |");
    }
}

fn separator_row(columns: usize) -> String {
    let mut out = String::from("|");
    for _ in 0..columns {
        out.push_str("---|");
    }
    out
}
