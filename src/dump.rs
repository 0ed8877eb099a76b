//! Markdown rendering of a worksheet range.

use std::io::Write;

use gridstore_core::Worksheet;
use gridstore_core::grid::{Axis, CellPosition, RangePosition};

/// Write the displayed values of `range` as a Markdown table with column
/// letters across the top and 1-based row numbers down the side. Hidden rows
/// and columns are left out.
pub fn write_markdown<W: Write>(w: &mut W, sheet: &Worksheet, range: RangePosition) -> std::io::Result<()> {
    let Ok(range) = sheet.fix_range(range) else {
        return writeln!(w, "*Empty range*");
    };
    let visible = |axis, index| {
        sheet
            .headers(axis)
            .get(index)
            .is_some_and(|header| header.visible)
    };
    let columns: Vec<usize> = (range.col..=range.end_col())
        .filter(|&col| visible(Axis::Column, col))
        .collect();

    write!(w, "|   |")?;
    for &col in &columns {
        write!(w, " {} |", CellPosition::col_to_letters(col))?;
    }
    writeln!(w)?;

    write!(w, "|---|")?;
    for _ in &columns {
        write!(w, "---|")?;
    }
    writeln!(w)?;

    for row in range.row..=range.end_row() {
        if !visible(Axis::Row, row) {
            continue;
        }
        write!(w, "| {} |", row + 1)?;
        for &col in &columns {
            let text = sheet
                .cell(CellPosition::new(row, col))
                .map(|cell| cell.display_text())
                .unwrap_or_default();
            write!(w, " {} |", escape_markdown(&text))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstore_core::EngineConfig;
    use gridstore_core::grid::CellInput;

    fn render(sheet: &Worksheet, range: &str) -> String {
        let mut out = Vec::new();
        write_markdown(&mut out, sheet, range.parse().unwrap()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_layout() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 5)).unwrap();
        sheet.set_cell_data(CellPosition::new(0, 1), CellInput::parse("a|b")).unwrap();
        sheet.set_cell_data(CellPosition::new(1, 0), CellInput::parse("12%")).unwrap();
        assert_eq!(
            render(&sheet, "A1:B2"),
            "|   | A | B |\n|---|---|---|\n| 1 |  | a\\|b |\n| 2 | 12% |  |\n"
        );
    }

    #[test]
    fn test_hidden_rows_skipped() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 5)).unwrap();
        sheet.set_headers_visible(Axis::Row, 1, 1, false).unwrap();
        let text = render(&sheet, "A1:A3");
        assert!(text.contains("| 1 |"));
        assert!(!text.contains("| 2 |"));
        assert!(text.contains("| 3 |"));
    }
}
