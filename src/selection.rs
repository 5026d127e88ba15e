//! Text extraction from a grid selection.
//!
//! Selections address rows absolutely: index 0 is the oldest scrollback
//! row, visible rows follow after the history. Extraction skips wide-char
//! spacer cells, trims trailing blanks on hard line breaks, and joins
//! soft-wrapped rows without inserting a newline.

use crate::cell::CellFlags;
use crate::grid::Grid;

/// One end of a selection, in absolute grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionPoint {
    /// Absolute row (0 = oldest scrollback row).
    pub row: usize,
    /// Column within the row.
    pub col: usize,
}

/// An inclusive selection between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: SelectionPoint,
    pub end: SelectionPoint,
}

impl Selection {
    pub fn new(start: SelectionPoint, end: SelectionPoint) -> Self {
        Self { start, end }
    }

    /// The two endpoints in document order.
    fn ordered(&self) -> (SelectionPoint, SelectionPoint) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

/// Extract the text covered by `selection`, newline-separated per hard
/// line break.
pub fn extract_text(grid: &Grid, selection: &Selection) -> String {
    let (start, end) = selection.ordered();
    let mut result = String::new();

    for abs_row in start.row..=end.row {
        let Some(row) = grid.absolute_row(abs_row) else {
            break;
        };
        if row.is_empty() {
            continue;
        }

        let row_start = if abs_row == start.row { start.col } else { 0 };
        let row_end = if abs_row == end.row {
            end.col
        } else {
            row.len() - 1
        };

        let mut line = String::new();
        for col in row_start..=row_end.min(row.len() - 1) {
            let cell = &row[col];
            if cell
                .flags
                .intersects(CellFlags::WIDE_CHAR_SPACER | CellFlags::LEADING_WIDE_CHAR_SPACER)
            {
                continue;
            }
            line.push(if cell.ch == '\0' { ' ' } else { cell.ch });
        }

        let is_wrapped = row[row.len() - 1].flags.contains(CellFlags::WRAPLINE);
        if is_wrapped && abs_row < end.row {
            // Soft wrap: keep trailing cells, no newline.
            result.push_str(&line);
        } else {
            result.push_str(line.trim_end());
            if abs_row < end.row {
                result.push('\n');
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{Selection, SelectionPoint, extract_text};
    use crate::grid::Grid;

    fn select(grid: &Grid, start: (usize, usize), end: (usize, usize)) -> String {
        extract_text(
            grid,
            &Selection::new(
                SelectionPoint {
                    row: start.0,
                    col: start.1,
                },
                SelectionPoint {
                    row: end.0,
                    col: end.1,
                },
            ),
        )
    }

    #[test]
    fn single_row_extraction() {
        let mut grid = Grid::new(3, 10);
        for ch in "hello".chars() {
            grid.put_char(ch);
        }
        assert_eq!(select(&grid, (0, 0), (0, 4)), "hello");
    }

    #[test]
    fn partial_row_extraction() {
        let mut grid = Grid::new(3, 10);
        for ch in "hello".chars() {
            grid.put_char(ch);
        }
        assert_eq!(select(&grid, (0, 1), (0, 3)), "ell");
    }

    #[test]
    fn multi_row_hard_break_inserts_newline() {
        let mut grid = Grid::new(3, 10);
        for ch in "one".chars() {
            grid.put_char(ch);
        }
        grid.goto(1, 0);
        for ch in "two".chars() {
            grid.put_char(ch);
        }
        assert_eq!(select(&grid, (0, 0), (1, 9)), "one\ntwo");
    }

    #[test]
    fn soft_wrapped_rows_join_without_newline() {
        let mut grid = Grid::new(3, 5);
        for ch in "abcdefg".chars() {
            grid.put_char(ch);
        }
        assert_eq!(select(&grid, (0, 0), (1, 4)), "abcdefg");
    }

    #[test]
    fn wide_chars_extract_once() {
        let mut grid = Grid::new(3, 10);
        grid.put_char('好');
        grid.put_char('き');
        assert_eq!(select(&grid, (0, 0), (0, 9)), "好き");
    }

    #[test]
    fn selection_spans_scrollback_into_grid() {
        let mut grid = Grid::new(2, 10);
        for ch in "old".chars() {
            grid.put_char(ch);
        }
        grid.goto(1, 0);
        for ch in "new".chars() {
            grid.put_char(ch);
        }
        grid.linefeed();
        // "old" is now in scrollback (absolute row 0).
        assert_eq!(grid.scrollback_len(), 1);
        assert_eq!(select(&grid, (0, 0), (1, 9)), "old\nnew");
    }

    #[test]
    fn reversed_endpoints_normalize() {
        let mut grid = Grid::new(3, 10);
        for ch in "swap".chars() {
            grid.put_char(ch);
        }
        assert_eq!(select(&grid, (0, 3), (0, 0)), "swap");
    }

    #[test]
    fn out_of_range_rows_stop_extraction() {
        let grid = Grid::new(2, 10);
        // Two blank visible rows, then nothing: one separator per row edge.
        assert_eq!(select(&grid, (0, 0), (10, 5)), "\n\n");
    }
}
