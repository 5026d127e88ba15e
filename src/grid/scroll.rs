//! Scroll operations: scroll up/down, line feed, carriage return,
//! reverse index, and scrollback eviction.

use super::{Grid, Row};

impl Grid {
    /// LF: move the cursor down one line. At the bottom of the scroll
    /// region, scroll the region contents up instead.
    pub fn linefeed(&mut self) {
        self.cursor.input_needs_wrap = false;
        if self.cursor.row == self.scroll_bottom {
            self.scroll_up(1);
        } else if self.cursor.row + 1 < self.lines {
            self.cursor.row += 1;
        } else {
            // Below the scroll region on the last line: nowhere to go.
        }
    }

    /// RI: move the cursor up one line. At the top of the scroll region,
    /// scroll the region contents down instead.
    pub fn reverse_index(&mut self) {
        self.cursor.input_needs_wrap = false;
        if self.cursor.row == self.scroll_top {
            self.scroll_down(1);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        } else {
            // Above the scroll region on line 0: nowhere to go.
        }
    }

    /// CR: move the cursor to column 0.
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.cursor.input_needs_wrap = false;
    }

    /// BS: move the cursor left one column, clearing any pending wrap
    /// without wrapping.
    pub fn backspace(&mut self) {
        if self.cursor.input_needs_wrap {
            self.cursor.input_needs_wrap = false;
            return;
        }
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        }
    }

    /// Scroll the scroll region up by `count` lines. Rows leaving the top
    /// of a region anchored at line 0 are evicted into scrollback.
    pub fn scroll_up(&mut self, count: usize) {
        self.scroll_up_in_region(self.scroll_top, self.scroll_bottom, count);
    }

    /// Scroll the scroll region down by `count` lines. Scrollback is never
    /// written.
    pub fn scroll_down(&mut self, count: usize) {
        self.scroll_down_in_region(self.scroll_top, self.scroll_bottom, count);
    }

    pub(super) fn scroll_up_in_region(&mut self, top: usize, bottom: usize, count: usize) {
        if top > bottom || bottom >= self.lines {
            return;
        }
        let count = count.min(bottom - top + 1);

        for _ in 0..count {
            let scrolled_row = self.rows.remove(top);

            // History only grows when a multi-line region anchored at the
            // top of the screen scrolls.
            if top == 0 && bottom > top {
                self.push_scrollback(scrolled_row);
            }

            self.rows.insert(bottom, Row::new(self.cols));
        }
        self.dirty_mut().mark_all();
    }

    pub(super) fn scroll_down_in_region(&mut self, top: usize, bottom: usize, count: usize) {
        if top > bottom || bottom >= self.lines {
            return;
        }
        let count = count.min(bottom - top + 1);

        for _ in 0..count {
            self.rows.remove(bottom);
            self.rows.insert(top, Row::new(self.cols));
        }
        self.dirty_mut().mark_all();
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::Grid;

    fn fill_lines(grid: &mut Grid, count: usize) {
        for line in 0..count {
            grid.goto(line, 0);
            grid.put_char((b'A' + line as u8) as char);
        }
    }

    #[test]
    fn linefeed_in_middle_moves_down() {
        let mut grid = Grid::new(24, 80);
        grid.goto(5, 3);
        grid.linefeed();
        assert_eq!(grid.cursor.row, 6);
        // Column untouched.
        assert_eq!(grid.cursor.col, 3);
    }

    #[test]
    fn linefeed_at_bottom_scrolls_and_evicts() {
        let mut grid = Grid::new(3, 10);
        fill_lines(&mut grid, 3);
        grid.goto(2, 0);
        grid.linefeed();

        assert_eq!(grid.cursor.row, 2);
        assert_eq!(grid.row(0)[0].ch, 'B');
        assert_eq!(grid.row(1)[0].ch, 'C');
        assert!(grid.row(2)[0].is_empty());
        // Top row went into history.
        assert_eq!(grid.scrollback_len(), 1);
        assert_eq!(grid.scrollback_row(0).unwrap()[0].ch, 'A');
    }

    #[test]
    fn linefeed_at_region_bottom_scrolls_region_only() {
        let mut grid = Grid::new(5, 10);
        fill_lines(&mut grid, 5);
        grid.set_scroll_region(1, Some(3));
        grid.goto(3, 0);
        grid.linefeed();

        // Outside the region untouched.
        assert_eq!(grid.row(0)[0].ch, 'A');
        assert_eq!(grid.row(4)[0].ch, 'E');
        // Inside: shifted up, blank at the bottom.
        assert_eq!(grid.row(1)[0].ch, 'C');
        assert_eq!(grid.row(2)[0].ch, 'D');
        assert!(grid.row(3)[0].is_empty());
        // Region does not start at row 0: no history.
        assert_eq!(grid.scrollback_len(), 0);
    }

    #[test]
    fn linefeed_in_single_line_region_does_not_grow_scrollback() {
        let mut grid = Grid::new(5, 10);
        grid.set_scroll_region(0, Some(0));
        grid.goto(0, 0);
        grid.linefeed();
        assert_eq!(grid.cursor.row, 0);
        assert_eq!(grid.scrollback_len(), 0);
    }

    #[test]
    fn scrollback_is_bounded() {
        let mut grid = Grid::with_max_scrollback(2, 10, 3);
        for i in 0..10u8 {
            grid.goto(1, 0);
            grid.put_char(char::from(b'0' + i));
            grid.linefeed();
        }
        assert_eq!(grid.scrollback_len(), 3);
    }

    #[test]
    fn reverse_index_at_top_scrolls_down() {
        let mut grid = Grid::new(3, 10);
        fill_lines(&mut grid, 3);
        grid.goto(0, 0);
        grid.reverse_index();

        assert_eq!(grid.cursor.row, 0);
        assert!(grid.row(0)[0].is_empty());
        assert_eq!(grid.row(1)[0].ch, 'A');
        assert_eq!(grid.row(2)[0].ch, 'B');
        assert_eq!(grid.scrollback_len(), 0);
    }

    #[test]
    fn reverse_index_in_middle_moves_up() {
        let mut grid = Grid::new(24, 80);
        grid.goto(5, 0);
        grid.reverse_index();
        assert_eq!(grid.cursor.row, 4);
    }

    #[test]
    fn scroll_up_count_exceeding_region_blanks_it() {
        let mut grid = Grid::new(3, 10);
        fill_lines(&mut grid, 3);
        grid.scroll_up(100);
        for line in 0..3 {
            assert!(grid.row(line)[0].is_empty());
        }
    }

    #[test]
    fn scroll_down_shifts_rows() {
        let mut grid = Grid::new(3, 10);
        fill_lines(&mut grid, 3);
        grid.scroll_down(1);
        assert!(grid.row(0)[0].is_empty());
        assert_eq!(grid.row(1)[0].ch, 'A');
        assert_eq!(grid.row(2)[0].ch, 'B');
    }

    #[test]
    fn carriage_return_homes_column() {
        let mut grid = Grid::new(5, 10);
        grid.goto(2, 7);
        grid.carriage_return();
        assert_eq!((grid.cursor.row, grid.cursor.col), (2, 0));
    }

    #[test]
    fn backspace_clears_pending_wrap_without_moving() {
        let mut grid = Grid::new(5, 10);
        for _ in 0..10 {
            grid.put_char('x');
        }
        assert!(grid.cursor.input_needs_wrap);
        assert_eq!(grid.cursor.col, 9);

        grid.backspace();
        assert!(!grid.cursor.input_needs_wrap);
        assert_eq!(grid.cursor.col, 9);

        grid.backspace();
        assert_eq!(grid.cursor.col, 8);
    }

    #[test]
    fn backspace_at_column_zero_is_noop() {
        let mut grid = Grid::new(5, 10);
        grid.backspace();
        assert_eq!(grid.cursor.col, 0);
    }
}
