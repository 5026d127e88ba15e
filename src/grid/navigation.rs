//! Cursor movement, tab stops, save/restore cursor, and scroll region.

use super::Grid;

impl Grid {
    /// Set cursor to absolute `(row, col)`, clamped to grid bounds.
    pub fn goto(&mut self, row: usize, col: usize) {
        self.cursor.row = row.min(self.lines - 1);
        self.cursor.col = col.min(self.cols - 1);
        self.cursor.input_needs_wrap = false;
    }

    /// Set cursor row, clamped to the last line.
    pub fn goto_line(&mut self, row: usize) {
        self.cursor.row = row.min(self.lines - 1);
        self.cursor.input_needs_wrap = false;
    }

    /// Set cursor column, clamped to the last column.
    pub fn goto_col(&mut self, col: usize) {
        self.cursor.col = col.min(self.cols - 1);
        self.cursor.input_needs_wrap = false;
    }

    /// Move cursor up by `n` lines, clamped to the top.
    pub fn move_up(&mut self, n: usize) {
        self.cursor.row = self.cursor.row.saturating_sub(n);
        self.cursor.input_needs_wrap = false;
    }

    /// Move cursor down by `n` lines, clamped to the bottom.
    pub fn move_down(&mut self, n: usize) {
        self.cursor.row = (self.cursor.row + n).min(self.lines - 1);
        self.cursor.input_needs_wrap = false;
    }

    /// Move cursor right by `n` columns, clamped to the last column.
    pub fn move_forward(&mut self, n: usize) {
        self.cursor.col = (self.cursor.col + n).min(self.cols - 1);
        self.cursor.input_needs_wrap = false;
    }

    /// Move cursor left by `n` columns, clamped to column 0.
    pub fn move_backward(&mut self, n: usize) {
        self.cursor.col = self.cursor.col.saturating_sub(n);
        self.cursor.input_needs_wrap = false;
    }

    /// Snapshot the cursor position and attribute template.
    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(self.cursor.clone());
    }

    /// Restore the saved cursor, clamped to current dimensions. Without a
    /// prior save this is a no-op.
    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor.clone() {
            self.cursor = saved;
            self.cursor.row = self.cursor.row.min(self.lines - 1);
            self.cursor.col = self.cursor.col.min(self.cols - 1);
        }
    }

    /// DECSTBM: set the scroll region to `[top..=bottom]` (0-based,
    /// inclusive). Out-of-range values clamp; an inverted pair is ignored.
    pub fn set_scroll_region(&mut self, top: usize, bottom: Option<usize>) {
        let bottom = bottom
            .unwrap_or(self.lines - 1)
            .min(self.lines - 1);
        if top <= bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        }
    }

    /// HT: advance the cursor to the next tab stop, or the last column.
    pub fn advance_tab(&mut self) {
        let mut col = self.cursor.col + 1;
        while col < self.cols && !self.tab_stops[col] {
            col += 1;
        }
        self.cursor.col = col.min(self.cols - 1);
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::Grid;

    #[test]
    fn goto_clamps_to_bounds() {
        let mut grid = Grid::new(24, 80);
        grid.goto(100, 200);
        assert_eq!((grid.cursor.row, grid.cursor.col), (23, 79));
    }

    #[test]
    fn goto_clears_pending_wrap() {
        let mut grid = Grid::new(5, 10);
        for _ in 0..10 {
            grid.put_char('x');
        }
        assert!(grid.cursor.input_needs_wrap);
        grid.goto(0, 0);
        assert!(!grid.cursor.input_needs_wrap);
    }

    #[test]
    fn relative_moves_clamp() {
        let mut grid = Grid::new(24, 80);
        grid.move_up(5);
        assert_eq!(grid.cursor.row, 0);
        grid.move_down(100);
        assert_eq!(grid.cursor.row, 23);
        grid.move_forward(100);
        assert_eq!(grid.cursor.col, 79);
        grid.move_backward(100);
        assert_eq!(grid.cursor.col, 0);
    }

    #[test]
    fn save_restore_round_trips_position_and_template() {
        use crate::color::Color;

        let mut grid = Grid::new(24, 80);
        grid.goto(10, 42);
        grid.cursor.template.fg = Color::Ansi(5);
        grid.save_cursor();

        grid.goto(0, 0);
        grid.cursor.template.fg = Color::Default;

        grid.restore_cursor();
        assert_eq!((grid.cursor.row, grid.cursor.col), (10, 42));
        assert_eq!(grid.cursor.template.fg, Color::Ansi(5));
    }

    #[test]
    fn restore_without_save_is_noop() {
        let mut grid = Grid::new(24, 80);
        grid.goto(3, 4);
        grid.restore_cursor();
        assert_eq!((grid.cursor.row, grid.cursor.col), (3, 4));
    }

    #[test]
    fn restore_clamps_after_shrink() {
        let mut grid = Grid::new(24, 80);
        grid.goto(20, 70);
        grid.save_cursor();
        grid.resize(10, 40);
        grid.restore_cursor();
        assert_eq!((grid.cursor.row, grid.cursor.col), (9, 39));
    }

    #[test]
    fn scroll_region_clamps_and_rejects_inverted() {
        let mut grid = Grid::new(10, 20);
        grid.set_scroll_region(2, Some(100));
        assert_eq!((grid.scroll_top(), grid.scroll_bottom()), (2, 9));

        grid.set_scroll_region(8, Some(3));
        // Inverted: unchanged.
        assert_eq!((grid.scroll_top(), grid.scroll_bottom()), (2, 9));
    }

    #[test]
    fn scroll_region_single_line_is_accepted() {
        let mut grid = Grid::new(10, 20);
        grid.set_scroll_region(4, Some(4));
        assert_eq!((grid.scroll_top(), grid.scroll_bottom()), (4, 4));
    }

    #[test]
    fn tab_advances_to_next_stop() {
        let mut grid = Grid::new(24, 80);
        grid.goto_col(1);
        grid.advance_tab();
        assert_eq!(grid.cursor.col, 8);
        grid.advance_tab();
        assert_eq!(grid.cursor.col, 16);
    }

    #[test]
    fn tab_past_last_stop_goes_to_last_column() {
        let mut grid = Grid::new(24, 80);
        grid.goto_col(77);
        grid.advance_tab();
        assert_eq!(grid.cursor.col, 79);
    }
}
