//! Character writing, erasing, and insertion/deletion operations.

use crate::cell::{Cell, CellFlags, char_width};

use super::Grid;

/// Display erase extents (CSI J).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// From the cursor to the end of the screen.
    Below,
    /// From the start of the screen through the cursor.
    Above,
    /// The whole visible screen.
    All,
    /// The whole visible screen plus scrollback history.
    Saved,
}

/// Line erase extents (CSI K).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClearMode {
    /// From the cursor to the end of the line.
    Right,
    /// From the start of the line through the cursor.
    Left,
    /// The whole line.
    All,
}

impl Grid {
    /// Write a single-width character at the cursor, honoring deferred wrap.
    ///
    /// Wide characters must go through [`Grid::put_wide_char`]; this method
    /// routes them there based on the character's width class.
    pub fn put_char(&mut self, c: char) {
        if char_width(c) == 2 {
            return self.put_wide_char(c);
        }

        if self.cursor.input_needs_wrap {
            self.wrap_cursor();
        }

        let row = self.cursor.row;
        let col = self.cursor.col;

        self.clear_wide_pair_at(row, col);

        let template = self.cursor.template;
        let cell = &mut self.row_mut(row)[col];
        cell.ch = c;
        cell.fg = template.fg;
        cell.bg = template.bg;
        cell.flags = template.flags;

        self.advance_after_write(1);
        self.mark_dirty(row);
    }

    /// Write a wide character: leading cell plus trailing spacer. A wide
    /// character that would straddle the last column wraps first, leaving a
    /// blank filler cell behind.
    pub fn put_wide_char(&mut self, c: char) {
        // A wide character can never fit on a one-column grid.
        if self.cols() < 2 {
            return;
        }

        if self.cursor.input_needs_wrap {
            self.wrap_cursor();
        }

        if self.cursor.col + 1 >= self.cols() {
            // No room for both halves: blank filler, then wrap.
            let row = self.cursor.row;
            let col = self.cursor.col;
            let template = self.cursor.template;
            let filler = &mut self.row_mut(row)[col];
            filler.ch = ' ';
            filler.fg = template.fg;
            filler.bg = template.bg;
            filler.flags = CellFlags::LEADING_WIDE_CHAR_SPACER;
            self.mark_dirty(row);
            self.wrap_cursor();
        }

        let row = self.cursor.row;
        let col = self.cursor.col;

        self.clear_wide_pair_at(row, col);
        self.clear_wide_pair_at(row, col + 1);

        let template = self.cursor.template;
        let cell = &mut self.row_mut(row)[col];
        cell.ch = c;
        cell.fg = template.fg;
        cell.bg = template.bg;
        cell.flags = template.flags | CellFlags::WIDE_CHAR;

        let spacer = &mut self.row_mut(row)[col + 1];
        spacer.ch = ' ';
        spacer.fg = template.fg;
        spacer.bg = template.bg;
        spacer.flags = CellFlags::WIDE_CHAR_SPACER;

        self.advance_after_write(2);
        self.mark_dirty(row);
    }

    /// Advance the cursor after writing `width` columns, deferring the wrap
    /// when it runs past the last column.
    fn advance_after_write(&mut self, width: usize) {
        let col = self.cursor.col + width;
        if col >= self.cols() {
            self.cursor.col = self.cols() - 1;
            self.cursor.input_needs_wrap = true;
        } else {
            self.cursor.col = col;
        }
    }

    /// Wrap now if a wrap is pending. Used by callers that need the cursor
    /// settled on its final row before preparing the write (insert mode).
    pub(crate) fn wrap_if_pending(&mut self) {
        if self.cursor.input_needs_wrap {
            self.wrap_cursor();
        }
    }

    /// Perform the deferred wrap: flag the row as soft-wrapped and move to
    /// column 0 of the next line (scrolling if needed).
    fn wrap_cursor(&mut self) {
        let row = self.cursor.row;
        let last = self.cols() - 1;
        self.row_mut(row)[last].flags.insert(CellFlags::WRAPLINE);
        self.mark_dirty(row);
        self.linefeed();
        self.cursor.col = 0;
    }

    /// If (row, col) holds either half of a wide pair, clear both halves.
    fn clear_wide_pair_at(&mut self, row: usize, col: usize) {
        if col >= self.cols() {
            return;
        }
        let flags = self.row(row)[col].flags;

        if flags.contains(CellFlags::WIDE_CHAR_SPACER) && col > 0 {
            let lead = &mut self.row_mut(row)[col - 1];
            lead.ch = ' ';
            lead.flags.remove(CellFlags::WIDE_CHAR);
        }
        if flags.contains(CellFlags::WIDE_CHAR) && col + 1 < self.cols() {
            let spacer = &mut self.row_mut(row)[col + 1];
            spacer.ch = ' ';
            spacer.flags.remove(CellFlags::WIDE_CHAR_SPACER);
        }
    }

    /// ICH: insert `count` blank cells at the cursor, shifting the rest of
    /// the line right. Cells pushed past the right edge are lost.
    pub fn insert_blank_chars(&mut self, count: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let cols = self.cols();
        let count = count.min(cols - col);

        let cells = self.row_mut(row).cells_mut();
        for i in ((col + count)..cols).rev() {
            cells.swap(i, i - count);
        }
        let blank = Cell::default();
        for cell in &mut cells[col..col + count] {
            cell.reset(&blank);
        }
        self.mark_dirty(row);
    }

    /// DCH: delete `count` cells at the cursor, shifting the rest of the
    /// line left and padding with blank cells at the end.
    pub fn delete_chars(&mut self, count: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let cols = self.cols();
        let count = count.min(cols - col);

        let cells = self.row_mut(row).cells_mut();
        for i in col..(cols - count) {
            cells.swap(i, i + count);
        }
        let blank = Cell::default();
        for cell in &mut cells[cols - count..] {
            cell.reset(&blank);
        }
        self.mark_dirty(row);
    }

    /// ECH: blank `count` cells starting at the cursor without shifting.
    /// The cursor does not move.
    pub fn erase_chars(&mut self, count: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let end = (col + count).min(self.cols());

        let blank = Cell::default();
        for cell in &mut self.row_mut(row).cells_mut()[col..end] {
            cell.reset(&blank);
        }
        self.mark_dirty(row);
    }

    /// ED: erase part or all of the display. Erased cells return to the
    /// default glyph, colors, and flags.
    pub fn erase_display(&mut self, mode: ClearMode) {
        let blank = Cell::default();
        match mode {
            ClearMode::Below => {
                self.erase_line(LineClearMode::Right);
                for line in (self.cursor.row + 1)..self.lines() {
                    self.row_mut(line).reset(&blank);
                }
                self.dirty_mut().mark_all();
            }
            ClearMode::Above => {
                self.erase_line(LineClearMode::Left);
                for line in 0..self.cursor.row {
                    self.row_mut(line).reset(&blank);
                }
                self.dirty_mut().mark_all();
            }
            ClearMode::All => {
                for line in 0..self.lines() {
                    self.row_mut(line).reset(&blank);
                }
                self.dirty_mut().mark_all();
            }
            ClearMode::Saved => {
                self.erase_display(ClearMode::All);
                self.clear_scrollback();
            }
        }
    }

    /// EL: erase part or all of the cursor's line.
    pub fn erase_line(&mut self, mode: LineClearMode) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let cols = self.cols();
        let blank = Cell::default();

        let cells = self.row_mut(row).cells_mut();
        match mode {
            LineClearMode::Right => {
                for cell in &mut cells[col..] {
                    cell.reset(&blank);
                }
            }
            LineClearMode::Left => {
                for cell in &mut cells[..=col.min(cols - 1)] {
                    cell.reset(&blank);
                }
            }
            LineClearMode::All => {
                for cell in cells {
                    cell.reset(&blank);
                }
            }
        }
        self.mark_dirty(row);
    }

    /// IL: insert `count` blank lines at the cursor, pushing lines below it
    /// down within the scroll region. No-op outside the region.
    pub fn insert_lines(&mut self, count: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top() || row > self.scroll_bottom() {
            return;
        }
        self.scroll_down_in_region(row, self.scroll_bottom(), count);
    }

    /// DL: delete `count` lines at the cursor, pulling lines below it up
    /// within the scroll region. No-op outside the region.
    pub fn delete_lines(&mut self, count: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top() || row > self.scroll_bottom() {
            return;
        }
        self.scroll_up_in_region(row, self.scroll_bottom(), count);
    }
}

#[cfg(test)]
mod tests {
    use super::{ClearMode, LineClearMode};
    use crate::cell::CellFlags;
    use crate::color::Color;
    use crate::grid::Grid;

    fn grid_with_text(lines: usize, cols: usize, text: &str) -> Grid {
        let mut grid = Grid::new(lines, cols);
        for ch in text.chars() {
            grid.put_char(ch);
        }
        grid
    }

    #[test]
    fn put_char_writes_and_advances() {
        let mut grid = Grid::new(24, 80);
        grid.put_char('A');
        assert_eq!(grid.row(0)[0].ch, 'A');
        assert_eq!(grid.cursor.col, 1);
    }

    #[test]
    fn put_char_applies_template() {
        let mut grid = Grid::new(24, 80);
        grid.cursor.template.fg = Color::Ansi(1);
        grid.cursor.template.flags = CellFlags::BOLD;
        grid.put_char('R');

        let cell = &grid.row(0)[0];
        assert_eq!(cell.fg, Color::Ansi(1));
        assert!(cell.flags.contains(CellFlags::BOLD));
    }

    #[test]
    fn last_column_write_defers_wrap() {
        let mut grid = Grid::new(5, 10);
        for ch in "0123456789".chars() {
            grid.put_char(ch);
        }
        // Cursor visually at the last column, logically about to wrap.
        assert_eq!((grid.cursor.row, grid.cursor.col), (0, 9));
        assert!(grid.cursor.input_needs_wrap);
        assert_eq!(grid.row(0)[9].ch, '9');

        grid.put_char('A');
        assert_eq!((grid.cursor.row, grid.cursor.col), (1, 1));
        assert_eq!(grid.row(1)[0].ch, 'A');
        assert!(grid.row(0)[9].flags.contains(CellFlags::WRAPLINE));
    }

    #[test]
    fn put_char_marks_row_dirty() {
        let mut grid = Grid::new(5, 10);
        grid.drain_dirty().for_each(drop);
        grid.goto(2, 0);
        grid.put_char('x');
        let dirty: Vec<usize> = grid.drain_dirty().collect();
        assert_eq!(dirty, vec![2]);
    }

    #[test]
    fn wide_char_writes_pair() {
        let mut grid = Grid::new(24, 80);
        grid.put_char('好');
        assert_eq!(grid.row(0)[0].ch, '好');
        assert!(grid.row(0)[0].flags.contains(CellFlags::WIDE_CHAR));
        assert!(grid.row(0)[1].flags.contains(CellFlags::WIDE_CHAR_SPACER));
        assert_eq!(grid.cursor.col, 2);
    }

    #[test]
    fn wide_char_spacer_shares_background() {
        let mut grid = Grid::new(24, 80);
        grid.cursor.template.bg = Color::Ansi(4);
        grid.put_char('好');
        assert_eq!(grid.row(0)[0].bg, Color::Ansi(4));
        assert_eq!(grid.row(0)[1].bg, Color::Ansi(4));
    }

    #[test]
    fn wide_char_at_last_column_wraps_with_filler() {
        let mut grid = Grid::new(24, 5);
        for _ in 0..4 {
            grid.put_char('A');
        }
        assert_eq!(grid.cursor.col, 4);
        grid.put_char('好');

        assert!(
            grid.row(0)[4]
                .flags
                .contains(CellFlags::LEADING_WIDE_CHAR_SPACER)
        );
        assert_eq!(grid.row(1)[0].ch, '好');
        assert_eq!((grid.cursor.row, grid.cursor.col), (1, 2));
    }

    #[test]
    fn wide_char_on_one_column_grid_is_dropped() {
        let mut grid = Grid::new(3, 1);
        grid.put_char('好');
        assert!(grid.row(0)[0].is_empty());
        assert_eq!((grid.cursor.row, grid.cursor.col), (0, 0));
    }

    #[test]
    fn overwriting_spacer_clears_wide_char() {
        let mut grid = Grid::new(24, 80);
        grid.put_char('好');
        grid.goto(0, 1);
        grid.put_char('X');

        assert_eq!(grid.row(0)[0].ch, ' ');
        assert!(!grid.row(0)[0].flags.contains(CellFlags::WIDE_CHAR));
        assert_eq!(grid.row(0)[1].ch, 'X');
    }

    #[test]
    fn overwriting_wide_char_clears_spacer() {
        let mut grid = Grid::new(24, 80);
        grid.put_char('好');
        grid.goto(0, 0);
        grid.put_char('Y');

        assert_eq!(grid.row(0)[0].ch, 'Y');
        assert_eq!(grid.row(0)[1].ch, ' ');
        assert!(!grid.row(0)[1].flags.contains(CellFlags::WIDE_CHAR_SPACER));
    }

    #[test]
    fn insert_blank_shifts_right() {
        let mut grid = grid_with_text(24, 80, "ABCDE");
        grid.goto(0, 1);
        grid.insert_blank_chars(3);

        assert_eq!(grid.row(0)[0].ch, 'A');
        assert!(grid.row(0)[1].is_empty());
        assert!(grid.row(0)[3].is_empty());
        assert_eq!(grid.row(0)[4].ch, 'B');
        assert_eq!(grid.row(0)[5].ch, 'C');
    }

    #[test]
    fn delete_chars_shifts_left_and_pads() {
        let mut grid = grid_with_text(24, 10, "ABCDE");
        grid.goto(0, 1);
        grid.delete_chars(2);

        assert_eq!(grid.row(0)[0].ch, 'A');
        assert_eq!(grid.row(0)[1].ch, 'D');
        assert_eq!(grid.row(0)[2].ch, 'E');
        assert!(grid.row(0)[8].is_empty());
        assert!(grid.row(0)[9].is_empty());
    }

    #[test]
    fn delete_chars_count_clamps_to_line_end() {
        let mut grid = grid_with_text(24, 10, "ABCDE");
        grid.goto(0, 2);
        grid.delete_chars(100);
        assert_eq!(grid.row(0)[1].ch, 'B');
        assert!(grid.row(0)[2].is_empty());
    }

    #[test]
    fn erase_chars_blanks_without_moving_cursor() {
        let mut grid = grid_with_text(24, 10, "ABCDEFGHIJ");
        grid.goto(0, 2);
        grid.erase_chars(5);

        assert_eq!(grid.row(0)[1].ch, 'B');
        assert!(grid.row(0)[2].is_empty());
        assert!(grid.row(0)[6].is_empty());
        assert_eq!(grid.row(0)[7].ch, 'H');
        assert_eq!(grid.cursor.col, 2);
    }

    #[test]
    fn erase_display_below() {
        let mut grid = Grid::new(3, 10);
        for line in 0..3 {
            grid.goto(line, 0);
            for _ in 0..10 {
                grid.put_char('X');
            }
        }
        grid.goto(1, 5);
        grid.erase_display(ClearMode::Below);

        assert_eq!(grid.row(0)[0].ch, 'X');
        assert_eq!(grid.row(1)[4].ch, 'X');
        assert!(grid.row(1)[5].is_empty());
        assert!(grid.row(2)[0].is_empty());
    }

    #[test]
    fn erase_display_above_is_inclusive() {
        let mut grid = Grid::new(3, 10);
        for line in 0..3 {
            grid.goto(line, 0);
            for _ in 0..10 {
                grid.put_char('X');
            }
        }
        grid.goto(1, 5);
        grid.erase_display(ClearMode::Above);

        assert!(grid.row(0)[0].is_empty());
        assert!(grid.row(1)[5].is_empty());
        assert_eq!(grid.row(1)[6].ch, 'X');
        assert_eq!(grid.row(2)[0].ch, 'X');
    }

    #[test]
    fn erase_display_all_keeps_scrollback() {
        let mut grid = Grid::new(2, 10);
        grid.put_char('a');
        grid.goto(1, 0);
        grid.linefeed();
        assert_eq!(grid.scrollback_len(), 1);

        grid.erase_display(ClearMode::All);
        assert!(grid.row(0)[0].is_empty());
        assert_eq!(grid.scrollback_len(), 1);
    }

    #[test]
    fn erase_display_saved_purges_scrollback() {
        let mut grid = Grid::new(2, 10);
        grid.goto(1, 0);
        grid.linefeed();
        assert_eq!(grid.scrollback_len(), 1);

        grid.erase_display(ClearMode::Saved);
        assert_eq!(grid.scrollback_len(), 0);
    }

    #[test]
    fn erase_uses_default_background_not_template() {
        let mut grid = Grid::new(2, 10);
        grid.cursor.template.bg = Color::Ansi(4);
        grid.put_char('X');
        grid.goto(0, 0);
        grid.erase_line(LineClearMode::All);
        assert_eq!(grid.row(0)[0].bg, Color::Default);
    }

    #[test]
    fn erase_line_variants() {
        let mut grid = grid_with_text(24, 10, "ABCDEFGHIJ");
        grid.goto(0, 5);
        grid.erase_line(LineClearMode::Right);
        assert_eq!(grid.row(0)[4].ch, 'E');
        assert!(grid.row(0)[5].is_empty());
        assert!(grid.row(0)[9].is_empty());

        let mut grid = grid_with_text(24, 10, "ABCDEFGHIJ");
        grid.goto(0, 5);
        grid.erase_line(LineClearMode::Left);
        assert!(grid.row(0)[0].is_empty());
        assert!(grid.row(0)[5].is_empty());
        assert_eq!(grid.row(0)[6].ch, 'G');

        let mut grid = grid_with_text(24, 10, "ABCDEFGHIJ");
        grid.erase_line(LineClearMode::All);
        assert!(grid.row(0).iter().all(crate::cell::Cell::is_empty));
    }

    #[test]
    fn insert_lines_pushes_down_within_region() {
        let mut grid = Grid::new(5, 10);
        for line in 0..5 {
            grid.goto(line, 0);
            grid.put_char((b'A' + line as u8) as char);
        }
        grid.goto(2, 0);
        grid.insert_lines(2);

        assert_eq!(grid.row(0)[0].ch, 'A');
        assert_eq!(grid.row(1)[0].ch, 'B');
        assert!(grid.row(2)[0].is_empty());
        assert!(grid.row(3)[0].is_empty());
        assert_eq!(grid.row(4)[0].ch, 'C');
    }

    #[test]
    fn delete_lines_pulls_up_within_region() {
        let mut grid = Grid::new(5, 10);
        for line in 0..5 {
            grid.goto(line, 0);
            grid.put_char((b'A' + line as u8) as char);
        }
        grid.goto(1, 0);
        grid.delete_lines(2);

        assert_eq!(grid.row(0)[0].ch, 'A');
        assert_eq!(grid.row(1)[0].ch, 'D');
        assert_eq!(grid.row(2)[0].ch, 'E');
        assert!(grid.row(3)[0].is_empty());
        assert!(grid.row(4)[0].is_empty());
    }

    #[test]
    fn line_ops_outside_region_are_noops() {
        let mut grid = Grid::new(5, 10);
        for line in 0..5 {
            grid.goto(line, 0);
            grid.put_char((b'A' + line as u8) as char);
        }
        grid.set_scroll_region(1, Some(3));

        grid.goto(0, 0);
        grid.insert_lines(1);
        assert_eq!(grid.row(0)[0].ch, 'A');
        assert_eq!(grid.row(1)[0].ch, 'B');

        grid.goto(4, 0);
        grid.delete_lines(1);
        assert_eq!(grid.row(4)[0].ch, 'E');
    }

    #[test]
    fn delete_lines_below_top_never_touches_scrollback() {
        let mut grid = Grid::new(3, 10);
        grid.goto(1, 0);
        grid.delete_lines(1);
        assert_eq!(grid.scrollback_len(), 0);
    }

    #[test]
    fn delete_lines_at_row_zero_evicts_like_a_scroll() {
        let mut grid = Grid::new(3, 10);
        grid.put_char('A');
        grid.goto(0, 0);
        grid.delete_lines(1);
        assert_eq!(grid.scrollback_len(), 1);
        assert_eq!(grid.scrollback_row(0).unwrap()[0].ch, 'A');
    }
}
