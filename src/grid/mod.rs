//! Terminal grid: 2D cell storage with cursor, scrollback, scroll region,
//! and dirty tracking.
//!
//! The `Grid` is the central data structure for terminal emulation. Editing,
//! navigation, and scrolling operations live in submodules; this module owns
//! the storage, dimensions, resize, and read-side queries.

pub mod cursor;
pub mod dirty;
mod editing;
mod navigation;
mod scroll;
pub mod row;


use std::collections::VecDeque;

use crate::cell::{Cell, CellFlags};

pub use cursor::Cursor;
pub use dirty::{DirtyIter, DirtyTracker};
pub use editing::{ClearMode, LineClearMode};
pub use row::Row;

const DEFAULT_TAB_INTERVAL: usize = 8;

/// Default maximum scrollback lines.
pub const DEFAULT_MAX_SCROLLBACK: usize = 10_000;

/// The 2D terminal cell grid.
///
/// Stores visible rows indexed `0..lines` (top to bottom), a cursor with
/// one saved-cursor slot, tab stops, a scroll region, bounded scrollback
/// history, and per-row dirty tracking.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Visible rows (index 0 = top of screen).
    rows: Vec<Row>,
    /// Number of columns.
    cols: usize,
    /// Number of visible lines.
    lines: usize,
    /// Current cursor position and attribute template.
    pub cursor: Cursor,
    /// DECSC/DECRC saved cursor (position and template).
    saved_cursor: Option<Cursor>,
    /// Scroll region top line (inclusive).
    scroll_top: usize,
    /// Scroll region bottom line (inclusive).
    scroll_bottom: usize,
    /// Tab stop at each column (true = stop).
    tab_stops: Vec<bool>,
    /// Rows evicted from the top of the grid, oldest first.
    scrollback: VecDeque<Row>,
    /// Maximum number of scrollback rows to retain.
    max_scrollback: usize,
    /// Tracks which rows have changed since last drain.
    dirty: DirtyTracker,
}

impl Grid {
    /// Create a new grid with the default scrollback limit.
    pub fn new(lines: usize, cols: usize) -> Self {
        Self::with_max_scrollback(lines, cols, DEFAULT_MAX_SCROLLBACK)
    }

    /// Create a new grid with an explicit scrollback limit.
    ///
    /// Dimensions are clamped to at least 1x1.
    pub fn with_max_scrollback(lines: usize, cols: usize, max_scrollback: usize) -> Self {
        let lines = lines.max(1);
        let cols = cols.max(1);
        let rows = (0..lines).map(|_| Row::new(cols)).collect();
        let tab_stops = Self::build_tab_stops(cols);

        Self {
            rows,
            cols,
            lines,
            cursor: Cursor::new(),
            saved_cursor: None,
            scroll_top: 0,
            scroll_bottom: lines - 1,
            tab_stops,
            scrollback: VecDeque::new(),
            max_scrollback,
            dirty: DirtyTracker::new(lines),
        }
    }

    fn build_tab_stops(cols: usize) -> Vec<bool> {
        let mut stops = vec![false; cols];
        for i in (DEFAULT_TAB_INTERVAL..cols).step_by(DEFAULT_TAB_INTERVAL) {
            stops[i] = true;
        }
        stops
    }

    /// Number of visible lines.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Visible dimensions as `(lines, cols)`.
    pub fn size(&self) -> (usize, usize) {
        (self.lines, self.cols)
    }

    /// Reference to a visible row.
    pub fn row(&self, line: usize) -> &Row {
        &self.rows[line]
    }

    pub(crate) fn row_mut(&mut self, line: usize) -> &mut Row {
        &mut self.rows[line]
    }

    /// Scroll region top line (inclusive).
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Scroll region bottom line (inclusive).
    pub fn scroll_bottom(&self) -> usize {
        self.scroll_bottom
    }

    /// Number of rows currently held in scrollback.
    pub fn scrollback_len(&self) -> usize {
        self.scrollback.len()
    }

    /// Maximum number of scrollback rows this grid retains.
    pub fn max_scrollback(&self) -> usize {
        self.max_scrollback
    }

    /// A scrollback row by age (0 = oldest).
    pub fn scrollback_row(&self, idx: usize) -> Option<&Row> {
        self.scrollback.get(idx)
    }

    /// Total rows: scrollback plus visible.
    pub fn total_lines(&self) -> usize {
        self.scrollback.len() + self.lines
    }

    /// Access a row by absolute index: scrollback row 0 is the oldest,
    /// visible rows follow after the scrollback.
    pub fn absolute_row(&self, abs_row: usize) -> Option<&Row> {
        let sb_len = self.scrollback.len();
        if abs_row < sb_len {
            Some(&self.scrollback[abs_row])
        } else {
            self.rows.get(abs_row - sb_len)
        }
    }

    /// Immutable reference to the dirty tracker.
    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Mutable reference to the dirty tracker.
    pub fn dirty_mut(&mut self) -> &mut DirtyTracker {
        &mut self.dirty
    }

    /// Drain the set of dirty row indices, resetting the tracker to clean.
    pub fn drain_dirty(&mut self) -> DirtyIter<'_> {
        self.dirty.drain()
    }

    pub(super) fn mark_dirty(&mut self, line: usize) {
        self.dirty.mark(line);
    }

    pub(super) fn push_scrollback(&mut self, row: Row) {
        if self.max_scrollback == 0 {
            return;
        }
        if self.scrollback.len() >= self.max_scrollback {
            self.scrollback.pop_front();
        }
        self.scrollback.push_back(row);
    }

    /// Discard all scrollback history.
    pub(super) fn clear_scrollback(&mut self) {
        self.scrollback.clear();
    }

    /// Erase every visible cell and home the cursor. Scrollback is kept.
    pub fn clear_all(&mut self) {
        let template = Cell::default();
        for row in &mut self.rows {
            row.reset(&template);
        }
        self.cursor.row = 0;
        self.cursor.col = 0;
        self.cursor.input_needs_wrap = false;
        self.dirty.mark_all();
    }

    /// Full grid reset: blank cells, default attributes, cursor home,
    /// full-screen scroll region, default tab stops. Scrollback is kept.
    pub fn reset(&mut self) {
        self.clear_all();
        self.cursor = Cursor::new();
        self.saved_cursor = None;
        self.scroll_top = 0;
        self.scroll_bottom = self.lines - 1;
        self.tab_stops = Self::build_tab_stops(self.cols);
    }

    /// Resize the grid to `lines` x `cols` (each clamped to at least 1).
    ///
    /// Columns are truncated or padded per row. Shrinking vertically drops
    /// rows from the top into scrollback; growing appends blank rows at the
    /// bottom. The scroll region resets to the full screen, the cursor is
    /// clamped, and every row is marked dirty. Wrapped lines are not
    /// reflowed.
    pub fn resize(&mut self, lines: usize, cols: usize) {
        let lines = lines.max(1);
        let cols = cols.max(1);

        if cols != self.cols {
            // Scrollback rows are committed history and keep their width;
            // readers clamp against each row's own length.
            for row in &mut self.rows {
                row.resize(cols);
                // A truncation can cut a wide pair in half. Blank the
                // orphaned leading cell so no wide char sits in the last
                // column without its spacer.
                let last = &mut row[cols - 1];
                if last.flags.contains(CellFlags::WIDE_CHAR) {
                    last.ch = ' ';
                    last.flags.remove(CellFlags::WIDE_CHAR);
                }
            }
            self.cols = cols;
            self.tab_stops = Self::build_tab_stops(cols);
        }

        if lines < self.lines {
            let excess = self.lines - lines;
            for _ in 0..excess {
                let row = self.rows.remove(0);
                self.push_scrollback(row);
            }
            self.cursor.row = self.cursor.row.saturating_sub(excess);
        } else {
            for _ in self.lines..lines {
                self.rows.push(Row::new(cols));
            }
        }
        self.lines = lines;

        self.scroll_top = 0;
        self.scroll_bottom = lines - 1;
        self.cursor.row = self.cursor.row.min(lines - 1);
        self.cursor.col = self.cursor.col.min(cols - 1);
        self.cursor.input_needs_wrap = false;
        if let Some(saved) = &mut self.saved_cursor {
            saved.row = saved.row.min(lines - 1);
            saved.col = saved.col.min(cols - 1);
        }
        self.dirty.resize(lines);
    }
}
