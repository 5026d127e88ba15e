//! Terminal state machine.
//!
//! `Term<T: EventListener>` owns the grid, mode flags, and title, and
//! implements the parser's `Handler` trait to turn decoded actions into
//! grid mutations. Generic over `EventListener` so tests can use
//! `VoidListener` while a real host routes events to its event loop.

mod handler;
pub mod mode;

pub use mode::TermMode;


use crate::event::EventListener;
use crate::grid::Grid;

/// The terminal state machine.
#[derive(Debug)]
pub struct Term<T: EventListener> {
    /// The cell grid with scrollback.
    grid: Grid,
    /// Terminal mode flags.
    mode: TermMode,
    /// Window title (set by OSC 0/1/2).
    title: String,
    /// Event sink.
    event_listener: T,
}

impl<T: EventListener> Term<T> {
    /// Create a new terminal with the given dimensions and scrollback
    /// capacity.
    pub fn new(lines: usize, cols: usize, max_scrollback: usize, listener: T) -> Self {
        Self {
            grid: Grid::with_max_scrollback(lines, cols, max_scrollback),
            mode: TermMode::default(),
            title: String::new(),
            event_listener: listener,
        }
    }

    /// Reference to the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable reference to the grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current terminal mode flags.
    pub fn mode(&self) -> TermMode {
        self.mode
    }

    /// Current window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the cursor should be drawn (DECTCEM).
    pub fn cursor_visible(&self) -> bool {
        self.mode.contains(TermMode::SHOW_CURSOR)
    }

    /// Whether the cursor prefers to blink (ATT610).
    pub fn cursor_blinking(&self) -> bool {
        self.mode.contains(TermMode::CURSOR_BLINKING)
    }

    /// Reference to the event listener.
    pub fn event_listener(&self) -> &T {
        &self.event_listener
    }

    /// Resize the grid. The session issues the matching window-size update
    /// on the PTY after this returns.
    pub fn resize(&mut self, lines: usize, cols: usize) {
        self.grid.resize(lines, cols);
    }
}
