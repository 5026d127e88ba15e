//! Terminal emulation engine.
//!
//! Three subsystems turn a raw byte stream into a rendered grid:
//!
//! - [`session`]: spawns a shell on a PTY, pumps its output, and forwards
//!   user input and resizes back to it.
//! - [`parser`]: a total byte-stream state machine that classifies
//!   printable text, control codes, and CSI/OSC/DCS sequences.
//! - [`term`] and [`grid`]: the screen model — cells, cursor, scrollback,
//!   scroll region, attributes, modes, and dirty tracking.
//!
//! The crate contains no rendering or platform UI code. Hosts pull cell
//! data through [`Term`] accessors and receive [`Event`]s for everything
//! else.

pub mod cell;
pub mod color;
pub mod config;
pub mod event;
pub mod grid;
pub mod parser;
pub mod selection;
pub mod term;

#[cfg(unix)]
pub mod session;

pub use cell::{Cell, CellFlags};
pub use color::Color;
pub use config::SessionConfig;
pub use event::{Event, EventListener, VoidListener};
pub use grid::{ClearMode, Cursor, Grid, LineClearMode, Row};
pub use parser::{Handler, Processor};
pub use selection::{Selection, SelectionPoint};
pub use term::{Term, TermMode};

#[cfg(unix)]
pub use session::Session;
