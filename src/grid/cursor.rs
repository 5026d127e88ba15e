//! Terminal cursor state and attribute template.

use crate::cell::{Cell, CellFlags};
use crate::color::Color;

/// Terminal cursor: position, attribute template, and deferred-wrap state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Row position (0-based, top of visible grid).
    pub row: usize,
    /// Column position (0-based).
    pub col: usize,
    /// Attribute template applied to newly written cells.
    pub template: Cell,
    /// Set after printing into the last column: the cursor stays put and the
    /// next printable character wraps first. Cleared by explicit movement.
    pub input_needs_wrap: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            template: Cell::default(),
            input_needs_wrap: false,
        }
    }

    /// Reset the attribute template to default colors and no flags (SGR 0).
    pub fn reset_attrs(&mut self) {
        self.template.fg = Color::Default;
        self.template.bg = Color::Default;
        self.template.flags = CellFlags::empty();
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
