//! Terminal cell types and character width classification.
//!
//! A `Cell` represents one character position in the terminal grid. Wide
//! characters occupy two cells: the leading cell carries the character and
//! `WIDE_CHAR`, the trailing cell is a spacer with no independent glyph.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Per-cell attribute flags (SGR and internal bookkeeping).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u16 {
        const BOLD                     = 1 << 0;
        const DIM                      = 1 << 1;
        const ITALIC                   = 1 << 2;
        const UNDERLINE                = 1 << 3;
        const BLINK                    = 1 << 4;
        const INVERSE                  = 1 << 5;
        const HIDDEN                   = 1 << 6;
        const STRIKETHROUGH            = 1 << 7;
        /// Leading half of a wide character.
        const WIDE_CHAR                = 1 << 8;
        /// Trailing half of a wide character (no independent glyph).
        const WIDE_CHAR_SPACER         = 1 << 9;
        /// Blank filler written when a wide character would straddle the
        /// last column and wraps instead.
        const LEADING_WIDE_CHAR_SPACER = 1 << 10;
        /// The row soft-wrapped onto the next row at this cell.
        const WRAPLINE                 = 1 << 11;
    }
}

impl Default for CellFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One character position in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character stored in this cell.
    pub ch: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// SGR attribute flags.
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Default,
            bg: Color::Default,
            flags: CellFlags::empty(),
        }
    }
}

impl Cell {
    /// Reset this cell to match the given template.
    pub fn reset(&mut self, template: &Self) {
        self.ch = template.ch;
        self.fg = template.fg;
        self.bg = template.bg;
        self.flags = template.flags;
    }

    /// Returns `true` if this cell is visually empty (space, default colors,
    /// no flags).
    pub fn is_empty(&self) -> bool {
        self.ch == ' '
            && self.fg == Color::Default
            && self.bg == Color::Default
            && self.flags.is_empty()
    }

    /// Display width of this cell's character in columns.
    pub fn width(&self) -> usize {
        if self.flags.contains(CellFlags::WIDE_CHAR) {
            return 2;
        }
        if self
            .flags
            .intersects(CellFlags::WIDE_CHAR_SPACER | CellFlags::LEADING_WIDE_CHAR_SPACER)
        {
            return 0;
        }
        char_width(self.ch)
    }
}

/// Column width of a character: 2 for the East Asian wide and CJK ranges,
/// 1 for everything else.
///
/// Combining marks and zero-width joiners are treated as width 1; clusters
/// beyond the two width classes are not modeled.
pub fn char_width(ch: char) -> usize {
    match ch {
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}'
        | '\u{20000}'..='\u{2FFFD}'
        | '\u{30000}'..='\u{3FFFD}' => 2,
        _ => 1,
    }
}
