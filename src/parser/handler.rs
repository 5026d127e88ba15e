//! The seam between the parser and the screen: one trait method per
//! terminal action, plus the enums that name SGR attributes and modes.
//!
//! All methods default to no-ops so tests can implement just the slice
//! they observe. `Term<T>` implements the full surface.

use crate::color::Color;
use crate::grid::{ClearMode, LineClearMode};

/// An SGR attribute change, already decoded from parameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Reset,
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    Reverse,
    Hidden,
    Strike,
    CancelBoldDim,
    CancelItalic,
    CancelUnderline,
    CancelBlink,
    CancelReverse,
    CancelHidden,
    CancelStrike,
    Foreground(Color),
    Background(Color),
}

/// ANSI modes (SM/RM without the `?` marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// IRM (4).
    Insert,
    /// LNM (20).
    LineFeedNewLine,
}

impl Mode {
    pub(super) fn from_param(param: u32) -> Option<Self> {
        match param {
            4 => Some(Self::Insert),
            20 => Some(Self::LineFeedNewLine),
            _ => None,
        }
    }
}

/// DEC private modes (SM/RM with the `?` marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateMode {
    /// DECCKM (?1).
    CursorKeys,
    /// DECOM (?6).
    Origin,
    /// DECAWM (?7).
    LineWrap,
    /// ATT610 (?12) — cursor blinking.
    CursorBlinking,
    /// DECTCEM (?25).
    ShowCursor,
    /// Alternate screen buffer (?1049). Accepted, inert.
    AlternateScreen,
    /// Bracketed paste (?2004).
    BracketedPaste,
}

impl PrivateMode {
    pub(super) fn from_param(param: u32) -> Option<Self> {
        match param {
            1 => Some(Self::CursorKeys),
            6 => Some(Self::Origin),
            7 => Some(Self::LineWrap),
            12 => Some(Self::CursorBlinking),
            25 => Some(Self::ShowCursor),
            1049 => Some(Self::AlternateScreen),
            2004 => Some(Self::BracketedPaste),
            _ => None,
        }
    }
}

/// Receiver for decoded terminal actions.
pub trait Handler {
    /// Print a character at the cursor.
    fn input(&mut self, _c: char) {}

    /// BEL.
    fn bell(&mut self) {}

    /// BS.
    fn backspace(&mut self) {}

    /// HT.
    fn put_tab(&mut self) {}

    /// LF/VT/FF.
    fn linefeed(&mut self) {}

    /// CR.
    fn carriage_return(&mut self) {}

    /// ESC M.
    fn reverse_index(&mut self) {}

    /// ESC E.
    fn next_line(&mut self) {}

    /// ESC 7 / CSI s.
    fn save_cursor(&mut self) {}

    /// ESC 8 / CSI u.
    fn restore_cursor(&mut self) {}

    /// ESC c.
    fn reset_state(&mut self) {}

    /// ESC = / ESC >.
    fn set_keypad_application_mode(&mut self, _enabled: bool) {}

    /// CUP/HVP (1-based params already converted to 0-based).
    fn goto(&mut self, _row: usize, _col: usize) {}

    /// VPA.
    fn goto_row(&mut self, _row: usize) {}

    /// CHA/HPA.
    fn goto_col(&mut self, _col: usize) {}

    /// CUU.
    fn move_up(&mut self, _n: usize) {}

    /// CUD.
    fn move_down(&mut self, _n: usize) {}

    /// CUF.
    fn move_forward(&mut self, _n: usize) {}

    /// CUB.
    fn move_backward(&mut self, _n: usize) {}

    /// CNL.
    fn move_down_and_cr(&mut self, _n: usize) {}

    /// CPL.
    fn move_up_and_cr(&mut self, _n: usize) {}

    /// ED.
    fn erase_display(&mut self, _mode: ClearMode) {}

    /// EL.
    fn erase_line(&mut self, _mode: LineClearMode) {}

    /// ECH.
    fn erase_chars(&mut self, _n: usize) {}

    /// IL.
    fn insert_blank_lines(&mut self, _n: usize) {}

    /// DL.
    fn delete_lines(&mut self, _n: usize) {}

    /// DCH.
    fn delete_chars(&mut self, _n: usize) {}

    /// SU.
    fn scroll_up(&mut self, _n: usize) {}

    /// SD.
    fn scroll_down(&mut self, _n: usize) {}

    /// DECSTBM (0-based inclusive bounds; `None` bottom means last line).
    fn set_scroll_region(&mut self, _top: usize, _bottom: Option<usize>) {}

    /// One decoded SGR attribute.
    fn terminal_attribute(&mut self, _attr: Attr) {}

    /// SM.
    fn set_mode(&mut self, _mode: Mode) {}

    /// RM.
    fn unset_mode(&mut self, _mode: Mode) {}

    /// DECSET.
    fn set_private_mode(&mut self, _mode: PrivateMode) {}

    /// DECRST.
    fn unset_private_mode(&mut self, _mode: PrivateMode) {}

    /// OSC 0/1/2.
    fn set_title(&mut self, _title: &str) {}
}
