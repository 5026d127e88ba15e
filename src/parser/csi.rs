//! CSI dispatch: parameter interpretation and SGR decoding.

use log::debug;

use crate::color::Color;
use crate::grid::{ClearMode, LineClearMode};

use super::handler::{Attr, Handler, Mode, PrivateMode};
use super::Processor;

impl Processor {
    /// Raw parameter at `idx`, or `default` when absent.
    fn param(&self, idx: usize, default: u32) -> u32 {
        self.params.get(idx).copied().unwrap_or(default)
    }

    /// Parameter at `idx` treated as a count: absent or 0 means 1.
    fn count_param(&self, idx: usize) -> usize {
        self.param(idx, 0).max(1) as usize
    }

    /// Parameter at `idx` as a 0-based coordinate (1-based on the wire).
    fn coord_param(&self, idx: usize) -> usize {
        (self.param(idx, 0).max(1) - 1) as usize
    }

    pub(super) fn csi_dispatch<H: Handler>(&self, handler: &mut H, final_byte: u8) {
        if !self.intermediates.is_empty() {
            debug!(
                "unhandled CSI with intermediates {:?}, final {final_byte:#04x}",
                self.intermediates
            );
            return;
        }
        if self.private_marker.is_some() && !matches!(final_byte, b'h' | b'l') {
            debug!("unhandled private CSI final {final_byte:#04x}");
            return;
        }

        match final_byte {
            b'A' => handler.move_up(self.count_param(0)),
            b'B' => handler.move_down(self.count_param(0)),
            b'C' => handler.move_forward(self.count_param(0)),
            b'D' => handler.move_backward(self.count_param(0)),
            b'E' => handler.move_down_and_cr(self.count_param(0)),
            b'F' => handler.move_up_and_cr(self.count_param(0)),
            b'G' | b'`' => handler.goto_col(self.coord_param(0)),
            b'd' => handler.goto_row(self.coord_param(0)),
            b'H' | b'f' => handler.goto(self.coord_param(0), self.coord_param(1)),
            b'J' => match self.param(0, 0) {
                0 => handler.erase_display(ClearMode::Below),
                1 => handler.erase_display(ClearMode::Above),
                2 => handler.erase_display(ClearMode::All),
                3 => handler.erase_display(ClearMode::Saved),
                p => debug!("unhandled ED mode {p}"),
            },
            b'K' => match self.param(0, 0) {
                0 => handler.erase_line(LineClearMode::Right),
                1 => handler.erase_line(LineClearMode::Left),
                2 => handler.erase_line(LineClearMode::All),
                p => debug!("unhandled EL mode {p}"),
            },
            b'L' => handler.insert_blank_lines(self.count_param(0)),
            b'M' => handler.delete_lines(self.count_param(0)),
            b'P' => handler.delete_chars(self.count_param(0)),
            b'S' => handler.scroll_up(self.count_param(0)),
            b'T' => handler.scroll_down(self.count_param(0)),
            b'X' => handler.erase_chars(self.count_param(0)),
            b'r' => {
                let top = self.coord_param(0);
                let bottom = match self.param(1, 0) {
                    0 => None,
                    b => Some((b - 1) as usize),
                };
                handler.set_scroll_region(top, bottom);
            }
            b'm' => self.sgr(handler),
            b'h' => self.mode_dispatch(handler, true),
            b'l' => self.mode_dispatch(handler, false),
            b's' => handler.save_cursor(),
            b'u' => handler.restore_cursor(),
            _ => debug!("unhandled CSI final {final_byte:#04x}"),
        }
    }

    fn mode_dispatch<H: Handler>(&self, handler: &mut H, set: bool) {
        let private = self.private_marker == Some(b'?');
        let params: &[u32] = if self.params.is_empty() {
            &[0]
        } else {
            &self.params
        };

        for &param in params {
            if private {
                match PrivateMode::from_param(param) {
                    Some(mode) if set => handler.set_private_mode(mode),
                    Some(mode) => handler.unset_private_mode(mode),
                    None => debug!("unhandled private mode {param}"),
                }
            } else {
                match Mode::from_param(param) {
                    Some(mode) if set => handler.set_mode(mode),
                    Some(mode) => handler.unset_mode(mode),
                    None => debug!("unhandled mode {param}"),
                }
            }
        }
    }

    /// SGR: consume parameters left to right, including the 38/48
    /// extended-color sub-grammars.
    fn sgr<H: Handler>(&self, handler: &mut H) {
        if self.params.is_empty() {
            handler.terminal_attribute(Attr::Reset);
            return;
        }

        let params = &self.params;
        let mut i = 0;
        while i < params.len() {
            let attr = match params[i] {
                0 => Some(Attr::Reset),
                1 => Some(Attr::Bold),
                2 => Some(Attr::Dim),
                3 => Some(Attr::Italic),
                4 => Some(Attr::Underline),
                5 | 6 => Some(Attr::Blink),
                7 => Some(Attr::Reverse),
                8 => Some(Attr::Hidden),
                9 => Some(Attr::Strike),
                22 => Some(Attr::CancelBoldDim),
                23 => Some(Attr::CancelItalic),
                24 => Some(Attr::CancelUnderline),
                25 => Some(Attr::CancelBlink),
                27 => Some(Attr::CancelReverse),
                28 => Some(Attr::CancelHidden),
                29 => Some(Attr::CancelStrike),
                30..=37 => Some(Attr::Foreground(Color::Ansi((params[i] - 30) as u8))),
                38 => extended_color(params, &mut i).map(Attr::Foreground),
                39 => Some(Attr::Foreground(Color::Default)),
                40..=47 => Some(Attr::Background(Color::Ansi((params[i] - 40) as u8))),
                48 => extended_color(params, &mut i).map(Attr::Background),
                49 => Some(Attr::Background(Color::Default)),
                90..=97 => Some(Attr::Foreground(Color::Ansi((params[i] - 90 + 8) as u8))),
                100..=107 => Some(Attr::Background(Color::Ansi((params[i] - 100 + 8) as u8))),
                p => {
                    debug!("unhandled SGR parameter {p}");
                    None
                }
            };
            if let Some(attr) = attr {
                handler.terminal_attribute(attr);
            }
            i += 1;
        }
    }
}

/// Parse the `5;n` / `2;r;g;b` sub-grammar following SGR 38/48. Advances
/// `i` past the consumed parameters; malformed input consumes nothing and
/// yields no color.
fn extended_color(params: &[u32], i: &mut usize) -> Option<Color> {
    match params.get(*i + 1).copied() {
        Some(5) => {
            let n = params.get(*i + 2).copied().unwrap_or(0).min(255) as u8;
            *i += 2;
            Some(Color::Palette256(n))
        }
        Some(2) => {
            let r = params.get(*i + 2).copied().unwrap_or(0).min(255) as u8;
            let g = params.get(*i + 3).copied().unwrap_or(0).min(255) as u8;
            let b = params.get(*i + 4).copied().unwrap_or(0).min(255) as u8;
            *i += 4;
            Some(Color::Rgb(r, g, b))
        }
        _ => {
            debug!("malformed extended color selector");
            None
        }
    }
}
