//! Byte-stream escape sequence parser.
//!
//! A state machine in the spirit of the VT500-series parser: total over
//! every byte in every state, with no lookback beyond its accumulators.
//! Bytes go in via [`Processor::advance`]; decoded actions come out
//! through the [`Handler`] trait. Splitting a stream across `advance`
//! calls at any boundary yields identical actions.

mod csi;
pub mod handler;

pub use handler::{Attr, Handler, Mode, PrivateMode};

use log::debug;

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    OscString,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,
}

/// Parameter accumulation is clamped here to keep hostile input from
/// overflowing arithmetic downstream.
const PARAM_MAX: u32 = 100_000;

/// Upper bound on distinct parameters per sequence.
const MAX_PARAMS: usize = 32;

/// Upper bound on buffered OSC payload bytes.
const MAX_OSC_LEN: usize = 1024;

/// The escape sequence parser.
#[derive(Debug, Default)]
pub struct Processor {
    state: State,
    params: Vec<u32>,
    intermediates: Vec<u8>,
    /// Private parameter marker (`?`, `<`, `=`, `>`), if any.
    private_marker: Option<u8>,
    osc_buf: Vec<u8>,
    /// Saw ESC inside a string state; the next byte decides ST vs abort.
    string_esc: bool,
    utf8_buf: [u8; 4],
    utf8_len: usize,
    utf8_need: usize,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, for invariant checks.
    pub fn state(&self) -> State {
        self.state
    }

    /// Feed a chunk of bytes, dispatching actions to `handler`.
    pub fn advance<H: Handler>(&mut self, handler: &mut H, bytes: &[u8]) {
        for &byte in bytes {
            self.step(handler, byte);
        }
    }

    fn step<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        match self.state {
            State::Ground => self.ground(handler, byte),
            State::Escape => self.escape(handler, byte),
            State::EscapeIntermediate => self.escape_intermediate(byte),
            State::CsiEntry | State::CsiParam | State::CsiIntermediate => {
                self.csi(handler, byte);
            }
            State::CsiIgnore => self.csi_ignore(handler, byte),
            State::OscString => self.osc_string(handler, byte),
            State::DcsEntry | State::DcsParam | State::DcsIntermediate => {
                self.dcs_header(byte);
            }
            State::DcsPassthrough => self.dcs_passthrough(byte),
            State::DcsIgnore => self.dcs_ignore(byte),
        }
    }

    // --- Ground -----------------------------------------------------------

    fn ground<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        // A fresh ASCII or control byte aborts a pending multi-byte
        // character; the buffered bytes are dropped.
        if self.utf8_need > 0 && byte < 0x80 {
            self.utf8_reset();
        }

        match byte {
            0x07 => handler.bell(),
            0x08 => handler.backspace(),
            0x09 => handler.put_tab(),
            0x0A..=0x0C => handler.linefeed(),
            0x0D => handler.carriage_return(),
            0x1B => self.enter_escape(),
            0x20..=0x7E => handler.input(byte as char),
            0x80..=0xFF => self.utf8_feed(handler, byte),
            // Remaining C0 controls and DEL have no effect.
            _ => {}
        }
    }

    fn utf8_feed<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        if self.utf8_need == 0 {
            self.utf8_need = match byte {
                0xC0..=0xDF => 1,
                0xE0..=0xEF => 2,
                0xF0..=0xF7 => 3,
                // Stray continuation or invalid leading byte.
                _ => return,
            };
            self.utf8_buf[0] = byte;
            self.utf8_len = 1;
            return;
        }

        if (0x80..=0xBF).contains(&byte) {
            self.utf8_buf[self.utf8_len] = byte;
            self.utf8_len += 1;
            if self.utf8_len == self.utf8_need + 1 {
                if let Ok(s) = std::str::from_utf8(&self.utf8_buf[..self.utf8_len]) {
                    if let Some(c) = s.chars().next() {
                        handler.input(c);
                    }
                }
                self.utf8_reset();
            }
        } else {
            // Early restart: drop the buffered bytes and treat this byte
            // as the start of something new.
            self.utf8_reset();
            self.utf8_feed(handler, byte);
        }
    }

    fn utf8_reset(&mut self) {
        self.utf8_len = 0;
        self.utf8_need = 0;
    }

    // --- Escape -----------------------------------------------------------

    fn enter_escape(&mut self) {
        self.state = State::Escape;
        self.intermediates.clear();
        self.private_marker = None;
        self.string_esc = false;
        self.utf8_reset();
    }

    fn escape<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        match byte {
            b'[' => {
                self.state = State::CsiEntry;
                self.params.clear();
            }
            b']' => {
                self.state = State::OscString;
                self.osc_buf.clear();
            }
            b'P' => {
                self.state = State::DcsEntry;
                self.params.clear();
            }
            b'M' => {
                handler.reverse_index();
                self.state = State::Ground;
            }
            b'E' => {
                handler.next_line();
                self.state = State::Ground;
            }
            b'D' => {
                handler.linefeed();
                self.state = State::Ground;
            }
            b'7' => {
                handler.save_cursor();
                self.state = State::Ground;
            }
            b'8' => {
                handler.restore_cursor();
                self.state = State::Ground;
            }
            b'c' => {
                handler.reset_state();
                self.state = State::Ground;
            }
            b'=' => {
                handler.set_keypad_application_mode(true);
                self.state = State::Ground;
            }
            b'>' => {
                handler.set_keypad_application_mode(false);
                self.state = State::Ground;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::EscapeIntermediate;
            }
            0x1B => {
                // Restart.
            }
            _ => {
                debug!("unhandled escape final: {byte:#04x}");
                self.state = State::Ground;
            }
        }
    }

    fn escape_intermediate(&mut self, byte: u8) {
        match byte {
            0x20..=0x2F => self.intermediates.push(byte),
            0x1B => self.enter_escape(),
            0x30..=0x7E => {
                // Charset designations and the like: accepted, unused.
                debug!(
                    "unhandled escape sequence: intermediates {:?}, final {byte:#04x}",
                    self.intermediates
                );
                self.state = State::Ground;
            }
            _ => self.state = State::Ground,
        }
    }

    // --- CSI --------------------------------------------------------------

    /// Execute a C0 control embedded inside a control sequence.
    fn execute<H: Handler>(handler: &mut H, byte: u8) {
        match byte {
            0x07 => handler.bell(),
            0x08 => handler.backspace(),
            0x09 => handler.put_tab(),
            0x0A..=0x0C => handler.linefeed(),
            0x0D => handler.carriage_return(),
            _ => {}
        }
    }

    fn push_param_digit(&mut self, digit: u32) {
        if self.params.is_empty() {
            self.params.push(0);
        }
        if let Some(last) = self.params.last_mut() {
            *last = (*last * 10 + digit).min(PARAM_MAX);
        }
    }

    fn next_param(&mut self) {
        if self.params.is_empty() {
            self.params.push(0);
        }
        if self.params.len() < MAX_PARAMS {
            self.params.push(0);
        }
    }

    fn csi<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        match byte {
            0x18 | 0x1A => self.state = State::Ground,
            0x1B => self.enter_escape(),
            0x00..=0x1F => Self::execute(handler, byte),
            b'0'..=b'9' => {
                if self.state == State::CsiIntermediate {
                    self.state = State::CsiIgnore;
                } else {
                    self.push_param_digit(u32::from(byte - b'0'));
                    self.state = State::CsiParam;
                }
            }
            b';' => {
                if self.state == State::CsiIntermediate {
                    self.state = State::CsiIgnore;
                } else {
                    self.next_param();
                    self.state = State::CsiParam;
                }
            }
            b':' => self.state = State::CsiIgnore,
            0x3C..=0x3F => {
                if self.state == State::CsiEntry {
                    self.private_marker = Some(byte);
                    self.state = State::CsiParam;
                } else {
                    self.state = State::CsiIgnore;
                }
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::CsiIntermediate;
            }
            0x40..=0x7E => {
                self.csi_dispatch(handler, byte);
                self.state = State::Ground;
            }
            _ => self.state = State::CsiIgnore,
        }
    }

    fn csi_ignore<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        match byte {
            0x18 | 0x1A => self.state = State::Ground,
            0x1B => self.enter_escape(),
            0x00..=0x1F => Self::execute(handler, byte),
            0x40..=0x7E => self.state = State::Ground,
            _ => {}
        }
    }

    // --- OSC --------------------------------------------------------------

    fn osc_string<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        if self.string_esc {
            self.string_esc = false;
            if byte == b'\\' {
                self.osc_dispatch(handler);
            } else {
                debug!("OSC aborted by ESC {byte:#04x}");
            }
            self.state = State::Ground;
            return;
        }

        match byte {
            0x07 => {
                self.osc_dispatch(handler);
                self.state = State::Ground;
            }
            0x18 | 0x1A => {
                self.osc_buf.clear();
                self.state = State::Ground;
            }
            0x1B => self.string_esc = true,
            0x20..=0xFF => {
                if self.osc_buf.len() < MAX_OSC_LEN {
                    self.osc_buf.push(byte);
                }
            }
            // Other C0 controls inside a string are dropped.
            _ => {}
        }
    }

    fn osc_dispatch<H: Handler>(&mut self, handler: &mut H) {
        let buf = std::mem::take(&mut self.osc_buf);
        let Some(sep) = buf.iter().position(|&b| b == b';') else {
            debug!("OSC without payload separator");
            return;
        };
        let Ok(code) = std::str::from_utf8(&buf[..sep]).unwrap_or("").parse::<u32>() else {
            debug!("OSC with non-numeric code");
            return;
        };

        match code {
            0 | 1 | 2 => {
                let title = String::from_utf8_lossy(&buf[sep + 1..]).into_owned();
                handler.set_title(&title);
            }
            // Palette overrides and clipboard writes are accepted but
            // have no effect in this core.
            4 | 52 => {}
            _ => debug!("unhandled OSC code {code}"),
        }
    }

    // --- DCS --------------------------------------------------------------

    fn dcs_header(&mut self, byte: u8) {
        match byte {
            0x18 | 0x1A => self.state = State::Ground,
            0x1B => self.enter_escape(),
            0x00..=0x1F => {}
            b'0'..=b'9' => {
                if self.state == State::DcsIntermediate {
                    self.state = State::DcsIgnore;
                } else {
                    self.push_param_digit(u32::from(byte - b'0'));
                    self.state = State::DcsParam;
                }
            }
            b';' => {
                if self.state == State::DcsIntermediate {
                    self.state = State::DcsIgnore;
                } else {
                    self.next_param();
                    self.state = State::DcsParam;
                }
            }
            b':' => self.state = State::DcsIgnore,
            0x3C..=0x3F => {
                if self.state == State::DcsEntry {
                    self.private_marker = Some(byte);
                    self.state = State::DcsParam;
                } else {
                    self.state = State::DcsIgnore;
                }
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::DcsIntermediate;
            }
            0x40..=0x7E => {
                // Hook point. The payload is consumed, not interpreted.
                self.state = State::DcsPassthrough;
            }
            _ => self.state = State::DcsIgnore,
        }
    }

    fn dcs_passthrough(&mut self, byte: u8) {
        if self.string_esc {
            self.string_esc = false;
            self.state = State::Ground;
            if byte != b'\\' {
                debug!("DCS aborted by ESC {byte:#04x}");
            }
            return;
        }
        match byte {
            0x07 | 0x18 | 0x1A => self.state = State::Ground,
            0x1B => self.string_esc = true,
            _ => {}
        }
    }

    fn dcs_ignore(&mut self, byte: u8) {
        match byte {
            0x07 | 0x18 | 0x1A => self.state = State::Ground,
            0x1B => self.string_esc = true,
            b'\\' if self.string_esc => {
                self.string_esc = false;
                self.state = State::Ground;
            }
            _ => self.string_esc = false,
        }
    }
}
