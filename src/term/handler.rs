//! Handler implementation: decoded parser actions applied to the terminal.

use crate::cell::{CellFlags, char_width};
use crate::event::{Event, EventListener};
use crate::grid::{ClearMode, LineClearMode};
use crate::parser::{Attr, Handler, Mode, PrivateMode};

use super::{Term, TermMode};

impl<T: EventListener> Handler for Term<T> {
    #[inline]
    fn input(&mut self, c: char) {
        if self.mode.contains(TermMode::LINE_WRAP) {
            self.grid.wrap_if_pending();
        } else {
            // Autowrap disabled: the last column absorbs overflow.
            self.grid.cursor.input_needs_wrap = false;
        }

        if self.mode.contains(TermMode::INSERT) {
            self.grid.insert_blank_chars(char_width(c));
        }
        self.grid.put_char(c);
    }

    #[inline]
    fn bell(&mut self) {
        self.event_listener.send_event(Event::Bell);
    }

    fn backspace(&mut self) {
        self.grid.backspace();
    }

    fn put_tab(&mut self) {
        self.grid.advance_tab();
    }

    #[inline]
    fn linefeed(&mut self) {
        self.grid.linefeed();
        if self.mode.contains(TermMode::LINE_FEED_NEW_LINE) {
            self.grid.carriage_return();
        }
    }

    #[inline]
    fn carriage_return(&mut self) {
        self.grid.carriage_return();
    }

    fn reverse_index(&mut self) {
        self.grid.reverse_index();
    }

    fn next_line(&mut self) {
        self.grid.linefeed();
        self.grid.carriage_return();
    }

    fn save_cursor(&mut self) {
        self.grid.save_cursor();
    }

    fn restore_cursor(&mut self) {
        self.grid.restore_cursor();
    }

    fn reset_state(&mut self) {
        self.grid.reset();
        self.mode = TermMode::default();
    }

    fn set_keypad_application_mode(&mut self, enabled: bool) {
        self.mode.set(TermMode::APP_KEYPAD, enabled);
    }

    fn goto(&mut self, row: usize, col: usize) {
        if self.mode.contains(TermMode::ORIGIN) {
            let top = self.grid.scroll_top();
            let bottom = self.grid.scroll_bottom();
            self.grid.goto((top + row).min(bottom), col);
        } else {
            self.grid.goto(row, col);
        }
    }

    fn goto_row(&mut self, row: usize) {
        self.grid.goto_line(row);
    }

    fn goto_col(&mut self, col: usize) {
        self.grid.goto_col(col);
    }

    fn move_up(&mut self, n: usize) {
        self.grid.move_up(n);
    }

    fn move_down(&mut self, n: usize) {
        self.grid.move_down(n);
    }

    fn move_forward(&mut self, n: usize) {
        self.grid.move_forward(n);
    }

    fn move_backward(&mut self, n: usize) {
        self.grid.move_backward(n);
    }

    fn move_down_and_cr(&mut self, n: usize) {
        self.grid.move_down(n);
        self.grid.carriage_return();
    }

    fn move_up_and_cr(&mut self, n: usize) {
        self.grid.move_up(n);
        self.grid.carriage_return();
    }

    fn erase_display(&mut self, mode: ClearMode) {
        self.grid.erase_display(mode);
    }

    fn erase_line(&mut self, mode: LineClearMode) {
        self.grid.erase_line(mode);
    }

    fn erase_chars(&mut self, n: usize) {
        self.grid.erase_chars(n);
    }

    fn insert_blank_lines(&mut self, n: usize) {
        self.grid.insert_lines(n);
    }

    fn delete_lines(&mut self, n: usize) {
        self.grid.delete_lines(n);
    }

    fn delete_chars(&mut self, n: usize) {
        self.grid.delete_chars(n);
    }

    fn scroll_up(&mut self, n: usize) {
        self.grid.scroll_up(n);
    }

    fn scroll_down(&mut self, n: usize) {
        self.grid.scroll_down(n);
    }

    fn set_scroll_region(&mut self, top: usize, bottom: Option<usize>) {
        self.grid.set_scroll_region(top, bottom);
        // Cursor homes after DECSTBM, to the region origin in origin mode.
        self.goto(0, 0);
    }

    fn terminal_attribute(&mut self, attr: Attr) {
        if attr == Attr::Reset {
            self.grid.cursor.reset_attrs();
            return;
        }
        let template = &mut self.grid.cursor.template;
        match attr {
            Attr::Reset => {}
            Attr::Bold => template.flags.insert(CellFlags::BOLD),
            Attr::Dim => template.flags.insert(CellFlags::DIM),
            Attr::Italic => template.flags.insert(CellFlags::ITALIC),
            Attr::Underline => template.flags.insert(CellFlags::UNDERLINE),
            Attr::Blink => template.flags.insert(CellFlags::BLINK),
            Attr::Reverse => template.flags.insert(CellFlags::INVERSE),
            Attr::Hidden => template.flags.insert(CellFlags::HIDDEN),
            Attr::Strike => template.flags.insert(CellFlags::STRIKETHROUGH),
            Attr::CancelBoldDim => {
                template.flags.remove(CellFlags::BOLD | CellFlags::DIM);
            }
            Attr::CancelItalic => template.flags.remove(CellFlags::ITALIC),
            Attr::CancelUnderline => template.flags.remove(CellFlags::UNDERLINE),
            Attr::CancelBlink => template.flags.remove(CellFlags::BLINK),
            Attr::CancelReverse => template.flags.remove(CellFlags::INVERSE),
            Attr::CancelHidden => template.flags.remove(CellFlags::HIDDEN),
            Attr::CancelStrike => template.flags.remove(CellFlags::STRIKETHROUGH),
            Attr::Foreground(color) => template.fg = color,
            Attr::Background(color) => template.bg = color,
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Insert => self.mode.insert(TermMode::INSERT),
            Mode::LineFeedNewLine => self.mode.insert(TermMode::LINE_FEED_NEW_LINE),
        }
    }

    fn unset_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Insert => self.mode.remove(TermMode::INSERT),
            Mode::LineFeedNewLine => self.mode.remove(TermMode::LINE_FEED_NEW_LINE),
        }
    }

    fn set_private_mode(&mut self, mode: PrivateMode) {
        self.mode.insert(private_mode_flag(mode));
    }

    fn unset_private_mode(&mut self, mode: PrivateMode) {
        self.mode.remove(private_mode_flag(mode));
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
        self.event_listener.send_event(Event::Title(self.title.clone()));
    }
}

fn private_mode_flag(mode: PrivateMode) -> TermMode {
    match mode {
        PrivateMode::CursorKeys => TermMode::APP_CURSOR,
        PrivateMode::Origin => TermMode::ORIGIN,
        PrivateMode::LineWrap => TermMode::LINE_WRAP,
        PrivateMode::CursorBlinking => TermMode::CURSOR_BLINKING,
        PrivateMode::ShowCursor => TermMode::SHOW_CURSOR,
        PrivateMode::AlternateScreen => TermMode::ALT_SCREEN,
        PrivateMode::BracketedPaste => TermMode::BRACKETED_PASTE,
    }
}
