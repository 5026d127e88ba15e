//! Terminal mode flags (DECSET/DECRST, SM/RM).

use bitflags::bitflags;

bitflags! {
    /// Bitflags for terminal mode state.
    ///
    /// Modes are toggled by SM (`CSI n h`), RM (`CSI n l`), and their DEC
    /// private variants (`CSI ? n h/l`), plus DECKPAM/DECKPNM for the
    /// keypad.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TermMode: u32 {
        /// DECTCEM (?25) — cursor visible.
        const SHOW_CURSOR       = 1;
        /// DECCKM (?1) — application cursor keys.
        const APP_CURSOR        = 1 << 1;
        /// DECKPAM/DECKPNM — application keypad mode.
        const APP_KEYPAD        = 1 << 2;
        /// DECAWM (?7) — auto-wrap at end of line.
        const LINE_WRAP         = 1 << 3;
        /// DECOM (?6) — origin mode (cursor relative to scroll region).
        const ORIGIN            = 1 << 4;
        /// IRM (4) — insert mode.
        const INSERT            = 1 << 5;
        /// LNM (20) — line feed implies carriage return.
        const LINE_FEED_NEW_LINE = 1 << 6;
        /// Mode ?2004 — bracketed paste.
        const BRACKETED_PASTE   = 1 << 7;
        /// Mode ?1049 — alternate screen buffer. Tracked but inert: the
        /// grid contents do not switch.
        const ALT_SCREEN        = 1 << 8;
        /// ATT610 (?12) — cursor blinking preference.
        const CURSOR_BLINKING   = 1 << 9;
    }
}

impl Default for TermMode {
    fn default() -> Self {
        Self::SHOW_CURSOR | Self::LINE_WRAP
    }
}

#[cfg(test)]
mod tests {
    use super::TermMode;

    #[test]
    fn default_mode_shows_cursor_and_wraps() {
        let mode = TermMode::default();
        assert!(mode.contains(TermMode::SHOW_CURSOR));
        assert!(mode.contains(TermMode::LINE_WRAP));
        assert!(!mode.contains(TermMode::INSERT));
        assert!(!mode.contains(TermMode::ORIGIN));
    }

    #[test]
    fn insert_and_remove_round_trip() {
        let mut mode = TermMode::default();
        mode.insert(TermMode::BRACKETED_PASTE);
        assert!(mode.contains(TermMode::BRACKETED_PASTE));
        mode.remove(TermMode::BRACKETED_PASTE);
        assert!(!mode.contains(TermMode::BRACKETED_PASTE));
    }
}
