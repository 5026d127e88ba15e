//! Terminal color representation.
//!
//! Colors are stored unresolved: a cell remembers *which* color the
//! application asked for, not the RGB value a palette maps it to. Palette
//! resolution is a renderer concern.

/// A terminal color as selected by SGR sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// The renderer's default foreground or background.
    #[default]
    Default,
    /// One of the 16 named ANSI colors (0-7 normal, 8-15 bright).
    Ansi(u8),
    /// An entry in the xterm 256-color palette.
    Palette256(u8),
    /// A 24-bit truecolor value.
    Rgb(u8, u8, u8),
}
