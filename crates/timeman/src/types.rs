//! Basic shared types

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Number of sides
    pub const NUM: usize = 2;

    /// The other side
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index for per-side arrays
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}
