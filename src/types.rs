use crate::constants::{LARGE_ASTEROID_GLYPH, SMALL_ASTEROID_GLYPH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub fn new(x: u16, y: u16) -> Self {
        Position { x, y }
    }

    pub fn right(&self) -> Self {
        Position::new(self.x + 1, self.y)
    }
}

/// Obstacle state of a single field cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Small,
    Large,
}

impl Cell {
    pub fn is_obstacle(&self) -> bool {
        !matches!(self, Cell::Empty)
    }

    pub fn glyph(&self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Small => SMALL_ASTEROID_GLYPH,
            Cell::Large => LARGE_ASTEROID_GLYPH,
        }
    }
}

/// Terminal colors the engine draws with. Foreground and background are set
/// independently, the way a serial terminal's SGR codes work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    ForegroundWhite,
    ForegroundCyan,
    ForegroundRed,
    ForegroundYellow,
    ForegroundGreen,
    BackgroundBlack,
    BackgroundRed,
    BackgroundYellow,
}

impl Color {
    pub fn is_background(&self) -> bool {
        matches!(
            self,
            Color::BackgroundBlack | Color::BackgroundRed | Color::BackgroundYellow
        )
    }
}
