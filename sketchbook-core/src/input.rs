//! Pointer events, as fed to [`Canvas::handle`](crate::state::canvas::Canvas::handle).

use crate::geom::Point;

#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PointerEvent {
    /// The button was pressed.
    Down(Point),
    /// The pointer moved, with or without the button held.
    Move(Point),
    /// The button was released.
    Up(Point),
    /// The pointer moved with the button known to be released.
    Hover(Point),
}
impl PointerEvent {
    #[must_use]
    pub fn position(self) -> Point {
        match self {
            Self::Down(p) | Self::Move(p) | Self::Up(p) | Self::Hover(p) => p,
        }
    }
}

/// Which tool pointer presses operate.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}
