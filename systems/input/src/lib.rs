#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input system that turns raw key codes into a pending movement direction.

use grid_chase_core::Direction;
use log::trace;

/// Key codes recognised by the input handler.
pub mod keycode {
    /// Left arrow.
    pub const ARROW_LEFT: u32 = 37;
    /// Up arrow.
    pub const ARROW_UP: u32 = 38;
    /// Right arrow.
    pub const ARROW_RIGHT: u32 = 39;
    /// Down arrow.
    pub const ARROW_DOWN: u32 = 40;
    /// The `A` key.
    pub const KEY_A: u32 = 65;
    /// The `D` key.
    pub const KEY_D: u32 = 68;
    /// The `S` key.
    pub const KEY_S: u32 = 83;
    /// The `W` key.
    pub const KEY_W: u32 = 87;
}

/// Maps a raw key code to the direction it requests.
#[must_use]
pub const fn direction_for_code(code: u32) -> Option<Direction> {
    match code {
        keycode::ARROW_LEFT | keycode::KEY_A => Some(Direction::Left),
        keycode::ARROW_UP | keycode::KEY_W => Some(Direction::Up),
        keycode::ARROW_RIGHT | keycode::KEY_D => Some(Direction::Right),
        keycode::ARROW_DOWN | keycode::KEY_S => Some(Direction::Down),
        _ => None,
    }
}

/// Holds the most recently requested direction between ticks.
///
/// Later inputs overwrite earlier ones and reading the pending direction does
/// not clear it, so the player keeps heading the same way until a new key
/// arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputHandler {
    pending: Option<Direction>,
}

impl InputHandler {
    /// Creates a handler with no pending direction.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Records a raw key code, returning the direction it mapped to.
    ///
    /// Unrecognised codes leave the pending direction untouched.
    pub fn record(&mut self, code: u32) -> Option<Direction> {
        let direction = direction_for_code(code);
        match direction {
            Some(direction) => self.pending = Some(direction),
            None => trace!("ignoring unmapped key code {code}"),
        }
        direction
    }

    /// Direction to hand to the next tick.
    #[must_use]
    pub const fn pending(&self) -> Option<Direction> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_the_same_directions() {
        assert_eq!(direction_for_code(keycode::ARROW_UP), Some(Direction::Up));
        assert_eq!(direction_for_code(keycode::KEY_W), Some(Direction::Up));
        assert_eq!(direction_for_code(keycode::ARROW_LEFT), Some(Direction::Left));
        assert_eq!(direction_for_code(keycode::KEY_A), Some(Direction::Left));
        assert_eq!(direction_for_code(keycode::ARROW_DOWN), Some(Direction::Down));
        assert_eq!(direction_for_code(keycode::KEY_S), Some(Direction::Down));
        assert_eq!(direction_for_code(keycode::ARROW_RIGHT), Some(Direction::Right));
        assert_eq!(direction_for_code(keycode::KEY_D), Some(Direction::Right));
    }

    #[test]
    fn other_codes_are_unmapped() {
        for code in [0, 13, 32, 36, 41, 66, 88, 1000] {
            assert_eq!(direction_for_code(code), None, "code {code}");
        }
    }
}
