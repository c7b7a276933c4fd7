//! Rules engine for a tile-path puzzle.
//!
//! A token starts on the base cell of a [`LevelMap`] and moves one cell at a time, orthogonally.
//! Every other cell asks to be entered in a particular [`Direction`]; the level is complete once
//! the last arrival on each of them matched. [`PlayState`] holds the rules for one level and
//! [`PuzzleEngine`] strings levels from a [`MapSource`] together, reporting each change as a
//! [`GameEvent`].
#![no_std]

extern crate alloc;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use event::*;
pub use game::*;
pub use loader::*;
pub use map::*;
pub use score::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod event;
mod game;
mod loader;
mod map;
mod score;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No level in progress.
    Ignored,
    /// Target is not adjacent to the token.
    Rejected,
    Moved { direction: Direction, matched: bool },
    Completed(Score),
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            Ignored => false,
            Rejected => false,
            Moved { .. } => true,
            Completed(_) => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UndoOutcome {
    NoChange,
    Reverted,
}

impl UndoOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Reverted => true,
        }
    }
}
