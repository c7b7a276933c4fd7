use alloc::string::{String, ToString};
use core::borrow::Borrow;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Stable identifier of a cell within one level.
///
/// Map documents may author ids as text or as integers, both end up as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawCellId")]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CellId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for CellId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for CellId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCellId {
    Text(String),
    Number(u64),
}

impl From<RawCellId> for CellId {
    fn from(raw: RawCellId) -> Self {
        match raw {
            RawCellId::Text(id) => id.into(),
            RawCellId::Number(id) => id.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Starting cell, always solved.
    Base,
    /// Solved when the token last arrived moving in this direction.
    Arrow(Direction),
}

/// One tile of a level map. Immutable once the map is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub(crate) id: CellId,
    pub(crate) pos: GridPos,
    pub(crate) kind: CellKind,
}

impl Cell {
    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_base(&self) -> bool {
        matches!(self.kind, CellKind::Base)
    }

    pub fn required_direction(&self) -> Option<Direction> {
        match self.kind {
            CellKind::Base => None,
            CellKind::Arrow(dir) => Some(dir),
        }
    }

    /// Whether arriving in `dir` satisfies this cell, `None` for the base which records nothing.
    pub(crate) fn arrival_outcome(&self, dir: Direction) -> Option<bool> {
        self.required_direction().map(|required| required == dir)
    }
}

/// Read-only snapshot of a cell as seen by the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub id: CellId,
    pub pos: GridPos,
    pub kind: CellKind,
    /// Outcome of the most recent arrival, `None` if the token never arrived here.
    pub last_outcome: Option<bool>,
    pub solved: bool,
    pub occupied: bool,
}
