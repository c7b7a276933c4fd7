use serde::{Deserialize, Serialize};

/// Single coordinate axis used for rows and columns. Maps start counting at 1.
pub type Coord = u8;

/// 1-based position of a level in the level sequence, 0 means no level.
pub type LevelIndex = u32;

/// Grid position of a cell. A larger `row` is further "up" on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub row: Coord,
    pub col: Coord,
}

impl GridPos {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    pub const fn is_valid(self) -> bool {
        self.row >= 1 && self.col >= 1
    }

    pub fn is_adjacent(self, other: GridPos) -> bool {
        Direction::between(self, other).is_some()
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for GridPos {
    type Output = [usize; 2];

    /// Zero-based `[row, col]` index, only meaningful for valid positions.
    fn to_nd_index(self) -> Self::Output {
        [
            usize::from(self.row.saturating_sub(1)),
            usize::from(self.col.saturating_sub(1)),
        ]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Direction of a single step from `from` to `to`, `None` unless the two positions are
    /// orthogonally adjacent.
    pub fn between(from: GridPos, to: GridPos) -> Option<Direction> {
        use Direction::*;

        if from.row == to.row {
            match to.col.checked_sub(from.col) {
                Some(1) => Some(Right),
                None if from.col - to.col == 1 => Some(Left),
                _ => None,
            }
        } else if from.col == to.col {
            match to.row.checked_sub(from.row) {
                Some(1) => Some(Up),
                None if from.row - to.row == 1 => Some(Down),
                _ => None,
            }
        } else {
            None
        }
    }

    /// `(row, col)` displacement of one step in this direction.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Up => (1, 0),
            Self::Down => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Applies one step in `dir` to `pos`, returning a value only when it stays within `1..=extent`.
fn apply_delta(pos: GridPos, dir: Direction, extent: GridPos) -> Option<GridPos> {
    let (dr, dc) = dir.delta();

    let row = pos.row.checked_add_signed(dr)?;
    if row == 0 || row > extent.row {
        return None;
    }

    let col = pos.col.checked_add_signed(dc)?;
    if col == 0 || col > extent.col {
        return None;
    }

    Some(GridPos { row, col })
}

/// Orthogonal neighbor positions of `center` inside a grid of size `extent`.
#[derive(Debug)]
pub struct NeighborIter {
    center: GridPos,
    extent: GridPos,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: GridPos, extent: GridPos) -> Self {
        Self {
            center,
            extent,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = (Direction, GridPos);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dir = *Direction::ALL.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(pos) = apply_delta(self.center, dir, self.extent) {
                return Some((dir, pos));
            }
        }
    }
}
