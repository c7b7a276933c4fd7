use alloc::string::ToString;
use alloc::vec::Vec;
use core::num::NonZeroU32;
use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Display-only compensation applied by the renderer when it first lays out a scene.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOffset {
    pub x: f64,
    pub y: f64,
}

/// A cell as authored in a map document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub id: CellId,
    pub row: Coord,
    pub col: Coord,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_base: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<Direction>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl CellData {
    pub fn base(id: impl Into<CellId>, row: Coord, col: Coord) -> Self {
        Self {
            id: id.into(),
            row,
            col,
            is_base: true,
            dir: None,
        }
    }

    pub fn arrow(id: impl Into<CellId>, row: Coord, col: Coord, dir: Direction) -> Self {
        Self {
            id: id.into(),
            row,
            col,
            is_base: false,
            dir: Some(dir),
        }
    }
}

/// Wire format of one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub cells: Vec<CellData>,
    pub optimum: u32,
    #[serde(default, rename = "positionCompensation")]
    pub render_offset: RenderOffset,
}

/// Validated, immutable definition of one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MapData", into = "MapData")]
pub struct LevelMap {
    cells: Vec<Cell>,
    base: usize,
    optimum: NonZeroU32,
    render_offset: RenderOffset,
    index: HashMap<CellId, usize>,
    /// Cell index by position, `[row - 1, col - 1]`.
    grid: Array2<Option<usize>>,
    extent: GridPos,
}

impl LevelMap {
    pub fn from_json(json: &str) -> Result<Self> {
        let data: MapData =
            serde_json::from_str(json).map_err(|err| PuzzleError::MalformedMap(err.to_string()))?;
        Self::try_from(data)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn base_cell(&self) -> &Cell {
        &self.cells[self.base]
    }

    pub fn optimum(&self) -> NonZeroU32 {
        self.optimum
    }

    pub fn render_offset(&self) -> RenderOffset {
        self.render_offset
    }

    /// Highest row and highest column used by any cell.
    pub fn extent(&self) -> GridPos {
        self.extent
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.index_of(id).map(|idx| &self.cells[idx])
    }

    pub fn cell_at(&self, pos: GridPos) -> Option<&Cell> {
        self.index_at(pos).map(|idx| &self.cells[idx])
    }

    /// Cells orthogonally adjacent to `pos`, with the direction of a move onto each of them.
    pub fn neighbors(&self, pos: GridPos) -> SmallVec<[(Direction, &Cell); 4]> {
        NeighborIter::new(pos, self.extent)
            .filter_map(|(dir, next)| self.cell_at(next).map(|cell| (dir, cell)))
            .collect()
    }

    pub(crate) fn base_index(&self) -> usize {
        self.base
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn index_at(&self, pos: GridPos) -> Option<usize> {
        if !pos.is_valid() || pos.row > self.extent.row || pos.col > self.extent.col {
            return None;
        }
        self.grid[pos.to_nd_index()]
    }
}

impl TryFrom<MapData> for LevelMap {
    type Error = PuzzleError;

    fn try_from(data: MapData) -> Result<Self> {
        let optimum = NonZeroU32::new(data.optimum).ok_or(PuzzleError::InvalidOptimum)?;

        let mut cells = Vec::with_capacity(data.cells.len());
        let mut index = HashMap::with_capacity(data.cells.len());
        let mut base = None;
        let mut extent = GridPos::new(0, 0);

        for raw in data.cells {
            let pos = GridPos::new(raw.row, raw.col);
            if !pos.is_valid() {
                return Err(PuzzleError::InvalidCoords(raw.id));
            }

            let kind = if raw.is_base {
                if base.is_some() {
                    return Err(PuzzleError::MultipleBaseCells);
                }
                if let Some(dir) = raw.dir {
                    log::warn!("Base cell {} declares direction {:?}, ignored", raw.id, dir);
                }
                base = Some(cells.len());
                CellKind::Base
            } else {
                match raw.dir {
                    Some(dir) => CellKind::Arrow(dir),
                    None => return Err(PuzzleError::MissingDirection(raw.id)),
                }
            };

            if index.contains_key(&raw.id) {
                return Err(PuzzleError::DuplicateCellId(raw.id));
            }
            index.insert(raw.id.clone(), cells.len());

            extent.row = extent.row.max(pos.row);
            extent.col = extent.col.max(pos.col);
            cells.push(Cell {
                id: raw.id,
                pos,
                kind,
            });
        }

        let base = base.ok_or(PuzzleError::MissingBaseCell)?;
        if cells.len() < 2 {
            return Err(PuzzleError::NothingToSolve);
        }

        let mut grid: Array2<Option<usize>> =
            Array2::from_elem([usize::from(extent.row), usize::from(extent.col)], None);
        for (idx, cell) in cells.iter().enumerate() {
            let slot = &mut grid[cell.pos.to_nd_index()];
            if slot.is_some() {
                return Err(PuzzleError::OverlappingCells(cell.id.clone()));
            }
            *slot = Some(idx);
        }

        Ok(Self {
            cells,
            base,
            optimum,
            render_offset: data.render_offset,
            index,
            grid,
            extent,
        })
    }
}

impl From<LevelMap> for MapData {
    fn from(map: LevelMap) -> Self {
        let cells = map
            .cells
            .into_iter()
            .map(|cell| CellData {
                id: cell.id,
                row: cell.pos.row,
                col: cell.pos.col,
                is_base: matches!(cell.kind, CellKind::Base),
                dir: match cell.kind {
                    CellKind::Base => None,
                    CellKind::Arrow(dir) => Some(dir),
                },
            })
            .collect();

        Self {
            cells,
            optimum: map.optimum.get(),
            render_offset: map.render_offset,
        }
    }
}
