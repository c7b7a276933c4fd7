use alloc::string::String;
use thiserror::Error;

use crate::{CellId, LevelIndex};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Map for level {0} not found")]
    MapNotFound(LevelIndex),
    #[error("Malformed map data: {0}")]
    MalformedMap(String),
    #[error("Map has no base cell")]
    MissingBaseCell,
    #[error("Map has more than one base cell")]
    MultipleBaseCells,
    #[error("Duplicate cell id {0}")]
    DuplicateCellId(CellId),
    #[error("Cell {0} shares its position with another cell")]
    OverlappingCells(CellId),
    #[error("Cell {0} has invalid coordinates, rows and columns start at 1")]
    InvalidCoords(CellId),
    #[error("Cell {0} has no required direction")]
    MissingDirection(CellId),
    #[error("Map has no cells to solve")]
    NothingToSolve,
    #[error("Optimum step count must be positive")]
    InvalidOptimum,
    #[error("Cell {0} is not part of the current map")]
    UnknownCell(CellId),
    #[error("No level is loaded")]
    NotLoaded,
    #[error("A level load is already pending")]
    LoadPending,
    #[error("No load is pending for level {0}")]
    UnexpectedLoad(LevelIndex),
    #[error("Saved play state is inconsistent: {0}")]
    InvalidPlayState(&'static str),
}

pub type Result<T> = core::result::Result<T, PuzzleError>;
