use alloc::vec::Vec;
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayStatus {
    InProgress,
    Complete,
}

impl PlayStatus {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl Default for PlayStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// One accepted move, enough to revert it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Step {
    from: usize,
    to: usize,
    previous_outcome: Option<bool>,
}

/// Play state of a single level: token position, move history and per-cell outcomes.
///
/// Deserializing checks saved indices against the map ([`PuzzleError::InvalidPlayState`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlayStateData", into = "PlayStateData")]
pub struct PlayState {
    map: LevelMap,
    /// Outcome of the last arrival on each cell, indexed like `map.cells()`.
    outcomes: Vec<Option<bool>>,
    history: Vec<Step>,
    current: usize,
    status: PlayStatus,
    score: Option<Score>,
}

impl PlayState {
    pub fn new(map: LevelMap) -> Self {
        let current = map.base_index();
        let outcomes = alloc::vec![None; map.cells().len()];
        Self {
            map,
            outcomes,
            history: Vec::new(),
            current,
            status: Default::default(),
            score: None,
        }
    }

    pub fn map(&self) -> &LevelMap {
        &self.map
    }

    pub fn status(&self) -> PlayStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status.is_in_progress()
    }

    pub fn current_cell(&self) -> &Cell {
        &self.map.cells()[self.current]
    }

    pub fn step_count(&self) -> u32 {
        u32::try_from(self.history.len()).unwrap_or(u32::MAX)
    }

    /// Ids of the cells left by each accepted move, oldest first.
    pub fn step_history(&self) -> impl Iterator<Item = &CellId> + '_ {
        self.history
            .iter()
            .map(|step| self.map.cells()[step.from].id())
    }

    /// Score of the completed level, `None` while still in progress.
    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn last_outcome(&self, id: &str) -> Result<Option<bool>> {
        let idx = self.resolve(id)?;
        Ok(self.outcomes[idx])
    }

    pub fn is_solved(&self, id: &str) -> Result<bool> {
        let idx = self.resolve(id)?;
        Ok(self.is_solved_at(idx))
    }

    /// Every non-base cell was last entered in its required direction.
    pub fn is_complete(&self) -> bool {
        (0..self.outcomes.len()).all(|idx| self.is_solved_at(idx))
    }

    pub fn cell_views(&self) -> Vec<CellView> {
        self.map
            .cells()
            .iter()
            .enumerate()
            .map(|(idx, cell)| CellView {
                id: cell.id().clone(),
                pos: cell.pos(),
                kind: cell.kind(),
                last_outcome: self.outcomes[idx],
                solved: self.is_solved_at(idx),
                occupied: idx == self.current,
            })
            .collect()
    }

    /// Cells the token can move to from its current position.
    pub fn legal_moves(&self) -> SmallVec<[(Direction, &Cell); 4]> {
        if !self.is_in_progress() {
            return SmallVec::new();
        }
        self.map.neighbors(self.current_cell().pos())
    }

    pub fn move_to(&mut self, target: &str) -> Result<MoveOutcome> {
        if !self.is_in_progress() {
            return Ok(MoveOutcome::Ignored);
        }

        let to = self.resolve(target)?;
        let from_cell = self.current_cell();
        let to_cell = &self.map.cells()[to];

        let Some(direction) = Direction::between(from_cell.pos(), to_cell.pos()) else {
            log::debug!("Rejected move {} -> {}, not adjacent", from_cell.id(), to_cell.id());
            return Ok(MoveOutcome::Rejected);
        };

        let outcome = to_cell.arrival_outcome(direction);
        self.history.push(Step {
            from: self.current,
            to,
            previous_outcome: self.outcomes[to],
        });
        if outcome.is_some() {
            self.outcomes[to] = outcome;
        }
        self.current = to;

        if !self.is_complete() {
            return Ok(MoveOutcome::Moved {
                direction,
                matched: outcome.unwrap_or(false),
            });
        }

        let Some(steps) = NonZeroU32::new(self.step_count()) else {
            log::error!("Level complete without any steps taken");
            return Err(PuzzleError::NothingToSolve);
        };
        let score = Score::compute(self.map.optimum(), steps);
        self.status = PlayStatus::Complete;
        self.score = Some(score);
        log::info!(
            "Level complete in {} steps (optimum {}), {} points",
            steps,
            score.optimum,
            score.points
        );
        Ok(MoveOutcome::Completed(score))
    }

    pub fn undo(&mut self) -> UndoOutcome {
        if !self.is_in_progress() {
            return UndoOutcome::NoChange;
        }

        let Some(step) = self.history.pop() else {
            return UndoOutcome::NoChange;
        };
        self.outcomes[step.to] = step.previous_outcome;
        self.current = step.from;
        UndoOutcome::Reverted
    }

    pub fn restart(&mut self) {
        self.outcomes.fill(None);
        self.history.clear();
        self.current = self.map.base_index();
        self.status = PlayStatus::InProgress;
        self.score = None;
    }

    fn is_solved_at(&self, idx: usize) -> bool {
        self.map.cells()[idx].is_base() || self.outcomes[idx] == Some(true)
    }

    fn resolve(&self, id: &str) -> Result<usize> {
        self.map.index_of(id).ok_or_else(|| {
            log::error!("Cell {} not found in the current map", id);
            PuzzleError::UnknownCell(id.into())
        })
    }
}

/// Unchecked wire form of [`PlayState`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct PlayStateData {
    map: LevelMap,
    outcomes: Vec<Option<bool>>,
    history: Vec<Step>,
    current: usize,
    status: PlayStatus,
    score: Option<Score>,
}

impl TryFrom<PlayStateData> for PlayState {
    type Error = PuzzleError;

    fn try_from(data: PlayStateData) -> Result<Self> {
        let invalid = PuzzleError::InvalidPlayState;
        let len = data.map.cells().len();
        let base = data.map.base_index();

        if data.outcomes.len() != len {
            return Err(invalid("outcome count differs from cell count"));
        }
        if data.outcomes[base].is_some() {
            return Err(invalid("base cell has an outcome"));
        }
        if data.current >= len {
            return Err(invalid("token position out of range"));
        }

        // Each step leaves from where the previous one arrived, the last one ends on the token.
        let mut at = base;
        for step in &data.history {
            if step.from >= len || step.to >= len {
                return Err(invalid("step index out of range"));
            }
            if step.from != at {
                return Err(invalid("step history is not a connected path"));
            }
            at = step.to;
        }
        if at != data.current {
            return Err(invalid("step history does not end on the token"));
        }

        if data.status.is_in_progress() == data.score.is_some() {
            return Err(invalid("score does not match status"));
        }

        Ok(Self {
            map: data.map,
            outcomes: data.outcomes,
            history: data.history,
            current: data.current,
            status: data.status,
            score: data.score,
        })
    }
}

impl From<PlayState> for PlayStateData {
    fn from(state: PlayState) -> Self {
        Self {
            map: state.map,
            outcomes: state.outcomes,
            history: state.history,
            current: state.current,
            status: state.status,
            score: state.score,
        }
    }
}
