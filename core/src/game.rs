use alloc::string::ToString;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of the engine as a whole.
///
/// Valid transitions:
/// - Uninitialized -> Loading
/// - Loading -> InProgress (load succeeded)
/// - Loading -> previous state (load failed)
/// - InProgress -> InProgress (move, undo)
/// - InProgress -> Complete
/// - InProgress | Complete -> InProgress (restart)
/// - InProgress | Complete -> Loading (next level)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Uninitialized,
    Loading,
    InProgress,
    Complete,
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

/// Renderer gestures, each mapping to one engine operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerInput {
    CellClicked(CellId),
    UndoRequested,
    RestartRequested,
    NextLevelRequested,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced(LevelIndex),
    /// The current level is the last one, nothing was loaded.
    Exhausted,
}

impl AdvanceOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Advanced(_))
    }
}

/// Drives levels from a [`MapSource`] through [`PlayState`] and reports every change on its
/// [`EventBus`].
#[derive(Debug)]
pub struct PuzzleEngine<S> {
    source: S,
    level: LevelIndex,
    pending: Option<LevelIndex>,
    play: Option<PlayState>,
    events: EventBus,
}

impl<S: MapSource> PuzzleEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            level: 0,
            pending: None,
            play: None,
            events: EventBus::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        if self.pending.is_some() {
            return EngineState::Loading;
        }
        match &self.play {
            None => EngineState::Uninitialized,
            Some(play) if play.is_in_progress() => EngineState::InProgress,
            Some(_) => EngineState::Complete,
        }
    }

    /// Index of the loaded level, 0 before the first successful load.
    pub fn level(&self) -> LevelIndex {
        self.level
    }

    pub fn level_count(&self) -> LevelIndex {
        self.source.level_count()
    }

    pub fn play(&self) -> Option<&PlayState> {
        self.play.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Loads `level` from the map source and starts it.
    pub fn initialize(&mut self, level: LevelIndex) -> Result<()> {
        self.begin_load(level)?;
        let loaded = self.source.load(level);
        self.finish_load(level, loaded)
    }

    /// Marks `level` as loading. Moves, undo and restart are ignored until [`Self::finish_load`].
    ///
    /// Hosts that fetch map documents asynchronously call this before starting the fetch.
    pub fn begin_load(&mut self, level: LevelIndex) -> Result<()> {
        if let Some(pending) = self.pending {
            log::warn!("Level {} requested while level {} is loading", level, pending);
            return Err(PuzzleError::LoadPending);
        }
        self.pending = Some(level);
        Ok(())
    }

    /// Completes the pending load of `level`, starting it on success.
    ///
    /// On failure the engine keeps the level it had before and reports
    /// [`GameEvent::LevelLoadFailed`].
    pub fn finish_load(&mut self, level: LevelIndex, loaded: Result<LevelMap>) -> Result<()> {
        if self.pending != Some(level) {
            return Err(PuzzleError::UnexpectedLoad(level));
        }
        self.pending = None;

        let map = match loaded {
            Ok(map) => map,
            Err(err) => {
                log::warn!("Could not load level {}: {}", level, err);
                self.events.emit(GameEvent::LevelLoadFailed {
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        log::info!("Level {} loaded, {} cells", level, map.cells().len());
        self.level = level;
        self.play = Some(PlayState::new(map));
        self.emit_scene(true);
        Ok(())
    }

    pub fn move_to(&mut self, target: &str) -> Result<MoveOutcome> {
        let Some(play) = self.active_play() else {
            return Ok(MoveOutcome::Ignored);
        };

        let outcome = play.move_to(target)?;
        if outcome.has_update() {
            self.emit_progress();
        }
        if let MoveOutcome::Completed(score) = outcome {
            self.events.emit(GameEvent::LevelComplete {
                score: score.points,
                star_count: score.stars.count(),
            });
        }
        Ok(outcome)
    }

    pub fn undo(&mut self) -> UndoOutcome {
        let Some(play) = self.active_play() else {
            return UndoOutcome::NoChange;
        };

        let outcome = play.undo();
        if outcome.has_update() {
            self.emit_progress();
        }
        outcome
    }

    pub fn restart(&mut self) -> Result<()> {
        if self.pending.is_some() {
            return Err(PuzzleError::LoadPending);
        }
        let play = self.play.as_mut().ok_or(PuzzleError::NotLoaded)?;

        play.restart();
        self.emit_scene(false);
        Ok(())
    }

    /// Moves on to the next level, or reports that every level is done.
    pub fn advance_level(&mut self) -> Result<AdvanceOutcome> {
        if self.pending.is_some() {
            return Err(PuzzleError::LoadPending);
        }
        if self.play.is_none() {
            return Err(PuzzleError::NotLoaded);
        }

        if self.level >= self.source.level_count() {
            log::info!("Level {} was the last one", self.level);
            self.events.emit(GameEvent::AllLevelsComplete);
            return Ok(AdvanceOutcome::Exhausted);
        }

        let next = self.level + 1;
        self.initialize(next)?;
        Ok(AdvanceOutcome::Advanced(next))
    }

    /// Applies a renderer gesture, returning whether anything changed.
    pub fn handle(&mut self, input: PlayerInput) -> Result<bool> {
        match input {
            PlayerInput::CellClicked(id) => Ok(self.move_to(id.as_str())?.has_update()),
            PlayerInput::UndoRequested => Ok(self.undo().has_update()),
            PlayerInput::RestartRequested => self.restart().map(|()| true),
            PlayerInput::NextLevelRequested => Ok(self.advance_level()?.has_update()),
        }
    }

    fn active_play(&mut self) -> Option<&mut PlayState> {
        if self.pending.is_some() {
            log::debug!("Input ignored while a level is loading");
            return None;
        }
        self.play.as_mut()
    }

    fn emit_scene(&mut self, first_start: bool) {
        let Some(play) = &self.play else {
            return;
        };
        self.events.emit(GameEvent::SceneInitialized {
            map: play.map().clone(),
            first_start,
        });
        self.emit_progress();
    }

    fn emit_progress(&mut self) {
        let Some(play) = &self.play else {
            return;
        };
        self.events.emit(GameEvent::TokenMoved {
            cell_id: play.current_cell().id().clone(),
        });
        self.events.emit(GameEvent::StepCountChanged {
            count: play.step_count(),
        });
        self.events.emit(GameEvent::CellStatesChanged {
            cells: play.cell_views(),
        });
    }
}
