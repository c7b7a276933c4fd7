// Plays the bundled levels through the public API, the way a renderer drives the engine.

use arrowpath_core::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

/// Optimal click sequence for each bundled level.
const SOLUTIONS: [&[&str]; 3] = [
    &["2", "3"],
    &["2", "1", "3", "1", "4"],
    &["2", "3", "4", "5", "6"],
];

#[test]
fn every_bundled_level_is_solvable_at_its_optimum() {
    let catalog = MapCatalog::bundled();
    assert_eq!(catalog.level_count() as usize, SOLUTIONS.len());

    for (level, solution) in (1..).zip(SOLUTIONS) {
        let map = catalog.load(level).unwrap();
        assert_eq!(map.optimum().get() as usize, solution.len(), "level {level}");

        let mut play = PlayState::new(map);
        let (last, rest) = solution.split_last().unwrap();
        for id in rest {
            let outcome = play.move_to(id).unwrap();
            assert!(
                matches!(outcome, MoveOutcome::Moved { .. }),
                "level {level}, move to {id}: {outcome:?}"
            );
        }

        let outcome = play.move_to(last).unwrap();
        let MoveOutcome::Completed(score) = outcome else {
            panic!("level {level} not complete: {outcome:?}");
        };
        assert_eq!(score.stars, StarRating::Three, "level {level}");
        assert_eq!(score.points, 100 * score.optimum.get(), "level {level}");
    }
}

#[test]
fn full_run_through_all_levels() {
    let mut engine = PuzzleEngine::new(MapCatalog::bundled());
    let completions = engine.events().subscribe_queue(Topics::LEVEL_COMPLETE);
    let finale = engine.events().subscribe_queue(Topics::ALL_LEVELS_COMPLETE);

    engine.initialize(1).unwrap();
    for (level, solution) in (1..).zip(SOLUTIONS) {
        assert_eq!(engine.level(), level);
        for id in solution {
            assert!(engine.handle(PlayerInput::CellClicked((*id).into())).unwrap());
        }
        assert_eq!(engine.state(), EngineState::Complete);
        engine.handle(PlayerInput::NextLevelRequested).unwrap();
    }

    assert_eq!(engine.level(), 3);
    assert_eq!(completions.len(), 3);
    assert!(completions.drain().iter().all(|event| matches!(
        event,
        GameEvent::LevelComplete { star_count: 3, .. }
    )));
    assert_eq!(finale.drain(), [GameEvent::AllLevelsComplete]);
}

#[test]
fn detour_then_undo_still_earns_three_stars() {
    let mut engine = PuzzleEngine::new(MapCatalog::bundled());
    engine.initialize(3).unwrap();

    // 1 -> 2 -> 3, detour up into 6 and back out with undo
    engine.move_to("2").unwrap();
    engine.move_to("3").unwrap();
    engine.move_to("6").unwrap();
    assert_eq!(engine.undo(), UndoOutcome::Reverted);
    // diagonal from 3 is ignored
    assert_eq!(engine.move_to("5").unwrap(), MoveOutcome::Rejected);

    for id in ["4", "5"] {
        engine.move_to(id).unwrap();
    }
    let outcome = engine.move_to("6").unwrap();

    let MoveOutcome::Completed(score) = outcome else {
        panic!("not complete: {outcome:?}");
    };
    assert_eq!(score.stars, StarRating::Three);
    assert_eq!(score.steps.get(), 5);
}
