use arrowpath_core::*;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A long corridor of arrows, the token walks it to the end and back with undo.
fn corridor(len: u8) -> LevelMap {
    let mut cells = vec![CellData::base("base", 1, 1)];
    cells.extend((2..=len).map(|col| CellData::arrow(u64::from(col), 1, col, Direction::Right)));
    LevelMap::try_from(MapData {
        cells,
        optimum: u32::from(len - 1),
        render_offset: RenderOffset::default(),
    })
    .unwrap()
}

fn bench_moves(c: &mut Criterion) {
    let map = corridor(200);
    let ids: Vec<String> = map.cells()[1..]
        .iter()
        .map(|cell| cell.id().to_string())
        .collect();

    c.bench_function("walk_and_undo_corridor", |b| {
        b.iter(|| {
            let mut play = PlayState::new(map.clone());
            // stop short of the end so the level stays in progress
            for id in &ids[..ids.len() - 1] {
                black_box(play.move_to(id).unwrap());
            }
            while play.undo().has_update() {}
            black_box(play.step_count())
        })
    });

    c.bench_function("cell_views", |b| {
        let mut play = PlayState::new(map.clone());
        for id in &ids[..ids.len() / 2] {
            play.move_to(id).unwrap();
        }
        b.iter(|| black_box(play.cell_views()))
    });
}

criterion_group!(benches, bench_moves);
criterion_main!(benches);
