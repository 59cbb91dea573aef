use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tilegraph::{
    fill, next_tile, split, CardinalDirection, Settings, TileId, TileKind, TileRegistry, Vector,
};

/// Canvas holding `count` windows, each split off the previous one, with
/// alternating directions
fn layout(count: usize, settings: &Settings) -> (TileRegistry, Vec<TileId>) {
    let mut registry = TileRegistry::new();
    let canvas = registry
        .create_tile_at(TileKind::Canvas, Vector::new(0, 0), Vector::new(3840, 2160), None)
        .unwrap();
    let mut windows = vec![fill(&mut registry, canvas).unwrap()];

    for index in 1..count {
        let direction = if index % 2 == 0 {
            CardinalDirection::South
        } else {
            CardinalDirection::East
        };
        let last = windows[windows.len() - 1];
        let (window, _) = split(&mut registry, last, direction, settings).unwrap();
        windows.push(window);
    }
    (registry, windows)
}

fn benchmark_splits(c: &mut Criterion) {
    let settings = Settings::with_margin(8);
    let mut group = c.benchmark_group("split");

    for count in [2, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(layout(count, &settings)))
        });
    }
    group.finish();
}

fn benchmark_navigation(c: &mut Criterion) {
    let settings = Settings::with_margin(8);
    let (registry, windows) = layout(16, &settings);

    c.bench_function("next_tile", |b| {
        b.iter(|| {
            for window in &windows {
                for direction in CardinalDirection::ALL {
                    black_box(next_tile(&registry, *window, direction, &settings).unwrap());
                }
            }
        })
    });
}

criterion_group!(benches, benchmark_splits, benchmark_navigation);
criterion_main!(benches);
