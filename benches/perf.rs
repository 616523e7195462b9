use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use rand::SeedableRng;
use rand::rngs::StdRng;

use kickcluster::features::{DeriveConfig, derive_features};
use kickcluster::matrix::build_matrix;
use kickcluster::plays::PlayType;
use kickcluster::synthetic::synthetic_dataset;
use kickcluster::window::kick_window;

fn bench_kick_window(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1001);
    let data = synthetic_dataset(&mut rng, 50, PlayType::FieldGoal);
    let meta = data.metadata[25].clone();
    let label = data.event_label();

    c.bench_function("kick_window", |b| {
        b.iter(|| {
            let window = kick_window(
                black_box(meta.game_id),
                black_box(meta.play_id),
                &data.ball,
                label,
            )
            .unwrap();
            black_box(window.peak);
        })
    });
}

fn bench_derive_features(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1002);
    let data = synthetic_dataset(&mut rng, 200, PlayType::FieldGoal);
    let plays = data.play_table();
    let cfg = DeriveConfig::default();

    c.bench_function("derive_features_200_plays", |b| {
        b.iter(|| {
            let mut batch = plays.clone();
            derive_features(
                &mut batch,
                &data.tracking,
                &data.ball,
                data.event_label(),
                &cfg,
            );
            black_box(batch.len());
        })
    });
}

fn bench_build_matrix(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1003);
    let data = synthetic_dataset(&mut rng, 200, PlayType::FieldGoal);
    let mut plays = data.play_table();
    let cfg = DeriveConfig::default();
    derive_features(
        &mut plays,
        &data.tracking,
        &data.ball,
        data.event_label(),
        &cfg,
    );

    c.bench_function("build_matrix_200_plays", |b| {
        b.iter(|| {
            let matrix = build_matrix(black_box(&plays), PlayType::FieldGoal, &cfg.core_dist_ks);
            black_box(matrix.rows.len());
        })
    });
}

criterion_group!(
    benches,
    bench_kick_window,
    bench_derive_features,
    bench_build_matrix
);
criterion_main!(benches);
