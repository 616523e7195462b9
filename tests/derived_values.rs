use rand::SeedableRng;
use rand::rngs::StdRng;

use kickcluster::features::{DeriveConfig, derive_features};
use kickcluster::plays::PlayType;
use kickcluster::synthetic::synthetic_dataset;
use kickcluster::trajectory::GOAL_CENTER_Y;

// The synthetic generator samples each kick exactly on a straight line to a
// known crossing y, so the derived columns have closed-form values.

#[test]
fn observed_and_expected_agree_with_the_known_crossing() {
    let mut rng = StdRng::seed_from_u64(601);
    let data = synthetic_dataset(&mut rng, 10, PlayType::FieldGoal);
    let mut plays = data.play_table();
    derive_features(
        &mut plays,
        &data.tracking,
        &data.ball,
        data.event_label(),
        &DeriveConfig::default(),
    );

    for (play, &target) in plays.iter().zip(&data.crossing_targets) {
        let observed = play.features.endzone_y.unwrap();
        let expected = play.features.endzone_y_expected.unwrap();
        assert!(
            (observed - target).abs() < 1e-9,
            "observed {observed} vs target {target}"
        );
        assert!(
            (expected - target).abs() < 1e-9,
            "expected {expected} vs target {target}"
        );
        assert!(play.features.endzone_y_error.unwrap() < 1e-9);

        let off = play.features.endzone_y_off_center.unwrap();
        assert!((off - (target - GOAL_CENTER_Y).abs()).abs() < 1e-9);
    }
}

#[test]
fn core_distance_grows_with_k() {
    let mut rng = StdRng::seed_from_u64(602);
    let data = synthetic_dataset(&mut rng, 5, PlayType::ExtraPoint);
    let mut plays = data.play_table();
    let cfg = DeriveConfig {
        core_dist_ks: vec![1, 3, 5, 11],
        ..DeriveConfig::default()
    };
    derive_features(
        &mut plays,
        &data.tracking,
        &data.ball,
        data.event_label(),
        &cfg,
    );

    for play in &plays {
        let dists: Vec<f64> = cfg
            .core_dist_ks
            .iter()
            .map(|k| play.features.kicker_core_dist[k].unwrap())
            .collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1]), "{dists:?}");
        assert!(dists[0] > 0.0);
    }
}

#[test]
fn k_beyond_defense_size_is_null_for_that_column_only() {
    let mut rng = StdRng::seed_from_u64(603);
    let data = synthetic_dataset(&mut rng, 3, PlayType::FieldGoal);
    let mut plays = data.play_table();
    let cfg = DeriveConfig {
        core_dist_ks: vec![5, 12], // only 11 defenders exist
        ..DeriveConfig::default()
    };
    derive_features(
        &mut plays,
        &data.tracking,
        &data.ball,
        data.event_label(),
        &cfg,
    );

    for play in &plays {
        assert!(play.features.kicker_core_dist[&5].is_some());
        assert_eq!(play.features.kicker_core_dist[&12], None);
        // The crossing features are untouched by the pressure failure.
        assert!(play.features.endzone_y.is_some());
    }
}
