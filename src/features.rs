use rayon::prelude::*;

use crate::plays::PlayRecord;
use crate::pressure::{DEFAULT_CORE_DIST_K, kicker_core_dist};
use crate::tracking::TrackingTable;
use crate::trajectory::{
    DEFAULT_CROSSING_TOLERANCE, GOAL_CENTER_Y, crossing_error, expected_crossing_y, off_center,
    observed_crossing_y,
};
use crate::window::kick_window;

/// Tunable constants of the derivation pass. The tolerance and goal-center
/// defaults suit standard fields; both stay configurable for reanalysis.
#[derive(Debug, Clone)]
pub struct DeriveConfig {
    pub crossing_tolerance: f64,
    pub goal_center_y: f64,
    /// k values for kicker_core_dist_{k} columns.
    pub core_dist_ks: Vec<usize>,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            crossing_tolerance: DEFAULT_CROSSING_TOLERANCE,
            goal_center_y: GOAL_CENTER_Y,
            core_dist_ks: vec![DEFAULT_CORE_DIST_K],
        }
    }
}

/// Enriches every play record in place with the derived feature columns.
///
/// Per-row data-quality failures (missing events, degenerate geometry,
/// missing players) become nulls; row count is always preserved and no
/// error crosses the batch boundary. Rows only read the shared immutable
/// tracking tables, so they are mapped in parallel.
///
/// The pass is idempotent: derived columns are recomputed from scratch, so
/// re-running over an already-enriched table yields identical values.
pub fn derive_features(
    plays: &mut [PlayRecord],
    full: &TrackingTable,
    ball: &TrackingTable,
    event_label: &str,
    cfg: &DeriveConfig,
) {
    plays.par_iter_mut().for_each(|play| {
        let (game_id, play_id) = play.key();

        let observed = observed_crossing_y(game_id, play_id, ball, cfg.crossing_tolerance);
        let expected = kick_window(game_id, play_id, ball, event_label)
            .and_then(|window| expected_crossing_y(&window))
            .ok();

        let features = &mut play.features;
        features.endzone_y = observed;
        features.endzone_y_expected = expected;
        features.endzone_y_error = crossing_error(observed, expected);
        features.endzone_y_off_center = off_center(observed, cfg.goal_center_y);

        features.kicker_core_dist.clear();
        for &k in &cfg.core_dist_ks {
            let dist = kicker_core_dist(game_id, play_id, full, ball, event_label, k).ok();
            features.kicker_core_dist.insert(k, dist);
        }
    });
}

/// True when every derived column of a record is populated. Partial rows
/// must never be treated as complete downstream.
pub fn features_complete(play: &PlayRecord) -> bool {
    let f = &play.features;
    f.endzone_y.is_some()
        && f.endzone_y_expected.is_some()
        && f.endzone_y_error.is_some()
        && f.endzone_y_off_center.is_some()
        && f.kicker_core_dist.values().all(Option::is_some)
}
