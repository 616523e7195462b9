use crate::errors::FeatureError;
use crate::tracking::{FIELD_LENGTH_X, TrackingTable};
use crate::window::KickWindow;

/// x-coordinate of the goal plane at the attacking end.
pub const GOAL_PLANE_X: f64 = FIELD_LENGTH_X;
/// Lateral center of the goal: the 160 ft field width in yards, halved.
/// Overridable through `DeriveConfig` for non-standard field setups.
pub const GOAL_CENTER_Y: f64 = 160.0 / 6.0;
/// Tolerance band (yards) around a goal plane inside which ball samples
/// count as "crossing".
pub const DEFAULT_CROSSING_TOLERANCE: f64 = 2.0;

/// Straight-line expectation of where the ball crosses the goal plane.
///
/// Uses the kick-moment sample and the sample two positions later; skipping
/// one sample damps the positional jitter right after release. The widened
/// window normally guarantees `peak + 2` exists, but truncated plays can
/// still leave it short.
pub fn expected_crossing_y(window: &KickWindow<'_>) -> Result<f64, FeatureError> {
    let first = window.peak_sample();
    let second =
        window
            .samples
            .get(window.peak + 2)
            .ok_or_else(|| FeatureError::InsufficientWindow {
                peak: window.peak,
                len: window.samples.len(),
            })?;

    let run = second.x - first.x;
    if run == 0.0 {
        return Err(FeatureError::DegenerateGeometry);
    }
    let slope = (second.y - first.y) / run;
    Ok(slope * (GOAL_PLANE_X - first.x) + first.y)
}

/// True when x sits within the tolerance band of either goal plane. Both
/// ends are checked to tolerate plays sampled before reorientation ran.
pub fn near_goal_plane(x: f64, tolerance: f64) -> bool {
    (x - GOAL_PLANE_X).abs() < tolerance || x.abs() < tolerance
}

/// Observed y-position of the ball as it crosses the goal plane.
///
/// Tracking is low-resolution relative to ball speed, so the crossing is
/// estimated by averaging the two center samples of the in-band sequence
/// (the last sample before and first after the plane). A single in-band
/// sample stands for itself; an empty band yields null, which is expected
/// for sparsely sampled plays and must not abort the batch.
pub fn observed_crossing_y(
    game_id: u64,
    play_id: u32,
    ball: &TrackingTable,
    tolerance: f64,
) -> Option<f64> {
    let in_band: Vec<f64> = ball
        .play(game_id, play_id)
        .iter()
        .filter(|s| near_goal_plane(s.x, tolerance))
        .map(|s| s.y)
        .collect();

    match in_band.len() {
        0 => None,
        1 => Some(in_band[0]),
        n => {
            let first = n / 2 - 1;
            let second = if n % 2 == 0 { n / 2 } else { n / 2 - 1 };
            Some((in_band[first] + in_band[second]) / 2.0)
        }
    }
}

/// Absolute error between observed and expected crossing. Null-propagating.
pub fn crossing_error(observed: Option<f64>, expected: Option<f64>) -> Option<f64> {
    Some((observed? - expected?).abs())
}

/// Absolute lateral offset of the observed crossing from the goal center.
/// Null-propagating.
pub fn off_center(observed: Option<f64>, goal_center_y: f64) -> Option<f64> {
    Some((observed? - goal_center_y).abs())
}
