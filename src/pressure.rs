use std::cmp::Ordering;

use crate::errors::FeatureError;
use crate::tracking::{TeamSide, TrackingSample, TrackingTable};
use crate::window::kick_window;

/// Default k for the core distance, matching the clustering neighborhood
/// size downstream.
pub const DEFAULT_CORE_DIST_K: usize = 5;

pub fn l2_norm(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Distance from the kicking specialist to the k-th nearest opposing player
/// at the kick frame (1-indexed): the radius containing the k nearest
/// defenders, a proxy for rush tightness.
///
/// The specialist is the player at position "K", falling back to "P" for
/// kick types handled by the punter. Missing specialists and short-handed
/// defenses are real data conditions, reported as errors the pipeline turns
/// into nulls.
pub fn kicker_core_dist(
    game_id: u64,
    play_id: u32,
    full: &TrackingTable,
    ball: &TrackingTable,
    event_label: &str,
    k: usize,
) -> Result<f64, FeatureError> {
    let window = kick_window(game_id, play_id, ball, event_label)?;
    let kick_frame = window.kick_frame_id();

    let at_kick: Vec<&TrackingSample> = full
        .play(game_id, play_id)
        .iter()
        .filter(|s| s.frame_id == kick_frame && s.team != TeamSide::Football)
        .collect();

    let kicker = find_specialist(&at_kick).ok_or(FeatureError::MissingEntity)?;
    let opposing = kicker.team.opponent().ok_or(FeatureError::MissingEntity)?;

    let mut distances: Vec<f64> = at_kick
        .iter()
        .filter(|s| s.team == opposing)
        .map(|s| l2_norm(kicker.x, kicker.y, s.x, s.y))
        .collect();
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    if k == 0 || distances.len() < k {
        return Err(FeatureError::IndexExhaustion {
            k,
            available: distances.len(),
        });
    }
    Ok(distances[k - 1])
}

fn find_specialist<'a>(frame: &[&'a TrackingSample]) -> Option<&'a TrackingSample> {
    frame
        .iter()
        .find(|s| s.position.as_deref() == Some("K"))
        .or_else(|| frame.iter().find(|s| s.position.as_deref() == Some("P")))
        .copied()
}
