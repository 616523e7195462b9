use crate::plays::PlayRecord;
use crate::tracking::TrackingTable;

/// Maximum plausible gap (in samples) between the labeled event frame and
/// the ball's global speed maximum. Larger gaps mean the vendor label is
/// inconsistent with ball physics.
pub const DEFAULT_GAP_THRESHOLD: usize = 7;

/// Gap between the labeled event row and the speed-maximum row over the
/// whole ball trajectory (not just the kick window). Null when the label is
/// absent for the play.
pub fn event_speed_index_gap(
    game_id: u64,
    play_id: u32,
    ball: &TrackingTable,
    event_label: &str,
) -> Option<usize> {
    let play = ball.play(game_id, play_id);
    let event_row = play
        .iter()
        .position(|s| s.event.as_deref() == Some(event_label))?;

    let mut max_row = 0usize;
    for (i, s) in play.iter().enumerate() {
        if s.speed > play[max_row].speed {
            max_row = i;
        }
    }
    Some(event_row.abs_diff(max_row))
}

/// Drops plays whose labeled event is implausibly far from the observed
/// speed peak. A kicked ball peaks in speed essentially at the kick, so a
/// large gap marks label noise. Null gaps cannot be verified as plausible
/// and are dropped too; the boundary is inclusive at the threshold.
pub fn filter_physically_plausible(
    plays: Vec<PlayRecord>,
    ball: &TrackingTable,
    event_label: &str,
    threshold: usize,
) -> Vec<PlayRecord> {
    plays
        .into_iter()
        .filter(|play| {
            event_speed_index_gap(play.game_id, play.play_id, ball, event_label)
                .is_some_and(|gap| gap <= threshold)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{TeamSide, TrackingSample};

    fn ball_play(play_id: u32, event_at: usize, peak_at: usize, len: usize) -> Vec<TrackingSample> {
        (0..len)
            .map(|i| TrackingSample {
                game_id: 1,
                play_id,
                frame_id: i as u32 + 1,
                team: TeamSide::Football,
                position: None,
                x: i as f64,
                y: 25.0,
                speed: if i == peak_at { 19.0 } else { 1.0 },
                event: (i == event_at).then(|| "kick".to_string()),
            })
            .collect()
    }

    #[test]
    fn gap_is_distance_between_label_and_global_peak() {
        let ball = TrackingTable::from_samples(ball_play(1, 10, 14, 40));
        assert_eq!(event_speed_index_gap(1, 1, &ball, "kick"), Some(4));
    }

    #[test]
    fn absent_label_is_null() {
        let ball = TrackingTable::from_samples(ball_play(1, 10, 14, 40));
        assert_eq!(event_speed_index_gap(1, 1, &ball, "punt"), None);
    }

    fn play_record(play_id: u32) -> PlayRecord {
        use crate::plays::{DerivedFeatures, PlayType};
        PlayRecord {
            game_id: 1,
            play_id,
            play_type: PlayType::FieldGoal,
            result: "Kick Attempt Good".to_string(),
            quarter: 1,
            down: None,
            yards_to_go: None,
            yardline_number: None,
            game_clock_seconds: Some(100),
            penalty_codes: "no penalty".to_string(),
            penalty_yards: 0.0,
            pre_snap_home_score: 0,
            pre_snap_visitor_score: 0,
            kick_length: None,
            play_result: None,
            kicker_id: None,
            kicker_height: None,
            kicker_weight: None,
            kicker_position: None,
            kicker_name: None,
            features: DerivedFeatures::default(),
            cluster: None,
        }
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let mut samples = ball_play(1, 10, 17, 40); // gap exactly 7
        samples.extend(ball_play(2, 10, 18, 40)); // gap 8
        samples.extend(ball_play(3, usize::MAX, 5, 40)); // no event label
        let ball = TrackingTable::from_samples(samples);

        let plays = vec![play_record(1), play_record(2), play_record(3)];
        let kept = filter_physically_plausible(plays, &ball, "kick", DEFAULT_GAP_THRESHOLD);
        let ids: Vec<u32> = kept.iter().map(|p| p.play_id).collect();
        assert_eq!(ids, vec![1]);
    }
}
