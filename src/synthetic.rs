use std::collections::HashMap;

use rand::Rng;

use crate::plays::{PlayMeta, PlayRecord, PlayType, build_play_table};
use crate::roster::Player;
use crate::tracking::{TeamSide, TrackingSample, TrackingTable};
use crate::trajectory::GOAL_CENTER_Y;

const PRE_KICK_FRAMES: u32 = 12;
const FLIGHT_DX: f64 = 2.0;

/// A self-consistent synthetic snapshot: play metadata, roster, and
/// physically plausible tracking for every play. Kicks are sampled exactly
/// on a straight line to a known crossing y, so derived features have
/// closed-form expected values.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub play_type: PlayType,
    pub metadata: Vec<PlayMeta>,
    pub roster: HashMap<u64, Player>,
    /// Full tracking: 22 players plus the ball.
    pub tracking: TrackingTable,
    /// Ball-only projection of `tracking`.
    pub ball: TrackingTable,
    /// Known crossing y per play, in metadata order.
    pub crossing_targets: Vec<f64>,
}

impl SyntheticDataset {
    pub fn event_label(&self) -> &'static str {
        self.play_type.kick_event_label()
    }

    pub fn play_table(&self) -> Vec<PlayRecord> {
        build_play_table(&self.metadata, &self.roster, self.play_type)
    }
}

pub fn synthetic_dataset(
    rng: &mut impl Rng,
    play_count: usize,
    play_type: PlayType,
) -> SyntheticDataset {
    let game_id: u64 = 2_021_090_900;
    let mut metadata = Vec::with_capacity(play_count);
    let mut roster = HashMap::new();
    let mut samples: Vec<TrackingSample> = Vec::new();
    let mut crossing_targets = Vec::with_capacity(play_count);

    for i in 0..play_count {
        let play_id = 100 * (i as u32 + 1);
        let kicker_id = 9_000 + i as u64;

        // Spot the ball an even number of yards short of the goal plane so
        // one flight sample lands exactly on x = 120.
        let spot_x = match play_type {
            PlayType::ExtraPoint => 98.0,
            PlayType::FieldGoal => 120.0 - 2.0 * rng.gen_range(10..=25) as f64,
        };
        let target_y = GOAL_CENTER_Y + rng.gen_range(-80..=80) as f64 / 10.0;
        crossing_targets.push(target_y);

        samples.extend(ball_flight(
            rng,
            game_id,
            play_id,
            spot_x,
            target_y,
            play_type.kick_event_label(),
        ));
        samples.extend(formation(rng, game_id, play_id, spot_x));

        roster.insert(
            kicker_id,
            Player {
                nfl_id: kicker_id,
                height_inches: rng.gen_range(69..=77),
                weight_lbs: rng.gen_range(175..=225),
                position: "K".to_string(),
                name: format!("Synthetic Kicker {i}"),
            },
        );

        metadata.push(PlayMeta {
            game_id,
            play_id,
            special_teams_play_type: play_type.metadata_label().to_string(),
            special_teams_result: "Kick Attempt Good".to_string(),
            quarter: rng.gen_range(1..=4),
            game_clock: format!("{:02}:{:02}", rng.gen_range(0..=14), rng.gen_range(0..=59)),
            down: Some(4),
            yards_to_go: Some(rng.gen_range(1..=12) as f64),
            yardline_number: Some((120.0 - spot_x - 10.0).max(1.0)),
            penalty_codes: None,
            penalty_yards: None,
            pre_snap_home_score: rng.gen_range(0..=35),
            pre_snap_visitor_score: rng.gen_range(0..=35),
            kicker_id: Some(kicker_id),
            kick_length: Some(120.0 - spot_x - 2.0),
            play_result: Some(3.0),
        });
    }

    let tracking = TrackingTable::from_samples(samples);
    let ball = tracking.football_only();
    SyntheticDataset {
        play_type,
        metadata,
        roster,
        tracking,
        ball,
        crossing_targets,
    }
}

/// Ball samples: quiet pre-snap frames, a labeled kick frame carrying the
/// global speed peak, then a straight-line flight through the goal plane.
fn ball_flight(
    rng: &mut impl Rng,
    game_id: u64,
    play_id: u32,
    spot_x: f64,
    target_y: f64,
    event_label: &str,
) -> Vec<TrackingSample> {
    let hold_y = 26.0;
    let slope = (target_y - hold_y) / (120.0 - spot_x);
    let peak_speed = 19.0 + rng.gen_range(0..=20) as f64 / 10.0;

    let mut out = Vec::new();
    let ball = |frame_id: u32, x: f64, y: f64, speed: f64, event: Option<String>| TrackingSample {
        game_id,
        play_id,
        frame_id,
        team: TeamSide::Football,
        position: None,
        x,
        y,
        speed,
        event,
    };

    for frame_id in 1..=PRE_KICK_FRAMES {
        let event = (frame_id == 1).then(|| "ball_snap".to_string());
        out.push(ball(
            frame_id,
            spot_x,
            hold_y,
            rng.gen_range(5..=20) as f64 / 10.0,
            event,
        ));
    }

    let kick_frame = PRE_KICK_FRAMES + 1;
    out.push(ball(
        kick_frame,
        spot_x,
        hold_y,
        peak_speed,
        Some(event_label.to_string()),
    ));

    // Flight continues a few yards past the goal plane so the crossing band
    // is populated on both sides.
    let mut x = spot_x;
    let mut frame_id = kick_frame;
    let mut speed = peak_speed - 2.0;
    while x < 124.0 {
        x += FLIGHT_DX;
        frame_id += 1;
        out.push(ball(frame_id, x, hold_y + slope * (x - spot_x), speed, None));
        speed = (speed - 0.2).max(8.0);
    }

    out
}

/// Two static 11-player formations around the spot: a kicking unit (home,
/// with the specialist at position "K") and a defensive front.
fn formation(
    rng: &mut impl Rng,
    game_id: u64,
    play_id: u32,
    spot_x: f64,
) -> Vec<TrackingSample> {
    let total_frames = frame_count_for(spot_x);
    let mut placements: Vec<(TeamSide, &str, f64, f64)> = Vec::with_capacity(22);

    placements.push((TeamSide::Home, "K", spot_x - 7.0, 26.0));
    for slot in 0..10 {
        let label = if slot == 0 { "LS" } else { "G" };
        placements.push((
            TeamSide::Home,
            label,
            spot_x - 1.0,
            17.0 + 2.0 * slot as f64,
        ));
    }
    for slot in 0..11 {
        placements.push((
            TeamSide::Away,
            "DL",
            spot_x + rng.gen_range(5..=30) as f64 / 10.0,
            17.0 + 1.8 * slot as f64,
        ));
    }

    let mut out = Vec::with_capacity(22 * total_frames as usize);
    for frame_id in 1..=total_frames {
        for &(team, label, x, y) in &placements {
            out.push(TrackingSample {
                game_id,
                play_id,
                frame_id,
                team,
                position: Some(label.to_string()),
                x,
                y,
                speed: 0.0,
                event: None,
            });
        }
    }
    out
}

fn frame_count_for(spot_x: f64) -> u32 {
    let flight_frames = ((124.0 - spot_x) / FLIGHT_DX).ceil() as u32 + 1;
    PRE_KICK_FRAMES + 1 + flight_frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::sanity::event_speed_index_gap;
    use crate::window::kick_window;

    #[test]
    fn kick_event_carries_the_global_speed_peak() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = synthetic_dataset(&mut rng, 4, PlayType::FieldGoal);
        for meta in &data.metadata {
            let gap =
                event_speed_index_gap(meta.game_id, meta.play_id, &data.ball, data.event_label());
            assert_eq!(gap, Some(0));
        }
    }

    #[test]
    fn every_play_has_a_resolvable_window() {
        let mut rng = StdRng::seed_from_u64(2);
        let data = synthetic_dataset(&mut rng, 4, PlayType::ExtraPoint);
        for meta in &data.metadata {
            let window =
                kick_window(meta.game_id, meta.play_id, &data.ball, data.event_label()).unwrap();
            assert!(window.peak + 2 < window.samples.len());
        }
    }

    #[test]
    fn formations_have_eleven_defenders_at_every_frame() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = synthetic_dataset(&mut rng, 1, PlayType::FieldGoal);
        let meta = &data.metadata[0];
        let play = data.tracking.play(meta.game_id, meta.play_id);
        let defenders = play
            .iter()
            .filter(|s| s.frame_id == 1 && s.team == TeamSide::Away)
            .count();
        assert_eq!(defenders, 11);
    }
}
