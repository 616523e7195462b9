use std::path::PathBuf;

use anyhow::{Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;

use kickcluster::plays::PlayType;
use kickcluster::pressure::{DEFAULT_CORE_DIST_K, kicker_core_dist};
use kickcluster::sanity::event_speed_index_gap;
use kickcluster::synthetic::synthetic_dataset;
use kickcluster::tracking::{TrackingTable, load_tracking_csv};
use kickcluster::trajectory::{
    DEFAULT_CROSSING_TOLERANCE, expected_crossing_y, observed_crossing_y,
};
use kickcluster::window::kick_window;

// This binary is intentionally simple: it walks one play through every
// derivation step and prints the intermediate values. Useful when a play's
// features come out null and the question is which step degraded.
//
// Usage:
//   inspect_play synthetic
//   inspect_play <tracking.csv> <game_id> <play_id> <event_label>
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let source = args
        .next()
        .ok_or_else(|| anyhow!("usage: inspect_play <synthetic|tracking.csv> [game_id play_id event_label]"))?;

    let (tracking, game_id, play_id, event_label) = if source == "synthetic" {
        let mut rng = StdRng::seed_from_u64(42);
        let data = synthetic_dataset(&mut rng, 1, PlayType::FieldGoal);
        let meta = &data.metadata[0];
        println!(
            "Synthetic field goal (known crossing y = {:.2})",
            data.crossing_targets[0]
        );
        (
            data.tracking.clone(),
            meta.game_id,
            meta.play_id,
            data.event_label().to_string(),
        )
    } else {
        let path = PathBuf::from(&source);
        let game_id: u64 = args
            .next()
            .ok_or_else(|| anyhow!("missing game_id"))?
            .parse()?;
        let play_id: u32 = args
            .next()
            .ok_or_else(|| anyhow!("missing play_id"))?
            .parse()?;
        let event_label = args.next().ok_or_else(|| anyhow!("missing event_label"))?;
        let samples = load_tracking_csv(&path)?;
        (
            TrackingTable::from_samples(samples),
            game_id,
            play_id,
            event_label,
        )
    };

    let ball = tracking.football_only();
    let play = ball.play(game_id, play_id);
    println!("Play {game_id}/{play_id}: {} ball samples", play.len());
    if play.is_empty() {
        return Err(anyhow!("no ball tracking for this play"));
    }

    match kick_window(game_id, play_id, &ball, &event_label) {
        Ok(window) => {
            println!(
                "Kick window: {} samples, speed peak at frame {} ({:.2} yd/s)",
                window.samples.len(),
                window.kick_frame_id(),
                window.peak_sample().speed
            );
            match expected_crossing_y(&window) {
                Ok(y) => println!("Expected crossing y: {y:.3}"),
                Err(err) => println!("Expected crossing y: null ({err})"),
            }
        }
        Err(err) => println!("Kick window: null ({err})"),
    }

    match observed_crossing_y(game_id, play_id, &ball, DEFAULT_CROSSING_TOLERANCE) {
        Some(y) => println!("Observed crossing y: {y:.3}"),
        None => println!("Observed crossing y: null (no samples in the goal-plane band)"),
    }

    match event_speed_index_gap(game_id, play_id, &ball, &event_label) {
        Some(gap) => println!("Event-vs-speed-max index gap: {gap}"),
        None => println!("Event-vs-speed-max index gap: null (label absent)"),
    }

    match kicker_core_dist(
        game_id,
        play_id,
        &tracking,
        &ball,
        &event_label,
        DEFAULT_CORE_DIST_K,
    ) {
        Ok(d) => println!("Kicker core distance (k={DEFAULT_CORE_DIST_K}): {d:.3} yd"),
        Err(err) => println!("Kicker core distance: null ({err})"),
    }

    Ok(())
}
