use crate::errors::FeatureError;
use crate::tracking::{TrackingSample, TrackingTable};

/// Half-width of the first-pass window around the labeled event frame.
pub const NARROW_HALF_WIDTH: usize = 5;
/// Fallback half-width when the speed peak lands on the window's edge.
pub const WIDE_HALF_WIDTH: usize = 10;

/// A contiguous slice of a play's ball samples centered on the labeled kick
/// event, with the refined kick moment (local speed peak) inside it.
#[derive(Debug, Clone, Copy)]
pub struct KickWindow<'a> {
    pub samples: &'a [TrackingSample],
    /// Offset of the speed peak within `samples`.
    pub peak: usize,
}

impl KickWindow<'_> {
    pub fn peak_sample(&self) -> &TrackingSample {
        &self.samples[self.peak]
    }

    pub fn kick_frame_id(&self) -> u32 {
        self.peak_sample().frame_id
    }
}

/// Locates the kick moment for one play. Vendor event labels are imprecise
/// by a few frames, so the labeled frame only anchors a window and the true
/// kick is taken as the speed maximum inside it. When that maximum falls on
/// the last or second-to-last sample the window cannot be trusted to contain
/// the real peak (or a post-kick sample to extrapolate from), so the search
/// re-runs once with the wide window.
pub fn kick_window<'a>(
    game_id: u64,
    play_id: u32,
    ball: &'a TrackingTable,
    event_label: &str,
) -> Result<KickWindow<'a>, FeatureError> {
    let play = ball.play(game_id, play_id);
    let event_row = play
        .iter()
        .position(|s| s.event.as_deref() == Some(event_label))
        .ok_or_else(|| FeatureError::MissingEvent {
            game_id,
            play_id,
            label: event_label.to_string(),
        })?;

    let narrow = window_around(play, event_row, NARROW_HALF_WIDTH);
    let peak = speed_argmax(narrow);
    if peak + 2 >= narrow.len() {
        let wide = window_around(play, event_row, WIDE_HALF_WIDTH);
        return Ok(KickWindow {
            samples: wide,
            peak: speed_argmax(wide),
        });
    }

    Ok(KickWindow {
        samples: narrow,
        peak,
    })
}

fn window_around(play: &[TrackingSample], center: usize, half_width: usize) -> &[TrackingSample] {
    let start = center.saturating_sub(half_width);
    let end = (center + half_width + 1).min(play.len());
    &play[start..end]
}

/// First index with the maximum speed (ties resolve to the earliest frame).
fn speed_argmax(samples: &[TrackingSample]) -> usize {
    let mut best = 0usize;
    for (i, s) in samples.iter().enumerate() {
        if s.speed > samples[best].speed {
            best = i;
        }
    }
    best
}
