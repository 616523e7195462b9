use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// Field length in yards, endzone back line to endzone back line.
pub const FIELD_LENGTH_X: f64 = 120.0;
/// Field width: 160 feet expressed in yards.
pub const FIELD_WIDTH_Y: f64 = 160.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
    Football,
}

impl TeamSide {
    pub fn opponent(self) -> Option<TeamSide> {
        match self {
            TeamSide::Home => Some(TeamSide::Away),
            TeamSide::Away => Some(TeamSide::Home),
            TeamSide::Football => None,
        }
    }
}

/// One (game, play, frame, entity) observation, already reoriented so the
/// offense drives toward increasing x.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSample {
    pub game_id: u64,
    pub play_id: u32,
    pub frame_id: u32,
    pub team: TeamSide,
    pub position: Option<String>,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub event: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTrackingRow {
    #[serde(rename = "gameId")]
    game_id: u64,
    #[serde(rename = "playId")]
    play_id: u32,
    #[serde(rename = "frameId")]
    frame_id: u32,
    team: TeamSide,
    #[serde(default)]
    position: Option<String>,
    x: f64,
    y: f64,
    s: f64,
    #[serde(default)]
    event: Option<String>,
    #[serde(rename = "playDirection")]
    play_direction: String,
}

impl RawTrackingRow {
    /// Mirrors left-running plays once at load so every play reads
    /// left-to-right. This is the only mutation tracking data ever sees.
    fn into_sample(self) -> TrackingSample {
        let leftward = self.play_direction.eq_ignore_ascii_case("left");
        let (x, y) = if leftward {
            (FIELD_LENGTH_X - self.x, FIELD_WIDTH_Y - self.y)
        } else {
            (self.x, self.y)
        };
        TrackingSample {
            game_id: self.game_id,
            play_id: self.play_id,
            frame_id: self.frame_id,
            team: self.team,
            position: self.position.filter(|p| !p.is_empty()),
            x,
            y,
            speed: self.s,
            event: self.event.filter(|e| !e.is_empty()),
        }
    }
}

/// Read-only tracking table with an O(1) per-play index. Rows are sorted by
/// (game, play, frame) at construction; a play's samples are one contiguous
/// range.
#[derive(Debug, Clone, Default)]
pub struct TrackingTable {
    samples: Vec<TrackingSample>,
    play_index: HashMap<(u64, u32), Range<usize>>,
}

impl TrackingTable {
    pub fn from_samples(mut samples: Vec<TrackingSample>) -> Self {
        samples.sort_by(|a, b| {
            (a.game_id, a.play_id, a.frame_id).cmp(&(b.game_id, b.play_id, b.frame_id))
        });

        let mut play_index: HashMap<(u64, u32), Range<usize>> = HashMap::new();
        let mut run_start = 0usize;
        for i in 0..samples.len() {
            let here = (samples[i].game_id, samples[i].play_id);
            let next_differs = samples
                .get(i + 1)
                .is_none_or(|n| (n.game_id, n.play_id) != here);
            if next_differs {
                play_index.insert(here, run_start..i + 1);
                run_start = i + 1;
            }
        }

        Self {
            samples,
            play_index,
        }
    }

    /// All samples belonging to one play. Empty slice (not an error) when
    /// the pair is unknown; callers must handle the empty case explicitly.
    pub fn play(&self, game_id: u64, play_id: u32) -> &[TrackingSample] {
        self.play_index
            .get(&(game_id, play_id))
            .map(|range| &self.samples[range.clone()])
            .unwrap_or(&[])
    }

    pub fn rows(&self) -> &[TrackingSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn play_count(&self) -> usize {
        self.play_index.len()
    }

    /// Ball-only projection of this table (the football entity carries the
    /// flight path and the event labels we refine against).
    pub fn football_only(&self) -> TrackingTable {
        let ball = self
            .samples
            .iter()
            .filter(|s| s.team == TeamSide::Football)
            .cloned()
            .collect();
        TrackingTable::from_samples(ball)
    }

    /// Restriction to a set of (game, play) pairs, e.g. one play type.
    pub fn restrict_to(&self, pairs: &HashSet<(u64, u32)>) -> TrackingTable {
        let kept = self
            .samples
            .iter()
            .filter(|s| pairs.contains(&(s.game_id, s.play_id)))
            .cloned()
            .collect();
        TrackingTable::from_samples(kept)
    }
}

const REQUIRED_TRACKING_COLUMNS: &[&str] = &[
    "gameId",
    "playId",
    "frameId",
    "team",
    "x",
    "y",
    "s",
    "event",
    "playDirection",
];

/// Loads one season's tracking CSV, mirroring left-running plays as rows
/// come in. A missing column is a caller contract violation and aborts with
/// the column names spelled out.
pub fn load_tracking_csv(path: &Path) -> Result<Vec<TrackingSample>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open tracking csv {}", path.display()))?;
    require_columns(&mut reader, REQUIRED_TRACKING_COLUMNS, path)?;

    let mut out = Vec::new();
    for row in reader.deserialize::<RawTrackingRow>() {
        let row = row.with_context(|| format!("decode tracking row in {}", path.display()))?;
        out.push(row.into_sample());
    }
    Ok(out)
}

pub(crate) fn require_columns<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    required: &[&str],
    path: &Path,
) -> Result<()> {
    let headers = reader
        .headers()
        .with_context(|| format!("read csv headers of {}", path.display()))?;
    let present: HashSet<&str> = headers.iter().collect();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !present.contains(col))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        ))
    }
}
