use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::roster::Player;
use crate::tracking::require_columns;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayType {
    FieldGoal,
    ExtraPoint,
}

impl PlayType {
    /// Label used by the play metadata table's specialTeamsPlayType column.
    pub fn metadata_label(self) -> &'static str {
        match self {
            PlayType::FieldGoal => "Field Goal",
            PlayType::ExtraPoint => "Extra Point",
        }
    }

    /// Tracking event label marking the kick for this play type.
    pub fn kick_event_label(self) -> &'static str {
        match self {
            PlayType::FieldGoal => "field_goal_attempt",
            PlayType::ExtraPoint => "extra_point_attempt",
        }
    }
}

/// One row of the play metadata table, as shipped.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayMeta {
    #[serde(rename = "gameId")]
    pub game_id: u64,
    #[serde(rename = "playId")]
    pub play_id: u32,
    #[serde(rename = "specialTeamsPlayType")]
    pub special_teams_play_type: String,
    #[serde(rename = "specialTeamsResult")]
    pub special_teams_result: String,
    pub quarter: u32,
    #[serde(rename = "gameClock")]
    pub game_clock: String,
    #[serde(default)]
    pub down: Option<u32>,
    #[serde(rename = "yardsToGo", default)]
    pub yards_to_go: Option<f64>,
    #[serde(rename = "yardlineNumber", default)]
    pub yardline_number: Option<f64>,
    #[serde(rename = "penaltyCodes", default)]
    pub penalty_codes: Option<String>,
    #[serde(rename = "penaltyYards", default)]
    pub penalty_yards: Option<f64>,
    #[serde(rename = "preSnapHomeScore")]
    pub pre_snap_home_score: u32,
    #[serde(rename = "preSnapVisitorScore")]
    pub pre_snap_visitor_score: u32,
    #[serde(rename = "kickerId", default)]
    pub kicker_id: Option<u64>,
    #[serde(rename = "kickLength", default)]
    pub kick_length: Option<f64>,
    #[serde(rename = "playResult", default)]
    pub play_result: Option<f64>,
}

/// Feature columns appended by the derivation pipeline. All start null and
/// degrade to null again on any per-row data-quality failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFeatures {
    pub endzone_y: Option<f64>,
    pub endzone_y_expected: Option<f64>,
    pub endzone_y_error: Option<f64>,
    pub endzone_y_off_center: Option<f64>,
    /// kicker_core_dist_{k}, keyed by k.
    pub kicker_core_dist: BTreeMap<usize, Option<f64>>,
}

/// One kick attempt, enriched in place by the pipeline and finally handed
/// to the clustering seam.
#[derive(Debug, Clone)]
pub struct PlayRecord {
    pub game_id: u64,
    pub play_id: u32,
    pub play_type: PlayType,
    pub result: String,
    pub quarter: u32,
    pub down: Option<u32>,
    pub yards_to_go: Option<f64>,
    pub yardline_number: Option<f64>,
    pub game_clock_seconds: Option<u32>,
    pub penalty_codes: String,
    pub penalty_yards: f64,
    pub pre_snap_home_score: u32,
    pub pre_snap_visitor_score: u32,
    pub kick_length: Option<f64>,
    pub play_result: Option<f64>,
    pub kicker_id: Option<u64>,
    pub kicker_height: Option<f64>,
    pub kicker_weight: Option<f64>,
    pub kicker_position: Option<String>,
    pub kicker_name: Option<String>,
    pub features: DerivedFeatures,
    pub cluster: Option<i32>,
}

impl PlayRecord {
    pub fn key(&self) -> (u64, u32) {
        (self.game_id, self.play_id)
    }
}

/// Game clock counts down within a quarter; this converts "MM:SS" plus the
/// quarter into seconds elapsed since kickoff. Unparseable clocks become
/// null rather than aborting the load.
pub fn game_clock_seconds(game_clock: &str, quarter: u32) -> Option<u32> {
    let (minutes, seconds) = game_clock.trim().split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.split(':').next()?.parse().ok()?;
    if minutes > 15 || seconds > 59 || quarter == 0 {
        return None;
    }
    let elapsed_minutes = (15 - minutes) + 15 * (quarter - 1);
    Some(elapsed_minutes * 60 + seconds)
}

const REQUIRED_PLAY_COLUMNS: &[&str] = &[
    "gameId",
    "playId",
    "specialTeamsPlayType",
    "specialTeamsResult",
    "quarter",
    "gameClock",
    "preSnapHomeScore",
    "preSnapVisitorScore",
    "kickerId",
];

pub fn load_play_metadata_csv(path: &Path) -> Result<Vec<PlayMeta>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open play metadata csv {}", path.display()))?;
    require_columns(&mut reader, REQUIRED_PLAY_COLUMNS, path)?;

    let mut out = Vec::new();
    for row in reader.deserialize::<PlayMeta>() {
        out.push(row.with_context(|| format!("decode play row in {}", path.display()))?);
    }
    Ok(out)
}

/// Filters the metadata to one play type and joins kicker measurables from
/// the roster. Null penalty info is normalized here (0 yards, "no penalty")
/// so downstream columns are dense.
pub fn build_play_table(
    metadata: &[PlayMeta],
    roster: &HashMap<u64, Player>,
    play_type: PlayType,
) -> Vec<PlayRecord> {
    metadata
        .iter()
        .filter(|m| m.special_teams_play_type == play_type.metadata_label())
        .map(|m| {
            let kicker = m.kicker_id.and_then(|id| roster.get(&id));
            PlayRecord {
                game_id: m.game_id,
                play_id: m.play_id,
                play_type,
                result: m.special_teams_result.clone(),
                quarter: m.quarter,
                down: m.down,
                yards_to_go: m.yards_to_go,
                yardline_number: m.yardline_number,
                game_clock_seconds: game_clock_seconds(&m.game_clock, m.quarter),
                penalty_codes: m
                    .penalty_codes
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "no penalty".to_string()),
                penalty_yards: m.penalty_yards.unwrap_or(0.0),
                pre_snap_home_score: m.pre_snap_home_score,
                pre_snap_visitor_score: m.pre_snap_visitor_score,
                kick_length: m.kick_length,
                play_result: m.play_result,
                kicker_id: m.kicker_id,
                kicker_height: kicker.map(|p| p.height_inches as f64),
                kicker_weight: kicker.map(|p| p.weight_lbs as f64),
                kicker_position: kicker.map(|p| p.position.clone()),
                kicker_name: kicker.map(|p| p.name.clone()),
                features: DerivedFeatures::default(),
                cluster: None,
            }
        })
        .collect()
}

pub fn play_keys(plays: &[PlayRecord]) -> HashSet<(u64, u32)> {
    plays.iter().map(PlayRecord::key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_converts_to_elapsed_seconds() {
        // 14:30 in Q1: 30 elapsed game seconds into the quarter, plus 30s.
        assert_eq!(game_clock_seconds("14:30", 1), Some(90));
        // Start of Q2.
        assert_eq!(game_clock_seconds("15:00", 2), Some(900));
        // 02:05 in Q4.
        assert_eq!(game_clock_seconds("02:05", 4), Some((45 + 13) * 60 + 5));
    }

    #[test]
    fn bad_clock_is_null_not_fatal() {
        assert_eq!(game_clock_seconds("", 1), None);
        assert_eq!(game_clock_seconds("99:99", 1), None);
        assert_eq!(game_clock_seconds("10:00", 0), None);
    }

    fn meta(play_type: &str, kicker_id: Option<u64>) -> PlayMeta {
        PlayMeta {
            game_id: 1,
            play_id: 100,
            special_teams_play_type: play_type.to_string(),
            special_teams_result: "Kick Attempt Good".to_string(),
            quarter: 1,
            game_clock: "12:00".to_string(),
            down: Some(4),
            yards_to_go: Some(8.0),
            yardline_number: Some(20.0),
            penalty_codes: None,
            penalty_yards: None,
            pre_snap_home_score: 7,
            pre_snap_visitor_score: 3,
            kicker_id,
            kick_length: Some(38.0),
            play_result: Some(3.0),
        }
    }

    #[test]
    fn build_filters_by_play_type_and_joins_kicker() {
        let roster = HashMap::from([(
            42,
            Player {
                nfl_id: 42,
                height_inches: 74,
                weight_lbs: 205,
                position: "K".to_string(),
                name: "Test Kicker".to_string(),
            },
        )]);
        let metadata = vec![meta("Field Goal", Some(42)), meta("Punt", Some(42))];

        let plays = build_play_table(&metadata, &roster, PlayType::FieldGoal);
        assert_eq!(plays.len(), 1);
        let play = &plays[0];
        assert_eq!(play.kicker_height, Some(74.0));
        assert_eq!(play.kicker_name.as_deref(), Some("Test Kicker"));
        assert_eq!(play.penalty_codes, "no penalty");
        assert_eq!(play.penalty_yards, 0.0);
    }

    #[test]
    fn unknown_kicker_leaves_measurables_null() {
        let plays = build_play_table(
            &[meta("Extra Point", Some(77))],
            &HashMap::new(),
            PlayType::ExtraPoint,
        );
        assert_eq!(plays[0].kicker_height, None);
        assert_eq!(plays[0].kicker_weight, None);
    }
}
