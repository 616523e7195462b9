use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::tracking::require_columns;

#[derive(Debug, Clone)]
pub struct Player {
    pub nfl_id: u64,
    pub height_inches: u32,
    pub weight_lbs: u32,
    pub position: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(rename = "nflId")]
    nfl_id: u64,
    height: String,
    weight: u32,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "displayName")]
    display_name: String,
}

/// Roster heights come as either plain inches ("74") or feet-inches
/// ("6-2"); both normalize to inches.
pub fn parse_height_inches(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if let Some((feet, inches)) = raw.split_once('-') {
        let feet: u32 = feet
            .trim()
            .parse()
            .with_context(|| format!("bad feet component in height {raw:?}"))?;
        let inches: u32 = inches
            .trim()
            .parse()
            .with_context(|| format!("bad inches component in height {raw:?}"))?;
        Ok(feet * 12 + inches)
    } else {
        raw.parse()
            .with_context(|| format!("bad height value {raw:?}"))
    }
}

const REQUIRED_PLAYER_COLUMNS: &[&str] = &["nflId", "height", "weight", "Position", "displayName"];

pub fn load_players_csv(path: &Path) -> Result<HashMap<u64, Player>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open players csv {}", path.display()))?;
    require_columns(&mut reader, REQUIRED_PLAYER_COLUMNS, path)?;

    let mut roster = HashMap::new();
    for row in reader.deserialize::<RawPlayerRow>() {
        let row = row.with_context(|| format!("decode player row in {}", path.display()))?;
        let height_inches = parse_height_inches(&row.height)
            .with_context(|| format!("player {} in {}", row.nfl_id, path.display()))?;
        let player = Player {
            nfl_id: row.nfl_id,
            height_inches,
            weight_lbs: row.weight,
            position: row.position,
            name: row.display_name,
        };
        if roster.insert(row.nfl_id, player).is_some() {
            return Err(anyhow!(
                "duplicate nflId {} in {}",
                row.nfl_id,
                path.display()
            ));
        }
    }
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feet_inches_height_converts() {
        assert_eq!(parse_height_inches("6-2").unwrap(), 74);
        assert_eq!(parse_height_inches("5-11").unwrap(), 71);
    }

    #[test]
    fn plain_inches_height_passes_through() {
        assert_eq!(parse_height_inches("74").unwrap(), 74);
    }

    #[test]
    fn garbage_height_is_an_error() {
        assert!(parse_height_inches("tall").is_err());
    }
}
