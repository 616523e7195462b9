use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::features::features_complete;
use crate::matrix::FeatureMatrix;
use crate::plays::PlayRecord;

pub struct ExportReport {
    pub rows: usize,
    pub complete_rows: usize,
}

/// Enriched play table as CSV, one row per kick attempt, derived columns
/// last. Nulls export as empty cells.
pub fn write_plays_csv(path: &Path, plays: &[PlayRecord], ks: &[usize]) -> Result<ExportReport> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create plays csv {}", path.display()))?;

    for row in play_rows(plays, ks) {
        writer
            .write_record(&row)
            .with_context(|| format!("write plays csv {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush plays csv {}", path.display()))?;

    Ok(report(plays))
}

/// Feature matrix as CSV for the out-of-process clusterer: key columns
/// first, then the scaled features.
pub fn write_matrix_csv(path: &Path, matrix: &FeatureMatrix) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create matrix csv {}", path.display()))?;

    let mut header = vec!["gameId".to_string(), "playId".to_string()];
    header.extend(matrix.columns.iter().cloned());
    writer.write_record(&header)?;

    for (key, row) in matrix.keys.iter().zip(&matrix.rows) {
        let mut record = vec![key.0.to_string(), key.1.to_string()];
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("flush matrix csv {}", path.display()))?;
    Ok(())
}

/// Workbook with the enriched play table plus a run summary sheet (row and
/// null counts per derived column, generation timestamp).
pub fn write_workbook(path: &Path, plays: &[PlayRecord], ks: &[usize]) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Plays")?;
        write_rows(sheet, &play_rows(plays, ks))?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows(plays, ks))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(report(plays))
}

fn report(plays: &[PlayRecord]) -> ExportReport {
    ExportReport {
        rows: plays.len(),
        complete_rows: plays.iter().filter(|p| features_complete(p)).count(),
    }
}

fn play_rows(plays: &[PlayRecord], ks: &[usize]) -> Vec<Vec<String>> {
    let mut header = vec![
        "gameId".to_string(),
        "playId".to_string(),
        "playType".to_string(),
        "specialTeamsResult".to_string(),
        "quarter".to_string(),
        "down".to_string(),
        "yardsToGo".to_string(),
        "yardlineNumber".to_string(),
        "gameClockSeconds".to_string(),
        "penaltyCodes".to_string(),
        "penaltyYards".to_string(),
        "preSnapHomeScore".to_string(),
        "preSnapVisitorScore".to_string(),
        "kickLength".to_string(),
        "playResult".to_string(),
        "kickerId".to_string(),
        "kicker_height".to_string(),
        "kicker_weight".to_string(),
        "kicker_name".to_string(),
        "endzone_y".to_string(),
        "endzone_y_expected".to_string(),
        "endzone_y_error".to_string(),
        "endzone_y_off_center".to_string(),
    ];
    for &k in ks {
        header.push(format!("kicker_core_dist_{k}"));
    }
    header.push("cluster_id".to_string());

    let mut rows = vec![header];
    for play in plays {
        let f = &play.features;
        let mut row = vec![
            play.game_id.to_string(),
            play.play_id.to_string(),
            play.play_type.metadata_label().to_string(),
            play.result.clone(),
            play.quarter.to_string(),
            opt_to_string(play.down),
            opt_to_string(play.yards_to_go),
            opt_to_string(play.yardline_number),
            opt_to_string(play.game_clock_seconds),
            play.penalty_codes.clone(),
            play.penalty_yards.to_string(),
            play.pre_snap_home_score.to_string(),
            play.pre_snap_visitor_score.to_string(),
            opt_to_string(play.kick_length),
            opt_to_string(play.play_result),
            opt_to_string(play.kicker_id),
            opt_to_string(play.kicker_height),
            opt_to_string(play.kicker_weight),
            play.kicker_name.clone().unwrap_or_default(),
            opt_to_string(f.endzone_y),
            opt_to_string(f.endzone_y_expected),
            opt_to_string(f.endzone_y_error),
            opt_to_string(f.endzone_y_off_center),
        ];
        for k in ks {
            row.push(opt_to_string(f.kicker_core_dist.get(k).copied().flatten()));
        }
        row.push(opt_to_string(play.cluster));
        rows.push(row);
    }
    rows
}

fn summary_rows(plays: &[PlayRecord], ks: &[usize]) -> Vec<Vec<String>> {
    let null_count = |take: &dyn Fn(&PlayRecord) -> Option<f64>| {
        plays
            .iter()
            .filter(|p| take(p).is_none())
            .count()
            .to_string()
    };

    let mut rows = vec![
        vec!["generated_at".to_string(), Utc::now().to_rfc3339()],
        vec!["plays".to_string(), plays.len().to_string()],
        vec![
            "complete_feature_rows".to_string(),
            report(plays).complete_rows.to_string(),
        ],
        vec![
            "null_endzone_y".to_string(),
            null_count(&|p| p.features.endzone_y),
        ],
        vec![
            "null_endzone_y_expected".to_string(),
            null_count(&|p| p.features.endzone_y_expected),
        ],
        vec![
            "null_endzone_y_error".to_string(),
            null_count(&|p| p.features.endzone_y_error),
        ],
        vec![
            "null_endzone_y_off_center".to_string(),
            null_count(&|p| p.features.endzone_y_off_center),
        ],
    ];
    for &k in ks {
        rows.push(vec![
            format!("null_kicker_core_dist_{k}"),
            null_count(&|p| p.features.kicker_core_dist.get(&k).copied().flatten()),
        ]);
    }
    rows
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::features::{DeriveConfig, derive_features};
    use crate::plays::PlayType;
    use crate::synthetic::synthetic_dataset;

    #[test]
    fn play_rows_align_with_header() {
        let mut rng = StdRng::seed_from_u64(31);
        let data = synthetic_dataset(&mut rng, 3, PlayType::FieldGoal);
        let mut plays = data.play_table();
        let cfg = DeriveConfig::default();
        derive_features(
            &mut plays,
            &data.tracking,
            &data.ball,
            data.event_label(),
            &cfg,
        );

        let rows = play_rows(&plays, &cfg.core_dist_ks);
        assert_eq!(rows.len(), plays.len() + 1);
        let width = rows[0].len();
        assert!(rows.iter().all(|r| r.len() == width));
    }

    #[test]
    fn null_features_export_as_empty_cells() {
        let mut rng = StdRng::seed_from_u64(32);
        let data = synthetic_dataset(&mut rng, 1, PlayType::ExtraPoint);
        let mut plays = data.play_table();
        plays[0].features.endzone_y = None;

        let rows = play_rows(&plays, &[5]);
        let header = &rows[0];
        let endzone_col = header.iter().position(|c| c == "endzone_y").unwrap();
        assert_eq!(rows[1][endzone_col], "");
    }
}
