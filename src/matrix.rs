use std::collections::BTreeMap;

use crate::features::features_complete;
use crate::plays::{PlayRecord, PlayType};

/// Numeric feature matrix handed to the clustering collaborator, plus the
/// identity of every surviving row. Scaled numeric columns come first,
/// label-encoded categoricals last.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    /// (game_id, play_id) of each row, in row order.
    pub keys: Vec<(u64, u32)>,
}

impl FeatureMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the clustering input for one play type.
///
/// Rows with any missing value are dropped in full (never partially), the
/// numeric columns are z-scored, and the two categorical columns (result,
/// penalty codes) are label-encoded and appended unscaled.
pub fn build_matrix(plays: &[PlayRecord], play_type: PlayType, ks: &[usize]) -> FeatureMatrix {
    let names = numeric_column_names(play_type, ks);

    let mut keys = Vec::new();
    let mut numeric: Vec<Vec<f64>> = Vec::new();
    let mut results: Vec<&str> = Vec::new();
    let mut penalties: Vec<&str> = Vec::new();

    for play in plays.iter().filter(|p| p.play_type == play_type) {
        let values = numeric_values(play, play_type, ks);
        let Some(dense) = values.into_iter().collect::<Option<Vec<f64>>>() else {
            continue;
        };
        if !features_complete(play) {
            continue;
        }
        keys.push(play.key());
        numeric.push(dense);
        results.push(&play.result);
        penalties.push(&play.penalty_codes);
    }

    standardize_in_place(&mut numeric);

    let result_codes = label_encode(&results);
    let penalty_codes = label_encode(&penalties);
    for (i, row) in numeric.iter_mut().enumerate() {
        row.push(result_codes[i]);
        row.push(penalty_codes[i]);
    }

    let mut columns = names;
    columns.push("specialTeamsResult".to_string());
    columns.push("penaltyCodes".to_string());

    FeatureMatrix {
        columns,
        rows: numeric,
        keys,
    }
}

fn numeric_column_names(play_type: PlayType, ks: &[usize]) -> Vec<String> {
    let mut names: Vec<String> = [
        "yardlineNumber",
        "gameClockSeconds",
        "penaltyYards",
        "preSnapHomeScore",
        "preSnapVisitorScore",
        "kicker_height",
        "kicker_weight",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if play_type == PlayType::FieldGoal {
        for extra in ["down", "yardsToGo", "kickLength", "playResult"] {
            names.push(extra.to_string());
        }
    }

    for derived in ["endzone_y", "endzone_y_error", "endzone_y_off_center"] {
        names.push(derived.to_string());
    }
    for &k in ks {
        names.push(format!("kicker_core_dist_{k}"));
    }
    names
}

fn numeric_values(play: &PlayRecord, play_type: PlayType, ks: &[usize]) -> Vec<Option<f64>> {
    let f = &play.features;
    let mut values = vec![
        play.yardline_number,
        play.game_clock_seconds.map(|s| s as f64),
        Some(play.penalty_yards),
        Some(play.pre_snap_home_score as f64),
        Some(play.pre_snap_visitor_score as f64),
        play.kicker_height,
        play.kicker_weight,
    ];

    if play_type == PlayType::FieldGoal {
        values.push(play.down.map(|d| d as f64));
        values.push(play.yards_to_go);
        values.push(play.kick_length);
        values.push(play.play_result);
    }

    values.push(f.endzone_y);
    values.push(f.endzone_y_error);
    values.push(f.endzone_y_off_center);
    for k in ks {
        values.push(f.kicker_core_dist.get(k).copied().flatten());
    }
    values
}

/// Column-wise z-scoring with population standard deviation; constant
/// columns map to zero instead of dividing by zero.
fn standardize_in_place(rows: &mut [Vec<f64>]) {
    let Some(width) = rows.first().map(Vec::len) else {
        return;
    };
    let n = rows.len() as f64;

    for col in 0..width {
        let mean = rows.iter().map(|r| r[col]).sum::<f64>() / n;
        let var = rows.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        for row in rows.iter_mut() {
            row[col] = if std > 0.0 { (row[col] - mean) / std } else { 0.0 };
        }
    }
}

/// Deterministic label encoding: distinct values sorted, then indexed, so
/// the encoding is independent of row order.
fn label_encode(values: &[&str]) -> Vec<f64> {
    let codes: BTreeMap<&str, usize> = values
        .iter()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(rank, v)| (*v, rank))
        .collect();
    values.iter().map(|v| codes[v] as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::features::{DeriveConfig, derive_features};
    use crate::synthetic::synthetic_dataset;

    #[test]
    fn label_encoding_is_order_independent() {
        assert_eq!(label_encode(&["b", "a", "b", "c"]), vec![1.0, 0.0, 1.0, 2.0]);
        assert_eq!(label_encode(&["c", "b", "a", "b"]), vec![2.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn standardize_centers_and_scales() {
        let mut rows = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        standardize_in_place(&mut rows);
        assert!((rows[0][0] + 1.0).abs() < 1e-12);
        assert!((rows[1][0] - 1.0).abs() < 1e-12);
        // Constant column collapses to zero, not NaN.
        assert_eq!(rows[0][1], 0.0);
        assert_eq!(rows[1][1], 0.0);
    }

    #[test]
    fn matrix_rows_are_dense_and_keyed() {
        let mut rng = StdRng::seed_from_u64(11);
        let data = synthetic_dataset(&mut rng, 8, PlayType::FieldGoal);
        let mut plays = data.play_table();
        let cfg = DeriveConfig::default();
        derive_features(
            &mut plays,
            &data.tracking,
            &data.ball,
            data.event_label(),
            &cfg,
        );

        let matrix = build_matrix(&plays, PlayType::FieldGoal, &cfg.core_dist_ks);
        assert_eq!(matrix.rows.len(), matrix.keys.len());
        assert!(!matrix.is_empty());
        let width = matrix.columns.len();
        for row in &matrix.rows {
            assert_eq!(row.len(), width);
            assert!(row.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn incomplete_rows_never_reach_the_matrix() {
        let mut rng = StdRng::seed_from_u64(12);
        let data = synthetic_dataset(&mut rng, 4, PlayType::ExtraPoint);
        let mut plays = data.play_table();
        let cfg = DeriveConfig::default();
        derive_features(
            &mut plays,
            &data.tracking,
            &data.ball,
            data.event_label(),
            &cfg,
        );
        // Poison one row's derived features.
        plays[1].features.endzone_y = None;

        let matrix = build_matrix(&plays, PlayType::ExtraPoint, &cfg.core_dist_ks);
        assert_eq!(matrix.rows.len(), plays.len() - 1);
        assert!(!matrix.keys.contains(&plays[1].key()));
    }
}
