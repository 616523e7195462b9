use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use kickcluster::cluster::{attach_cluster_labels, load_labels_json};
use kickcluster::export::{write_matrix_csv, write_plays_csv, write_workbook};
use kickcluster::features::{DeriveConfig, derive_features};
use kickcluster::matrix::build_matrix;
use kickcluster::plays::{PlayType, build_play_table, load_play_metadata_csv, play_keys};
use kickcluster::pressure::DEFAULT_CORE_DIST_K;
use kickcluster::roster::load_players_csv;
use kickcluster::sanity::{DEFAULT_GAP_THRESHOLD, filter_physically_plausible};
use kickcluster::tracking::{TrackingSample, TrackingTable, load_tracking_csv};
use kickcluster::trajectory::DEFAULT_CROSSING_TOLERANCE;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: kickcluster <data-dir> [field-goal|extra-point|both]"))?;
    let play_types = parse_play_types(args.next().as_deref())?;

    let cfg = DeriveConfig {
        crossing_tolerance: env_f64("CROSSING_TOLERANCE_YDS", DEFAULT_CROSSING_TOLERANCE),
        goal_center_y: DeriveConfig::default().goal_center_y,
        core_dist_ks: env_ks("KICK_CORE_DIST_K"),
    };
    let gap_threshold = env_usize("SANITY_GAP_THRESHOLD", DEFAULT_GAP_THRESHOLD);
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_else(|_| "out".to_string()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;

    println!(
        "Loading roster and play metadata from {}",
        data_dir.display()
    );
    let roster = load_players_csv(&data_dir.join("players.csv"))?;
    let metadata = load_play_metadata_csv(&data_dir.join("plays.csv"))?;
    let tracking = load_all_tracking(&data_dir)?;
    println!(
        "Loaded {} players, {} play rows, {} tracking samples ({} plays)",
        roster.len(),
        metadata.len(),
        tracking.len(),
        tracking.play_count()
    );

    for play_type in play_types {
        let label = play_type.metadata_label();
        let slug = slug_for(play_type);
        println!("== {label} ==");

        let mut plays = build_play_table(&metadata, &roster, play_type);
        if plays.is_empty() {
            println!("No {label} plays in metadata; skipping");
            continue;
        }

        let keys: HashSet<(u64, u32)> = play_keys(&plays);
        let type_tracking = tracking.restrict_to(&keys);
        let ball = type_tracking.football_only();
        let event_label = play_type.kick_event_label();

        derive_features(&mut plays, &type_tracking, &ball, event_label, &cfg);
        let before = plays.len();
        let mut plays = filter_physically_plausible(plays, &ball, event_label, gap_threshold);
        println!(
            "Derived features for {before} plays; {} survived the sanity filter (gap <= {gap_threshold})",
            plays.len()
        );

        let matrix = build_matrix(&plays, play_type, &cfg.core_dist_ks);
        println!(
            "Feature matrix: {} complete rows x {} columns",
            matrix.rows.len(),
            matrix.columns.len()
        );

        if let Ok(labels_path) = env::var("CLUSTER_LABELS") {
            let labels = load_labels_json(Path::new(&labels_path))?;
            attach_cluster_labels(&mut plays, &matrix, &labels)?;
            println!("Attached {} cluster labels from {labels_path}", labels.len());
        }

        let csv_path = out_dir.join(format!("plays_{slug}.csv"));
        let report = write_plays_csv(&csv_path, &plays, &cfg.core_dist_ks)?;
        println!(
            "Wrote {} ({} rows, {} with complete features)",
            csv_path.display(),
            report.rows,
            report.complete_rows
        );

        let matrix_path = out_dir.join(format!("matrix_{slug}.csv"));
        write_matrix_csv(&matrix_path, &matrix)?;
        println!("Wrote {}", matrix_path.display());

        let workbook_path = out_dir.join(format!("plays_{slug}.xlsx"));
        write_workbook(&workbook_path, &plays, &cfg.core_dist_ks)?;
        println!("Wrote {}", workbook_path.display());
    }

    Ok(())
}

/// All tracking CSVs in the data dir (one per season in the shipped
/// layout), concatenated before the per-play index is built.
fn load_all_tracking(data_dir: &Path) -> Result<TrackingTable> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(data_dir)
        .with_context(|| format!("read data dir {}", data_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("tracking") && n.ends_with(".csv"))
        })
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(anyhow!(
            "no tracking*.csv files found in {}",
            data_dir.display()
        ));
    }

    let mut samples: Vec<TrackingSample> = Vec::new();
    for path in &paths {
        let loaded = load_tracking_csv(path)?;
        println!("  {} -> {} samples", path.display(), loaded.len());
        samples.extend(loaded);
    }
    Ok(TrackingTable::from_samples(samples))
}

fn parse_play_types(arg: Option<&str>) -> Result<Vec<PlayType>> {
    match arg.unwrap_or("both") {
        "field-goal" => Ok(vec![PlayType::FieldGoal]),
        "extra-point" => Ok(vec![PlayType::ExtraPoint]),
        "both" => Ok(vec![PlayType::FieldGoal, PlayType::ExtraPoint]),
        other => Err(anyhow!(
            "unknown play type {other:?} (expected field-goal, extra-point or both)"
        )),
    }
}

fn slug_for(play_type: PlayType) -> &'static str {
    match play_type {
        PlayType::FieldGoal => "fg",
        PlayType::ExtraPoint => "ep",
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|val| val.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_ks(name: &str) -> Vec<usize> {
    let mut ks: Vec<usize> = env::var(name)
        .ok()
        .map(|val| {
            val.split(',')
                .filter_map(|part| part.trim().parse::<usize>().ok())
                .filter(|k| *k > 0)
                .collect()
        })
        .unwrap_or_default();
    ks.sort_unstable();
    ks.dedup();
    if ks.is_empty() {
        ks.push(DEFAULT_CORE_DIST_K);
    }
    ks
}
