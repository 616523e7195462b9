use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::matrix::FeatureMatrix;
use crate::plays::PlayRecord;

/// Sentinel label the density-based clusterer assigns to unclustered rows.
pub const NOISE_LABEL: i32 = -1;

/// The clustering collaborator: consumes a numeric feature matrix, returns
/// one integer label per row (`NOISE_LABEL` for noise). The algorithm runs
/// out of process or behind another crate; this pipeline only owns the seam.
pub trait Clusterer {
    fn fit(&self, matrix: &FeatureMatrix) -> Result<Vec<i32>>;
}

/// Writes cluster labels back onto the play table. Plays that were dropped
/// before clustering (null features) keep a null label.
pub fn attach_cluster_labels(
    plays: &mut [PlayRecord],
    matrix: &FeatureMatrix,
    labels: &[i32],
) -> Result<()> {
    if labels.len() != matrix.keys.len() {
        return Err(anyhow!(
            "label count {} does not match matrix row count {}",
            labels.len(),
            matrix.keys.len()
        ));
    }

    let by_key: HashMap<(u64, u32), i32> = matrix
        .keys
        .iter()
        .copied()
        .zip(labels.iter().copied())
        .collect();

    for play in plays.iter_mut() {
        play.cluster = by_key.get(&play.key()).copied();
    }
    Ok(())
}

/// Reads the label vector an out-of-process clusterer wrote as JSON.
pub fn load_labels_json(path: &Path) -> Result<Vec<i32>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read cluster labels {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse cluster labels {}", path.display()))
}
