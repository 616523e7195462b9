use thiserror::Error;

/// Per-row data-quality failures. Every variant degrades to a null feature
/// value at the pipeline boundary; none of them may abort a batch. Fatal
/// schema problems are anyhow errors raised at load time instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("event {label:?} not present for play {play_id} of game {game_id}")]
    MissingEvent {
        game_id: u64,
        play_id: u32,
        label: String,
    },
    #[error("kick window too short to extrapolate (peak {peak} of {len} samples)")]
    InsufficientWindow { peak: usize, len: usize },
    #[error("degenerate trajectory: zero x-run between extrapolation points")]
    DegenerateGeometry,
    #[error("no kicker or punter on the field at the kick frame")]
    MissingEntity,
    #[error("{available} opposing players at the kick frame, need {k}")]
    IndexExhaustion { k: usize, available: usize },
}
