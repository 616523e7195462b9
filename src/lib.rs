//! Batch feature derivation for special-teams kick tracking data.
//!
//! The pipeline locates the kick moment inside noisy positional tracking,
//! extrapolates the ball's flight to the goal plane, measures kick accuracy
//! against the observed crossing, scores defensive pressure on the kicker,
//! and hands a scaled feature matrix to an external density clusterer.

pub mod cluster;
pub mod errors;
pub mod export;
pub mod features;
pub mod matrix;
pub mod plays;
pub mod pressure;
pub mod roster;
pub mod sanity;
pub mod synthetic;
pub mod tracking;
pub mod trajectory;
pub mod window;
