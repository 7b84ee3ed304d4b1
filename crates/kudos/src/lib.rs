//! Employee recognition leaderboard: a pure scoring, winner-selection, and
//! badge-derivation engine behind a thin orchestration service.

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod telemetry;
