//! Game-state snapshot and rule gathering from the active sources.

pub mod gather;
mod models;

pub use gather::collect_rules;
pub use models::{Edition, GameMode, GameState};
