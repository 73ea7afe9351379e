#![warn(clippy::all)]

//! Core rule engine for the Firefly game setup assistant.
//!
//! This crate hosts the catalog of setup sources, the rule model and
//! arbitration, the per-domain composers that turn selections into a
//! resolved setup, and the configuration shared by frontends.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod filters;
pub mod manifest;
pub mod rules;
pub mod session;

pub use catalog::{Catalog, CatalogError, CatalogLoader};
pub use compose::{ResolvedSetup, Resolver};
pub use config::AppConfig;
pub use manifest::CatalogMetadata;
pub use rules::{Notice, PriorityTable, Rule, RuleEffect, RuleKind, RuleSet, SourceKind};
pub use session::{collect_rules, GameMode, GameState};
