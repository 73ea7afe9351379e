//! Alliance and Reaver placement.
//!
//! Mode, Alliance placement and Reaver placement are arbitrated separately so
//! a story can move the Cruiser without touching the alert mode. Each keeps its
//! own notice list.

use serde::Serialize;

use crate::rules::{
    arbitrate_kind, AllianceMode, Notice, PriorityTable, RuleEffect, RuleKind, RuleSet,
    SpecialRuleCategory,
};

use super::{special_rules, SpecialRule};

pub const DEFAULT_ALLIANCE_PLACEMENT: &str = "Alliance Cruiser at Londinium";
pub const DEFAULT_REAVER_PLACEMENT: &str = "Reaver Cutter in the Firefly-logo sector";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllianceDetails {
    pub mode: AllianceMode,
    pub mode_notices: Vec<Notice>,
    pub alliance_placement: String,
    pub alliance_placement_notices: Vec<Notice>,
    pub reaver_placement: String,
    pub reaver_placement_notices: Vec<Notice>,
    pub special_rules: Vec<SpecialRule>,
}

impl AllianceDetails {
    /// All notices, mode first, then Alliance and Reaver placement.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.mode_notices
            .iter()
            .chain(self.alliance_placement_notices.iter())
            .chain(self.reaver_placement_notices.iter())
    }
}

pub fn compose_alliance(rules: &RuleSet, priority: &PriorityTable) -> AllianceDetails {
    let mode = arbitrate_kind(rules, RuleKind::SetAllianceMode, priority);
    let alliance = arbitrate_kind(rules, RuleKind::SetAlliancePlacement, priority);
    let reaver = arbitrate_kind(rules, RuleKind::SetReaverPlacement, priority);

    AllianceDetails {
        mode: mode
            .value(|rule| match rule.effect {
                RuleEffect::SetAllianceMode { mode } => Some(mode),
                _ => None,
            })
            .unwrap_or_default(),
        mode_notices: mode.overruled,
        alliance_placement: alliance
            .value(|rule| match &rule.effect {
                RuleEffect::SetAlliancePlacement { placement } => Some(placement.clone()),
                _ => None,
            })
            .unwrap_or_else(|| DEFAULT_ALLIANCE_PLACEMENT.to_string()),
        alliance_placement_notices: alliance.overruled,
        reaver_placement: reaver
            .value(|rule| match &rule.effect {
                RuleEffect::SetReaverPlacement { placement } => Some(placement.clone()),
                _ => None,
            })
            .unwrap_or_else(|| DEFAULT_REAVER_PLACEMENT.to_string()),
        reaver_placement_notices: reaver.overruled,
        special_rules: special_rules(rules, SpecialRuleCategory::Alliance, priority),
    }
}
