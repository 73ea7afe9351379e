//! Crew, leader and ship draft.

use serde::Serialize;

use crate::rules::{
    arbitrate_kind, DraftMode, LeaderSetup, Notice, PriorityTable, RuleEffect, RuleKind, RuleSet,
    SpecialRuleCategory,
};

use super::{special_rules, SpecialRule};

pub const DEFAULT_SHIP_PLACEMENT: &str = "Persephone";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDetails {
    pub mode: DraftMode,
    pub leader_setup: LeaderSetup,
    pub ship_placement: String,
    pub notices: Vec<Notice>,
    /// Injected text for the draft order panel.
    pub panel_rules: Vec<SpecialRule>,
    /// Injected text about ship selection.
    pub ship_rules: Vec<SpecialRule>,
    /// Injected text about starting placement.
    pub placement_rules: Vec<SpecialRule>,
}

pub fn compose_draft(rules: &RuleSet, priority: &PriorityTable) -> DraftDetails {
    let mode = arbitrate_kind(rules, RuleKind::SetDraftMode, priority);
    let leader = arbitrate_kind(rules, RuleKind::SetLeaderSetup, priority);
    let placement = arbitrate_kind(rules, RuleKind::SetShipPlacement, priority);

    let mut notices = Vec::new();
    notices.extend(mode.overruled.iter().cloned());
    notices.extend(leader.overruled.iter().cloned());
    notices.extend(placement.overruled.iter().cloned());

    DraftDetails {
        mode: mode
            .value(|rule| match rule.effect {
                RuleEffect::SetDraftMode { mode } => Some(mode),
                _ => None,
            })
            .unwrap_or_default(),
        leader_setup: leader
            .value(|rule| match rule.effect {
                RuleEffect::SetLeaderSetup { mode } => Some(mode),
                _ => None,
            })
            .unwrap_or_default(),
        ship_placement: placement
            .value(|rule| match &rule.effect {
                RuleEffect::SetShipPlacement { placement } => Some(placement.clone()),
                _ => None,
            })
            .unwrap_or_else(|| DEFAULT_SHIP_PLACEMENT.to_string()),
        notices,
        panel_rules: special_rules(rules, SpecialRuleCategory::DraftPanel, priority),
        ship_rules: special_rules(rules, SpecialRuleCategory::DraftShips, priority),
        placement_rules: special_rules(rules, SpecialRuleCategory::DraftPlacement, priority),
    }
}
