//! Navigation deck setup.

use serde::Serialize;

use crate::rules::{
    arbitrate_kind, NavMode, Notice, PriorityTable, RuleEffect, RuleKind, RuleSet,
    SpecialRuleCategory,
};

use super::{special_rules, SpecialRule};

/// Deck behaviour implied by a navigation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavFlags {
    pub force_reshuffle: bool,
    pub clearer_skies: bool,
    pub has_rim_decks: bool,
}

/// Fixed mapping from navigation mode to deck behaviour.
pub fn nav_flags(mode: NavMode) -> NavFlags {
    let (force_reshuffle, clearer_skies, has_rim_decks) = match mode {
        NavMode::Standard => (false, false, false),
        NavMode::Browncoat => (true, false, false),
        NavMode::Rim => (false, false, true),
        NavMode::BrowncoatRim => (true, false, true),
        NavMode::FlyingSolo => (true, false, false),
        NavMode::ClearerSkies => (false, true, false),
        NavMode::ClearerSkiesRim => (false, true, true),
    };
    NavFlags {
        force_reshuffle,
        clearer_skies,
        has_rim_decks,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavDetails {
    pub mode: NavMode,
    pub force_reshuffle: bool,
    pub clearer_skies: bool,
    pub has_rim_decks: bool,
    pub notices: Vec<Notice>,
    pub special_rules: Vec<SpecialRule>,
}

pub fn compose_nav(rules: &RuleSet, priority: &PriorityTable) -> NavDetails {
    let outcome = arbitrate_kind(rules, RuleKind::SetNavMode, priority);
    let mode = outcome
        .value(|rule| match rule.effect {
            RuleEffect::SetNavMode { mode } => Some(mode),
            _ => None,
        })
        .unwrap_or_default();
    let flags = nav_flags(mode);

    NavDetails {
        mode,
        force_reshuffle: flags.force_reshuffle,
        clearer_skies: flags.clearer_skies,
        has_rim_decks: flags.has_rim_decks,
        notices: outcome.overruled,
        special_rules: special_rules(rules, SpecialRuleCategory::Nav, priority),
    }
}
