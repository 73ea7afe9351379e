//! Flags, extra board components and player badges.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    rules::{
        arbitrate_kind, Notice, PriorityTable, RuleEffect, RuleKind, RuleSet, SpecialRuleCategory,
    },
    session::GameState,
};

use super::{special_rules, SpecialRule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetails {
    /// Active flags: the state's own plus every flag added by a rule.
    pub flags: Vec<String>,
    pub components: Vec<String>,
    pub player_badges: Vec<String>,
    pub notices: Vec<Notice>,
    pub special_rules: Vec<SpecialRule>,
}

/// State flags plus every flag added by a candidate rule.
pub fn effective_flags(rules: &RuleSet, state: &GameState) -> BTreeSet<String> {
    let mut flags = state.flags.clone();
    for rule in rules.of_kind(RuleKind::AddFlag) {
        if let RuleEffect::AddFlag { flag } = &rule.effect {
            flags.insert(flag.clone());
        }
    }
    flags
}

pub fn compose_board(rules: &RuleSet, state: &GameState, priority: &PriorityTable) -> BoardDetails {
    let mut components = Vec::new();
    for rule in rules.of_kind(RuleKind::AddBoardComponent) {
        if let RuleEffect::AddBoardComponent { component } = &rule.effect {
            if !components.contains(component) {
                components.push(component.clone());
            }
        }
    }

    let badges = arbitrate_kind(rules, RuleKind::SetPlayerBadges, priority);

    BoardDetails {
        flags: effective_flags(rules, state).into_iter().collect(),
        components,
        player_badges: badges
            .value(|rule| match &rule.effect {
                RuleEffect::SetPlayerBadges { badges } => Some(badges.clone()),
                _ => None,
            })
            .unwrap_or_default(),
        notices: badges.overruled,
        special_rules: special_rules(rules, SpecialRuleCategory::Setup, priority),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, SourceKind};

    #[test]
    fn flags_and_components_accumulate() {
        let state = GameState::default().with_flag("solo");
        let rules = RuleSet::new(
            vec![
                Rule::new(
                    SourceKind::Expansion,
                    "10th Anniversary",
                    RuleEffect::AddFlag {
                        flag: "highSupplyVolume".to_string(),
                    },
                ),
                Rule::new(
                    SourceKind::Expansion,
                    "Blue Sun",
                    RuleEffect::AddBoardComponent {
                        component: "Rim Space board".to_string(),
                    },
                ),
                Rule::new(
                    SourceKind::Expansion,
                    "Kalidasa",
                    RuleEffect::AddBoardComponent {
                        component: "Rim Space board".to_string(),
                    },
                ),
            ],
            &state.expansions,
        );

        let details = compose_board(&rules, &state, &PriorityTable::default());
        assert_eq!(details.flags, vec!["highSupplyVolume", "solo"]);
        assert_eq!(details.components, vec!["Rim Space board"]);
        assert!(details.player_badges.is_empty());
    }

    #[test]
    fn player_badges_have_a_single_winner() {
        let state = GameState::default();
        let rules = RuleSet::new(
            vec![
                Rule::new(
                    SourceKind::OptionalRule,
                    "Big Damn Heroes",
                    RuleEffect::SetPlayerBadges {
                        badges: vec!["Hero".to_string()],
                    },
                ),
                Rule::new(
                    SourceKind::Challenge,
                    "Lone Wolf",
                    RuleEffect::SetPlayerBadges {
                        badges: vec!["Wolf".to_string()],
                    },
                ),
            ],
            &state.expansions,
        );

        let details = compose_board(&rules, &state, &PriorityTable::default());
        assert_eq!(details.player_badges, vec!["Wolf"]);
        assert_eq!(details.notices.len(), 1);
        assert_eq!(details.notices[0].source, SourceKind::Info);
    }
}
