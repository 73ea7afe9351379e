//! Static catalog of expansions, setup cards, story cards and optional rules.

/// Directory loader for catalog fragments.
pub mod loader;
mod models;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{rules::RuleTemplate, session::GameState};

pub use loader::CatalogLoader;
pub use models::{
    ChallengeOption, Expansion, Goal, ModeSupport, OptionalRule, SetupCard, StoryCard,
};

const BUILTIN_CATALOG: &str = include_str!("../../data/builtin_catalog.json");

/// Malformed catalog entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{owner} references unknown expansion '{id}'")]
    UnknownExpansion { owner: String, id: String },
    #[error("{owner} references unknown setup card '{id}'")]
    UnknownSetupCard { owner: String, id: String },
}

/// Every entry a game setup can draw rules from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    pub expansions: Vec<Expansion>,
    pub setup_cards: Vec<SetupCard>,
    pub story_cards: Vec<StoryCard>,
    pub optional_rules: Vec<OptionalRule>,
}

impl Catalog {
    /// Catalog embedded in the crate, parsed once.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
            serde_json::from_str(BUILTIN_CATALOG).expect("embedded catalog must parse")
        });
        &BUILTIN
    }

    pub fn expansion(&self, id: &str) -> Option<&Expansion> {
        self.expansions.iter().find(|entry| entry.id == id)
    }

    pub fn setup_card(&self, id: &str) -> Option<&SetupCard> {
        self.setup_cards.iter().find(|entry| entry.id == id)
    }

    pub fn story_card(&self, id: &str) -> Option<&StoryCard> {
        self.story_cards.iter().find(|entry| entry.id == id)
    }

    pub fn optional_rule(&self, id: &str) -> Option<&OptionalRule> {
        self.optional_rules.iter().find(|entry| entry.id == id)
    }

    /// Story card currently selected in `state`.
    pub fn selected_story(&self, state: &GameState) -> Option<&StoryCard> {
        state
            .story_card_id
            .as_deref()
            .and_then(|id| self.story_card(id))
    }

    /// Goal currently selected in `state`, looked up on the selected story.
    pub fn selected_goal(&self, state: &GameState) -> Option<&Goal> {
        let goal_id = state.goal_id.as_deref()?;
        self.selected_story(state)?.goal(goal_id)
    }

    /// Append the entries of another catalog fragment.
    pub fn merge(&mut self, other: Catalog) {
        self.expansions.extend(other.expansions);
        self.setup_cards.extend(other.setup_cards);
        self.story_cards.extend(other.story_cards);
        self.optional_rules.extend(other.optional_rules);
    }

    /// Check ids are unique and every cross-reference resolves.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let expansion_ids = unique_ids("expansion", self.expansions.iter().map(|e| &e.id))?;
        let setup_ids = unique_ids("setup card", self.setup_cards.iter().map(|c| &c.id))?;
        unique_ids("story card", self.story_cards.iter().map(|c| &c.id))?;
        unique_ids("optional rule", self.optional_rules.iter().map(|r| &r.id))?;

        let check_rules = |owner: &str, rules: &[RuleTemplate]| -> Result<(), CatalogError> {
            for rule in rules {
                if let Some(criteria) = &rule.criteria {
                    for id in criteria.expansion_ids() {
                        if !expansion_ids.contains(id) {
                            return Err(CatalogError::UnknownExpansion {
                                owner: owner.to_string(),
                                id: id.to_string(),
                            });
                        }
                    }
                }
            }
            Ok(())
        };

        for expansion in &self.expansions {
            check_rules(&expansion.name, &expansion.rules)?;
        }
        for card in &self.setup_cards {
            check_rules(&card.name, &card.rules)?;
        }
        for rule in &self.optional_rules {
            check_rules(&rule.name, &rule.rules)?;
        }

        for story in &self.story_cards {
            check_rules(&story.title, &story.rules)?;
            unique_ids(
                "challenge",
                story.challenges.iter().map(|challenge| &challenge.id),
            )?;
            unique_ids("goal", story.goals.iter().map(|goal| &goal.id))?;
            for challenge in &story.challenges {
                check_rules(&challenge.label, &challenge.rules)?;
            }

            for id in story
                .required_expansion
                .iter()
                .chain(story.additional_required_expansions.iter())
            {
                if !expansion_ids.contains(id.as_str()) {
                    return Err(CatalogError::UnknownExpansion {
                        owner: story.title.clone(),
                        id: id.clone(),
                    });
                }
            }

            for id in story
                .required_setup_card_id
                .iter()
                .chain(story.incompatible_setup_card_ids.iter())
            {
                if !setup_ids.contains(id.as_str()) {
                    return Err(CatalogError::UnknownSetupCard {
                        owner: story.title.clone(),
                        id: id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a String>,
) -> Result<BTreeSet<&'a str>, CatalogError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.clone(),
            });
        }
    }
    Ok(seen)
}
