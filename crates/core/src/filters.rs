//! Selection filters deciding which catalog entries can be picked.

use std::fmt;

use serde::Serialize;

use crate::{
    catalog::{Catalog, Expansion, StoryCard},
    session::{GameMode, GameState},
};

/// First reason a story card cannot be played with the current selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Incompatibility {
    MissingExpansion { expansion: String },
    MissingAdditionalExpansion { expansion: String },
    MissingFlag { flag: String },
    RequiresSetupCard { setup_card_id: String },
    IncompatibleSetupCard { setup_card_id: String },
    UnsupportedMode { mode: GameMode },
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Incompatibility::MissingExpansion { expansion } => {
                write!(f, "requires the {expansion} expansion")
            }
            Incompatibility::MissingAdditionalExpansion { expansion } => {
                write!(f, "also requires the {expansion} expansion")
            }
            Incompatibility::MissingFlag { flag } => write!(f, "requires {flag}"),
            Incompatibility::RequiresSetupCard { setup_card_id } => {
                write!(f, "must be played with the {setup_card_id} setup card")
            }
            Incompatibility::IncompatibleSetupCard { setup_card_id } => {
                write!(f, "cannot be played with the {setup_card_id} setup card")
            }
            Incompatibility::UnsupportedMode { mode } => write!(f, "not playable in {mode} games"),
        }
    }
}

/// Expansions that can be offered, in catalog order.
pub fn eligible_expansions<'a>(
    catalog: &'a Catalog,
    state: &GameState,
    include_hidden: bool,
) -> Vec<&'a Expansion> {
    catalog
        .expansions
        .iter()
        .filter(|expansion| include_hidden || !expansion.hidden)
        .filter(|expansion| {
            expansion.editions.is_empty() || expansion.editions.contains(&state.edition)
        })
        .collect()
}

/// Check a story card against the current selections.
///
/// Checks run in a fixed order and only the first failure is reported.
pub fn incompatibility_reason(story: &StoryCard, state: &GameState) -> Option<Incompatibility> {
    if let Some(expansion) = &story.required_expansion {
        if !state.has_expansion(expansion) {
            return Some(Incompatibility::MissingExpansion {
                expansion: expansion.clone(),
            });
        }
    }

    if let Some(expansion) = story
        .additional_required_expansions
        .iter()
        .find(|expansion| !state.has_expansion(expansion))
    {
        return Some(Incompatibility::MissingAdditionalExpansion {
            expansion: expansion.clone(),
        });
    }

    if let Some(flag) = &story.required_flag {
        if !state.has_flag(flag) {
            return Some(Incompatibility::MissingFlag { flag: flag.clone() });
        }
    }

    if let Some(required) = &story.required_setup_card_id {
        if state.setup_card_id.as_ref() != Some(required) {
            return Some(Incompatibility::RequiresSetupCard {
                setup_card_id: required.clone(),
            });
        }
    }

    if let Some(current) = &state.setup_card_id {
        if story.incompatible_setup_card_ids.contains(current) {
            return Some(Incompatibility::IncompatibleSetupCard {
                setup_card_id: current.clone(),
            });
        }
    }

    let supported = match state.mode {
        GameMode::Solo => story.support.solo,
        GameMode::Coop => story.support.coop,
        GameMode::Pvp => story.support.pvp,
    };
    if !supported {
        return Some(Incompatibility::UnsupportedMode { mode: state.mode });
    }

    None
}

/// Story card paired with the reason it cannot currently be chosen, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryAvailability<'a> {
    pub story: &'a StoryCard,
    pub reason: Option<Incompatibility>,
}

impl StoryAvailability<'_> {
    pub fn is_playable(&self) -> bool {
        self.reason.is_none()
    }
}

/// Visible story cards with their availability, in catalog order.
pub fn story_availability<'a>(
    catalog: &'a Catalog,
    state: &GameState,
    include_hidden: bool,
) -> Vec<StoryAvailability<'a>> {
    catalog
        .story_cards
        .iter()
        .filter(|story| include_hidden || !story.hidden)
        .map(|story| StoryAvailability {
            story,
            reason: incompatibility_reason(story, state),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::ModeSupport, session::Edition};

    fn story() -> StoryCard {
        StoryCard {
            id: "test".to_string(),
            title: "Test".to_string(),
            hidden: false,
            required_expansion: None,
            additional_required_expansions: Vec::new(),
            required_flag: None,
            required_setup_card_id: None,
            incompatible_setup_card_ids: Vec::new(),
            support: ModeSupport::default(),
            goals: Vec::new(),
            challenges: Vec::new(),
            rules: Vec::new(),
        }
    }

    fn expansion(id: &str, hidden: bool, editions: Vec<Edition>) -> Expansion {
        Expansion {
            id: id.to_string(),
            name: id.to_string(),
            hidden,
            editions,
            rules: Vec::new(),
        }
    }

    #[test]
    fn hidden_expansions_need_opt_in() {
        let catalog = Catalog {
            expansions: vec![
                expansion("blue_sun", false, Vec::new()),
                expansion("local_color", true, Vec::new()),
            ],
            ..Catalog::default()
        };
        let state = GameState::default();

        let visible: Vec<_> = eligible_expansions(&catalog, &state, false)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(visible, vec!["blue_sun"]);

        let all: Vec<_> = eligible_expansions(&catalog, &state, true)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(all, vec!["blue_sun", "local_color"]);
    }

    #[test]
    fn edition_restricted_expansions_are_filtered() {
        let catalog = Catalog {
            expansions: vec![expansion("tenth_extras", false, vec![Edition::Tenth])],
            ..Catalog::default()
        };
        let original = GameState::default();
        assert!(eligible_expansions(&catalog, &original, true).is_empty());

        let tenth = GameState {
            edition: Edition::Tenth,
            ..GameState::default()
        };
        assert_eq!(eligible_expansions(&catalog, &tenth, false).len(), 1);
    }

    #[test]
    fn missing_expansion_is_reported_before_setup_card() {
        let mut card = story();
        card.required_expansion = Some("blue_sun".to_string());
        card.incompatible_setup_card_ids = vec!["flying_solo".to_string()];
        let state = GameState::default().with_setup_card("flying_solo");

        assert_eq!(
            incompatibility_reason(&card, &state),
            Some(Incompatibility::MissingExpansion {
                expansion: "blue_sun".to_string()
            })
        );

        let state = state.with_expansion("blue_sun");
        assert_eq!(
            incompatibility_reason(&card, &state),
            Some(Incompatibility::IncompatibleSetupCard {
                setup_card_id: "flying_solo".to_string()
            })
        );
    }

    #[test]
    fn checks_run_in_order() {
        let mut card = story();
        card.additional_required_expansions = vec!["kalidasa".to_string()];
        card.required_flag = Some("solo".to_string());
        card.required_setup_card_id = Some("flying_solo".to_string());
        card.support = ModeSupport {
            solo: true,
            coop: false,
            pvp: false,
        };

        let mut state = GameState::default();
        assert!(matches!(
            incompatibility_reason(&card, &state),
            Some(Incompatibility::MissingAdditionalExpansion { .. })
        ));

        state = state.with_expansion("kalidasa");
        assert!(matches!(
            incompatibility_reason(&card, &state),
            Some(Incompatibility::MissingFlag { .. })
        ));

        state = state.with_flag("solo");
        assert!(matches!(
            incompatibility_reason(&card, &state),
            Some(Incompatibility::RequiresSetupCard { .. })
        ));

        state = state.with_setup_card("flying_solo");
        assert_eq!(
            incompatibility_reason(&card, &state),
            Some(Incompatibility::UnsupportedMode {
                mode: GameMode::Pvp
            })
        );

        state = state.with_mode(GameMode::Solo);
        assert_eq!(incompatibility_reason(&card, &state), None);
    }

    #[test]
    fn reasons_read_naturally() {
        let reason = Incompatibility::UnsupportedMode {
            mode: GameMode::Coop,
        };
        assert_eq!(reason.to_string(), "not playable in co-op games");
    }

    #[test]
    fn availability_covers_visible_stories() {
        let catalog = Catalog::builtin();
        let state = GameState::default();
        let stories = story_availability(catalog, &state, false);
        assert!(stories.iter().all(|entry| !entry.story.hidden));
        assert!(stories.iter().any(|entry| entry.is_playable()));
        assert!(stories.iter().any(|entry| !entry.is_playable()));
    }
}
