use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    rules::{Rule, RuleTemplate, SourceKind},
};

use super::GameState;

/// Materialise the rules of every source that is active in `state`.
///
/// Sources are visited story first, then its selected challenges, setup
/// cards, optional rules and finally expansions in catalog order, so
/// same-kind ties fall back to catalog order. Criteria are not applied here.
pub fn collect_rules(catalog: &Catalog, state: &GameState) -> Vec<Rule> {
    let mut rules = Vec::new();

    if let Some(id) = state.story_card_id.as_deref() {
        match catalog.story_card(id) {
            Some(story) => {
                extend(&mut rules, &story.rules, SourceKind::Story, &story.title);
                for challenge in &story.challenges {
                    if state.challenges.contains(&challenge.id) {
                        extend(
                            &mut rules,
                            &challenge.rules,
                            SourceKind::Challenge,
                            &challenge.label,
                        );
                    }
                }
                for id in &state.challenges {
                    if story.challenge(id).is_none() {
                        warn!("Ignoring challenge {id}: not offered by {}", story.title);
                    }
                }
            }
            None => warn!("Ignoring unknown story card {id}"),
        }
    }

    for id in [&state.setup_card_id, &state.secondary_setup_card_id]
        .into_iter()
        .flatten()
    {
        match catalog.setup_card(id) {
            Some(card) => {
                let source = if card.combinable {
                    SourceKind::CombinableSetupCard
                } else {
                    SourceKind::SetupCard
                };
                extend(&mut rules, &card.rules, source, &card.name);
            }
            None => warn!("Ignoring unknown setup card {id}"),
        }
    }

    for optional in &catalog.optional_rules {
        if state.optional_rules.contains(&optional.id) {
            extend(
                &mut rules,
                &optional.rules,
                SourceKind::OptionalRule,
                &optional.name,
            );
        }
    }

    for expansion in &catalog.expansions {
        if state.has_expansion(&expansion.id) {
            extend(
                &mut rules,
                &expansion.rules,
                SourceKind::Expansion,
                &expansion.name,
            );
        }
    }

    debug!(count = rules.len(), "collected rules from active sources");
    rules
}

fn extend(rules: &mut Vec<Rule>, templates: &[RuleTemplate], source: SourceKind, name: &str) {
    rules.extend(
        templates
            .iter()
            .map(|template| template.materialize(source, name)),
    );
}
