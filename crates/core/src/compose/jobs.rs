//! Job draw mode and contact deck composition.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    rules::{
        arbitrate_kind, JobMode, Notice, PriorityTable, RuleEffect, RuleKind, RuleSet,
        SpecialRuleCategory,
    },
    session::GameState,
};

use super::{special_rules, SpecialRule};

/// Contacts available in every game.
pub const CORE_CONTACTS: [&str; 5] = ["Harken", "Badger", "Amnon Duul", "Patience", "Niska"];

/// Contacts added by expansions when they are active.
const EXPANSION_CONTACTS: &[(&str, &[&str])] = &[
    ("blue_sun", &["Lord Harrow", "Mr. Universe"]),
    ("kalidasa", &["Fanty & Mingo", "Magistrate Higgins"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub mode: JobMode,
    /// Contacts whose decks deal starting jobs, in deal order.
    pub contacts: Vec<String>,
    /// Contacts removed by forbid rules.
    pub forbidden_contacts: Vec<String>,
    pub notices: Vec<Notice>,
    pub special_rules: Vec<SpecialRule>,
}

/// Contact list used when no rule replaces it.
pub fn standard_contacts(expansions: &BTreeSet<String>) -> Vec<String> {
    let mut contacts: Vec<String> = CORE_CONTACTS.iter().map(|c| c.to_string()).collect();
    for (expansion, extra) in EXPANSION_CONTACTS {
        if expansions.contains(*expansion) {
            contacts.extend(extra.iter().map(|c| c.to_string()));
        }
    }
    contacts
}

/// Resolve the job mode and contact list.
///
/// The mode and any replacement contact list are arbitrated. Allow and forbid
/// rules all apply regardless of source: allowed contacts are appended first,
/// then forbidden contacts are removed.
pub fn compose_jobs(rules: &RuleSet, state: &GameState, priority: &PriorityTable) -> JobDetails {
    let mode_outcome = arbitrate_kind(rules, RuleKind::SetJobMode, priority);
    let mode = mode_outcome
        .value(|rule| match rule.effect {
            RuleEffect::SetJobMode { mode } => Some(mode),
            _ => None,
        })
        .unwrap_or_default();

    let contacts_outcome = arbitrate_kind(rules, RuleKind::SetJobContacts, priority);
    let mut contacts = contacts_outcome
        .value(|rule| match &rule.effect {
            RuleEffect::SetJobContacts { contacts } => Some(contacts.clone()),
            _ => None,
        })
        .unwrap_or_else(|| standard_contacts(&state.expansions));

    for rule in rules.of_kind(RuleKind::AllowContacts) {
        if let RuleEffect::AllowContacts { contacts: allowed } = &rule.effect {
            for contact in allowed {
                if !contacts.contains(contact) {
                    contacts.push(contact.clone());
                }
            }
        }
    }

    let mut forbidden_contacts = Vec::new();
    for rule in rules.of_kind(RuleKind::ForbidContact) {
        if let RuleEffect::ForbidContact { contact } = &rule.effect {
            if !forbidden_contacts.contains(contact) {
                forbidden_contacts.push(contact.clone());
            }
        }
    }
    contacts.retain(|contact| !forbidden_contacts.contains(contact));

    if mode == JobMode::NoJobs {
        contacts.clear();
    }

    let mut notices = mode_outcome.overruled;
    notices.extend(contacts_outcome.overruled);

    JobDetails {
        mode,
        contacts,
        forbidden_contacts,
        notices,
        special_rules: special_rules(rules, SpecialRuleCategory::Jobs, priority),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, SourceKind};

    fn resolve(rules: Vec<Rule>, state: &GameState) -> JobDetails {
        let set = RuleSet::new(rules, &state.expansions);
        compose_jobs(&set, state, &PriorityTable::default())
    }

    fn contacts(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn defaults_to_standard_contacts() {
        let state = GameState::default().with_expansion("blue_sun");
        let details = resolve(Vec::new(), &state);
        assert_eq!(details.mode, JobMode::Standard);
        assert_eq!(details.contacts.len(), 7);
        assert!(details.contacts.contains(&"Lord Harrow".to_string()));
        assert!(details.notices.is_empty());
    }

    #[test]
    fn replacement_list_is_arbitrated() {
        let state = GameState::default();
        let details = resolve(
            vec![
                Rule::new(
                    SourceKind::SetupCard,
                    "Awful Lonely",
                    RuleEffect::SetJobContacts {
                        contacts: contacts(&["Harken"]),
                    },
                ),
                Rule::new(
                    SourceKind::Story,
                    "Shadow Hunt",
                    RuleEffect::SetJobContacts {
                        contacts: contacts(&["Niska", "Badger"]),
                    },
                ),
            ],
            &state,
        );
        assert_eq!(details.contacts, contacts(&["Niska", "Badger"]));
        assert_eq!(details.notices.len(), 1);
        assert_eq!(details.notices[0].title, "Job Contacts (Awful Lonely)");
    }

    #[test]
    fn allow_and_forbid_rules_accumulate_across_sources() {
        let state = GameState::default();
        let details = resolve(
            vec![
                Rule::new(
                    SourceKind::Story,
                    "Story",
                    RuleEffect::ForbidContact {
                        contact: "Niska".to_string(),
                    },
                ),
                Rule::new(
                    SourceKind::Expansion,
                    "Kalidasa",
                    RuleEffect::ForbidContact {
                        contact: "Harken".to_string(),
                    },
                ),
                Rule::new(
                    SourceKind::OptionalRule,
                    "Optional",
                    RuleEffect::AllowContacts {
                        contacts: contacts(&["Mr. Universe", "Badger"]),
                    },
                ),
            ],
            &state,
        );

        assert_eq!(
            details.contacts,
            contacts(&["Badger", "Amnon Duul", "Patience", "Mr. Universe"])
        );
        assert_eq!(details.forbidden_contacts, contacts(&["Niska", "Harken"]));
        assert!(details.notices.is_empty());
    }

    #[test]
    fn forbid_wins_over_allow() {
        let state = GameState::default();
        let details = resolve(
            vec![
                Rule::new(
                    SourceKind::Expansion,
                    "Blue Sun",
                    RuleEffect::AllowContacts {
                        contacts: contacts(&["Mr. Universe"]),
                    },
                ),
                Rule::new(
                    SourceKind::Expansion,
                    "Pirates",
                    RuleEffect::ForbidContact {
                        contact: "Mr. Universe".to_string(),
                    },
                ),
            ],
            &state,
        );
        assert!(!details.contacts.contains(&"Mr. Universe".to_string()));
    }

    #[test]
    fn no_jobs_mode_clears_contacts() {
        let state = GameState::default();
        let details = resolve(
            vec![Rule::new(
                SourceKind::Story,
                "Running On Empty",
                RuleEffect::SetJobMode {
                    mode: JobMode::NoJobs,
                },
            )],
            &state,
        );
        assert_eq!(details.mode, JobMode::NoJobs);
        assert!(details.contacts.is_empty());
    }
}
