//! Configuration composer: turns candidate rules into per-domain details.
//!
//! Each domain has its own aggregation function. Arbitrated kinds go through
//! [`arbitrate`](crate::rules::arbitrate); cumulative kinds are folded in
//! ascending priority so higher-priority sources apply last.

pub mod alliance;
pub mod board;
pub mod draft;
pub mod jobs;
pub mod nav;
pub mod prime;
pub mod resources;

use std::cmp::Reverse;

use serde::Serialize;
use tracing::debug;

use crate::{
    catalog::{Catalog, Goal},
    rules::{PriorityTable, Rule, RuleEffect, RuleKind, RuleSet, SourceKind, SpecialRuleCategory},
    session::{collect_rules, GameState},
};

pub use alliance::{compose_alliance, AllianceDetails};
pub use board::{compose_board, effective_flags, BoardDetails};
pub use draft::{compose_draft, DraftDetails};
pub use jobs::{compose_jobs, standard_contacts, JobDetails};
pub use nav::{compose_nav, nav_flags, NavDetails, NavFlags};
pub use prime::{compose_prime, PrimeDetails};
pub use resources::{
    compose_resources, AlertTokenStack, ResourceBaselines, ResourceDetails, ResourceTotal,
};

/// Block of rule text injected by a source, shown alongside a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialRule {
    pub source: SourceKind,
    pub source_name: String,
    pub title: String,
    pub content: Vec<String>,
}

/// Injected rule text of one category, highest priority first.
///
/// Injections never compete, so every candidate is kept.
pub fn special_rules(
    rules: &RuleSet,
    category: SpecialRuleCategory,
    priority: &PriorityTable,
) -> Vec<SpecialRule> {
    let mut matching = rules.of_kind(RuleKind::AddSpecialRule);
    matching.sort_by_key(|rule| priority.rank(rule.source));
    matching
        .into_iter()
        .filter_map(|rule| match &rule.effect {
            RuleEffect::AddSpecialRule {
                category: rule_category,
                title,
                content,
            } if *rule_category == category => Some(SpecialRule {
                source: rule.source,
                source_name: rule.source_name.clone(),
                title: title.clone(),
                content: content.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Order cumulative rules lowest priority first, breaking ties within a
/// source kind by `step`, then by collection order.
pub(crate) fn application_order<'a, K: Ord>(
    mut rules: Vec<&'a Rule>,
    priority: &PriorityTable,
    step: impl Fn(&Rule) -> K,
) -> Vec<&'a Rule> {
    rules.sort_by_key(|rule| (Reverse(priority.rank(rule.source)), step(rule)));
    rules
}

/// Every resolved domain for one game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSetup {
    pub jobs: JobDetails,
    pub nav: NavDetails,
    pub alliance: AllianceDetails,
    pub resources: ResourceDetails,
    pub prime: PrimeDetails,
    pub draft: DraftDetails,
    pub board: BoardDetails,
}

/// Runs a full resolution pass with an injected priority table and baselines.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    priority: PriorityTable,
    baselines: ResourceBaselines,
}

impl Resolver {
    pub fn new(priority: PriorityTable, baselines: ResourceBaselines) -> Self {
        Self {
            priority,
            baselines,
        }
    }

    pub fn priority(&self) -> &PriorityTable {
        &self.priority
    }

    pub fn baselines(&self) -> &ResourceBaselines {
        &self.baselines
    }

    /// Gather rules for `state` from `catalog` and resolve every domain.
    pub fn resolve(&self, catalog: &Catalog, state: &GameState) -> ResolvedSetup {
        let rules = collect_rules(catalog, state);
        self.resolve_rules(rules, state, catalog.selected_goal(state))
    }

    /// Resolve every domain from an explicit rule list.
    pub fn resolve_rules(
        &self,
        rules: Vec<Rule>,
        state: &GameState,
        goal: Option<&Goal>,
    ) -> ResolvedSetup {
        let rules = RuleSet::new(rules, &state.expansions);
        debug!(candidates = rules.len(), "resolving setup");

        let flags = effective_flags(&rules, state);
        ResolvedSetup {
            jobs: compose_jobs(&rules, state, &self.priority),
            nav: compose_nav(&rules, &self.priority),
            alliance: compose_alliance(&rules, &self.priority),
            resources: compose_resources(&rules, &self.priority, &self.baselines, goal),
            prime: compose_prime(&rules, &flags, &self.priority),
            draft: compose_draft(&rules, &self.priority),
            board: compose_board(&rules, state, &self.priority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{JobMode, NavMode, ResourceKind, SourceKind};

    #[test]
    fn flying_solo_scenario_resolves_story_job_mode() {
        let state = GameState::default()
            .with_expansion("tenth")
            .with_setup_card("flying_solo");
        let rules = vec![
            Rule::new(
                SourceKind::SetupCard,
                "Flying Solo",
                RuleEffect::SetJobMode {
                    mode: JobMode::Standard,
                },
            ),
            Rule::new(
                SourceKind::Story,
                "Running On Empty",
                RuleEffect::SetJobMode {
                    mode: JobMode::NoJobs,
                },
            ),
        ];

        let setup = Resolver::default().resolve_rules(rules, &state, None);
        assert_eq!(setup.jobs.mode, JobMode::NoJobs);
        assert_eq!(setup.jobs.notices.len(), 1);
        assert_eq!(setup.jobs.notices[0].source, SourceKind::SetupCard);
        assert_eq!(setup.jobs.notices[0].badge.as_deref(), Some("Overruled"));
        assert_eq!(setup.jobs.notices[0].body, "standard");
    }

    #[test]
    fn resolution_is_idempotent() {
        let catalog = Catalog::builtin();
        let mut state = GameState::default()
            .with_story("desperadoes")
            .with_setup_card("browncoat_way")
            .with_expansion("blue_sun")
            .with_expansion("kalidasa")
            .with_expansion("tenth");
        state.goal_id = Some("big_score".to_string());
        state.challenges.insert("no_warrants".to_string());

        let resolver = Resolver::default();
        let first = resolver.resolve(catalog, &state);
        let second = resolver.resolve(catalog, &state);
        assert_eq!(first, second);
    }

    #[test]
    fn builtin_catalog_resolves_a_full_setup() {
        let catalog = Catalog::builtin();
        let mut state = GameState::default()
            .with_story("desperadoes")
            .with_setup_card("browncoat_way")
            .with_expansion("blue_sun")
            .with_expansion("tenth");
        state.goal_id = Some("big_score".to_string());

        let setup = Resolver::default().resolve(catalog, &state);
        assert_eq!(setup.nav.mode, NavMode::Browncoat);
        assert!(setup.nav.force_reshuffle);
        assert!(setup.prime.is_high_supply_volume);
        assert_eq!(setup.resources.value(ResourceKind::Credits), 12000);
        assert!(setup
            .board
            .flags
            .iter()
            .any(|flag| flag == prime::HIGH_SUPPLY_VOLUME_FLAG));
    }

    #[test]
    fn special_rules_keep_every_injection() {
        let rules = RuleSet::new(
            vec![
                Rule::new(
                    SourceKind::Expansion,
                    "Pirates",
                    RuleEffect::AddSpecialRule {
                        category: SpecialRuleCategory::Jobs,
                        title: "Piracy".to_string(),
                        content: vec!["Pirate jobs are allowed.".to_string()],
                    },
                ),
                Rule::new(
                    SourceKind::Story,
                    "Desperadoes",
                    RuleEffect::AddSpecialRule {
                        category: SpecialRuleCategory::Jobs,
                        title: "Wanted".to_string(),
                        content: Vec::new(),
                    },
                ),
                Rule::new(
                    SourceKind::Story,
                    "Desperadoes",
                    RuleEffect::AddSpecialRule {
                        category: SpecialRuleCategory::Nav,
                        title: "Elsewhere".to_string(),
                        content: Vec::new(),
                    },
                ),
            ],
            &Default::default(),
        );

        let injected = special_rules(&rules, SpecialRuleCategory::Jobs, &PriorityTable::default());
        let titles: Vec<_> = injected.iter().map(|rule| rule.title.as_str()).collect();
        assert_eq!(titles, vec!["Wanted", "Piracy"]);
    }
}
