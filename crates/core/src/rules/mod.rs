//! Rule catalog model.
//!
//! Every source that takes part in a setup (story card, challenge, setup card,
//! optional rule, expansion) contributes [`Rule`]s drawn from a closed set of
//! kinds. Rules of the same kind compete through [`arbitrate`]; a handful of
//! kinds accumulate instead, as recorded by [`RuleKind::policy`].

pub mod arbitrate;
mod effect;

use std::{collections::BTreeSet, fmt};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use arbitrate::{arbitrate, arbitrate_kind, Arbitration};
pub use effect::{
    AggregationPolicy, AllianceMode, DraftMode, JobMode, LeaderSetup, NavMode, PrimeMode,
    ResourceKind, ResourceMethod, RuleEffect, RuleKind, SpecialRuleCategory,
};

/// Badge attached to notices for rules that lost arbitration.
pub const OVERRULED_BADGE: &str = "Overruled";

/// Category of entity that asserted a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Story,
    Challenge,
    CombinableSetupCard,
    SetupCard,
    OptionalRule,
    Expansion,
    /// Synthetic, only ever used on notices.
    Warning,
    /// Synthetic, only ever used on notices.
    Info,
}

impl SourceKind {
    /// Source kinds that compete during arbitration, highest priority first.
    pub const COMPETING: [SourceKind; 6] = [
        SourceKind::Story,
        SourceKind::Challenge,
        SourceKind::CombinableSetupCard,
        SourceKind::SetupCard,
        SourceKind::OptionalRule,
        SourceKind::Expansion,
    ];

    /// Whether this kind only exists on notices.
    pub fn is_synthetic(self) -> bool {
        matches!(self, SourceKind::Warning | SourceKind::Info)
    }

    /// Source shown on a notice for a rule of this kind.
    pub fn normalized(self) -> SourceKind {
        match self {
            SourceKind::Challenge => SourceKind::Warning,
            SourceKind::OptionalRule => SourceKind::Info,
            SourceKind::CombinableSetupCard => SourceKind::SetupCard,
            other => other,
        }
    }

    /// Short user-facing label.
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Story => "story",
            SourceKind::Challenge => "challenge",
            SourceKind::CombinableSetupCard => "combinable setup card",
            SourceKind::SetupCard => "setup card",
            SourceKind::OptionalRule => "optional rule",
            SourceKind::Expansion => "expansion",
            SourceKind::Warning => "warning",
            SourceKind::Info => "info",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised when building a custom [`PriorityTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriorityError {
    #[error("{0} sources never compete and cannot be ranked")]
    Synthetic(SourceKind),
    #[error("{0} is listed more than once in the priority order")]
    Duplicate(SourceKind),
    #[error("{0} is missing from the priority order")]
    Missing(SourceKind),
}

/// Ordering of competing source kinds, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    order: Vec<SourceKind>,
}

impl PriorityTable {
    /// Build a table from an explicit order. Every competing kind must appear exactly once.
    pub fn new(order: Vec<SourceKind>) -> Result<Self, PriorityError> {
        let mut seen = BTreeSet::new();
        for kind in &order {
            if kind.is_synthetic() {
                return Err(PriorityError::Synthetic(*kind));
            }
            if !seen.insert(*kind) {
                return Err(PriorityError::Duplicate(*kind));
            }
        }
        if let Some(missing) = SourceKind::COMPETING
            .iter()
            .find(|kind| !seen.contains(*kind))
        {
            return Err(PriorityError::Missing(*missing));
        }
        Ok(Self { order })
    }

    /// Rank of a source kind; lower ranks win. Synthetic kinds rank last.
    pub fn rank(&self, source: SourceKind) -> usize {
        self.order
            .iter()
            .position(|kind| *kind == source)
            .unwrap_or(self.order.len())
    }

    pub fn order(&self) -> &[SourceKind] {
        &self.order
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self {
            order: SourceKind::COMPETING.to_vec(),
        }
    }
}

/// Precondition over the active expansions gating whether a rule is a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_expansion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_expansion: Option<String>,
}

impl Criteria {
    pub fn requires(expansion: impl Into<String>) -> Self {
        Self {
            require_expansion: Some(expansion.into()),
            exclude_expansion: None,
        }
    }

    pub fn excludes(expansion: impl Into<String>) -> Self {
        Self {
            require_expansion: None,
            exclude_expansion: Some(expansion.into()),
        }
    }

    pub fn is_met(&self, expansions: &BTreeSet<String>) -> bool {
        let required = self
            .require_expansion
            .as_ref()
            .map(|id| expansions.contains(id))
            .unwrap_or(true);
        let excluded = self
            .exclude_expansion
            .as_ref()
            .map(|id| expansions.contains(id))
            .unwrap_or(false);
        required && !excluded
    }

    /// Expansion ids referenced by this criteria.
    pub fn expansion_ids(&self) -> impl Iterator<Item = &str> {
        self.require_expansion
            .iter()
            .chain(self.exclude_expansion.iter())
            .map(String::as_str)
    }
}

/// A single typed assertion about setup, attributed to the source that made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub source: SourceKind,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
    #[serde(flatten)]
    pub effect: RuleEffect,
}

impl Rule {
    pub fn new(source: SourceKind, source_name: impl Into<String>, effect: RuleEffect) -> Self {
        Self {
            source,
            source_name: source_name.into(),
            criteria: None,
            effect,
        }
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn kind(&self) -> RuleKind {
        self.effect.kind()
    }

    /// Display text of the rule's effect; equal labels count as agreement.
    pub fn label(&self) -> String {
        self.effect.label()
    }

    /// Whether the rule's criteria hold for the given active expansions.
    pub fn is_candidate(&self, expansions: &BTreeSet<String>) -> bool {
        self.criteria
            .as_ref()
            .map(|criteria| criteria.is_met(expansions))
            .unwrap_or(true)
    }
}

/// Catalog form of a rule, before a source is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
    #[serde(flatten)]
    pub effect: RuleEffect,
}

impl RuleTemplate {
    pub fn materialize(&self, source: SourceKind, source_name: &str) -> Rule {
        Rule {
            source,
            source_name: source_name.to_string(),
            criteria: self.criteria.clone(),
            effect: self.effect.clone(),
        }
    }
}

/// Display-ready message attached to a resolved domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub source: SourceKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub body: String,
}

impl Notice {
    /// Notice for a rule whose effect was discarded in favour of another.
    pub fn overruled(rule: &Rule, title: &str, label: &str) -> Self {
        Self {
            source: rule.source.normalized(),
            title: format!("{} ({})", title, rule.source_name),
            badge: Some(OVERRULED_BADGE.to_string()),
            body: compact_annotation(label),
        }
    }
}

/// Collapse whitespace runs so a label fits on a single annotation line.
pub fn compact_annotation(label: &str) -> String {
    static WHITESPACE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

    WHITESPACE_RE.replace_all(label.trim(), " ").into_owned()
}

/// Candidate rules for one resolution pass, with criteria already applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Keep only the rules whose criteria hold for the active expansions.
    pub fn new(rules: impl IntoIterator<Item = Rule>, expansions: &BTreeSet<String>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .filter(|rule| rule.is_candidate(expansions))
                .collect(),
        }
    }

    /// Candidates of one kind, in collection order.
    pub fn of_kind(&self, kind: RuleKind) -> Vec<&Rule> {
        self.rules.iter().filter(|rule| rule.kind() == kind).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expansions(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn criteria_requires_and_excludes() {
        let active = expansions(&["blue_sun"]);
        assert!(Criteria::requires("blue_sun").is_met(&active));
        assert!(!Criteria::requires("kalidasa").is_met(&active));
        assert!(!Criteria::excludes("blue_sun").is_met(&active));
        assert!(Criteria::excludes("kalidasa").is_met(&active));
        assert!(Criteria::default().is_met(&active));
    }

    #[test]
    fn rule_set_drops_rules_failing_criteria() {
        let rules = vec![
            Rule::new(
                SourceKind::Expansion,
                "Blue Sun",
                RuleEffect::AddFlag {
                    flag: "blueSun".to_string(),
                },
            )
            .with_criteria(Criteria::requires("blue_sun")),
            Rule::new(
                SourceKind::Expansion,
                "Kalidasa",
                RuleEffect::AddFlag {
                    flag: "kalidasa".to_string(),
                },
            )
            .with_criteria(Criteria::requires("kalidasa")),
        ];

        let set = RuleSet::new(rules, &expansions(&["blue_sun"]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.of_kind(RuleKind::AddFlag)[0].source_name, "Blue Sun");
    }

    #[test]
    fn priority_table_rejects_bad_orders() {
        assert_eq!(
            PriorityTable::new(vec![SourceKind::Warning]),
            Err(PriorityError::Synthetic(SourceKind::Warning))
        );

        let mut duplicated = SourceKind::COMPETING.to_vec();
        duplicated.push(SourceKind::Story);
        assert_eq!(
            PriorityTable::new(duplicated),
            Err(PriorityError::Duplicate(SourceKind::Story))
        );

        let missing = SourceKind::COMPETING[..5].to_vec();
        assert_eq!(
            PriorityTable::new(missing),
            Err(PriorityError::Missing(SourceKind::Expansion))
        );
    }

    #[test]
    fn default_priority_ranks_story_first() {
        let table = PriorityTable::default();
        assert_eq!(table.rank(SourceKind::Story), 0);
        assert_eq!(table.rank(SourceKind::Expansion), 5);
        assert!(table.rank(SourceKind::Info) > table.rank(SourceKind::Expansion));
    }

    #[test]
    fn rules_parse_from_catalog_json() -> anyhow::Result<()> {
        let rule: Rule = serde_json::from_str(
            r#"{
                "source": "story",
                "sourceName": "Desperadoes",
                "type": "modifyResource",
                "resource": "credits",
                "method": "add",
                "value": 500,
                "criteria": { "requireExpansion": "blue_sun" }
            }"#,
        )?;
        assert_eq!(rule.kind(), RuleKind::ModifyResource);
        assert_eq!(
            rule.criteria.and_then(|c| c.require_expansion).as_deref(),
            Some("blue_sun")
        );
        Ok(())
    }

    #[test]
    fn compact_annotation_collapses_whitespace() {
        assert_eq!(compact_annotation("  Harken,\n   Badger "), "Harken, Badger");
    }
}
