//! Priming the supply decks.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::rules::{
    arbitrate_kind, Notice, PrimeMode, PriorityTable, Rule, RuleEffect, RuleKind, RuleSet,
    SpecialRuleCategory,
};

use super::{application_order, special_rules, SpecialRule};

/// Flag raised by large-format supply decks.
pub const HIGH_SUPPLY_VOLUME_FLAG: &str = "highSupplyVolume";

/// Cards discarded from each supply deck in a standard game.
pub const BASE_DISCARD: u32 = 3;
/// Cards discarded when the supply decks are high volume.
pub const HIGH_SUPPLY_DISCARD: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimeDetails {
    pub mode: PrimeMode,
    pub is_blitz: bool,
    pub is_high_supply_volume: bool,
    pub base_discard: u32,
    /// Cards to discard from each deck once every modifier has applied.
    pub discard_count: u32,
    pub notices: Vec<Notice>,
    pub special_rules: Vec<SpecialRule>,
}

/// Resolve the priming step against the effective flag set.
///
/// Modifiers apply lowest priority first, multiplier before add. Blitz doubles
/// the final count.
pub fn compose_prime(
    rules: &RuleSet,
    flags: &BTreeSet<String>,
    priority: &PriorityTable,
) -> PrimeDetails {
    let outcome = arbitrate_kind(rules, RuleKind::SetPrimeMode, priority);
    let mode = outcome
        .value(|rule| match rule.effect {
            RuleEffect::SetPrimeMode { mode } => Some(mode),
            _ => None,
        })
        .unwrap_or_default();

    let is_high_supply_volume = flags.contains(HIGH_SUPPLY_VOLUME_FLAG);
    let base_discard = if is_high_supply_volume {
        HIGH_SUPPLY_DISCARD
    } else {
        BASE_DISCARD
    };

    let modifiers = application_order(rules.of_kind(RuleKind::ModifyPrime), priority, |_: &Rule| 0);
    let mut count = i64::from(base_discard);
    for rule in modifiers {
        if let RuleEffect::ModifyPrime { multiplier, add } = rule.effect {
            if let Some(multiplier) = multiplier {
                count *= i64::from(multiplier);
            }
            if let Some(add) = add {
                count += i64::from(add);
            }
        }
    }

    let is_blitz = mode == PrimeMode::Blitz;
    if is_blitz {
        count *= 2;
    }

    PrimeDetails {
        mode,
        is_blitz,
        is_high_supply_volume,
        base_discard,
        discard_count: u32::try_from(count.max(0)).unwrap_or(u32::MAX),
        notices: outcome.overruled,
        special_rules: special_rules(rules, SpecialRuleCategory::Prime, priority),
    }
}
