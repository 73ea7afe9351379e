//! Starting resources and alert-token stacks.
//!
//! Resource modifications are cumulative. They apply lowest priority first so
//! a higher-priority `set` or `disable` always has the final say; within one
//! source kind `set` applies before `add`, and `disable` applies last.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    catalog::Goal,
    rules::{
        Notice, PriorityTable, ResourceKind, ResourceMethod, Rule, RuleEffect, RuleKind, RuleSet,
        SourceKind, SpecialRuleCategory,
    },
};

use super::{application_order, special_rules, SpecialRule};

/// Goal base used by alert-token multipliers when no goal is selected.
pub const DEFAULT_ALERT_BASE: u32 = 1;

/// Starting value of each resource before any rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBaselines {
    pub credits: i32,
    pub fuel: i32,
    pub parts: i32,
    pub warrants: i32,
    pub goal_tokens: i32,
}

impl ResourceBaselines {
    pub fn get(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Credits => self.credits,
            ResourceKind::Fuel => self.fuel,
            ResourceKind::Parts => self.parts,
            ResourceKind::Warrants => self.warrants,
            ResourceKind::GoalTokens => self.goal_tokens,
        }
    }
}

impl Default for ResourceBaselines {
    fn default() -> Self {
        Self {
            credits: 3000,
            fuel: 6,
            parts: 2,
            warrants: 0,
            goal_tokens: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTotal {
    pub kind: ResourceKind,
    pub value: i32,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTokenStack {
    pub token: String,
    pub count: u32,
    pub source: SourceKind,
    pub source_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetails {
    /// One entry per resource kind, in [`ResourceKind::ALL`] order.
    pub totals: Vec<ResourceTotal>,
    pub alert_stacks: Vec<AlertTokenStack>,
    pub notices: Vec<Notice>,
    pub special_rules: Vec<SpecialRule>,
}

impl ResourceDetails {
    pub fn total(&self, kind: ResourceKind) -> Option<&ResourceTotal> {
        self.totals.iter().find(|total| total.kind == kind)
    }

    /// Resolved value of a resource; disabled resources report zero.
    pub fn value(&self, kind: ResourceKind) -> i32 {
        self.total(kind).map(|total| total.value).unwrap_or(0)
    }

    pub fn is_disabled(&self, kind: ResourceKind) -> bool {
        self.total(kind).map(|total| total.disabled).unwrap_or(false)
    }
}

fn method_step(rule: &Rule) -> u8 {
    match rule.effect {
        RuleEffect::ModifyResource { method, .. } => match method {
            ResourceMethod::Set => 0,
            ResourceMethod::Add => 1,
            ResourceMethod::Disable => 2,
        },
        _ => 0,
    }
}

pub fn compose_resources(
    rules: &RuleSet,
    priority: &PriorityTable,
    baselines: &ResourceBaselines,
    goal: Option<&Goal>,
) -> ResourceDetails {
    let ordered = application_order(rules.of_kind(RuleKind::ModifyResource), priority, method_step);

    let mut notices = Vec::new();
    let totals = ResourceKind::ALL
        .iter()
        .map(|kind| apply_modifications(*kind, &ordered, baselines.get(*kind), &mut notices))
        .collect();

    let mut stacks = rules.of_kind(RuleKind::CreateAlertTokenStack);
    stacks.sort_by_key(|rule| priority.rank(rule.source));
    let alert_stacks = stacks
        .into_iter()
        .filter_map(|rule| match &rule.effect {
            RuleEffect::CreateAlertTokenStack {
                token,
                multiplier,
                fixed_value,
                values_by_goal,
            } => {
                let count = if let Some(multiplier) = multiplier {
                    multiplier.saturating_mul(
                        goal.map(|g| g.alert_base).unwrap_or(DEFAULT_ALERT_BASE),
                    )
                } else if let Some(fixed) = fixed_value {
                    *fixed
                } else {
                    values_by_goal
                        .as_ref()
                        .zip(goal)
                        .and_then(|(values, goal)| values.get(&goal.id).copied())
                        .unwrap_or(0)
                };
                Some(AlertTokenStack {
                    token: token.clone(),
                    count,
                    source: rule.source,
                    source_name: rule.source_name.clone(),
                })
            }
            _ => None,
        })
        .collect();

    ResourceDetails {
        totals,
        alert_stacks,
        notices,
        special_rules: special_rules(rules, SpecialRuleCategory::Resources, priority),
    }
}

/// Fold every modification of `kind` onto `baseline`.
///
/// Within one source kind the first-listed `set` (or `disable`) holds; later
/// ones of the same method are skipped. Modifications wiped out by a later
/// `set` or `disable` from another source are reported when they disagree
/// with it, as are skipped rules and adds ignored while the resource is
/// disabled.
fn apply_modifications(
    kind: ResourceKind,
    ordered: &[&Rule],
    baseline: i32,
    notices: &mut Vec<Notice>,
) -> ResourceTotal {
    let mut value = baseline;
    let mut disabled = false;
    let mut contributors: Vec<&Rule> = Vec::new();
    let mut anchor: Option<(&Rule, ResourceMethod)> = None;

    for rule in ordered.iter().copied() {
        let RuleEffect::ModifyResource {
            resource,
            method,
            value: amount,
        } = rule.effect
        else {
            continue;
        };
        if resource != kind {
            continue;
        }

        match method {
            ResourceMethod::Set | ResourceMethod::Disable => {
                let label = rule.label();
                if let Some((held, held_method)) = anchor {
                    if held.source == rule.source && held_method == method {
                        if held.label() != label {
                            notices.push(Notice::overruled(
                                rule,
                                RuleKind::ModifyResource.title(),
                                &label,
                            ));
                        }
                        continue;
                    }
                }

                for earlier in contributors.drain(..) {
                    let same_source =
                        earlier.source == rule.source && earlier.source_name == rule.source_name;
                    if !same_source && earlier.label() != label {
                        notices.push(Notice::overruled(
                            earlier,
                            RuleKind::ModifyResource.title(),
                            &earlier.label(),
                        ));
                    }
                }
                contributors.push(rule);
                anchor = Some((rule, method));
                if method == ResourceMethod::Set {
                    value = amount;
                    disabled = false;
                } else {
                    value = 0;
                    disabled = true;
                }
            }
            ResourceMethod::Add if disabled => {
                notices.push(Notice::overruled(
                    rule,
                    RuleKind::ModifyResource.title(),
                    &rule.label(),
                ));
            }
            ResourceMethod::Add => {
                value = value.saturating_add(amount);
                contributors.push(rule);
            }
        }
    }

    debug!(resource = %kind, value, disabled, "resolved resource");
    ResourceTotal {
        kind,
        value,
        disabled,
    }
}
