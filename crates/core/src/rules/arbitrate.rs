//! Single-winner resolution for rules of one kind.

use tracing::debug;

use super::{Notice, PriorityTable, Rule, RuleKind, RuleSet};

/// Outcome of arbitrating one rule kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Arbitration<'a> {
    /// Winning rule, or `None` when no candidate exists.
    pub active: Option<&'a Rule>,
    /// Notices for losers whose label disagrees with the winner, in priority order.
    pub overruled: Vec<Notice>,
}

impl<'a> Arbitration<'a> {
    /// Extract a value from the winning rule's effect.
    pub fn value<T>(&self, extract: impl FnOnce(&'a Rule) -> Option<T>) -> Option<T> {
        self.active.and_then(extract)
    }
}

/// Pick the highest-priority rule among same-kind candidates.
///
/// Candidates are stably sorted by `priority`, so rules from the same source
/// kind keep their collection order and the first listed wins. Losers whose
/// label equals the winner's are absorbed; the rest become overruled notices.
pub fn arbitrate<'a, L, T>(
    rules: &[&'a Rule],
    priority: &PriorityTable,
    label_of: L,
    title_of: T,
) -> Arbitration<'a>
where
    L: Fn(&Rule) -> String,
    T: Fn(&Rule) -> String,
{
    let mut sorted = rules.to_vec();
    sorted.sort_by_key(|rule| priority.rank(rule.source));

    let mut candidates = sorted.into_iter();
    let Some(active) = candidates.next() else {
        return Arbitration::default();
    };

    let active_label = label_of(active);
    let overruled: Vec<Notice> = candidates
        .filter_map(|rule| {
            let label = label_of(rule);
            if label == active_label {
                None
            } else {
                Some(Notice::overruled(rule, &title_of(rule), &label))
            }
        })
        .collect();

    debug!(
        winner = %active.source_name,
        source = %active.source,
        overruled = overruled.len(),
        "arbitrated {}",
        active_label
    );

    Arbitration {
        active: Some(active),
        overruled,
    }
}

/// Arbitrate every candidate of `kind`, labelled and titled by the kind itself.
pub fn arbitrate_kind<'a>(
    rules: &'a RuleSet,
    kind: RuleKind,
    priority: &PriorityTable,
) -> Arbitration<'a> {
    arbitrate(&rules.of_kind(kind), priority, Rule::label, |rule| {
        rule.kind().title().to_string()
    })
}
