//! Plain-text rendering of resolved setups.

use std::fmt::Write;

use ffsetup_core::{
    compose::{ResolvedSetup, SpecialRule},
    filters::StoryAvailability,
    rules::ResourceKind,
    Catalog, CatalogMetadata, Notice,
};

pub fn setup(setup: &ResolvedSetup) -> String {
    let mut out = String::new();

    section(&mut out, "Jobs");
    line(&mut out, "mode", setup.jobs.mode.as_str());
    line(&mut out, "contacts", &list(&setup.jobs.contacts));
    if !setup.jobs.forbidden_contacts.is_empty() {
        line(&mut out, "forbidden", &list(&setup.jobs.forbidden_contacts));
    }
    notices(&mut out, &setup.jobs.notices);
    special_rules(&mut out, &setup.jobs.special_rules);

    section(&mut out, "Navigation");
    line(&mut out, "mode", setup.nav.mode.as_str());
    line(&mut out, "force reshuffle", yes_no(setup.nav.force_reshuffle));
    line(&mut out, "clearer skies", yes_no(setup.nav.clearer_skies));
    line(&mut out, "rim decks", yes_no(setup.nav.has_rim_decks));
    notices(&mut out, &setup.nav.notices);
    special_rules(&mut out, &setup.nav.special_rules);

    section(&mut out, "Alliance & Reavers");
    line(&mut out, "mode", setup.alliance.mode.as_str());
    line(&mut out, "alliance", &setup.alliance.alliance_placement);
    line(&mut out, "reavers", &setup.alliance.reaver_placement);
    for notice in setup.alliance.notices() {
        notice_line(&mut out, notice);
    }
    special_rules(&mut out, &setup.alliance.special_rules);

    section(&mut out, "Starting Resources");
    for kind in ResourceKind::ALL {
        let value = if setup.resources.is_disabled(kind) {
            "disabled".to_string()
        } else {
            setup.resources.value(kind).to_string()
        };
        line(&mut out, kind.as_str(), &value);
    }
    for stack in &setup.resources.alert_stacks {
        let _ = writeln!(
            out,
            "  {} tokens: {} ({})",
            stack.token, stack.count, stack.source_name
        );
    }
    notices(&mut out, &setup.resources.notices);
    special_rules(&mut out, &setup.resources.special_rules);

    section(&mut out, "Priming the Pump");
    line(&mut out, "mode", setup.prime.mode.as_str());
    line(&mut out, "discard", &setup.prime.discard_count.to_string());
    notices(&mut out, &setup.prime.notices);
    special_rules(&mut out, &setup.prime.special_rules);

    section(&mut out, "Draft");
    line(&mut out, "mode", setup.draft.mode.as_str());
    line(&mut out, "leaders", setup.draft.leader_setup.as_str());
    line(&mut out, "ships start at", &setup.draft.ship_placement);
    notices(&mut out, &setup.draft.notices);
    special_rules(&mut out, &setup.draft.panel_rules);
    special_rules(&mut out, &setup.draft.ship_rules);
    special_rules(&mut out, &setup.draft.placement_rules);

    section(&mut out, "Board");
    line(&mut out, "flags", &list(&setup.board.flags));
    line(&mut out, "components", &list(&setup.board.components));
    if !setup.board.player_badges.is_empty() {
        line(&mut out, "badges", &list(&setup.board.player_badges));
    }
    notices(&mut out, &setup.board.notices);
    special_rules(&mut out, &setup.board.special_rules);

    out
}

pub fn story(entry: &StoryAvailability<'_>) -> String {
    match &entry.reason {
        None => format!("  {:<36} {}", entry.story.id, entry.story.title),
        Some(reason) => format!("x {:<36} {} ({reason})", entry.story.id, entry.story.title),
    }
}

/// One-line description of a validated catalog.
pub fn catalog_summary(catalog: &Catalog, metadata: Option<&CatalogMetadata>) -> String {
    let origin = match metadata {
        Some(metadata) => format!("catalog {metadata}"),
        None => "catalog".to_string(),
    };
    format!(
        "{origin} ok: {} expansions, {} setup cards, {} story cards, {} optional rules",
        catalog.expansions.len(),
        catalog.setup_cards.len(),
        catalog.story_cards.len(),
        catalog.optional_rules.len()
    )
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "== {title} ==");
}

fn line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<16} {value}");
}

fn notices(out: &mut String, notices: &[Notice]) {
    for notice in notices {
        notice_line(out, notice);
    }
}

fn notice_line(out: &mut String, notice: &Notice) {
    let badge = notice.badge.as_deref().unwrap_or(notice.source.label());
    let _ = writeln!(out, "  [{badge}] {}: {}", notice.title, notice.body);
}

fn special_rules(out: &mut String, rules: &[SpecialRule]) {
    for rule in rules {
        let _ = writeln!(out, "  * {} ({})", rule.title, rule.source_name);
        for paragraph in &rule.content {
            let _ = writeln!(out, "      {paragraph}");
        }
    }
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffsetup_core::{GameState, Resolver};

    #[test]
    fn renders_every_section() {
        let state = GameState::default()
            .with_story("desperadoes")
            .with_setup_card("browncoat_way");
        let resolved = Resolver::default().resolve(Catalog::builtin(), &state);
        let text = setup(&resolved);

        for heading in ["Jobs", "Navigation", "Starting Resources", "Draft", "Board"] {
            assert!(text.contains(&format!("== {heading} ==")), "missing {heading}");
        }
        assert!(text.contains("credits          12000"));
    }

    #[test]
    fn catalog_summary_shows_the_manifest_version() {
        let metadata = CatalogMetadata {
            version: Some("2024.1".to_string()),
            updated_at: None,
        };
        let catalog = Catalog::default();

        assert_eq!(
            catalog_summary(&catalog, Some(&metadata)),
            "catalog 2024.1 ok: 0 expansions, 0 setup cards, 0 story cards, 0 optional rules"
        );
        assert!(catalog_summary(Catalog::builtin(), None).starts_with("catalog ok: "));
    }
}
