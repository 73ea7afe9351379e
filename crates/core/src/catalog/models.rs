use serde::{Deserialize, Serialize};

use crate::{rules::RuleTemplate, session::Edition};

fn default_true() -> bool {
    true
}

fn default_alert_base() -> u32 {
    1
}

/// Expansion that can be toggled on for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expansion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    /// Editions the expansion can be combined with; empty means all.
    #[serde(default)]
    pub editions: Vec<Edition>,
    #[serde(default)]
    pub rules: Vec<RuleTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupCard {
    pub id: String,
    pub name: String,
    /// Combinable cards modify another setup card and outrank it.
    #[serde(default)]
    pub combinable: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub rules: Vec<RuleTemplate>,
}

/// Game modes a story card declares support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSupport {
    #[serde(default)]
    pub solo: bool,
    #[serde(default)]
    pub coop: bool,
    #[serde(default = "default_true")]
    pub pvp: bool,
}

impl Default for ModeSupport {
    fn default() -> Self {
        Self {
            solo: false,
            coop: false,
            pvp: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    /// Base count multiplied by alert-token stack multipliers.
    #[serde(default = "default_alert_base")]
    pub alert_base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub rules: Vec<RuleTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub required_expansion: Option<String>,
    #[serde(default)]
    pub additional_required_expansions: Vec<String>,
    #[serde(default)]
    pub required_flag: Option<String>,
    #[serde(default)]
    pub required_setup_card_id: Option<String>,
    #[serde(default)]
    pub incompatible_setup_card_ids: Vec<String>,
    #[serde(default)]
    pub support: ModeSupport,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub challenges: Vec<ChallengeOption>,
    #[serde(default)]
    pub rules: Vec<RuleTemplate>,
}

impl StoryCard {
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn challenge(&self, id: &str) -> Option<&ChallengeOption> {
        self.challenges.iter().find(|challenge| challenge.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RuleTemplate>,
}
