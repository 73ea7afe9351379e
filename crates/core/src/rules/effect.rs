use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// How the candidates of one rule kind are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPolicy {
    /// Exactly one rule wins; disagreeing losers are reported as overruled.
    Arbitrated,
    /// Every candidate applies.
    Cumulative,
}

/// Payload of a rule, one variant per rule kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RuleEffect {
    SetJobMode {
        mode: JobMode,
    },
    SetJobContacts {
        contacts: Vec<String>,
    },
    ForbidContact {
        contact: String,
    },
    AllowContacts {
        contacts: Vec<String>,
    },
    SetAllianceMode {
        mode: AllianceMode,
    },
    SetAlliancePlacement {
        placement: String,
    },
    SetReaverPlacement {
        placement: String,
    },
    SetNavMode {
        mode: NavMode,
    },
    SetPrimeMode {
        mode: PrimeMode,
    },
    ModifyPrime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        add: Option<i32>,
    },
    SetDraftMode {
        mode: DraftMode,
    },
    SetLeaderSetup {
        mode: LeaderSetup,
    },
    SetShipPlacement {
        placement: String,
    },
    ModifyResource {
        resource: ResourceKind,
        method: ResourceMethod,
        #[serde(default)]
        value: i32,
    },
    CreateAlertTokenStack {
        token: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fixed_value: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values_by_goal: Option<BTreeMap<String, u32>>,
    },
    AddSpecialRule {
        category: SpecialRuleCategory,
        title: String,
        #[serde(default)]
        content: Vec<String>,
    },
    AddFlag {
        flag: String,
    },
    AddBoardComponent {
        component: String,
    },
    SetPlayerBadges {
        badges: Vec<String>,
    },
}

impl RuleEffect {
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleEffect::SetJobMode { .. } => RuleKind::SetJobMode,
            RuleEffect::SetJobContacts { .. } => RuleKind::SetJobContacts,
            RuleEffect::ForbidContact { .. } => RuleKind::ForbidContact,
            RuleEffect::AllowContacts { .. } => RuleKind::AllowContacts,
            RuleEffect::SetAllianceMode { .. } => RuleKind::SetAllianceMode,
            RuleEffect::SetAlliancePlacement { .. } => RuleKind::SetAlliancePlacement,
            RuleEffect::SetReaverPlacement { .. } => RuleKind::SetReaverPlacement,
            RuleEffect::SetNavMode { .. } => RuleKind::SetNavMode,
            RuleEffect::SetPrimeMode { .. } => RuleKind::SetPrimeMode,
            RuleEffect::ModifyPrime { .. } => RuleKind::ModifyPrime,
            RuleEffect::SetDraftMode { .. } => RuleKind::SetDraftMode,
            RuleEffect::SetLeaderSetup { .. } => RuleKind::SetLeaderSetup,
            RuleEffect::SetShipPlacement { .. } => RuleKind::SetShipPlacement,
            RuleEffect::ModifyResource { .. } => RuleKind::ModifyResource,
            RuleEffect::CreateAlertTokenStack { .. } => RuleKind::CreateAlertTokenStack,
            RuleEffect::AddSpecialRule { .. } => RuleKind::AddSpecialRule,
            RuleEffect::AddFlag { .. } => RuleKind::AddFlag,
            RuleEffect::AddBoardComponent { .. } => RuleKind::AddBoardComponent,
            RuleEffect::SetPlayerBadges { .. } => RuleKind::SetPlayerBadges,
        }
    }

    /// Text describing the effect. Arbitration treats equal labels as agreement.
    pub fn label(&self) -> String {
        match self {
            RuleEffect::SetJobMode { mode } => mode.as_str().to_string(),
            RuleEffect::SetJobContacts { contacts } => join_or_none(contacts),
            RuleEffect::ForbidContact { contact } => format!("no jobs from {contact}"),
            RuleEffect::AllowContacts { contacts } => join_or_none(contacts),
            RuleEffect::SetAllianceMode { mode } => mode.as_str().to_string(),
            RuleEffect::SetAlliancePlacement { placement }
            | RuleEffect::SetReaverPlacement { placement }
            | RuleEffect::SetShipPlacement { placement } => placement.clone(),
            RuleEffect::SetNavMode { mode } => mode.as_str().to_string(),
            RuleEffect::SetPrimeMode { mode } => mode.as_str().to_string(),
            RuleEffect::ModifyPrime { multiplier, add } => {
                let mut parts = Vec::new();
                if let Some(multiplier) = multiplier {
                    parts.push(format!("x{multiplier}"));
                }
                if let Some(add) = add {
                    parts.push(format!("{add:+}"));
                }
                if parts.is_empty() {
                    "unchanged".to_string()
                } else {
                    parts.join(" ")
                }
            }
            RuleEffect::SetDraftMode { mode } => mode.as_str().to_string(),
            RuleEffect::SetLeaderSetup { mode } => mode.as_str().to_string(),
            RuleEffect::ModifyResource {
                resource,
                method,
                value,
            } => match method {
                ResourceMethod::Set => format!("{resource}: {value}"),
                ResourceMethod::Add => format!("{resource}: {value:+}"),
                ResourceMethod::Disable => format!("{resource}: disabled"),
            },
            RuleEffect::CreateAlertTokenStack { token, .. } => token.clone(),
            RuleEffect::AddSpecialRule { title, .. } => title.clone(),
            RuleEffect::AddFlag { flag } => flag.clone(),
            RuleEffect::AddBoardComponent { component } => component.clone(),
            RuleEffect::SetPlayerBadges { badges } => join_or_none(badges),
        }
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// Discriminant of [`RuleEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    SetJobMode,
    SetJobContacts,
    ForbidContact,
    AllowContacts,
    SetAllianceMode,
    SetAlliancePlacement,
    SetReaverPlacement,
    SetNavMode,
    SetPrimeMode,
    ModifyPrime,
    SetDraftMode,
    SetLeaderSetup,
    SetShipPlacement,
    ModifyResource,
    CreateAlertTokenStack,
    AddSpecialRule,
    AddFlag,
    AddBoardComponent,
    SetPlayerBadges,
}

impl RuleKind {
    /// Per-kind aggregation policy. Contacts, modifiers and injected content
    /// accumulate; modes and placements compete.
    pub fn policy(self) -> AggregationPolicy {
        match self {
            RuleKind::ForbidContact
            | RuleKind::AllowContacts
            | RuleKind::ModifyPrime
            | RuleKind::ModifyResource
            | RuleKind::CreateAlertTokenStack
            | RuleKind::AddSpecialRule
            | RuleKind::AddFlag
            | RuleKind::AddBoardComponent => AggregationPolicy::Cumulative,
            RuleKind::SetJobMode
            | RuleKind::SetJobContacts
            | RuleKind::SetAllianceMode
            | RuleKind::SetAlliancePlacement
            | RuleKind::SetReaverPlacement
            | RuleKind::SetNavMode
            | RuleKind::SetPrimeMode
            | RuleKind::SetDraftMode
            | RuleKind::SetLeaderSetup
            | RuleKind::SetShipPlacement
            | RuleKind::SetPlayerBadges => AggregationPolicy::Arbitrated,
        }
    }

    /// Title used on notices about rules of this kind.
    pub fn title(self) -> &'static str {
        match self {
            RuleKind::SetJobMode => "Job Setup",
            RuleKind::SetJobContacts => "Job Contacts",
            RuleKind::ForbidContact => "Forbidden Contact",
            RuleKind::AllowContacts => "Extra Contacts",
            RuleKind::SetAllianceMode => "Alliance Mode",
            RuleKind::SetAlliancePlacement => "Alliance Placement",
            RuleKind::SetReaverPlacement => "Reaver Placement",
            RuleKind::SetNavMode => "Navigation Decks",
            RuleKind::SetPrimeMode => "Priming",
            RuleKind::ModifyPrime => "Priming Modifier",
            RuleKind::SetDraftMode => "Draft",
            RuleKind::SetLeaderSetup => "Leader Setup",
            RuleKind::SetShipPlacement => "Starting Location",
            RuleKind::ModifyResource => "Starting Resources",
            RuleKind::CreateAlertTokenStack => "Alert Tokens",
            RuleKind::AddSpecialRule => "Special Rule",
            RuleKind::AddFlag => "Flag",
            RuleKind::AddBoardComponent => "Board Component",
            RuleKind::SetPlayerBadges => "Player Badges",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobMode {
    #[default]
    Standard,
    NoJobs,
    CaperStart,
    AwfulJobs,
    RimJobs,
}

impl JobMode {
    pub fn as_str(self) -> &'static str {
        match self {
            JobMode::Standard => "standard",
            JobMode::NoJobs => "no_jobs",
            JobMode::CaperStart => "caper_start",
            JobMode::AwfulJobs => "awful_jobs",
            JobMode::RimJobs => "rim_jobs",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceMode {
    #[default]
    Standard,
    NoAlerts,
    ExtraCruisers,
    AwfulCrowded,
}

impl AllianceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AllianceMode::Standard => "standard",
            AllianceMode::NoAlerts => "no_alerts",
            AllianceMode::ExtraCruisers => "extra_cruisers",
            AllianceMode::AwfulCrowded => "awful_crowded",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavMode {
    #[default]
    Standard,
    Browncoat,
    Rim,
    BrowncoatRim,
    FlyingSolo,
    ClearerSkies,
    ClearerSkiesRim,
}

impl NavMode {
    pub fn as_str(self) -> &'static str {
        match self {
            NavMode::Standard => "standard",
            NavMode::Browncoat => "browncoat",
            NavMode::Rim => "rim",
            NavMode::BrowncoatRim => "browncoat_rim",
            NavMode::FlyingSolo => "flying_solo",
            NavMode::ClearerSkies => "clearer_skies",
            NavMode::ClearerSkiesRim => "clearer_skies_rim",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimeMode {
    #[default]
    Standard,
    Blitz,
}

impl PrimeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimeMode::Standard => "standard",
            PrimeMode::Blitz => "blitz",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftMode {
    #[default]
    Standard,
    Browncoat,
    Snake,
}

impl DraftMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftMode::Standard => "standard",
            DraftMode::Browncoat => "browncoat",
            DraftMode::Snake => "snake",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderSetup {
    #[default]
    Standard,
    Wanted,
    Disgruntled,
}

impl LeaderSetup {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaderSetup::Standard => "standard",
            LeaderSetup::Wanted => "wanted",
            LeaderSetup::Disgruntled => "disgruntled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Credits,
    Fuel,
    Parts,
    Warrants,
    GoalTokens,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Credits,
        ResourceKind::Fuel,
        ResourceKind::Parts,
        ResourceKind::Warrants,
        ResourceKind::GoalTokens,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Credits => "credits",
            ResourceKind::Fuel => "fuel",
            ResourceKind::Parts => "parts",
            ResourceKind::Warrants => "warrants",
            ResourceKind::GoalTokens => "goal tokens",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceMethod {
    Set,
    Add,
    Disable,
}

/// Where injected rule text is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRuleCategory {
    Setup,
    Jobs,
    Nav,
    Alliance,
    Resources,
    Prime,
    DraftPanel,
    DraftShips,
    DraftPlacement,
}
