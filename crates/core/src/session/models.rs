use std::{collections::BTreeSet, fmt, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    #[default]
    Original,
    Tenth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Solo,
    Coop,
    #[default]
    Pvp,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameMode::Solo => "solo",
            GameMode::Coop => "co-op",
            GameMode::Pvp => "competitive",
        })
    }
}

/// Read-only snapshot of the user's selections, supplied by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub edition: Edition,
    pub mode: GameMode,
    pub expansions: BTreeSet<String>,
    pub flags: BTreeSet<String>,
    pub show_hidden_content: bool,
    pub story_card_id: Option<String>,
    pub goal_id: Option<String>,
    pub setup_card_id: Option<String>,
    /// Second setup card, used when the primary card is combinable.
    pub secondary_setup_card_id: Option<String>,
    pub challenges: BTreeSet<String>,
    pub optional_rules: BTreeSet<String>,
}

impl GameState {
    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read game state {}", path.display()))?;
        let state = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse game state {}", path.display()))?;
        Ok(state)
    }

    pub fn has_expansion(&self, id: &str) -> bool {
        self.expansions.contains(id)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn with_expansion(mut self, id: impl Into<String>) -> Self {
        self.expansions.insert(id.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    pub fn with_story(mut self, id: impl Into<String>) -> Self {
        self.story_card_id = Some(id.into());
        self
    }

    pub fn with_setup_card(mut self, id: impl Into<String>) -> Self {
        self.setup_card_id = Some(id.into());
        self
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_snapshot_with_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{
                "expansions": ["tenth", "blue_sun"],
                "setupCardId": "flying_solo",
                "mode": "solo"
            }"#,
        )?;

        let state = GameState::load(&path)?;
        assert!(state.has_expansion("tenth"));
        assert_eq!(state.setup_card_id.as_deref(), Some("flying_solo"));
        assert_eq!(state.mode, GameMode::Solo);
        assert_eq!(state.edition, Edition::Original);
        assert!(state.flags.is_empty());
        assert!(!state.show_hidden_content);
        Ok(())
    }

    #[test]
    fn missing_snapshot_reports_path() {
        let err = GameState::load("/nonexistent/state.json").expect_err("load should fail");
        assert!(err.to_string().contains("/nonexistent/state.json"));
    }
}
