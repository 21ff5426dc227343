//! Persisted selection snapshot
//!
//! Wire shape:
//!
//! ```json
//! {"state": {"selectedPokemon": [...], "themeSettings": {...}}, "version": 0}
//! ```
//!
//! `themeSettings` is optional on read.

use serde::{Deserialize, Serialize};

use super::types::{SelectedItem, ThemeSettings};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSelection {
    pub state: PersistedState,
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub selected_pokemon: Vec<SelectedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_settings: Option<ThemeSettings>,
}

impl PersistedSelection {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
