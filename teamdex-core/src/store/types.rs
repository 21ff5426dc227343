//! Selection and theme records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::catalog::CatalogItem;
use crate::share::palette::DEFAULT_PALETTE;

/// A catalog entry the user picked, stamped with when it was picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    #[serde(flatten)]
    item: CatalogItem,
    selected_at: DateTime<Utc>,
}

impl SelectedItem {
    pub(crate) fn new(item: CatalogItem) -> Self {
        Self {
            item,
            selected_at: Utc::now(),
        }
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub fn selected_at(&self) -> DateTime<Utc> {
        self.selected_at
    }
}

impl Deref for SelectedItem {
    type Target = CatalogItem;

    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

/// Result of [`SelectionStore::add`](super::SelectionStore::add)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The id was already in the selection; nothing changed
    AlreadySelected,
    /// The selection was full; nothing changed
    CapacityExceeded,
}

impl AddOutcome {
    pub fn is_added(self) -> bool {
        self == AddOutcome::Added
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    #[default]
    Modern,
    Classic,
    Minimal,
}

impl fmt::Display for CardStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardStyle::Modern => "modern",
            CardStyle::Classic => "classic",
            CardStyle::Minimal => "minimal",
        };
        f.write_str(s)
    }
}

impl FromStr for CardStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "modern" => Ok(CardStyle::Modern),
            "classic" => Ok(CardStyle::Classic),
            "minimal" => Ok(CardStyle::Minimal),
            other => Err(format!(
                "unknown card style '{other}' (expected modern, classic or minimal)"
            )),
        }
    }
}

/// Visual settings for the exported image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub background_color: String,
    pub text_color: String,
    pub card_style: CardStyle,
    /// Name of the active palette
    #[serde(default = "default_palette_name")]
    pub palette: String,
}

fn default_palette_name() -> String {
    DEFAULT_PALETTE.to_string()
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            background_color: "#f0f9ff".to_string(),
            text_color: "#1e293b".to_string(),
            card_style: CardStyle::Modern,
            palette: default_palette_name(),
        }
    }
}

/// Partial theme change; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeUpdate {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub card_style: Option<CardStyle>,
    pub palette: Option<String>,
}

impl ThemeUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ThemeSettings {
    pub(crate) fn merge(&mut self, update: ThemeUpdate) {
        if let Some(background_color) = update.background_color {
            self.background_color = background_color;
        }
        if let Some(text_color) = update.text_color {
            self.text_color = text_color;
        }
        if let Some(card_style) = update.card_style {
            self.card_style = card_style;
        }
        if let Some(palette) = update.palette {
            self.palette = palette;
        }
    }
}
