//! Simplified catalog entries

use serde::{Deserialize, Serialize};

use super::api::{PokemonResponse, Sprites};

/// Image used when the API provides no sprite at all
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-pokemon.png";

/// Highest generation number a catalog id can map to
pub const MAX_GENERATION: u8 = 9;

/// Upper id bound (inclusive) of each generation, in order
const GENERATION_BANDS: [(u32, u8); 8] = [
    (151, 1),
    (251, 2),
    (386, 3),
    (493, 4),
    (649, 5),
    (721, 6),
    (809, 7),
    (905, 8),
];

/// Generation of a catalog id, from fixed id bands.
///
/// This avoids a species request per entry. The species endpoint carries the
/// authoritative generation and the two can disagree if the upstream catalog
/// ever renumbers entries near a band edge; the band table is kept as-is.
pub fn generation_for_id(id: u32) -> u8 {
    GENERATION_BANDS
        .iter()
        .find(|(upper, _)| id <= *upper)
        .map(|(_, generation)| *generation)
        .unwrap_or(MAX_GENERATION)
}

/// Pick the best available image: official artwork, then home, then the
/// default sprite, then the local placeholder.
pub fn best_image_url(sprites: &Sprites) -> String {
    let non_empty = |url: &Option<String>| url.as_deref().filter(|u| !u.is_empty()).map(str::to_string);

    sprites
        .other
        .official_artwork
        .as_ref()
        .and_then(|s| non_empty(&s.front_default))
        .or_else(|| {
            sprites
                .other
                .home
                .as_ref()
                .and_then(|s| non_empty(&s.front_default))
        })
        .or_else(|| non_empty(&sprites.front_default))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

/// One creature as the rest of the crate sees it. Immutable once built.
///
/// Deserializing goes through [`CatalogItem::new`], so stored items are
/// normalized the same way fresh ones are and `generation` is recomputed
/// from the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredItem")]
pub struct CatalogItem {
    id: u32,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    japanese_name: Option<String>,
    types: Vec<String>,
    image_url: String,
    generation: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    id: u32,
    name: String,
    #[serde(default)]
    japanese_name: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    image_url: String,
}

impl From<StoredItem> for CatalogItem {
    fn from(stored: StoredItem) -> Self {
        let item = Self::new(stored.id, &stored.name, stored.types, &stored.image_url);
        match stored.japanese_name {
            Some(name) => item.with_japanese_name(name),
            None => item,
        }
    }
}

impl CatalogItem {
    /// Build an item, normalizing the name to lowercase, dropping repeated
    /// types and substituting the placeholder for an empty image URL.
    pub fn new<I, S>(id: u32, name: &str, types: I, image_url: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique_types: Vec<String> = Vec::new();
        for t in types {
            let t = t.into().to_lowercase();
            if !t.is_empty() && !unique_types.contains(&t) {
                unique_types.push(t);
            }
        }

        let image_url = if image_url.is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            image_url.to_string()
        };

        Self {
            id,
            name: name.to_lowercase(),
            japanese_name: None,
            types: unique_types,
            image_url,
            generation: generation_for_id(id),
        }
    }

    /// Simplify a detail response. Types keep their declared slot order.
    pub fn from_response(response: &PokemonResponse) -> Self {
        let mut slots: Vec<_> = response.types.iter().collect();
        slots.sort_by_key(|t| t.slot);

        Self::new(
            response.id,
            &response.name,
            slots.into_iter().map(|t| t.kind.name.clone()),
            &best_image_url(&response.sprites),
        )
    }

    pub fn with_japanese_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.japanese_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn japanese_name(&self) -> Option<&str> {
        self.japanese_name.as_deref()
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(kind))
    }

    /// `#025` style id
    pub fn formatted_id(&self) -> String {
        format!("#{:03}", self.id)
    }

    /// Localized name when known, otherwise [`latin_name`](Self::latin_name)
    pub fn display_name(&self) -> String {
        match &self.japanese_name {
            Some(name) => name.clone(),
            None => self.latin_name(),
        }
    }

    /// Capitalized canonical name
    pub fn latin_name(&self) -> String {
        capitalize(&self.name)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
