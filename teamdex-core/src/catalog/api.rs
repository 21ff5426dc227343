//! Catalog API response shapes
//!
//! Only the fields the loader reads are modelled; everything else in the
//! upstream payloads is ignored.

use serde::{Deserialize, Serialize};

/// `GET /pokemon?limit=N`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonListResponse {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// A `{name, url}` reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// `GET /pokemon/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonResponse {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub species: Option<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default)]
    pub home: Option<SpriteSet>,
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<SpriteSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteSet {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonSpeciesResponse {
    pub id: u32,
    #[serde(default)]
    pub names: Vec<LocalizedName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}

impl PokemonSpeciesResponse {
    /// Name for the given language code, if the species lists one
    pub fn name_for(&self, language: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.language.name == language)
            .map(|n| n.name.as_str())
    }
}
