//! Background palettes and type badge colors

use image::Rgba;
use serde::Serialize;

/// Key of the palette used when none is chosen
pub const DEFAULT_PALETTE: &str = "default";

/// A two-stop diagonal gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub key: &'static str,
    pub label: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

impl Palette {
    /// CSS-style gradient string, e.g. `linear-gradient(135deg, #667eea 0%, #764ba2 100%)`
    pub fn background(&self) -> String {
        format!(
            "linear-gradient(135deg, {} 0%, {} 100%)",
            self.primary, self.secondary
        )
    }

    pub fn primary_rgba(&self) -> Rgba<u8> {
        parse_hex_color(self.primary).unwrap_or(FALLBACK_COLOR)
    }

    pub fn secondary_rgba(&self) -> Rgba<u8> {
        parse_hex_color(self.secondary).unwrap_or(FALLBACK_COLOR)
    }
}

const FALLBACK_COLOR: Rgba<u8> = Rgba([0x66, 0x7e, 0xea, 0xff]);

pub const PALETTES: [Palette; 6] = [
    Palette {
        key: "default",
        label: "デフォルト",
        primary: "#667eea",
        secondary: "#764ba2",
    },
    Palette {
        key: "ocean",
        label: "オーシャン",
        primary: "#a1c4fd",
        secondary: "#c2e9fb",
    },
    Palette {
        key: "sunset",
        label: "サンセット",
        primary: "#f093fb",
        secondary: "#f5576c",
    },
    Palette {
        key: "forest",
        label: "フォレスト",
        primary: "#56ab2f",
        secondary: "#a8e063",
    },
    Palette {
        key: "autumn",
        label: "オータム",
        primary: "#fa709a",
        secondary: "#fee140",
    },
    Palette {
        key: "midnight",
        label: "ミッドナイト",
        primary: "#2c3e50",
        secondary: "#3498db",
    },
];

pub fn palettes() -> &'static [Palette] {
    &PALETTES
}

/// Look a palette up by key (case-insensitive) or by its label
pub fn palette_by_name(name: &str) -> Option<&'static Palette> {
    let name = name.trim();
    PALETTES
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(name) || p.label == name)
}

pub fn default_palette() -> &'static Palette {
    &PALETTES[0]
}

const TYPE_COLORS: [(&str, &str); 20] = [
    ("normal", "#A8A878"),
    ("fighting", "#C03028"),
    ("flying", "#A890F0"),
    ("poison", "#A040A0"),
    ("ground", "#E0C068"),
    ("rock", "#B8A038"),
    ("bug", "#A8B820"),
    ("ghost", "#705898"),
    ("steel", "#B8B8D0"),
    ("fire", "#F08030"),
    ("water", "#6890F0"),
    ("grass", "#78C850"),
    ("electric", "#F8D030"),
    ("psychic", "#F85888"),
    ("ice", "#98D8D8"),
    ("dragon", "#7038F8"),
    ("dark", "#705848"),
    ("fairy", "#EE99AC"),
    ("unknown", "#68A090"),
    ("shadow", "#604E82"),
];

/// Badge color for a type; unknown types get the `normal` color
pub fn type_color(kind: &str) -> &'static str {
    TYPE_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(kind))
        .map(|(_, color)| *color)
        .unwrap_or(TYPE_COLORS[0].1)
}

pub fn type_rgba(kind: &str) -> Rgba<u8> {
    parse_hex_color(type_color(kind)).unwrap_or(FALLBACK_COLOR)
}

/// Parse `#rrggbb` or `#rgb` into an opaque color
pub fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let hex = hex.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        6 => Some(Rgba([
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
            0xff,
        ])),
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 0xff]))
        }
        _ => None,
    }
}

/// Black or white, whichever reads better on `background`
pub fn contrast_color(background: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, _] = background.0;
    let luminance = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0;
    if luminance > 0.5 {
        Rgba([0, 0, 0, 0xff])
    } else {
        Rgba([0xff, 0xff, 0xff, 0xff])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_palettes_with_unique_keys() {
        let mut keys: Vec<_> = palettes().iter().map(|p| p.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 6);
        assert_eq!(default_palette().key, DEFAULT_PALETTE);
    }

    #[test]
    fn test_background_gradient() {
        assert_eq!(
            default_palette().background(),
            "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"
        );
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(palette_by_name("Ocean").map(|p| p.primary), Some("#a1c4fd"));
        assert_eq!(palette_by_name("ミッドナイト").map(|p| p.key), Some("midnight"));
        assert!(palette_by_name("neon").is_none());
    }

    #[test]
    fn test_type_color_fallback() {
        assert_eq!(type_color("fire"), "#F08030");
        assert_eq!(type_color("Water"), "#6890F0");
        assert_eq!(type_color("stellar"), "#A8A878");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#667eea"), Some(Rgba([0x66, 0x7e, 0xea, 0xff])));
        assert_eq!(parse_hex_color("#fff"), Some(Rgba([0xff, 0xff, 0xff, 0xff])));
        assert_eq!(parse_hex_color("667eea"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_contrast_color() {
        assert_eq!(contrast_color(Rgba([0xf0, 0xf9, 0xff, 0xff])).0[0], 0);
        assert_eq!(contrast_color(Rgba([0x2c, 0x3e, 0x50, 0xff])).0[0], 0xff);
    }
}
