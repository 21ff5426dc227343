//! Fonts for exported images
//!
//! A [`FontSet`] is an ordered list of fonts. Each character is drawn with
//! the first font that has a glyph for it. The built-in font (DejaVu Sans)
//! is always last; it covers Latin, Greek and Cyrillic but no CJK, so
//! Japanese text needs a configured or system font.

use fontdue::{Font, FontSettings, Metrics};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::composition::Caption;
use crate::error::RenderError;

const BUNDLED_FONT: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");

/// CJK-capable system fonts, tried in order; the first one that loads is used
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\YuGothM.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

pub struct FontSet {
    fonts: Vec<Font>,
}

impl FontSet {
    /// No fonts; text is measured but never drawn
    pub fn empty() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Only the built-in font
    pub fn bundled() -> Result<Self, RenderError> {
        Ok(Self {
            fonts: vec![parse("built-in", BUNDLED_FONT)?],
        })
    }

    /// `extra` fonts, then the first system CJK font found, then the
    /// built-in font. An `extra` font that cannot be read is an error.
    pub fn load(extra: &[PathBuf]) -> Result<Self, RenderError> {
        let mut fonts = Vec::with_capacity(extra.len() + 2);
        for path in extra {
            fonts.push(read_font(path)?);
        }

        let system = SYSTEM_FONTS
            .iter()
            .map(Path::new)
            .filter(|path| path.is_file())
            .find_map(|path| match read_font(path) {
                Ok(font) => {
                    debug!("Using system font {}", path.display());
                    Some(font)
                }
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            });
        fonts.extend(system);

        fonts.push(parse("built-in", BUNDLED_FONT)?);
        Ok(Self { fonts })
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn font_for(&self, c: char) -> Option<&Font> {
        self.fonts.iter().find(|font| font.lookup_glyph_index(c) != 0)
    }

    /// Whether every non-whitespace character of `text` has a glyph
    pub fn covers(&self, text: &str) -> bool {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| self.font_for(c).is_some())
    }

    /// The caption's text when it can be drawn, otherwise its fallback
    pub fn pick<'a>(&self, caption: &'a Caption) -> &'a str {
        if self.covers(&caption.text) {
            &caption.text
        } else {
            &caption.fallback
        }
    }

    /// Horizontal advance of `text` at `px`
    pub fn text_width(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| match self.font_for(c) {
                Some(font) => font.metrics(c, px).advance_width,
                None => missing_advance(px),
            })
            .sum()
    }

    /// `(ascent, descent)` at `px`; descent is negative
    pub fn line_metrics(&self, px: f32) -> (f32, f32) {
        self.fonts
            .last()
            .and_then(|font| font.horizontal_line_metrics(px))
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((px * 0.8, -px * 0.2))
    }

    /// Coverage bitmap of `c` at `px`, if any font has it
    pub fn rasterize(&self, c: char, px: f32) -> Option<(Metrics, Vec<u8>)> {
        self.font_for(c).map(|font| font.rasterize(c, px))
    }
}

/// Advance used for characters no font can draw
pub(crate) fn missing_advance(px: f32) -> f32 {
    px * 0.5
}

fn read_font(path: &Path) -> Result<Font, RenderError> {
    let bytes = std::fs::read(path).map_err(|e| RenderError::Font {
        name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse(&path.display().to_string(), bytes)
}

fn parse<D>(name: &str, bytes: D) -> Result<Font, RenderError>
where
    D: std::ops::Deref<Target = [u8]>,
{
    Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| RenderError::Font {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
