//! Rendering strategies
//!
//! A [`RenderChain`] tries its renderers in order. The first one that
//! produces an image wins; if all of them fail, the last failure is
//! returned.

use async_trait::async_trait;
use futures::future::join_all;
use image::{DynamicImage, Rgba};
use std::sync::Arc;
use tracing::{debug, warn};

use super::canvas::Canvas;
use super::composition::{CardNode, Composition, Node, Rect};
use super::font::FontSet;
use super::palette::{parse_hex_color, type_rgba};
use crate::catalog::CatalogTransport;
use crate::error::RenderError;
use crate::store::CardStyle;

/// Lowest accepted raster scale
pub const MIN_SCALE: u32 = 2;

const WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const HEADER_BAND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0x33]);
const FOOTER_BAND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0x1a]);
const SILHOUETTE: Rgba<u8> = Rgba([0x94, 0xa3, 0xb8, 0x66]);
const ID_TEXT: Rgba<u8> = Rgba([0x6b, 0x72, 0x80, 0xff]);

/// Encoded PNG with its physical size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl PngImage {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decode back to raw RGBA pixels
    pub fn to_rgba(&self) -> Result<image::RgbaImage, RenderError> {
        Ok(image::load_from_memory(&self.bytes)?.to_rgba8())
    }
}

/// Shared inputs of every renderer in a chain
pub struct RenderContext<'a> {
    pub scale: u32,
    pub fonts: &'a FontSet,
}

/// One way of turning a composition into a PNG
#[async_trait]
pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn render(
        &self,
        composition: &Composition,
        context: &RenderContext<'_>,
    ) -> Result<PngImage, RenderError>;
}

pub struct RenderChain {
    renderers: Vec<Box<dyn Renderer>>,
    scale: u32,
    fonts: FontSet,
}

impl RenderChain {
    /// Empty chain drawing text with the built-in font; `scale` is raised
    /// to [`MIN_SCALE`] if lower
    pub fn new(scale: u32) -> Self {
        let fonts = FontSet::bundled().unwrap_or_else(|e| {
            warn!("{}; text will not be drawn", e);
            FontSet::empty()
        });
        Self {
            renderers: Vec::new(),
            scale: scale.max(MIN_SCALE),
            fonts,
        }
    }

    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = fonts;
        self
    }

    /// Sprite renderer backed by `transport`, then the flat fallback
    pub fn standard(transport: Arc<dyn CatalogTransport>, scale: u32) -> Self {
        Self::new(scale)
            .with(SpriteRenderer::new(transport))
            .with(FlatRenderer)
    }

    pub fn with(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn renderer_names(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    pub async fn render(&self, composition: &Composition) -> Result<PngImage, RenderError> {
        let mut last_error = RenderError::NoStrategies;
        let context = RenderContext {
            scale: self.scale,
            fonts: &self.fonts,
        };

        for renderer in &self.renderers {
            match renderer.render(composition, &context).await {
                Ok(image) => {
                    debug!(
                        "Rendered {}x{} with {}",
                        image.width(),
                        image.height(),
                        renderer.name()
                    );
                    return Ok(image);
                }
                Err(e) => {
                    warn!("Renderer {} failed: {}", renderer.name(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

/// Draw the whole composition; `sprites[i]` (when present) goes into the
/// image box of the i-th card, other cards get a silhouette
fn paint(
    composition: &Composition,
    context: &RenderContext<'_>,
    gradient: bool,
    sprites: &[Option<DynamicImage>],
) -> Result<PngImage, RenderError> {
    let (width, height) = composition.measure();
    let mut canvas = Canvas::new(width, height, context.scale)?;
    let fonts = context.fonts;

    let palette = composition.palette;
    if gradient {
        canvas.fill_gradient(palette.primary_rgba(), palette.secondary_rgba());
    } else {
        canvas.fill(palette.primary_rgba());
    }

    let colors = CardColors {
        fill: parse_hex_color(&composition.background_color).unwrap_or(WHITE),
        text: parse_hex_color(&composition.text_color).unwrap_or(ID_TEXT),
    };
    let mut card_index = 0;
    for node in composition.visual_nodes() {
        match node {
            Node::Header {
                title,
                subtitle,
                rect,
            } => {
                canvas.fill_rect(*rect, HEADER_BAND);
                let title_box = Rect {
                    height: 48,
                    ..*rect
                };
                let subtitle_box = Rect {
                    y: rect.y + 48,
                    height: rect.height - 56,
                    ..*rect
                };
                canvas.draw_text_centered(fonts, fonts.pick(title), inset(title_box, 8), 26.0, WHITE);
                canvas.draw_text_centered(fonts, fonts.pick(subtitle), subtitle_box, 15.0, WHITE);
            }
            Node::Card(card) => {
                let sprite = sprites.get(card_index).and_then(Option::as_ref);
                paint_card(&mut canvas, fonts, card, composition.card_style, sprite, colors);
                card_index += 1;
            }
            Node::Footer { text, rect } => {
                canvas.fill_rect(*rect, FOOTER_BAND);
                canvas.draw_text_centered(fonts, fonts.pick(text), *rect, 12.0, WHITE);
            }
            Node::Style { .. } => {}
        }
    }

    let bytes = canvas.encode_png()?;
    Ok(PngImage::new(bytes, canvas.width(), canvas.height()))
}

#[derive(Clone, Copy)]
struct CardColors {
    fill: Rgba<u8>,
    text: Rgba<u8>,
}

const BADGE_TEXT_SIZE: f32 = 10.0;
const BADGE_HEIGHT: u32 = 16;
const BADGE_GAP: u32 = 6;

fn paint_card(
    canvas: &mut Canvas,
    fonts: &FontSet,
    card: &CardNode,
    style: CardStyle,
    sprite: Option<&DynamicImage>,
    colors: CardColors,
) {
    let rect = card.rect;
    match style {
        CardStyle::Modern => canvas.fill_rect(rect, with_alpha(colors.fill, 0xf2)),
        CardStyle::Classic => {
            canvas.fill_rect(rect, colors.text);
            canvas.fill_rect(inset(rect, 2), colors.fill);
        }
        CardStyle::Minimal => canvas.fill_rect(rect, with_alpha(colors.fill, 0x99)),
    }

    let image_box = Rect {
        x: rect.x + 16,
        y: rect.y + 12,
        width: rect.width - 32,
        height: 92,
    };
    match sprite {
        Some(sprite) => canvas.draw_sprite(sprite, image_box),
        None => canvas.fill_rect(inset(image_box, 16), SILHOUETTE),
    }

    let text_box = |y: u32, height: u32| Rect {
        x: rect.x + 6,
        y,
        width: rect.width - 12,
        height,
    };
    let mut y = image_box.bottom() + 2;
    if card.show_ids {
        canvas.draw_text_centered(fonts, &card.label, text_box(y, 14), 11.0, ID_TEXT);
        y += 14;
    }
    canvas.draw_text_centered(fonts, fonts.pick(&card.name), text_box(y, 22), 16.0, colors.text);
    y += 24;

    if card.show_types && !card.type_labels.is_empty() {
        let labels: Vec<&str> = card.type_labels.iter().map(|c| fonts.pick(c)).collect();
        let widths: Vec<u32> = labels
            .iter()
            .map(|label| fonts.text_width(label, BADGE_TEXT_SIZE).ceil() as u32 + 12)
            .collect();
        let total = widths.iter().sum::<u32>() + BADGE_GAP * (widths.len() as u32 - 1);

        let mut x = rect.x + rect.width.saturating_sub(total) / 2;
        for ((kind, label), width) in card.types.iter().zip(&labels).zip(&widths) {
            let badge = Rect {
                x,
                y,
                width: *width,
                height: BADGE_HEIGHT,
            };
            canvas.fill_rect(badge, type_rgba(kind));
            canvas.draw_text_centered(fonts, label, badge, BADGE_TEXT_SIZE, WHITE);
            x += width + BADGE_GAP;
        }
    }
}

fn with_alpha(color: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], alpha])
}

fn inset(rect: Rect, by: u32) -> Rect {
    Rect {
        x: rect.x + by,
        y: rect.y + by,
        width: rect.width.saturating_sub(2 * by),
        height: rect.height.saturating_sub(2 * by),
    }
}

/// Gradient background with card sprites fetched through the transport.
///
/// Cards whose sprite cannot be loaded get a silhouette. The renderer only
/// fails outright when the team is non-empty and no sprite loads at all.
pub struct SpriteRenderer {
    transport: Arc<dyn CatalogTransport>,
}

impl SpriteRenderer {
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport }
    }

    async fn load_sprite(&self, url: &str) -> Result<DynamicImage, RenderError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RenderError::Sprite {
                url: url.to_string(),
                reason: "not a remote image".to_string(),
            });
        }

        let bytes = self
            .transport
            .get_bytes(url)
            .await
            .map_err(|e| RenderError::Sprite {
                url: url.to_string(),
                reason: e.cause.to_string(),
            })?;

        image::load_from_memory(&bytes).map_err(|e| RenderError::Sprite {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Renderer for SpriteRenderer {
    fn name(&self) -> &'static str {
        "sprite"
    }

    async fn render(
        &self,
        composition: &Composition,
        context: &RenderContext<'_>,
    ) -> Result<PngImage, RenderError> {
        let urls: Vec<&str> = composition.cards().map(|c| c.image_url.as_str()).collect();
        let results = join_all(urls.iter().map(|url| self.load_sprite(url))).await;

        let mut sprites = Vec::with_capacity(results.len());
        let mut last_error = None;
        for result in results {
            match result {
                Ok(sprite) => sprites.push(Some(sprite)),
                Err(e) => {
                    debug!("{}", e);
                    last_error = Some(e);
                    sprites.push(None);
                }
            }
        }

        if !sprites.is_empty() && sprites.iter().all(Option::is_none) {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        paint(composition, context, true, &sprites)
    }
}

/// Solid palette background and silhouettes; needs no network
pub struct FlatRenderer;

#[async_trait]
impl Renderer for FlatRenderer {
    fn name(&self) -> &'static str {
        "flat"
    }

    async fn render(
        &self,
        composition: &Composition,
        context: &RenderContext<'_>,
    ) -> Result<PngImage, RenderError> {
        paint(composition, context, false, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::error::FetchError;
    use crate::share::composition::DisplayOptions;
    use crate::store::{SelectionStore, ThemeSettings};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a 4x4 red PNG for URLs containing "ok", 404 otherwise
    struct SpriteHost {
        calls: AtomicUsize,
    }

    fn red_png() -> Vec<u8> {
        let mut canvas = Canvas::new(2, 2, 2).unwrap();
        canvas.fill(Rgba([255, 0, 0, 255]));
        canvas.encode_png().unwrap()
    }

    #[async_trait]
    impl CatalogTransport for SpriteHost {
        async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
            Err(FetchError::status(url, 404))
        }

        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("ok") {
                Ok(red_png())
            } else {
                Err(FetchError::status(url, 404))
            }
        }

        fn name(&self) -> &'static str {
            "sprites"
        }
    }

    fn composition(urls: &[&str]) -> Composition {
        let mut store = SelectionStore::new();
        for (i, url) in urls.iter().enumerate() {
            store.add(CatalogItem::new(i as u32 + 1, "mon", ["fire", "flying"], url));
        }
        Composition::from_selection(store.selection(), &ThemeSettings::default(), DisplayOptions::default())
    }

    struct Failing;

    #[async_trait]
    impl Renderer for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn render(&self, _: &Composition, _: &RenderContext<'_>) -> Result<PngImage, RenderError> {
            Err(RenderError::Sprite {
                url: "x".to_string(),
                reason: "boom".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_flat_renderer_scales_measured_size() {
        let composition = composition(&["a.png", "b.png"]);
        let (width, height) = composition.measure();

        let image = RenderChain::new(2).with(FlatRenderer).render(&composition).await.unwrap();
        assert_eq!((image.width(), image.height()), (width * 2, height * 2));
        assert_eq!(&image.bytes()[..4], b"\x89PNG");

        let decoded = image.to_rgba().unwrap();
        assert_eq!(decoded.dimensions(), (width * 2, height * 2));
    }

    #[tokio::test]
    async fn test_scale_below_minimum_is_raised() {
        assert_eq!(RenderChain::new(1).scale(), MIN_SCALE);
        assert_eq!(RenderChain::new(3).scale(), 3);
    }

    #[tokio::test]
    async fn test_chain_falls_through_to_next() {
        let chain = RenderChain::new(2).with(Failing).with(FlatRenderer);
        assert_eq!(chain.renderer_names(), vec!["failing", "flat"]);
        assert!(chain.render(&composition(&["a.png"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_chain_surfaces_last_error() {
        let empty = RenderChain::new(2);
        assert!(matches!(
            empty.render(&composition(&[])).await,
            Err(RenderError::NoStrategies)
        ));

        let chain = RenderChain::new(2).with(Failing);
        assert!(matches!(
            chain.render(&composition(&[])).await,
            Err(RenderError::Sprite { .. })
        ));
    }

    #[tokio::test]
    async fn test_sprite_renderer_tolerates_partial_failure() {
        let host = Arc::new(SpriteHost {
            calls: AtomicUsize::new(0),
        });
        let renderer = SpriteRenderer::new(host.clone());
        let fonts = FontSet::bundled().unwrap();
        let context = RenderContext {
            scale: 2,
            fonts: &fonts,
        };

        let mixed = composition(&["https://img.test/ok.png", "https://img.test/missing.png"]);
        assert!(renderer.render(&mixed, &context).await.is_ok());
        assert_eq!(host.calls.load(Ordering::SeqCst), 2);

        let none = composition(&["https://img.test/missing.png", "/placeholder-pokemon.png"]);
        assert!(matches!(
            renderer.render(&none, &context).await,
            Err(RenderError::Sprite { .. })
        ));
    }

    #[tokio::test]
    async fn test_standard_chain_falls_back_to_flat() {
        let host = Arc::new(SpriteHost {
            calls: AtomicUsize::new(0),
        });
        let chain = RenderChain::standard(host, 2);
        let composition = composition(&["https://img.test/missing.png"]);
        let image = chain.render(&composition).await.unwrap();

        // Flat background is the solid primary color
        let pixel = *image.to_rgba().unwrap().get_pixel(0, 0);
        assert_eq!(pixel, composition.palette.primary_rgba());
    }

    fn single(item: CatalogItem, theme: &ThemeSettings) -> Composition {
        let mut store = SelectionStore::new();
        store.add(item);
        Composition::from_selection(store.selection(), theme, DisplayOptions::default())
    }

    #[tokio::test]
    async fn test_names_change_the_image() {
        let chain = RenderChain::new(2).with(FlatRenderer);
        let theme = ThemeSettings::default();

        let pikachu = single(CatalogItem::new(25, "pikachu", ["electric"], "p.png"), &theme);
        let raichu = single(
            CatalogItem::new(25, "raichu", ["electric"], "p.png").with_japanese_name("ライチュウ"),
            &theme,
        );

        let a = chain.render(&pikachu).await.unwrap();
        let b = chain.render(&raichu).await.unwrap();
        assert_eq!((a.width(), a.height()), (b.width(), b.height()));
        assert_ne!(a.to_rgba().unwrap(), b.to_rgba().unwrap());
    }

    #[tokio::test]
    async fn test_background_color_fills_cards() {
        let chain = RenderChain::new(2).with(FlatRenderer);
        let item = CatalogItem::new(4, "charmander", ["fire"], "c.png");
        let red = ThemeSettings {
            background_color: "#ff0000".to_string(),
            ..Default::default()
        };

        let default = single(item.clone(), &ThemeSettings::default());
        let tinted = single(item, &red);
        let card = tinted.cards().next().unwrap().rect;
        let (x, y) = ((card.x + 4) * 2, (card.y + 4) * 2);

        let plain = *chain.render(&default).await.unwrap().to_rgba().unwrap().get_pixel(x, y);
        let filled = *chain.render(&tinted).await.unwrap().to_rgba().unwrap().get_pixel(x, y);
        assert_ne!(plain, filled);
        assert!(filled[0] > 240 && filled[1] < 20, "{filled:?}");
    }
}
