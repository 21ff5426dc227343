//! Share and export
//!
//! ```text
//! SelectionStore ──► Composition ──► RenderChain ──► PngImage
//!                                     (sprite, flat)     │
//!                                        FontSet         ├─► file
//!                                                        ├─► ClipboardSink
//!                                                        └─► ShareSheet
//! selected names ──► compose_share_text ──► build_social_intent_url ──► UrlOpener
//! ```

pub mod canvas;
pub mod capabilities;
pub mod composition;
pub mod export;
pub mod font;
pub mod intent;
pub mod palette;
pub mod render;
pub mod text;

#[cfg(feature = "clipboard")]
pub use capabilities::SystemClipboard;
pub use capabilities::{ClipboardSink, ShareSheet, SystemOpener, UrlOpener};
pub use composition::{Caption, CardNode, Composition, DisplayOptions, Layout, Node, Rect};
pub use export::{save_png, ExportPipeline, ExportStatus, IntentOutcome};
pub use font::FontSet;
pub use intent::{build_social_intent_url, IntentGuard, SocialPlatform};
pub use palette::{
    default_palette, palette_by_name, palettes, type_color, Palette, DEFAULT_PALETTE, PALETTES,
};
pub use render::{
    FlatRenderer, PngImage, RenderChain, RenderContext, Renderer, SpriteRenderer, MIN_SCALE,
};
pub use text::compose_share_text;
