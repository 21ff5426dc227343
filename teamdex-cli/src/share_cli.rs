//! Export and sharing commands

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use teamdex_core::catalog::HttpTransport;
use teamdex_core::share::{
    compose_share_text, palette_by_name, Composition, DisplayOptions, ExportPipeline, FontSet,
    IntentOutcome, Layout, RenderChain, SocialPlatform, SystemOpener,
};
use teamdex_core::store::ThemeSettings;
use teamdex_core::{SelectionStore, TeamdexConfig};

use crate::session::Session;

pub struct ExportOptions {
    pub output: Option<PathBuf>,
    pub layout: String,
    pub hide_types: bool,
    pub hide_ids: bool,
    pub palette: Option<String>,
}

fn build_pipeline(config: &TeamdexConfig) -> Result<ExportPipeline> {
    let transport = Arc::new(HttpTransport::new(config.catalog.timeout())?);
    let fonts = FontSet::load(&config.share.fonts).context("Failed to load export fonts")?;
    let chain = RenderChain::standard(transport, config.share.scale).with_fonts(fonts);
    Ok(ExportPipeline::new(chain, config.share.clone()))
}

fn composition(store: &SelectionStore, theme: &ThemeSettings, options: DisplayOptions) -> Composition {
    Composition::from_selection(store.selection(), theme, options)
}

pub async fn execute_export(config: &TeamdexConfig, session: &Session, options: ExportOptions) -> Result<()> {
    let store = session.load()?;
    if store.count() == 0 {
        eprintln!("The team is empty; exporting an empty card.");
    }

    let layout: Layout = options.layout.parse().map_err(anyhow::Error::msg)?;
    let mut theme = store.theme().clone();
    if let Some(name) = options.palette {
        let palette = palette_by_name(&name)
            .ok_or_else(|| anyhow!("Unknown palette '{name}'. See `teamdex palettes`."))?;
        theme.palette = palette.key.to_string();
    }

    let display = DisplayOptions {
        layout,
        show_types: !options.hide_types,
        show_ids: !options.hide_ids,
    };
    let composition = composition(&store, &theme, display);

    let mut pipeline = build_pipeline(config)?;
    let path = pipeline
        .download(&composition, options.output.as_deref())
        .await
        .context("Export failed")?;

    if let Some(image) = pipeline.last_image() {
        println!(
            "Saved {}x{} image to {}",
            image.width(),
            image.height(),
            path.display()
        );
    }
    Ok(())
}

#[cfg(feature = "clipboard")]
pub async fn execute_copy(config: &TeamdexConfig, session: &Session) -> Result<()> {
    use teamdex_core::share::SystemClipboard;

    let store = session.load()?;
    let composition = composition(&store, store.theme(), DisplayOptions::default());

    let mut pipeline = build_pipeline(config)?.with_clipboard(SystemClipboard);
    if cfg!(target_os = "linux") {
        eprintln!("Holding the image on the clipboard until something else is copied...");
    }
    pipeline
        .copy_to_clipboard(&composition)
        .await
        .context("Copy failed")?;

    println!("Copied the team image to the clipboard");
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
pub async fn execute_copy(config: &TeamdexConfig, session: &Session) -> Result<()> {
    let store = session.load()?;
    let composition = composition(&store, store.theme(), DisplayOptions::default());

    let mut pipeline = build_pipeline(config)?;
    pipeline
        .copy_to_clipboard(&composition)
        .await
        .context("This build has no clipboard support")?;
    Ok(())
}

pub fn execute_share_text(session: &Session) -> Result<()> {
    let store = session.load()?;
    println!("{}", compose_share_text(&store.selected_names()));
    Ok(())
}

pub fn execute_intent(config: &TeamdexConfig, session: &Session, platform: &str, open: bool) -> Result<()> {
    let platform: SocialPlatform = platform.parse().map_err(anyhow::Error::msg)?;
    let store = session.load()?;
    let text = compose_share_text(&store.selected_names());

    let mut pipeline = ExportPipeline::new(RenderChain::new(config.share.scale), config.share.clone());
    if open {
        pipeline = pipeline.with_opener(SystemOpener);
    }

    match pipeline.open_social_intent(platform, &text)? {
        IntentOutcome::Opened(url) => println!("Opened {url}"),
        IntentOutcome::Prepared(url) => println!("{url}"),
        IntentOutcome::Suppressed => println!("Already opened, try again shortly"),
    }
    Ok(())
}
