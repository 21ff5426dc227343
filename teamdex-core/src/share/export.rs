//! Export pipeline
//!
//! Each action moves the status through `Generating` to `Succeeded` or
//! `Failed`. A finished status reads as `Idle` again once the configured
//! timeout has passed; nothing has to reset it.

use std::path::{Path, PathBuf};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::capabilities::{ClipboardSink, ShareSheet, UrlOpener};
use super::composition::Composition;
use super::intent::{build_social_intent_url, IntentGuard, SocialPlatform};
use super::render::{PngImage, RenderChain};
use crate::config::ShareConfig;
use crate::error::{ExportError, RenderError};

pub const MSG_GENERATED: &str = "画像を生成しました！";
pub const MSG_GENERATE_FAILED: &str = "画像の生成に失敗しました";
pub const MSG_SAVED: &str = "画像を保存しました！";
pub const MSG_SAVE_FAILED: &str = "画像の保存に失敗しました";
pub const MSG_COPIED: &str = "画像をクリップボードにコピーしました！";
pub const MSG_COPY_FAILED: &str = "クリップボードへのコピーに失敗しました";
pub const MSG_SHARED: &str = "共有しました！";
pub const MSG_SHARE_FAILED: &str = "ネイティブ共有に失敗しました";
pub const MSG_OPENED: &str = "共有ページを開きました";
pub const MSG_OPEN_FAILED: &str = "共有ページを開けませんでした";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    Generating,
    Succeeded(String),
    Failed(String),
}

/// What [`ExportPipeline::open_social_intent`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The URL was handed to the opener
    Opened(String),
    /// No opener is configured; the caller gets the URL to use
    Prepared(String),
    /// A previous invocation is still inside the debounce window
    Suppressed,
}

pub struct ExportPipeline {
    chain: RenderChain,
    config: ShareConfig,
    clipboard: Option<Box<dyn ClipboardSink>>,
    share_sheet: Option<Box<dyn ShareSheet>>,
    opener: Option<Box<dyn UrlOpener>>,
    /// Last rendered image and the composition it was rendered from
    last: Option<(Composition, PngImage)>,
    status: ExportStatus,
    status_at: Option<Instant>,
    intent_guard: IntentGuard,
}

impl ExportPipeline {
    pub fn new(chain: RenderChain, config: ShareConfig) -> Self {
        let intent_guard = IntentGuard::new(config.intent_debounce());
        Self {
            chain,
            config,
            clipboard: None,
            share_sheet: None,
            opener: None,
            last: None,
            status: ExportStatus::Idle,
            status_at: None,
            intent_guard,
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardSink + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn with_share_sheet(mut self, sheet: impl ShareSheet + 'static) -> Self {
        self.share_sheet = Some(Box::new(sheet));
        self
    }

    pub fn with_opener(mut self, opener: impl UrlOpener + 'static) -> Self {
        self.opener = Some(Box::new(opener));
        self
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    /// Current status; finished statuses expire to `Idle`
    pub fn status(&self) -> ExportStatus {
        match (&self.status, self.status_at) {
            (ExportStatus::Succeeded(_) | ExportStatus::Failed(_), Some(at))
                if at.elapsed() >= self.config.status_timeout() =>
            {
                ExportStatus::Idle
            }
            (status, _) => status.clone(),
        }
    }

    fn set_status(&mut self, status: ExportStatus) {
        self.status = status;
        self.status_at = Some(Instant::now());
    }

    fn succeed(&mut self, message: &str) {
        info!("{}", message);
        self.set_status(ExportStatus::Succeeded(message.to_string()));
    }

    fn fail(&mut self, message: &str, error: &dyn std::fmt::Display) {
        warn!("{}: {}", message, error);
        self.set_status(ExportStatus::Failed(message.to_string()));
    }

    /// The most recently generated image, if any
    pub fn last_image(&self) -> Option<&PngImage> {
        self.last.as_ref().map(|(_, image)| image)
    }

    /// Forget the last image so the next action renders again
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Render `composition` and keep the result as the last image
    pub async fn generate_image(&mut self, composition: &Composition) -> Result<PngImage, RenderError> {
        self.set_status(ExportStatus::Generating);
        debug!(
            "Generating image for {} cards with {:?}",
            composition.card_count(),
            self.chain.renderer_names()
        );

        match self.chain.render(composition).await {
            Ok(image) => {
                self.last = Some((composition.clone(), image.clone()));
                self.succeed(MSG_GENERATED);
                Ok(image)
            }
            Err(e) => {
                self.fail(MSG_GENERATE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// The last image if it was rendered from `composition`, otherwise a
    /// fresh one
    async fn current_image(&mut self, composition: &Composition) -> Result<PngImage, ExportError> {
        match &self.last {
            Some((rendered, image)) if rendered == composition => Ok(image.clone()),
            _ => Ok(self.generate_image(composition).await?),
        }
    }

    /// Write the image to `path`, or to the configured default file name
    pub async fn download(
        &mut self,
        composition: &Composition,
        path: Option<&Path>,
    ) -> Result<PathBuf, ExportError> {
        let image = self.current_image(composition).await?;
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.config.default_filename));

        match save_png(&image, &path).await {
            Ok(()) => {
                self.succeed(MSG_SAVED);
                Ok(path)
            }
            Err(e) => {
                self.fail(MSG_SAVE_FAILED, &e);
                Err(e)
            }
        }
    }

    pub async fn copy_to_clipboard(&mut self, composition: &Composition) -> Result<(), ExportError> {
        if self.clipboard.is_none() {
            let e = ExportError::ClipboardUnsupported;
            self.fail(MSG_COPY_FAILED, &e);
            return Err(e);
        }

        let image = self.current_image(composition).await?;
        let result = match &self.clipboard {
            Some(clipboard) => clipboard.copy_image(&image),
            None => Err(ExportError::ClipboardUnsupported),
        };

        match result {
            Ok(()) => {
                self.succeed(MSG_COPIED);
                Ok(())
            }
            Err(e) => {
                self.fail(MSG_COPY_FAILED, &e);
                Err(e)
            }
        }
    }

    pub async fn native_share(&mut self, composition: &Composition, text: &str) -> Result<(), ExportError> {
        if self.share_sheet.is_none() {
            let e = ExportError::ShareUnsupported;
            self.fail(MSG_SHARE_FAILED, &e);
            return Err(e);
        }

        let image = self.current_image(composition).await?;
        let result = match &self.share_sheet {
            Some(sheet) => sheet.share(&image, &self.config.title, text).await,
            None => Err(ExportError::ShareUnsupported),
        };

        match result {
            Ok(()) => {
                self.succeed(MSG_SHARED);
                Ok(())
            }
            Err(e) => {
                self.fail(MSG_SHARE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// Build the intent URL for `platform` and open it.
    ///
    /// Calls inside the debounce window of a previous call are suppressed.
    pub fn open_social_intent(
        &mut self,
        platform: SocialPlatform,
        text: &str,
    ) -> Result<IntentOutcome, ExportError> {
        if !self.intent_guard.try_acquire() {
            debug!("Ignoring repeated {} intent", platform);
            return Ok(IntentOutcome::Suppressed);
        }

        let url = build_social_intent_url(
            platform,
            text,
            &self.config.hashtags,
            self.config.link.as_deref(),
        );

        match self.opener.as_ref().map(|opener| opener.open(&url)) {
            None => Ok(IntentOutcome::Prepared(url)),
            Some(Ok(())) => {
                self.succeed(MSG_OPENED);
                Ok(IntentOutcome::Opened(url))
            }
            Some(Err(e)) => {
                self.intent_guard.release();
                self.fail(MSG_OPEN_FAILED, &e);
                Err(e)
            }
        }
    }
}

/// Write PNG bytes to `path`, creating parent directories
pub async fn save_png(image: &PngImage, path: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, image.bytes()).await.map_err(io_error)
}
