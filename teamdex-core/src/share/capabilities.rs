//! Host capabilities used by the export pipeline
//!
//! Each capability is optional. The pipeline reports an `*Unsupported`
//! error when one it needs was not provided.

use async_trait::async_trait;
use std::process::Command;

use super::render::PngImage;
use crate::error::ExportError;

/// Places an image on the system clipboard
pub trait ClipboardSink: Send + Sync {
    fn copy_image(&self, image: &PngImage) -> Result<(), ExportError>;
}

/// Hands an image to a platform share sheet
#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn share(&self, image: &PngImage, title: &str, text: &str) -> Result<(), ExportError>;
}

/// Opens a URL in the user's browser
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), ExportError>;
}

/// Clipboard access through `arboard`
#[cfg(feature = "clipboard")]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn copy_image(&self, image: &PngImage) -> Result<(), ExportError> {
        let data = image_data(image)?;
        let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
        set_image(&mut clipboard, data).map_err(clipboard_error)
    }
}

#[cfg(feature = "clipboard")]
fn clipboard_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Clipboard(e.to_string())
}

#[cfg(feature = "clipboard")]
fn image_data(image: &PngImage) -> Result<arboard::ImageData<'static>, ExportError> {
    let rgba = image.to_rgba().map_err(clipboard_error)?;
    let (width, height) = rgba.dimensions();
    Ok(arboard::ImageData {
        width: width as usize,
        height: height as usize,
        bytes: std::borrow::Cow::Owned(rgba.into_raw()),
    })
}

/// X11 and Wayland serve the selection only while its owner is alive, so
/// this blocks until another program takes the clipboard over.
#[cfg(all(feature = "clipboard", target_os = "linux"))]
fn set_image(
    clipboard: &mut arboard::Clipboard,
    data: arboard::ImageData<'static>,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    clipboard.set().wait().image(data)
}

#[cfg(all(feature = "clipboard", not(target_os = "linux")))]
fn set_image(
    clipboard: &mut arboard::Clipboard,
    data: arboard::ImageData<'static>,
) -> Result<(), arboard::Error> {
    clipboard.set_image(data)
}

/// Launches the platform URL handler
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), ExportError> {
        open_command(std::env::consts::OS, url)
            .spawn()
            .map_err(|e| ExportError::Opener {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// URL handler command for `os`. The URL is always its own argument and
/// never passes through a shell, so `&` in query strings survives.
fn open_command(os: &str, url: &str) -> Command {
    let mut cmd = match os {
        "macos" => Command::new("open"),
        "windows" => {
            let mut cmd = Command::new("rundll32");
            cmd.arg("url.dll,FileProtocolHandler");
            cmd
        }
        _ => Command::new("xdg-open"),
    };
    cmd.arg(url);
    cmd
}
