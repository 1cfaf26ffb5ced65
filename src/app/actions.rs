use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::format::epoch_millis;
use super::notify::Notification;
use super::settings::PanelSettings;
use super::state::GenerationResult;

pub(crate) trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard. The `arboard` handle is kept alive after the first copy
/// because some platforms drop the clipboard contents with their owner.
#[derive(Default)]
pub(crate) struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("failed to open the system clipboard")?,
        };
        self.inner
            .insert(clipboard)
            .set_text(text.to_owned())
            .context("failed to write text to the clipboard")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    Saved(PathBuf),
    Cancelled,
}

pub(crate) trait ImageSaver {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SaveOutcome>;
}

/// Asks the user where to put the file, starting in `directory`.
pub(crate) struct DialogSaver {
    pub(crate) directory: Option<PathBuf>,
}

impl ImageSaver for DialogSaver {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SaveOutcome> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save QR code")
            .set_file_name(file_name)
            .add_filter("PNG image", &["png"]);
        if let Some(directory) = &self.directory {
            dialog = dialog.set_directory(directory);
        }

        let Some(path) = dialog.save_file() else {
            return Ok(SaveOutcome::Cancelled);
        };
        write_file(&path, bytes)?;
        Ok(SaveOutcome::Saved(path))
    }
}

/// Writes straight into `directory` without prompting.
pub(crate) struct DirectorySaver {
    pub(crate) directory: PathBuf,
}

impl ImageSaver for DirectorySaver {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SaveOutcome> {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!(
                "failed to create download directory {}",
                self.directory.display()
            )
        })?;
        let path = self.directory.join(file_name);
        write_file(&path, bytes)?;
        Ok(SaveOutcome::Saved(path))
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Pick the saver described by the download settings.
pub(crate) fn image_saver(settings: &PanelSettings) -> Rc<dyn ImageSaver> {
    match settings.download_directory() {
        Some(directory) if !settings.download.ask_for_location => {
            Rc::new(DirectorySaver { directory })
        }
        directory => Rc::new(DialogSaver { directory }),
    }
}

/// `qr-code-<epoch milliseconds>.png`
pub(crate) fn download_file_name(at: OffsetDateTime) -> String {
    format!("qr-code-{}.png", epoch_millis(at))
}

/// Copy the field text verbatim. Nothing happens for an empty field.
///
/// Clipboard errors are logged; the confirmation is shown regardless.
pub(crate) fn copy_text(clipboard: &mut impl ClipboardSink, text: &str) -> Option<Notification> {
    if text.is_empty() {
        return None;
    }

    if let Err(err) = clipboard.write_text(text) {
        warn!(?err, "clipboard write failed");
    }
    Some(Notification::copied())
}

/// Save the current image. Returns the notification to show, if any.
pub(crate) fn download_image(
    saver: &dyn ImageSaver,
    result: Option<&GenerationResult>,
    clicked_at: OffsetDateTime,
) -> Option<Notification> {
    let result = result?;
    let file_name = download_file_name(clicked_at);

    match saver.save(&file_name, result.image.png()) {
        Ok(SaveOutcome::Saved(path)) => {
            info!(path = %path.display(), "QR code saved");
            Some(Notification::downloaded())
        }
        Ok(SaveOutcome::Cancelled) => {
            info!("download cancelled");
            None
        }
        Err(err) => {
            error!(?err, "failed to save QR code");
            Some(Notification::download_failed(err.root_cause()))
        }
    }
}
