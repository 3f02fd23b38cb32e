//! Clipboard image ingestion: filter, validate, and re-encode pasted
//! image data into base64 data URLs.
//!
//! Decoding runs on blocking worker threads, one task per entry, and
//! results are joined back in entry order so attachment order matches
//! what the user pasted.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::warn;

/// Image subtypes the paste pipeline accepts. Anything else on the
/// clipboard is ignored.
pub const ACCEPTED_IMAGE_SUBTYPES: [&str; 3] = ["png", "jpeg", "webp"];

/// One item read from the system clipboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipboardEntry {
    /// MIME type as reported by the clipboard, e.g. `image/png`.
    pub mime: String,
    pub data: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    #[error("failed to decode {mime} clipboard data: {reason}")]
    Decode { mime: String, reason: String },
    #[error("failed to encode clipboard image: {0}")]
    Encode(String),
}

/// Source of clipboard entries, injectable for tests.
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSource {
    fn entries(&mut self) -> Result<Vec<ClipboardEntry>, PasteError>;
}

/// System clipboard backed by `arboard`.
///
/// `arboard` surfaces images as raw RGBA, so entries are re-encoded to
/// PNG before they enter the pipeline.
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn entries(&mut self) -> Result<Vec<ClipboardEntry>, PasteError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|source| PasteError::ClipboardUnavailable(source.to_string()))?;

        let image = match clipboard.get_image() {
            Ok(image) => image,
            Err(arboard::Error::ContentNotAvailable) => return Ok(Vec::new()),
            Err(source) => return Err(PasteError::ClipboardUnavailable(source.to_string())),
        };

        let width = u32::try_from(image.width)
            .map_err(|source| PasteError::Encode(source.to_string()))?;
        let height = u32::try_from(image.height)
            .map_err(|source| PasteError::Encode(source.to_string()))?;
        let rgba = RgbaImage::from_raw(width, height, image.bytes.into_owned())
            .ok_or_else(|| PasteError::Encode("clipboard image buffer too short".to_string()))?;

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|source| PasteError::Encode(source.to_string()))?;

        Ok(vec![ClipboardEntry {
            mime: "image/png".to_string(),
            data: png,
        }])
    }
}

/// Returns the accepted image subtype of `mime`, if any.
pub fn accepted_image_subtype(mime: &str) -> Option<&'static str> {
    let subtype = mime.strip_prefix("image/")?;

    ACCEPTED_IMAGE_SUBTYPES
        .into_iter()
        .find(|accepted| *accepted == subtype)
}

/// Decodes accepted image entries into base64 data URLs, in entry order.
///
/// Each entry decodes on its own blocking task; entries that fail to
/// decode are dropped with a warning rather than failing the batch.
pub async fn decode_image_entries(entries: Vec<ClipboardEntry>) -> Vec<String> {
    let handles: Vec<_> = entries
        .into_iter()
        .map(|entry| tokio::task::spawn_blocking(move || decode_entry(&entry)))
        .collect();

    let mut data_urls = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(Ok(data_url)) => data_urls.push(data_url),
            Ok(Err(error)) => warn!(%error, "dropping undecodable clipboard image"),
            Err(error) => warn!(%error, "clipboard decode task failed"),
        }
    }

    data_urls
}

/// Validates one entry by fully decoding it, then re-emits the original
/// bytes as a `data:image/<subtype>;base64,...` URL.
fn decode_entry(entry: &ClipboardEntry) -> Result<String, PasteError> {
    let subtype = accepted_image_subtype(&entry.mime).ok_or_else(|| PasteError::Decode {
        mime: entry.mime.clone(),
        reason: "unsupported image subtype".to_string(),
    })?;

    let format = ImageFormat::from_mime_type(&entry.mime).ok_or_else(|| PasteError::Decode {
        mime: entry.mime.clone(),
        reason: "unrecognized mime type".to_string(),
    })?;

    image::load_from_memory_with_format(&entry.data, format).map_err(|source| {
        PasteError::Decode {
            mime: entry.mime.clone(),
            reason: source.to_string(),
        }
    })?;

    Ok(format!(
        "data:image/{subtype};base64,{}",
        STANDARD.encode(&entry.data)
    ))
}
