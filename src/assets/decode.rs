use std::sync::Arc;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose};

use crate::{
    document::model::Background,
    foundation::error::{DeckleError, DeckleResult},
};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> DeckleResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Resolve a background image source string to encoded image bytes.
///
/// Accepted forms are base64 `data:` URIs (the shape file uploads arrive in)
/// and filesystem paths. Remote URLs are rejected: fetching is the embedding
/// application's job, and it hands the result to the core as a data URI.
pub fn load_image_source(source: &str) -> DeckleResult<Vec<u8>> {
    let source = source.trim();
    if source.is_empty() {
        return Err(DeckleError::validation("image source must be non-empty"));
    }
    if let Some(rest) = source.strip_prefix("data:") {
        return decode_data_uri(rest);
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return Err(DeckleError::validation(
            "remote URLs are not fetched here; convert to a data URI first",
        ));
    }
    std::fs::read(source)
        .with_context(|| format!("read image bytes from '{source}'"))
        .map_err(DeckleError::from)
}

/// Resolve and decode a background's image, if it has one.
///
/// Color backgrounds yield `Ok(None)`; image backgrounds resolve their source
/// and decode. Callers decide whether a failure is surfaced or swallowed.
pub fn load_background_image(background: &Background) -> DeckleResult<Option<PreparedImage>> {
    match background {
        Background::Color(_) => Ok(None),
        Background::Image(source) => Ok(Some(decode_image(&load_image_source(source)?)?)),
    }
}

/// Encode raw bytes as a base64 `data:` URI with the given MIME type.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

fn decode_data_uri(rest: &str) -> DeckleResult<Vec<u8>> {
    // rest is "<mime>;base64,<payload>"; only base64 payloads are supported.
    let Some((header, payload)) = rest.split_once(',') else {
        return Err(DeckleError::validation("malformed data URI (missing ',')"));
    };
    if !header.ends_with(";base64") {
        return Err(DeckleError::validation(
            "data URI must carry a base64 payload",
        ));
    }
    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DeckleError::asset(format!("invalid base64 payload in data URI: {e}")))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
