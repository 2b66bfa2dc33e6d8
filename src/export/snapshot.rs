use std::io::Cursor;

use anyhow::Context;

use crate::{
    assets::decode::{decode_image, load_image_source},
    document::model::{Background, Overlay, Slide},
    foundation::core::StageSize,
    foundation::error::{DeckleError, DeckleResult},
    render::raster::{CpuRasterizer, FrameRgba},
    scene::codec::to_render_params,
    scene::stage::Stage,
    text::shaper::TextShaper,
};

/// JPEG quality used for slide exports.
pub const EXPORT_JPEG_QUALITY: u8 = 80;

/// Default thumbnail dimensions.
pub const THUMBNAIL_SIZE: StageSize = StageSize {
    width: 160,
    height: 90,
};

/// Render a slide to a raster frame at the given target size.
///
/// Builds a fully isolated offscreen stage (never touching any live editor
/// scene, so export causes no flicker or selection loss), scales overlay
/// geometry per axis and font size by the smaller axis scale to avoid glyph
/// distortion, and draws the background scaled to fill. A background image
/// that fails to resolve or decode is logged and skipped; the slide still
/// renders.
#[tracing::instrument(skip(slide, shaper), fields(slide = slide.id.as_u64()))]
pub fn render_slide_to_image(
    slide: &Slide,
    target: StageSize,
    shaper: &mut TextShaper,
) -> DeckleResult<FrameRgba> {
    let native = slide.aspect_ratio.dims();
    let sx = f64::from(target.width) / f64::from(native.width);
    let sy = f64::from(target.height) / f64::from(native.height);
    let smin = sx.min(sy);

    let mut stage = Stage::new(target);
    match &slide.background {
        Background::Color(color) => stage.set_background_color(*color),
        Background::Image(source) => {
            match load_image_source(source).and_then(|bytes| decode_image(&bytes)) {
                Ok(image) => stage.set_background_image(image),
                Err(err) => {
                    tracing::warn!(
                        slide = slide.id.as_u64(),
                        error = %err,
                        "background image unavailable for export; rendering without it"
                    );
                }
            }
        }
    }

    for overlay in &slide.overlays {
        let Overlay::Text(text) = overlay;
        let mut params = to_render_params(text);
        params.x *= sx;
        params.y *= sy;
        params.font_size *= smin;
        params.stroke_width *= smin;
        let (width, height) = (params.width * sx, params.height * sy);
        params.set_box(width, height);
        stage.add_text(text.id, params);
    }

    CpuRasterizer::new().render(&stage, shaper)
}

/// Render a slide at its native aspect-ratio dimensions.
pub fn render_slide_native(slide: &Slide, shaper: &mut TextShaper) -> DeckleResult<FrameRgba> {
    render_slide_to_image(slide, slide.aspect_ratio.dims(), shaper)
}

/// Render a small thumbnail of a slide (see [`THUMBNAIL_SIZE`]).
pub fn render_slide_thumbnail(slide: &Slide, shaper: &mut TextShaper) -> DeckleResult<FrameRgba> {
    render_slide_to_image(slide, THUMBNAIL_SIZE, shaper)
}

/// Encode a rendered frame as PNG bytes.
pub fn encode_png(frame: &FrameRgba) -> DeckleResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_alpha())
        .ok_or_else(|| DeckleError::render("frame byte length does not match dimensions"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

/// Encode a rendered frame as JPEG bytes at the given quality.
pub fn encode_jpeg(frame: &FrameRgba, quality: u8) -> DeckleResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_alpha())
        .ok_or_else(|| DeckleError::render("frame byte length does not match dimensions"))?;
    let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut out), quality);
    rgb.write_with_encoder(encoder).context("encode jpeg")?;
    Ok(out)
}

/// Render and PNG-encode a slide in one step.
pub fn render_slide_to_png(
    slide: &Slide,
    target: StageSize,
    shaper: &mut TextShaper,
) -> DeckleResult<Vec<u8>> {
    encode_png(&render_slide_to_image(slide, target, shaper)?)
}

/// Render and JPEG-encode a slide in one step (quality [`EXPORT_JPEG_QUALITY`]).
pub fn render_slide_to_jpeg(
    slide: &Slide,
    target: StageSize,
    shaper: &mut TextShaper,
) -> DeckleResult<Vec<u8>> {
    encode_jpeg(
        &render_slide_to_image(slide, target, shaper)?,
        EXPORT_JPEG_QUALITY,
    )
}

/// File name for the slide at `index` out of `total` exported slides:
/// `slide.<ext>` for a single slide, `slide-<index+1>.<ext>` otherwise.
pub fn export_file_name(index: usize, total: usize, ext: &str) -> String {
    if total == 1 {
        format!("slide.{ext}")
    } else {
        format!("slide-{}.{ext}", index + 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/snapshot.rs"]
mod tests;
