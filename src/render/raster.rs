use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    foundation::core::Color,
    foundation::error::{DeckleError, DeckleResult},
    scene::codec::split_font_style,
    scene::stage::{Stage, StageBackground, TextNode},
    text::shaper::{TextBrush, TextShaper, TextSpec},
};

/// One rendered frame: tightly packed row-major RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Pixel bytes converted to straight (unpremultiplied) alpha.
    pub fn to_straight_alpha(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }
}

/// CPU rasterizer for stages, backed by `vello_cpu`.
///
/// The render context is kept across calls and recreated only when the stage
/// size changes.
#[derive(Default)]
pub struct CpuRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuRasterizer {
    /// Construct a rasterizer with no allocated surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the stage's background and visible nodes into a fresh frame.
    ///
    /// Nodes whose font family resolves to no registered font are skipped
    /// with a warning rather than failing the frame.
    #[tracing::instrument(skip(self, stage, shaper))]
    pub fn render(&mut self, stage: &Stage, shaper: &mut TextShaper) -> DeckleResult<FrameRgba> {
        let size = stage.size();
        let w: u16 = size
            .width
            .try_into()
            .map_err(|_| DeckleError::render("stage width exceeds u16"))?;
        let h: u16 = size
            .height
            .try_into()
            .map_err(|_| DeckleError::render("stage height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        draw_background(&mut ctx, stage)?;
        for (_, node) in stage.nodes() {
            if !node.visible {
                continue;
            }
            draw_text_node(&mut ctx, node, shaper)?;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        let data = pixmap.data_as_u8_slice().to_vec();
        self.ctx = Some(ctx);

        Ok(FrameRgba {
            width: size.width,
            height: size.height,
            data,
            premultiplied: true,
        })
    }
}

fn draw_background(ctx: &mut vello_cpu::RenderContext, stage: &Stage) -> DeckleResult<()> {
    let size = stage.size();
    match stage.background() {
        StageBackground::Color(color) => {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(*color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(size.width),
                f64::from(size.height),
            ));
        }
        StageBackground::Image(image) => {
            let paint = image_paint(image)?;
            // Scale-to-fill: each axis stretches independently to cover the
            // stage exactly.
            let sx = f64::from(size.width) / f64::from(image.width.max(1));
            let sy = f64::from(size.height) / f64::from(image.height.max(1));
            ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(image.width),
                f64::from(image.height),
            ));
        }
    }
    Ok(())
}

fn draw_text_node(
    ctx: &mut vello_cpu::RenderContext,
    node: &TextNode,
    shaper: &mut TextShaper,
) -> DeckleResult<()> {
    let params = &node.params;
    if params.text.is_empty() {
        return Ok(());
    }
    let (weight, slant) = split_font_style(&params.font_style);
    let shaped = shaper.shape(TextSpec {
        text: &params.text,
        family: &params.font_family,
        weight,
        style: slant,
        size_px: params.font_size as f32,
        align: params.align,
        brush: TextBrush {
            r: params.fill.r,
            g: params.fill.g,
            b: params.fill.b,
            a: params.fill.a,
        },
        max_width: Some(params.width as f32),
    })?;
    let Some(shaped) = shaped else {
        tracing::warn!(
            family = %params.font_family,
            "no registered font to draw text node; skipping"
        );
        return Ok(());
    };

    ctx.set_transform(affine_to_cpu(params.to_affine()));

    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&shaped.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    if params.stroke_width > 0.0 {
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(params.stroke_width));
        ctx.set_paint(color_to_cpu(params.stroke));
        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&shaped.font)
                    .font_size(run.run().font_size())
                    .stroke_glyphs(glyphs);
            }
        }
    }

    Ok(())
}

fn color_to_cpu(color: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(image: &PreparedImage) -> DeckleResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> DeckleResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| DeckleError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| DeckleError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(DeckleError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
