use std::path::Path;

use crate::{
    document::model::{FontStyle, FontWeight, TextAlign},
    foundation::error::{DeckleError, DeckleResult},
};

/// RGBA8 brush color attached to Parley text styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Everything needed to shape one run of overlay text.
#[derive(Clone, Copy, Debug)]
pub struct TextSpec<'a> {
    /// UTF-8 text content.
    pub text: &'a str,
    /// Requested font family name.
    pub family: &'a str,
    /// Font weight.
    pub weight: FontWeight,
    /// Font slant.
    pub style: FontStyle,
    /// Font size in pixels.
    pub size_px: f32,
    /// Horizontal alignment within the wrap width.
    pub align: TextAlign,
    /// Brush carried through to glyph runs.
    pub brush: TextBrush,
    /// Wrap width in pixels, if the text is boxed.
    pub max_width: Option<f32>,
}

/// A shaped layout plus the font needed to draw its glyphs.
#[derive(Clone)]
pub struct ShapedText {
    /// Fully built text layout ready for rendering.
    pub layout: parley::Layout<TextBrush>,
    /// Font backing the layout's glyph ids.
    pub font: vello_cpu::peniko::FontData,
}

struct RegisteredFace {
    family: String,
    font: vello_cpu::peniko::FontData,
}

/// Builds Parley text layouts from fonts registered with the editor.
///
/// Fonts are registered explicitly (bytes or a directory scan), never pulled
/// from the system, so shaping is deterministic across machines. A family
/// with no registered match falls back to the first registered face; with no
/// faces at all, shaping yields `None` and callers skip the node.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    faces: Vec<RegisteredFace>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    /// Construct a shaper with fresh Parley contexts and no fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
        }
    }

    /// Register a font from raw bytes; returns the detected family name.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> DeckleResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            DeckleError::asset("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| DeckleError::asset("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        self.faces.push(RegisteredFace {
            family: family.clone(),
            font,
        });
        Ok(family)
    }

    /// Register every `.ttf`/`.otf`/`.ttc` file in a directory; returns the
    /// number of faces registered. Unreadable entries are skipped.
    pub fn load_fonts_dir(&mut self, dir: &Path) -> usize {
        let Ok(rd) = std::fs::read_dir(dir) else {
            return 0;
        };

        let mut count = 0;
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            match self.register_font(bytes) {
                Ok(_) => count += 1,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "skipping font file");
                }
            }
        }
        count
    }

    /// Family names registered so far, in registration order.
    pub fn families(&self) -> Vec<&str> {
        self.faces.iter().map(|f| f.family.as_str()).collect()
    }

    /// Whether any font has been registered.
    pub fn has_fonts(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Shape and lay out one text run. Returns `None` when no font is
    /// registered at all.
    pub fn shape(&mut self, spec: TextSpec<'_>) -> DeckleResult<Option<ShapedText>> {
        if !spec.size_px.is_finite() || spec.size_px <= 0.0 {
            return Err(DeckleError::validation("text size_px must be finite and > 0"));
        }
        let Some(face) = self.resolve(spec.family) else {
            return Ok(None);
        };
        let family = face.family.clone();
        let font = face.font.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, spec.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(match spec.weight {
            FontWeight::Normal => parley::style::FontWeight::NORMAL,
            FontWeight::Bold => parley::style::FontWeight::BOLD,
        }));
        builder.push_default(parley::style::StyleProperty::FontStyle(match spec.style {
            FontStyle::Normal => parley::style::FontStyle::Normal,
            FontStyle::Italic => parley::style::FontStyle::Italic,
        }));
        builder.push_default(parley::style::StyleProperty::Brush(spec.brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(spec.text);
        layout.break_all_lines(spec.max_width);
        layout.align(
            spec.max_width,
            match spec.align {
                TextAlign::Left => parley::Alignment::Start,
                TextAlign::Center => parley::Alignment::Center,
                TextAlign::Right => parley::Alignment::End,
            },
            parley::AlignmentOptions::default(),
        );

        Ok(Some(ShapedText { layout, font }))
    }

    fn resolve(&self, family: &str) -> Option<&RegisteredFace> {
        self.faces
            .iter()
            .find(|f| f.family.eq_ignore_ascii_case(family))
            .or_else(|| self.faces.first())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
