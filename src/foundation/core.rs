use crate::foundation::error::{DeckleError, DeckleResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel dimensions of a stage surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl StageSize {
    /// Construct a size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> DeckleResult<Self> {
        if width == 0 || height == 0 {
            return Err(DeckleError::validation("stage width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Center point of the surface.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Named slide aspect ratios with fixed editing-surface pixel dimensions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum AspectRatio {
    /// 4:5 portrait, 400x500.
    #[default]
    #[serde(rename = "4:5")]
    R4x5,
    /// 9:16 tall portrait, 450x800.
    #[serde(rename = "9:16")]
    R9x16,
    /// 3:4 portrait, 450x600.
    #[serde(rename = "3:4")]
    R3x4,
    /// 4:3 landscape, 600x450.
    #[serde(rename = "4:3")]
    R4x3,
    /// 5:4 landscape, 625x500.
    #[serde(rename = "5:4")]
    R5x4,
    /// 16:9 wide landscape, 800x450.
    #[serde(rename = "16:9")]
    R16x9,
    /// 1:1 square, 500x500.
    #[serde(rename = "1:1")]
    R1x1,
}

impl AspectRatio {
    /// All supported ratios, in the order chrome presents them.
    pub const ALL: [AspectRatio; 7] = [
        AspectRatio::R4x5,
        AspectRatio::R9x16,
        AspectRatio::R3x4,
        AspectRatio::R4x3,
        AspectRatio::R5x4,
        AspectRatio::R16x9,
        AspectRatio::R1x1,
    ];

    /// Editing-surface pixel dimensions for this ratio.
    pub fn dims(self) -> StageSize {
        let (width, height) = match self {
            AspectRatio::R4x5 => (400, 500),
            AspectRatio::R9x16 => (450, 800),
            AspectRatio::R3x4 => (450, 600),
            AspectRatio::R4x3 => (600, 450),
            AspectRatio::R5x4 => (625, 500),
            AspectRatio::R16x9 => (800, 450),
            AspectRatio::R1x1 => (500, 500),
        };
        StageSize { width, height }
    }

    /// Display name, e.g. `"16:9"`.
    pub fn name(self) -> &'static str {
        match self {
            AspectRatio::R4x5 => "4:5",
            AspectRatio::R9x16 => "9:16",
            AspectRatio::R3x4 => "3:4",
            AspectRatio::R4x3 => "4:3",
            AspectRatio::R5x4 => "5:4",
            AspectRatio::R16x9 => "16:9",
            AspectRatio::R1x1 => "1:1",
        }
    }

    /// Parse a display name back into a ratio.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.name() == name)
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Straight-alpha RGBA color carried through the document as a hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Construct an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    pub fn from_hex(s: &str) -> DeckleResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> DeckleResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| DeckleError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        match s.len() {
            6 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: 255,
            }),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err(DeckleError::validation(
                "hex color must be #RRGGBB or #RRGGBBAA",
            )),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to premultiplied RGBA8 bytes.
    pub fn to_premul_rgba8(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Where the stage sits on screen, and at what zoom.
///
/// Stage-space coordinates map to screen space as `screen = origin + p * zoom`.
/// Used for the floating toolbar and the inline text-edit input box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageViewport {
    /// Screen x of the stage's left edge.
    pub left: f64,
    /// Screen y of the stage's top edge.
    pub top: f64,
    /// Stage zoom factor (1.0 = unscaled).
    pub zoom: f64,
}

impl Default for StageViewport {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            zoom: 1.0,
        }
    }
}

impl StageViewport {
    /// Map a stage-space point to screen space.
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(self.left + p.x * self.zoom, self.top + p.y * self.zoom)
    }

    /// Map a stage-space rectangle to screen space.
    pub fn rect_to_screen(&self, r: Rect) -> Rect {
        Rect::new(
            self.left + r.x0 * self.zoom,
            self.top + r.y0 * self.zoom,
            self.left + r.x1 * self.zoom,
            self.top + r.y1 * self.zoom,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
