//! Visual style records and the hover/active/held priority cascade.
//!
//! Style is never stored on an entity. It is resolved on read from the
//! entity's interaction flags and its variant's [`StyleTable`], so a state
//! setter can never forget to refresh it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit sRGB color with alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| -> Option<u8> { Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) };

        match bytes.len() {
            3 => Some(Self::rgb(
                hex_val(bytes[0])? * 17,
                hex_val(bytes[1])? * 17,
                hex_val(bytes[2])? * 17,
            )),
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("bad color {s:?}")))
    }
}

// ─── Style records ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
}

/// Everything a painter needs to draw one entity in one interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleRecord {
    /// Node radius in abstract units. Also the node hit radius. Unused by rectangles.
    pub radius: f64,
    /// `None` means "use the entity's own color" (rectangles).
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub alpha: f64,
    pub shadow: Option<Shadow>,
}

/// One style per interaction state for a given entity variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleTable {
    pub default: StyleRecord,
    pub hover: StyleRecord,
    pub active: StyleRecord,
    pub held: StyleRecord,
}

/// The three flags that drive style selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    pub held: bool,
    pub active: bool,
    pub hovered: bool,
}

/// Pick the style for an interaction state: held > active > hovered > default.
pub fn resolve_style(state: Interaction, table: &StyleTable) -> &StyleRecord {
    if state.held {
        &table.held
    } else if state.active {
        &table.active
    } else if state.hovered {
        &table.hover
    } else {
        &table.default
    }
}

// ─── Built-in tables ─────────────────────────────────────────────────────

pub const BACKGROUND: Color = Color::rgb(0x30, 0x30, 0x40);

const NODE_STROKE: Color = Color::rgb(0x80, 0x80, 0xc0);
const NODE_FILL: Color = Color::rgb(0x50, 0x50, 0x80);
const NODE_STROKE_LIT: Color = Color::rgb(0xb0, 0xb0, 0xf0);
const NODE_FILL_LIT: Color = Color::rgb(0x70, 0x70, 0xa0);
const SELECTION: Color = Color::rgb(0xe0, 0xc0, 0x60);

const HELD_SHADOW: Shadow = Shadow {
    offset_x: 0.0,
    offset_y: 4.0,
    blur: 12.0,
    color: Color::rgba(0, 0, 0, 0x80),
};

pub const NODE_STYLES: StyleTable = StyleTable {
    default: StyleRecord {
        radius: 25.0,
        fill: Some(NODE_FILL),
        stroke: Some(NODE_STROKE),
        stroke_width: 2.0,
        alpha: 0.8,
        shadow: None,
    },
    hover: StyleRecord {
        radius: 25.0,
        fill: Some(NODE_FILL_LIT),
        stroke: Some(NODE_STROKE_LIT),
        stroke_width: 2.0,
        alpha: 0.8,
        shadow: None,
    },
    active: StyleRecord {
        radius: 25.0,
        fill: Some(NODE_FILL),
        stroke: Some(SELECTION),
        stroke_width: 2.0,
        alpha: 0.8,
        shadow: None,
    },
    held: StyleRecord {
        radius: 27.0,
        fill: Some(NODE_FILL_LIT),
        stroke: Some(NODE_STROKE_LIT),
        stroke_width: 3.0,
        alpha: 0.6,
        shadow: Some(HELD_SHADOW),
    },
};

pub const RECT_STYLES: StyleTable = StyleTable {
    default: StyleRecord {
        radius: 0.0,
        fill: None,
        stroke: None,
        stroke_width: 0.0,
        alpha: 0.4,
        shadow: None,
    },
    hover: StyleRecord {
        radius: 0.0,
        fill: None,
        stroke: Some(NODE_STROKE_LIT),
        stroke_width: 1.0,
        alpha: 0.4,
        shadow: None,
    },
    active: StyleRecord {
        radius: 0.0,
        fill: None,
        stroke: Some(SELECTION),
        stroke_width: 2.0,
        alpha: 0.4,
        shadow: None,
    },
    held: StyleRecord {
        radius: 0.0,
        fill: None,
        stroke: Some(NODE_STROKE_LIT),
        stroke_width: 3.0,
        alpha: 0.3,
        shadow: Some(HELD_SHADOW),
    },
};

/// Edges have no geometry yet; their table exists so every variant resolves.
pub const EDGE_STYLES: StyleTable = StyleTable {
    default: StyleRecord {
        radius: 0.0,
        fill: None,
        stroke: Some(NODE_STROKE),
        stroke_width: 2.0,
        alpha: 0.8,
        shadow: None,
    },
    hover: EDGE_STYLES_LIT,
    active: EDGE_STYLES_LIT,
    held: EDGE_STYLES_LIT,
};

const EDGE_STYLES_LIT: StyleRecord = StyleRecord {
    radius: 0.0,
    fill: None,
    stroke: Some(NODE_STROKE_LIT),
    stroke_width: 3.0,
    alpha: 0.8,
    shadow: None,
};
