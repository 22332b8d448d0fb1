use std::f32::consts::TAU;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;
use crate::geometry::{polar_to_cartesian, CoordSpace, Viewport};

/// Radius given to a freshly constructed node, before layout.
pub const DEFAULT_NODE_RADIUS: f32 = 20.0;

/// Length of a content leaf when none is given.
pub const DEFAULT_LENGTH_UNITS: u32 = 4;

/// Loop category; fixes the outline of the node that carries it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    None, // Plain circle
    Drums, // Square
    Bass,  // Pentagon
    Lead,  // Hexagon
}

impl Category {
    pub fn vertex_count(&self) -> usize {
        match self {
            Category::None => 0,
            Category::Drums => 4,
            Category::Bass => 5,
            Category::Lead => 6,
        }
    }

    pub fn shape(&self) -> ShapeKind {
        match self.vertex_count() {
            0 => ShapeKind::Circle,
            n => ShapeKind::Polygon(n),
        }
    }

    /// Get color hue for category (0-360 degrees)
    pub fn hue_degrees(&self) -> f32 {
        match self {
            Category::None => 120.0,  // Green
            Category::Drums => 30.0,  // Warm amber
            Category::Bass => 270.0,  // Purple
            Category::Lead => 200.0,  // Cool blue
        }
    }

    /// Classify a loop by the names along its path
    pub fn from_path(path: &Path) -> Self {
        for component in path.components().rev() {
            let Some(part) = component.as_os_str().to_str() else {
                continue;
            };
            let part = part.to_lowercase();
            if part.contains("drum") || part.contains("perc") {
                return Category::Drums;
            }
            if part.contains("bass") {
                return Category::Bass;
            }
            if part.contains("lead") || part.contains("vox") || part.contains("voice") {
                return Category::Lead;
            }
        }
        Category::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Polygon(usize),
}

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Build an opaque colour from hue (degrees), saturation and value in [0, 1].
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_u8 = |channel: f32| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    pub fn parse_hex(raw: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(raw.to_string());
        let hex = raw.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::parse_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

/// How long a placed loop keeps playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifespan {
    #[default]
    Infinite,
    Finite(Duration),
}

/// Payload of a selectable leaf: the loop it stands for
#[derive(Debug, Clone, PartialEq)]
pub struct ContentLeaf {
    /// Opaque content reference (the loop file)
    pub content: PathBuf,
    pub category: Category,
    pub lifespan: Lifespan,
    /// Length in beats, never zero
    pub length: NonZeroU32,
}

impl Default for ContentLeaf {
    fn default() -> Self {
        Self {
            content: PathBuf::new(),
            category: Category::None,
            lifespan: Lifespan::Infinite,
            length: NonZeroU32::MIN.saturating_add(DEFAULT_LENGTH_UNITS - 1),
        }
    }
}

impl ContentLeaf {
    pub fn new(content: impl Into<PathBuf>, category: Category) -> Self {
        Self {
            content: content.into(),
            category,
            ..Self::default()
        }
    }

    pub fn with_length(mut self, length: NonZeroU32) -> Self {
        self.length = length;
        self
    }

    pub fn with_lifespan(mut self, lifespan: Lifespan) -> Self {
        self.lifespan = lifespan;
        self
    }
}

/// One node of the half-pie menu.
///
/// Children are owned by [`crate::tree::MenuTree`]; this record holds the
/// node's own shape, placement and activation flag. Vertex offsets are kept
/// relative to `origin`, so moving a node never touches them.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    label: String,
    category: Category,
    color: Rgba,
    origin: Vec2,
    origin_init: Vec2,
    radius: f32,
    active: bool,
    vertices: Vec<Vec2>,
    payload: Option<ContentLeaf>,
}

impl MenuNode {
    pub fn new(category: Category, color: Rgba) -> Self {
        Self {
            label: String::new(),
            category,
            color,
            origin: Vec2::ZERO,
            origin_init: Vec2::ZERO,
            radius: DEFAULT_NODE_RADIUS,
            active: false,
            vertices: regular_polygon(category.vertex_count(), DEFAULT_NODE_RADIUS),
            payload: None,
        }
    }

    /// A selectable leaf; its outline follows the payload's category.
    pub fn leaf(label: impl Into<String>, color: Rgba, content: ContentLeaf) -> Self {
        let mut node = Self::new(content.category, color).with_label(label);
        node.payload = Some(content);
        node
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn shape(&self) -> ShapeKind {
        self.category.shape()
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Set the origin; normalized input is scaled by the viewport first.
    pub fn set_origin(&mut self, point: Vec2, space: CoordSpace, viewport: &Viewport) {
        self.origin = viewport.to_pixels(point, space);
    }

    /// Set the origin from a pixel-space point.
    pub fn move_to(&mut self, point: Vec2) {
        self.origin = point;
    }

    pub fn origin_init(&self) -> Vec2 {
        self.origin_init
    }

    pub fn set_origin_init(&mut self, point: Vec2, space: CoordSpace, viewport: &Viewport) {
        self.origin_init = viewport.to_pixels(point, space);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Update the radius and re-derive the outline.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.vertices = regular_polygon(self.category.vertex_count(), radius);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Vertex offsets relative to the origin.
    pub fn vertex_offsets(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Vertices in absolute pixel space.
    pub fn vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |offset| self.origin + *offset)
    }

    pub fn payload(&self) -> Option<&ContentLeaf> {
        self.payload.as_ref()
    }
}

/// Offsets of a regular polygon; vertex `i` sits at angle `spacing * (i + 1)`.
fn regular_polygon(count: usize, radius: f32) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let spacing = TAU / count as f32;
    (0..count)
        .map(|i| polar_to_cartesian(radius, spacing * (i + 1) as f32))
        .collect()
}
