use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::drag::{DragPolicy, ReleasePolicy, DEFAULT_MAX_LIFTED};
use crate::error::ConfigError;
use crate::geometry::Viewport;
use crate::layout::NODE_RADIUS_RATIO;
use crate::render::DEFAULT_NODE_ALPHA;

/// Where the menu origin sits on the surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Centre of the bottom edge, follows resizes
    #[default]
    BottomCenter,
    /// Fixed pixel position
    Fixed([f32; 2]),
}

impl Anchor {
    pub fn resolve(&self, viewport: &Viewport) -> Vec2 {
        match self {
            Anchor::BottomCenter => viewport.bottom_center(),
            Anchor::Fixed([x, y]) => Vec2::new(*x, *y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub ring_width: f32,
    pub node_radius_ratio: f32,
    pub node_alpha: u8,
    pub anchor: Anchor,
    pub drag_policy: DragPolicy,
    pub release_policy: ReleasePolicy,
    pub max_lifted: usize,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            ring_width: 100.0,
            node_radius_ratio: NODE_RADIUS_RATIO,
            node_alpha: DEFAULT_NODE_ALPHA,
            anchor: Anchor::default(),
            drag_policy: DragPolicy::default(),
            release_policy: ReleasePolicy::default(),
            max_lifted: DEFAULT_MAX_LIFTED,
        }
    }
}

impl MenuConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `HALFPIE_*` overrides fetched through `lookup`. Values that do
    /// not parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HALFPIE_RING_WIDTH") {
            match v.parse::<f32>() {
                Ok(parsed) => self.ring_width = parsed,
                Err(_) => warn!(value = %v, "ignoring HALFPIE_RING_WIDTH"),
            }
        }
        if let Some(v) = lookup("HALFPIE_NODE_ALPHA") {
            match v.parse::<u8>() {
                Ok(parsed) => self.node_alpha = parsed,
                Err(_) => warn!(value = %v, "ignoring HALFPIE_NODE_ALPHA"),
            }
        }
        if let Some(v) = lookup("HALFPIE_DRAG_POLICY") {
            match v.trim() {
                "per_pointer" => self.drag_policy = DragPolicy::PerPointer,
                "first_only" => self.drag_policy = DragPolicy::FirstOnly,
                _ => warn!(value = %v, "ignoring HALFPIE_DRAG_POLICY"),
            }
        }
        if let Some(v) = lookup("HALFPIE_RELEASE_POLICY") {
            match v.trim() {
                "on_pointer_up" => self.release_policy = ReleasePolicy::OnPointerUp,
                "manual" => self.release_policy = ReleasePolicy::Manual,
                _ => warn!(value = %v, "ignoring HALFPIE_RELEASE_POLICY"),
            }
        }
        if let Some(v) = lookup("HALFPIE_MAX_LIFTED") {
            match v.parse::<usize>() {
                Ok(parsed) => self.max_lifted = parsed,
                Err(_) => warn!(value = %v, "ignoring HALFPIE_MAX_LIFTED"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ring_width.is_finite() && self.ring_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ring_width must be positive, got {}",
                self.ring_width
            )));
        }
        if !(self.node_radius_ratio > 0.0 && self.node_radius_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "node_radius_ratio must be in (0, 1], got {}",
                self.node_radius_ratio
            )));
        }
        if self.max_lifted == 0 {
            return Err(ConfigError::Invalid("max_lifted must be at least 1".into()));
        }
        Ok(())
    }
}

/// Read `path` if it exists, then apply environment overrides and validate.
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<MenuConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(raw) => MenuConfig::from_toml_str(&raw)?,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            MenuConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
