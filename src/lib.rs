//! Stacked half-pie menu: a radial, touch-driven browser for a tree of
//! loops, anchored at the bottom edge of the screen. Leaves can be lifted
//! out of the menu and dragged around freely.

pub mod activation;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit_test;
pub mod input;
pub mod layout;
pub mod node;
pub mod render;
pub mod tree;

pub use cli::HostArgs;
pub use config::{load_config, Anchor, MenuConfig};
pub use drag::{DragPolicy, LiftedCopy, PointerId, ReleasePolicy};
pub use engine::MenuEngine;
pub use error::{CatalogError, ConfigError};
pub use geometry::{CoordSpace, Viewport};
pub use input::{PointerEvent, PointerPhase};
pub use node::{Category, ContentLeaf, Lifespan, MenuNode, Rgba};
pub use render::{DrawPrimitive, Sector};
pub use tree::MenuTree;
