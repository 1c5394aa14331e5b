//! unibots: point robots on a torus with quadtree-backed bearing sensors

pub mod types;
pub mod geom;
pub mod api;
pub mod quadtree;
pub mod torus;
pub mod sensor;
pub mod config;
pub mod error;
pub mod universe;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::geom::{Bounds, Coord};
pub use crate::quadtree::{QuadTree, DEFAULT_MAX_LEAVES};
pub use crate::sensor::SensorParams;
pub use crate::config::UniverseConfig;
pub use crate::error::UniverseError;
pub use crate::universe::Universe;
