//! Ray-casting core: per-column wall casting, floor/ceiling casting and the
//! frame driver that picks between flat and buffered output.

pub mod engine;
pub mod planes;
pub mod types;
pub mod walls;

pub use engine::{Engine, RenderMode, Textures};
pub use planes::{GROUND, SKY};
pub use types::{RayHit, Screen, Side, WallStrip};
