//! Grid ray-caster: procedural block maps, DDA walls, affine floor and
//! ceiling, and a small first-person controller.

pub mod engine;
pub mod mapfile;
pub mod renderer;
pub mod sim;
pub mod world;
