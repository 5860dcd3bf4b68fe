mod camera;
mod generator;
mod grid;
mod texture;

pub use grid::{DEFAULT_PALETTE, EMPTY, FLOOR_RGB, Grid, GridError, Palette, Rgb};

pub use generator::{GenMode, GridGenerator};

pub use camera::{CameraState, DEFAULT_DIR, DEFAULT_PLANE};

pub use texture::{
    AUTO_TEX_SIZE, AUTO_WALL_COUNT, TexFlags, TexGroup, Texture, TextureError, auto_ceiling,
    auto_floor, auto_walls, darken,
};
