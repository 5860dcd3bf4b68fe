use glam::{IVec2, Vec2};

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f32, // integer half, pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_h: (h / 2) as f32,
        }
    }

    /// Screen row the horizon sits on for a given pitch.
    #[inline]
    pub fn horizon(&self, pitch: f32) -> f32 {
        self.half_h + pitch
    }
}

/// Grid axis whose line the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Crossed a vertical grid line (stepped along x).
    X,
    /// Crossed a horizontal grid line (stepped along y); shaded darker.
    Y,
}

/// Result of marching one ray through the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Cell that stopped the ray.
    pub cell: IVec2,
    /// Its occupancy code (wall type).
    pub wall: u8,
    pub side: Side,
    /// Distance projected on the camera's facing axis.
    pub perp_dist: f32,
    pub ray: Vec2,
}

/// Screen-space extent of one wall column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallStrip {
    pub x: usize,
    pub hit: RayHit,
    /// Unclipped strip height in pixels.
    pub line_height: i32,
    /// First and last row to fill, clipped to the screen.
    pub draw_start: i32,
    pub draw_end: i32,
}
