use glam::{Vec2, vec2};

use super::grid::{Grid, GridError};

/// Facing used when a camera is placed on a grid.
pub const DEFAULT_DIR: Vec2 = vec2(-1.0, 0.0);
/// Camera plane used when a camera is placed on a grid (≈ 66° FoV).
pub const DEFAULT_PLANE: Vec2 = vec2(0.0, 0.66);

/// Player view-point on the grid.
///
/// * `pos` is in cell units; the integer part is the occupied cell.
/// * `z` is the vertical eye offset in screen pixels a wall at distance 1
///   shifts by (0 = standing, negative = crouched).
/// * `pitch` is how far the horizon is shifted, in screen pixels.
/// * `dir` must stay unit length; `plane` is perpendicular to it and its
///   length sets the horizontal field of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub pos: Vec2,
    pub z: f32,
    pub dir: Vec2,
    pub plane: Vec2,
    pub pitch: f32,
    pub jump_phase: f32,
    /// Latched while a jump arc is in flight; cleared on landing.
    pub jumping: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec2::ZERO, DEFAULT_DIR, DEFAULT_PLANE)
    }
}

impl CameraState {
    pub fn new(pos: Vec2, dir: Vec2, plane: Vec2) -> Self {
        Self {
            pos,
            z: 0.0,
            dir,
            plane,
            pitch: 0.0,
            jump_phase: 0.0,
            jumping: false,
        }
    }

    /// Place a default camera on `grid`.
    ///
    /// The requested cell is used if it is a passable interior cell,
    /// otherwise the first free interior cell (x-major scan).
    pub fn spawn(grid: &Grid, cell: Option<(usize, usize)>) -> Result<Self, GridError> {
        let (x, y) = cell
            .filter(|&(x, y)| !grid.is_border(x, y) && grid.is_passable(x, y))
            .or_else(|| grid.first_free_cell())
            .ok_or(GridError::NoFreeCell)?;

        log::debug!("camera spawned at cell ({x}, {y})");
        Ok(Self::new(
            vec2(x as f32 + 0.5, y as f32 + 0.5),
            DEFAULT_DIR,
            DEFAULT_PLANE,
        ))
    }

    /// Rotate facing and camera plane by `angle` radians (positive = CCW).
    ///
    /// Both vectors are rotated from their pre-rotation values with one
    /// rotor, so `|dir|` is preserved up to rounding.
    #[inline]
    pub fn rotate(&mut self, angle: f32) {
        let rotor = Vec2::from_angle(angle);
        self.dir = rotor.rotate(self.dir);
        self.plane = rotor.rotate(self.plane);
    }

    /// Grid cell the camera stands in.
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.pos.x as i32, self.pos.y as i32)
    }

    /// Direction of the ray through screen column `x` of a `width`-wide view.
    #[inline(always)]
    pub fn ray_dir(&self, x: usize, width: usize) -> Vec2 {
        let camera_x = 2.0 * x as f32 / width as f32 - 1.0;
        self.dir + self.plane * camera_x
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
