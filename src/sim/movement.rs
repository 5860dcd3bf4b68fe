//! Walking, jumping and crouching.
//!
//! Collision is resolved one axis at a time against the cell the tentative
//! position lands in, which lets the camera slide along walls.

use glam::Vec2;

use super::input::Controls;
use crate::world::{CameraState, Grid};

/// Cells per second while standing.
pub const MOVE_SPEED: f32 = 5.0;
/// Cells per second while crouched.
pub const CROUCH_MOVE_SPEED: f32 = 2.5;
/// Jump oscillator advance per frame (not scaled by dt).
pub const JUMP_PHASE_STEP: f32 = 0.0765;
/// Amplitude of one jump oscillator step, in screen pixels.
pub const JUMP_HEIGHT: f32 = 30.0;
/// Lowest eye offset while crouched.
pub const CROUCH_FLOOR: f32 = -200.0;
/// Crouch rate, multiplied by the dt-scaled move speed.
pub const CROUCH_RATE: f32 = 300.0;
/// Stand-up rate, multiplied by the dt-scaled move speed.
pub const STAND_RATE: f32 = 100.0;

/// Advance `cam` by one frame of `dt` seconds.
pub fn integrate_movement(cam: &mut CameraState, controls: Controls, grid: &Grid, dt: f32) {
    let crouched = controls.contains(Controls::CROUCH);
    let mov_speed = if crouched {
        CROUCH_MOVE_SPEED * dt
    } else {
        MOVE_SPEED * dt
    };

    /* ---- walk ----------------------------------------------------------- */
    let wish = wish_dir(controls);
    if wish.y != 0.0 {
        let (dir, pos) = (cam.dir, cam.pos);
        slide(cam, grid, pos + dir * mov_speed * wish.y);
    }
    if wish.x != 0.0 {
        let (plane, pos) = (cam.plane, cam.pos);
        slide(cam, grid, pos + plane * mov_speed * wish.x);
    }

    /* ---- jump ----------------------------------------------------------- */
    if controls.contains(Controls::JUMP) && !cam.jumping {
        cam.jumping = true;
    }
    if cam.jumping {
        cam.jump_phase += JUMP_PHASE_STEP;
        cam.z += cam.jump_phase.cos() * JUMP_HEIGHT;
        if cam.z < 0.0 {
            cam.jumping = false;
            cam.jump_phase = 0.0;
            cam.z = 0.0;
        }
    }

    /* ---- crouch / stand up ---------------------------------------------- */
    if crouched {
        cam.z = (cam.z - CROUCH_RATE * mov_speed).max(CROUCH_FLOOR);
    } else if cam.z > 0.0 {
        cam.z = (cam.z - STAND_RATE * mov_speed).max(0.0);
    } else if cam.z < 0.0 {
        cam.z = (cam.z + STAND_RATE * mov_speed).min(0.0);
    }
}

/// Unit wish vector: `y` = forward(+)/back(−), `x` = right(+)/left(−).
/// Diagonals are normalised so they are not faster than straight moves.
fn wish_dir(controls: Controls) -> Vec2 {
    let mut wish = Vec2::ZERO;
    if controls.contains(Controls::UP) {
        wish.y += 1.0;
    }
    if controls.contains(Controls::DOWN) {
        wish.y -= 1.0;
    }
    if controls.contains(Controls::LEFT) {
        wish.x -= 1.0;
    }
    if controls.contains(Controls::RIGHT) {
        wish.x += 1.0;
    }
    wish.normalize_or_zero()
}

/// Commit `target.x` if its cell is free, then `target.y` against the
/// possibly updated x.
fn slide(cam: &mut CameraState, grid: &Grid, target: Vec2) {
    if grid.is_passable_at(Vec2::new(target.x, cam.pos.y)) {
        cam.pos.x = target.x;
    }
    if grid.is_passable_at(Vec2::new(cam.pos.x, target.y)) {
        cam.pos.y = target.y;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{DEFAULT_DIR, DEFAULT_PALETTE, DEFAULT_PLANE};
    use glam::vec2;

    fn open_grid() -> Grid {
        Grid::bordered(8, 8, 1, &DEFAULT_PALETTE).unwrap()
    }

    fn camera_at(x: f32, y: f32) -> CameraState {
        CameraState::new(vec2(x, y), DEFAULT_DIR, DEFAULT_PLANE)
    }

    #[test]
    fn forward_moves_speed_times_dt() {
        let mut cam = camera_at(4.5, 4.5);
        integrate_movement(&mut cam, Controls::UP, &open_grid(), 0.1);
        assert!((cam.pos - vec2(4.0, 4.5)).length() < 1e-5);
    }

    #[test]
    fn crouching_halves_speed() {
        let mut cam = camera_at(4.5, 4.5);
        integrate_movement(&mut cam, Controls::DOWN | Controls::CROUCH, &open_grid(), 0.1);
        assert!((cam.pos - vec2(4.75, 4.5)).length() < 1e-5);
    }

    #[test]
    fn strafe_follows_camera_plane() {
        let mut cam = camera_at(4.5, 4.5);
        integrate_movement(&mut cam, Controls::RIGHT, &open_grid(), 0.1);
        assert!((cam.pos - vec2(4.5, 4.5 + 0.66 * 0.5)).length() < 1e-5);
    }

    #[test]
    fn diagonal_is_not_faster() {
        let mut cam = CameraState::new(vec2(4.5, 4.5), vec2(1.0, 0.0), vec2(0.0, 1.0));
        integrate_movement(&mut cam, Controls::UP | Controls::RIGHT, &open_grid(), 0.1);
        let moved = cam.pos - vec2(4.5, 4.5);
        assert!((moved.length() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn slides_along_wall() {
        // Facing the west border at x = 0 while moving diagonally.
        let mut cam = CameraState::new(vec2(1.05, 4.5), vec2(-1.0, 0.0), vec2(0.0, 1.0));
        integrate_movement(&mut cam, Controls::UP | Controls::RIGHT, &open_grid(), 0.1);
        assert!(cam.pos.x >= 1.0, "went through the wall: {}", cam.pos.x);
        assert!(cam.pos.y > 4.5);
    }

    #[test]
    fn corner_blocks_both_axes() {
        let mut cam = CameraState::new(vec2(1.05, 1.05), vec2(-1.0, 0.0), vec2(0.0, -1.0));
        integrate_movement(&mut cam, Controls::UP | Controls::RIGHT, &open_grid(), 0.1);
        assert_eq!(cam.pos, vec2(1.05, 1.05));
    }

    #[test]
    fn jump_lands_back_on_the_ground() {
        let grid = open_grid();
        let mut cam = camera_at(4.5, 4.5);
        integrate_movement(&mut cam, Controls::JUMP, &grid, 1.0 / 60.0);
        assert!(cam.jumping);
        assert!(cam.z > 0.0);

        let mut frames = 0;
        while cam.jumping && frames < 1000 {
            integrate_movement(&mut cam, Controls::empty(), &grid, 1.0 / 60.0);
            frames += 1;
        }
        assert!(!cam.jumping);
        assert_eq!(cam.z, 0.0);
        assert_eq!(cam.jump_phase, 0.0);
    }

    #[test]
    fn crouch_bottoms_out_and_recovers() {
        let grid = open_grid();
        let mut cam = camera_at(4.5, 4.5);
        for _ in 0..200 {
            integrate_movement(&mut cam, Controls::CROUCH, &grid, 1.0 / 60.0);
            assert!(cam.z >= CROUCH_FLOOR);
        }
        assert_eq!(cam.z, CROUCH_FLOOR);

        for _ in 0..1000 {
            integrate_movement(&mut cam, Controls::empty(), &grid, 1.0 / 60.0);
            assert!(cam.z <= 0.0);
        }
        assert_eq!(cam.z, 0.0);
    }
}
