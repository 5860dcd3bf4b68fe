mod clock;
mod input;
mod look;
mod movement;

pub use clock::{FrameClock, TARGET_FPS};
pub use input::{Controls, InputSnapshot, LookInput, Overlays};
pub use look::{PITCH_LIMIT, PITCH_RATE, PITCH_SENSITIVITY, YAW_SENSITIVITY, integrate_look};
pub use movement::{
    CROUCH_FLOOR, CROUCH_MOVE_SPEED, JUMP_HEIGHT, JUMP_PHASE_STEP, MOVE_SPEED, integrate_movement,
};

use crate::world::{CameraState, Grid};

/// Run the per-frame integrators in their fixed order: look, then move.
pub fn step(cam: &mut CameraState, input: &mut InputSnapshot, grid: &Grid, dt: f32) {
    integrate_look(cam, &mut input.look, dt);
    integrate_movement(cam, input.controls, grid, dt);
}
