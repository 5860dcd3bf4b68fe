use super::input::LookInput;
use crate::world::CameraState;

/// Radians of yaw per unit of mouse motion per second.
pub const YAW_SENSITIVITY: f32 = 0.5;
/// Scale applied to vertical mouse motion before [`PITCH_RATE`].
pub const PITCH_SENSITIVITY: f32 = 0.5;
/// Horizon shift in pixels per unit of scaled vertical motion.
pub const PITCH_RATE: f32 = 400.0;
/// Horizon shift limit in either direction.
pub const PITCH_LIMIT: f32 = 200.0;

/// Apply pending mouse motion to `cam`, consuming it.
///
/// * `dx < 0` turns left (counter-clockwise), `dx > 0` turns right.
/// * `dy < 0` looks up (horizon moves down the screen), `dy > 0` looks down.
pub fn integrate_look(cam: &mut CameraState, look: &mut LookInput, dt: f32) {
    if let Some(dx) = look.dx.take() {
        let angle = YAW_SENSITIVITY * dx.unsigned_abs() as f32 * dt;
        cam.rotate(if dx < 0 { angle } else { -angle });
    }

    if let Some(dy) = look.dy.take() {
        let shift = PITCH_RATE * PITCH_SENSITIVITY * dy.unsigned_abs() as f32 * dt;
        let shift = if dy < 0 { shift } else { -shift };
        cam.pitch = (cam.pitch + shift).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use proptest::prelude::*;

    #[test]
    fn yaw_matches_rotation_formula() {
        let mut cam = CameraState::default();
        let mut look = LookInput {
            dx: Some(-10),
            dy: None,
        };
        integrate_look(&mut cam, &mut look, 0.016);

        let theta: f32 = 0.5 * 10.0 * 0.016;
        let expected = vec2(-theta.cos(), -theta.sin());
        assert!((cam.dir - expected).length() < 1e-6);
        let expected_plane = vec2(-0.66 * theta.sin(), 0.66 * theta.cos());
        assert!((cam.plane - expected_plane).length() < 1e-6);
    }

    #[test]
    fn deltas_are_consumed_once() {
        let mut cam = CameraState::default();
        let mut look = LookInput {
            dx: Some(8),
            dy: Some(-3),
        };
        integrate_look(&mut cam, &mut look, 0.02);
        assert_eq!(look, LookInput::default());

        let after_first = cam;
        integrate_look(&mut cam, &mut look, 0.02);
        assert_eq!(cam, after_first);
    }

    #[test]
    fn pitch_moves_and_clamps() {
        let mut cam = CameraState::default();
        let mut look = LookInput {
            dx: None,
            dy: Some(-2),
        };
        integrate_look(&mut cam, &mut look, 0.1);
        assert!((cam.pitch - PITCH_RATE * PITCH_SENSITIVITY * 2.0 * 0.1).abs() < 1e-4);
        assert!((cam.pitch - 40.0).abs() < 1e-4);

        look.dy = Some(100);
        integrate_look(&mut cam, &mut look, 1.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);

        look.dy = Some(-100);
        integrate_look(&mut cam, &mut look, 1.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
    }

    proptest! {
        #[test]
        fn yaw_preserves_facing_norm(deltas in prop::collection::vec(-127i32..=127, 1..500)) {
            let mut cam = CameraState::default();
            for dx in deltas {
                let mut look = LookInput { dx: Some(dx), dy: None };
                integrate_look(&mut cam, &mut look, 1.0 / 60.0);
            }
            prop_assert!((cam.dir.length() - 1.0).abs() < 1e-4);
        }
    }
}
