//! Floor and ceiling.
//!
//! Textured planes are cast row by row: every screen row below the horizon
//! sees the floor at one distance, every row above it sees the ceiling.
//! Across the row the world point advances linearly from the left-most to
//! the right-most ray, so each row costs one division.

use crate::{
    engine::types::Screen,
    renderer::{DrawCall, Rgba},
    world::{CameraState, Texture, darken},
};

/// Floor colour when no floor texture is loaded.
pub const GROUND: Rgba = 0x00_007B00;
/// Ceiling colour when no ceiling texture is loaded.
pub const SKY: Rgba = 0x00_003FFF;

/// Fill the whole frame with floor and ceiling.
///
/// Rows strictly below the horizon are floor. A missing texture falls back
/// to [`GROUND`] / [`SKY`] for that surface only.
pub fn cast_planes(
    cam: &CameraState,
    screen: &Screen,
    floor: Option<&Texture>,
    ceiling: Option<&Texture>,
    frame: &mut [Rgba],
) {
    let horizon = screen.horizon(cam.pitch);

    if floor.is_none() && ceiling.is_none() {
        for (y, row) in frame.chunks_exact_mut(screen.w).enumerate() {
            row.fill(if y as f32 > horizon { GROUND } else { SKY });
        }
        return;
    }

    /* rays through the left and right screen edges */
    let ray0 = cam.dir - cam.plane;
    let ray1 = cam.dir + cam.plane;
    let w = screen.w as f32;
    let h = screen.h as f32;

    for (y, row) in frame.chunks_exact_mut(screen.w).enumerate() {
        let is_floor = y as f32 > horizon;

        /* rows from the horizon; at least one so the horizon row stays finite */
        let p = if is_floor {
            y as f32 - screen.half_h - cam.pitch
        } else {
            screen.half_h - y as f32 + cam.pitch
        };
        let p = (p as i32).max(1) as f32;

        let cam_z = if is_floor {
            0.5 * h + cam.z
        } else {
            0.5 * h - cam.z
        };
        let row_dist = cam_z / p;

        let step = row_dist * (ray1 - ray0) / w;
        let mut world = cam.pos + row_dist * ray0;

        let (tex, fallback) = if is_floor {
            (floor, GROUND)
        } else {
            (ceiling, SKY)
        };
        let Some(tex) = tex else {
            row.fill(fallback);
            continue;
        };

        let tw = tex.w() as f32;
        let th = tex.h() as f32;
        for px in row.iter_mut() {
            let frac = world - world.trunc();
            let tx = (tw * frac.x) as i32;
            let ty = (th * frac.y) as i32;
            world += step;
            *px = darken(tex.sample_wrapped(tx, ty));
        }
    }
}

/// Untextured floor and sky as two rectangles split at the horizon.
///
/// The ground always runs to the bottom row, even with the horizon pitched
/// off the top of the screen.
pub fn plane_calls(cam: &CameraState, screen: &Screen) -> [DrawCall; 2] {
    let horizon = screen.horizon(cam.pitch) as i32;
    let (w, h) = (screen.w as i32, screen.h as i32);
    [
        DrawCall::Rect {
            x: 0,
            y: horizon,
            w,
            h: h - horizon,
            color: GROUND,
        },
        DrawCall::Rect {
            x: 0,
            y: 0,
            w,
            h: horizon,
            color: SKY,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Renderer, RendererExt, Software};
    use crate::world::{DEFAULT_DIR, DEFAULT_PLANE, auto_floor};
    use glam::vec2;

    fn checker() -> Texture {
        let pixels = (0..16)
            .map(|i| if (i % 4 + i / 4) % 2 == 0 { 0xFE_FEFE } else { 0x02_0202 })
            .collect();
        Texture::new("checker", 4, 4, pixels).unwrap()
    }

    #[test]
    fn flat_fill_splits_at_horizon() {
        let screen = Screen::new(4, 10);
        let mut cam = CameraState::new(vec2(2.5, 2.5), DEFAULT_DIR, DEFAULT_PLANE);
        cam.pitch = 2.0;
        let mut frame = vec![0; 40];
        cast_planes(&cam, &screen, None, None, &mut frame);

        // horizon at row 7; row 7 itself is ceiling
        assert!(frame[..32].iter().all(|&c| c == SKY));
        assert!(frame[32..].iter().all(|&c| c == GROUND));
    }

    #[test]
    fn missing_ceiling_texture_falls_back_to_sky() {
        let screen = Screen::new(8, 8);
        let cam = CameraState::new(vec2(2.5, 2.5), DEFAULT_DIR, DEFAULT_PLANE);
        let floor = checker();
        let mut frame = vec![0; 64];
        cast_planes(&cam, &screen, Some(&floor), None, &mut frame);

        assert!(frame[..40].iter().all(|&c| c == SKY));
        // floor texels are darkened
        assert!(
            frame[40..]
                .iter()
                .all(|&c| c == darken(0xFE_FEFE) || c == darken(0x02_0202))
        );
    }

    #[test]
    fn floor_texture_wraps_across_cells() {
        let screen = Screen::new(64, 48);
        let cam = CameraState::new(vec2(10.3, 7.8), DEFAULT_DIR, DEFAULT_PLANE);
        let floor = auto_floor();
        let mut frame = vec![0; 64 * 48];
        cast_planes(&cam, &screen, Some(&floor), Some(&floor), &mut frame);

        let palette: Vec<_> = floor.pixels().iter().map(|&c| darken(c)).collect();
        assert!(frame.iter().all(|c| palette.contains(c)));
    }

    #[test]
    fn rectangles_meet_at_horizon() {
        let screen = Screen::new(10, 10);
        let mut cam = CameraState::default();
        cam.pitch = -3.0;

        let mut sw = Software::default();
        sw.begin_frame(10, 10);
        sw.draw_all(&plane_calls(&cam, &screen));

        assert_eq!(sw.pixel(5, 1), Some(SKY));
        assert_eq!(sw.pixel(5, 2), Some(GROUND));
        assert_eq!(sw.pixel(9, 9), Some(GROUND));
    }

    #[test]
    fn ground_fills_screen_when_horizon_is_above_it() {
        let screen = Screen::new(8, 240);
        let mut cam = CameraState::default();
        cam.pitch = -200.0;

        let mut sw = Software::default();
        sw.begin_frame(8, 240);
        sw.draw_all(&plane_calls(&cam, &screen));

        // horizon at row -80
        for y in [0, 120, 239] {
            assert_eq!(sw.pixel(3, y), Some(GROUND), "row {y}");
        }
    }

    #[test]
    fn sky_fills_screen_when_horizon_is_below_it() {
        let screen = Screen::new(8, 100);
        let mut cam = CameraState::default();
        cam.pitch = 200.0;

        let mut sw = Software::default();
        sw.begin_frame(8, 100);
        sw.draw_all(&plane_calls(&cam, &screen));

        assert_eq!(sw.pixel(3, 0), Some(SKY));
        assert_eq!(sw.pixel(3, 99), Some(SKY));
    }
}
