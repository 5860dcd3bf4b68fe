//! Debug minimap: the whole grid as coloured tiles centred on screen, with
//! the player's cell drawn on top.

use crate::{
    renderer::{DrawCall, Rgba},
    world::{CameraState, EMPTY, FLOOR_RGB, Grid},
};

/// Side of one minimap tile in pixels.
pub const TILE_SIZE: i32 = 10;

const OUTLINE: Rgba = 0x00_000000;
const PLAYER: Rgba = 0x00_000000;

/// Primitives drawing `grid` and the camera's cell on a `w`×`h` screen.
pub fn minimap(grid: &Grid, cam: &CameraState, w: usize, h: usize) -> Vec<DrawCall> {
    let origin_x = (w as i32 - grid.width() as i32 * TILE_SIZE) / 2;
    let origin_y = (h as i32 - grid.height() as i32 * TILE_SIZE) / 2;

    let mut calls = Vec::with_capacity(grid.cells().len() + 2);
    for x in 0..=grid.width() {
        for y in 0..=grid.height() {
            let color = match grid.get(x, y) {
                Some(EMPTY) | None => FLOOR_RGB,
                Some(wall) => grid.wall_color(wall).unwrap_or(FLOOR_RGB),
            };
            calls.push(DrawCall::Rect {
                x: origin_x + x as i32 * TILE_SIZE,
                y: origin_y + y as i32 * TILE_SIZE,
                w: TILE_SIZE,
                h: TILE_SIZE,
                color: color.to_rgba(),
            });
        }
    }

    calls.push(DrawCall::Outline {
        x: origin_x,
        y: origin_y,
        w: TILE_SIZE * (grid.width() as i32 + 1),
        h: TILE_SIZE * (grid.height() as i32 + 1),
        color: OUTLINE,
    });

    let (cx, cy) = cam.cell();
    calls.push(DrawCall::Rect {
        x: origin_x + cx * TILE_SIZE,
        y: origin_y + cy * TILE_SIZE,
        w: TILE_SIZE,
        h: TILE_SIZE,
        color: PLAYER,
    });
    calls
}
