//! Wall casting: one DDA ray per screen column.
//!
//! The ray starts in the camera's cell and steps to whichever grid line is
//! nearer until it enters a wall. The distance used for projection is the
//! accumulated side distance minus the last step, i.e. the distance along
//! the facing axis, which keeps flat walls flat on screen.

use glam::{IVec2, Vec2};

use crate::{
    engine::types::{RayHit, Screen, Side, WallStrip},
    renderer::{DrawCall, Rgba},
    world::{CameraState, EMPTY, Grid, Rgb, TexGroup, darken},
};

/// Stand-in step length for an axis the ray never advances on.
const NO_STEP: f32 = 1e30;

/// Guards the strip projection against a camera touching a wall.
const MIN_PERP_DIST: f32 = 1e-4;

/// Colour for a wall type missing from the palette.
const UNKNOWN_WALL: Rgb = Rgb([255, 255, 255]);

/// March `ray` from the camera until it enters a wall.
///
/// Requires a sealed border; the loop has no bounds checks.
pub fn cast_ray(cam: &CameraState, grid: &Grid, ray: Vec2) -> RayHit {
    let pos = cam.pos;
    let (mut map_x, mut map_y) = cam.cell();

    /* length of ray from one x or y-side to the next */
    let delta = Vec2::new(
        if ray.x == 0.0 { NO_STEP } else { (1.0 / ray.x).abs() },
        if ray.y == 0.0 { NO_STEP } else { (1.0 / ray.y).abs() },
    );

    /* step direction and distance to the first grid line */
    let (step_x, mut side_x) = if ray.x < 0.0 {
        (-1, (pos.x - map_x as f32) * delta.x)
    } else {
        (1, (map_x as f32 + 1.0 - pos.x) * delta.x)
    };
    let (step_y, mut side_y) = if ray.y < 0.0 {
        (-1, (pos.y - map_y as f32) * delta.y)
    } else {
        (1, (map_y as f32 + 1.0 - pos.y) * delta.y)
    };

    let (side, wall) = loop {
        let side = if side_x < side_y {
            side_x += delta.x;
            map_x += step_x;
            Side::X
        } else {
            side_y += delta.y;
            map_y += step_y;
            Side::Y
        };
        let wall = grid.cell(map_x, map_y);
        if wall != EMPTY {
            break (side, wall);
        }
    };

    let perp_dist = match side {
        Side::X => side_x - delta.x,
        Side::Y => side_y - delta.y,
    };

    RayHit {
        cell: IVec2::new(map_x, map_y),
        wall,
        side,
        perp_dist,
        ray,
    }
}

/// Project a hit onto screen column `x`.
///
/// The strip is centred on the pitched horizon and shifted by `z / dist`,
/// so eye height changes produce parallax.
pub fn wall_strip(cam: &CameraState, screen: &Screen, x: usize, hit: RayHit) -> WallStrip {
    let dist = hit.perp_dist.max(MIN_PERP_DIST);
    let line_height = (screen.h as f32 / dist) as i32;
    let centre = screen.horizon(cam.pitch) + cam.z / dist;
    let half = line_height as f32 / 2.0;

    WallStrip {
        x,
        hit,
        line_height,
        draw_start: ((centre - half) as i32).max(0),
        draw_end: ((centre + half) as i32).min(screen.h as i32 - 1),
    }
}

/// Cast every screen column.
pub fn cast_columns<'a>(
    cam: &'a CameraState,
    grid: &'a Grid,
    screen: &'a Screen,
) -> impl Iterator<Item = WallStrip> + 'a {
    (0..screen.w).map(move |x| {
        let hit = cast_ray(cam, grid, cam.ray_dir(x, screen.w));
        wall_strip(cam, screen, x, hit)
    })
}

/// Palette colour of a strip, halved on y-sides.
fn flat_colour(grid: &Grid, hit: &RayHit) -> Rgb {
    let color = grid.wall_color(hit.wall).unwrap_or(UNKNOWN_WALL);
    match hit.side {
        Side::X => color,
        Side::Y => color.darken(),
    }
}

/// Flat-colour walls as one vertical line per column.
pub fn cast_walls_flat(cam: &CameraState, grid: &Grid, screen: &Screen, out: &mut Vec<DrawCall>) {
    out.extend(cast_columns(cam, grid, screen).map(|strip| DrawCall::VLine {
        x: strip.x as i32,
        y0: strip.draw_start,
        y1: strip.draw_end,
        color: flat_colour(grid, &strip.hit).to_rgba(),
    }));
}

/// Walls written into `frame`: textured when `walls` is given, palette
/// coloured otherwise.
pub fn cast_walls_buffered(
    cam: &CameraState,
    grid: &Grid,
    screen: &Screen,
    walls: Option<&TexGroup>,
    frame: &mut [Rgba],
) {
    for strip in cast_columns(cam, grid, screen) {
        match walls {
            Some(group) => textured_column(cam, screen, group, &strip, frame),
            None => {
                let color = flat_colour(grid, &strip.hit).to_rgba();
                for y in strip.draw_start..=strip.draw_end {
                    frame[y as usize * screen.w + strip.x] = color;
                }
            }
        }
    }
}

/// Sample one wall texture column into the frame buffer.
fn textured_column(
    cam: &CameraState,
    screen: &Screen,
    group: &TexGroup,
    strip: &WallStrip,
    frame: &mut [Rgba],
) {
    let hit = &strip.hit;
    let tex = group.for_wall(hit.wall);
    let dist = hit.perp_dist.max(MIN_PERP_DIST);

    /* where exactly the wall was hit, along the wall face */
    let mut wall_x = match hit.side {
        Side::X => cam.pos.y + dist * hit.ray.y,
        Side::Y => cam.pos.x + dist * hit.ray.x,
    };
    wall_x -= wall_x.floor();

    /* x coordinate on the texture, mirrored so faces read left to right */
    let tex_w = tex.w() as i32;
    let mut tex_x = (wall_x * tex_w as f32) as i32;
    let mirrored = match hit.side {
        Side::X => hit.ray.x > 0.0,
        Side::Y => hit.ray.y < 0.0,
    };
    if mirrored {
        tex_x = tex_w - tex_x - 1;
    }

    /* texels per screen pixel, starting where a clipped strip resumes */
    let line_height = strip.line_height.max(1) as f32;
    let step = tex.h() as f32 / line_height;
    let mut tex_pos = (strip.draw_start as f32 - cam.pitch - cam.z / dist - screen.half_h
        + line_height / 2.0)
        * step;

    for y in strip.draw_start..=strip.draw_end {
        let tex_y = tex_pos as i32;
        tex_pos += step;
        let mut color = tex.sample_wrapped(tex_x, tex_y);
        if hit.side == Side::Y {
            color = darken(color);
        }
        frame[y as usize * screen.w + strip.x] = color;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
