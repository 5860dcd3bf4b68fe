//! First-person walk through a generated grid.
//!
//! ```bash
//! cargo run --release -- --mode maze --grid 33x33 --seed 7
//! cargo run --release -- --load level.grid --flat
//! ```
//!
//! WASD move, mouse or arrow keys look, Space jump, LeftShift crouch,
//! F1 minimap, F3 fps in the title bar, Esc quit.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use gridcast::{
    engine::Engine,
    mapfile,
    renderer::Software,
    sim::{self, Controls, FrameClock, InputSnapshot, TARGET_FPS},
    world::{CameraState, DEFAULT_PALETTE, GenMode, Grid, GridGenerator, TexFlags},
};

const TITLE: &str = "Raycaster - Demo";

/// Pixels of look motion one frame of a held arrow key is worth.
const ARROW_LOOK: i32 = 4;

/// Surfaces that get a procedural texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TexKind {
    Walls,
    Floor,
    Ceiling,
}

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Window size in pixels
    #[arg(long, value_name = "WxH", default_value = "640x480", value_parser = parse_pair)]
    window: (usize, usize),

    /// Grid size in cells (the border is included)
    #[arg(long, value_name = "WxH", default_value = "32x32", value_parser = parse_pair)]
    grid: (usize, usize),

    /// Number of wall types, at most the palette size
    #[arg(long, default_value_t = 8)]
    walls: usize,

    /// Generation algorithm
    #[arg(long, value_enum, default_value_t = GenMode::Carve)]
    mode: GenMode,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Procedurally textured surfaces
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [TexKind::Walls, TexKind::Floor])]
    tex: Vec<TexKind>,

    /// Flat-colour rendering, no textures at all
    #[arg(long, conflicts_with = "tex")]
    flat: bool,

    /// Frame-rate cap
    #[arg(long, default_value_t = TARGET_FPS)]
    fps: u32,

    /// Preferred spawn cell, e.g. `3,4`
    #[arg(long, value_name = "X,Y", value_parser = parse_pair)]
    spawn: Option<(usize, usize)>,

    /// Play a saved grid instead of generating one
    #[arg(long, value_name = "FILE", conflicts_with_all = ["mode", "seed", "walls"])]
    load: Option<PathBuf>,

    /// Save the generated grid before playing
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
}

/// Accepts `AxB` or `A,B`.
fn parse_pair(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(['x', ','])
        .ok_or_else(|| format!("expected two numbers like 32x32, got `{s}`"))?;
    let parse = |v: &str| v.trim().parse::<usize>().map_err(|e| format!("`{v}`: {e}"));
    Ok((parse(a)?, parse(b)?))
}

impl Opts {
    fn tex_flags(&self) -> TexFlags {
        if self.flat {
            return TexFlags::empty();
        }
        self.tex.iter().fold(TexFlags::empty(), |flags, kind| {
            flags
                | match kind {
                    TexKind::Walls => TexFlags::AUTO_WALL,
                    TexKind::Floor => TexFlags::AUTO_FLOOR,
                    TexKind::Ceiling => TexFlags::AUTO_CEILING,
                }
        })
    }

    fn build_grid(&self) -> anyhow::Result<Grid> {
        if let Some(path) = &self.load {
            return Ok(mapfile::load(path)?);
        }
        let seed = self.seed.unwrap_or_else(rand::random);
        log::info!("generating {:?} grid, seed {seed}", self.mode);
        let (w, h) = self.grid;
        let grid =
            GridGenerator::seeded(seed).generate(w, h, self.walls, &DEFAULT_PALETTE, self.mode)?;
        if let Some(path) = &self.save {
            mapfile::save(path, &grid)?;
        }
        Ok(grid)
    }
}

/// Sample held keys and pending look motion for one frame.
fn poll_input(win: &Window, input: &mut InputSnapshot, mouse: &mut Option<(f32, f32)>) {
    const HELD: [(Key, Controls); 5] = [
        (Key::W, Controls::UP),
        (Key::S, Controls::DOWN),
        (Key::A, Controls::LEFT),
        (Key::D, Controls::RIGHT),
        (Key::LeftShift, Controls::CROUCH),
    ];

    input.controls = Controls::empty();
    for (key, bit) in HELD {
        input.controls.set(bit, win.is_key_down(key));
    }
    input
        .controls
        .set(Controls::JUMP, win.is_key_pressed(Key::Space, KeyRepeat::No));

    if win.is_key_pressed(Key::F1, KeyRepeat::No) {
        input.overlays.map = !input.overlays.map;
    }
    if win.is_key_pressed(Key::F3, KeyRepeat::No) {
        input.overlays.fps = !input.overlays.fps;
    }

    /* mouse motion since the previous frame */
    let now = win.get_mouse_pos(MouseMode::Pass);
    if let (Some((x0, y0)), Some((x1, y1))) = (*mouse, now) {
        input.look.push((x1 - x0) as i32, (y1 - y0) as i32);
    }
    *mouse = now;

    /* arrow keys look too */
    let axis = |neg: Key, pos: Key| {
        (win.is_key_down(pos) as i32 - win.is_key_down(neg) as i32) * ARROW_LOOK
    };
    input
        .look
        .push(axis(Key::Left, Key::Right), axis(Key::Up, Key::Down));
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let grid = opts.build_grid()?;
    let mut camera = CameraState::spawn(&grid, opts.spawn)?;
    log::info!(
        "{}x{} grid, spawn at ({:.1}, {:.1})",
        grid.width(),
        grid.height(),
        camera.pos.x,
        camera.pos.y
    );

    let (w, h) = opts.window;
    let mut engine = Engine::new(Software::default(), w, h, opts.tex_flags());
    log::info!("render mode {:?}", engine.mode());

    let mut win = Window::new(TITLE, w, h, WindowOptions::default())?;

    let mut clock = FrameClock::new(opts.fps);
    let mut input = InputSnapshot::default();
    let mut mouse = None;
    let mut shown_fps = None;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = clock.tick();

        poll_input(&win, &mut input, &mut mouse);
        sim::step(&mut camera, &mut input, &grid, dt);

        let mut shown = Ok(());
        engine.render_frame(&camera, &grid, input.overlays, |fb, w, h| {
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        let fps = input.overlays.fps.then(|| clock.fps());
        if fps != shown_fps {
            match fps {
                Some(fps) => win.set_title(&format!("{TITLE} - {fps} fps")),
                None => win.set_title(TITLE),
            }
            shown_fps = fps;
        }

        clock.limit();
    }
    Ok(())
}
