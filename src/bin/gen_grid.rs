//! gen_grid.rs - headless grid generator.
//!
//! USAGE:
//! ```bash
//! cargo run --bin gen_grid -- --mode maze --size 21x15 --seed 3 \
//!     --save level.grid
//! ```
//!
//! Prints the grid as text (`.` floor, `1`-`9`/`a`-`z` wall types) and can
//! save it in the grid-file format `gridcast --load` reads.

use std::{
    fmt::Write as _,
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;

use gridcast::{
    mapfile,
    world::{DEFAULT_PALETTE, EMPTY, GenMode, Grid, GridGenerator},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Grid size in cells, e.g. `32x32`
    #[arg(long, value_name = "WxH", default_value = "32x32", value_parser = parse_size)]
    size: (usize, usize),

    /// Number of wall types, at most the palette size
    #[arg(long, default_value_t = 8)]
    walls: usize,

    /// Generation algorithm
    #[arg(long, value_enum, default_value_t = GenMode::Carve)]
    mode: GenMode,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Write the grid to this file
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Do not print the grid
    #[arg(long, short)]
    quiet: bool,
}

fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got `{s}`"))?;
    let parse = |v: &str| v.trim().parse::<usize>().map_err(|e| format!("`{v}`: {e}"));
    Ok((parse(w)?, parse(h)?))
}

/// One character per cell, one line per row.
fn render_ascii(grid: &Grid) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut out = String::with_capacity((grid.width() + 2) * (grid.height() + 1));
    for y in 0..=grid.height() {
        for x in 0..=grid.width() {
            let c = match grid.get(x, y) {
                Some(EMPTY) | None => '.',
                Some(v) => DIGITS.get(v as usize).map_or('#', |&d| d as char),
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let seed = opts.seed.unwrap_or_else(rand::random);
    let (w, h) = opts.size;
    let grid = GridGenerator::seeded(seed).generate(w, h, opts.walls, &DEFAULT_PALETTE, opts.mode)?;

    if !opts.quiet {
        let mut header = String::new();
        writeln!(header, "{:?} {w}x{h} seed {seed}", opts.mode)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(header.as_bytes())?;
        stdout.write_all(render_ascii(&grid).as_bytes())?;
    }

    if let Some(path) = &opts.save {
        mapfile::save(path, &grid)?;
    }
    Ok(())
}
