//! # Grid files
//!
//! A finished grid saved to disk and loaded back.
//!
//! ```text
//! offset  size  field
//!      0     4  magic "GRID"
//!      4     2  format version (LE)
//!      6     4  body length in bytes (LE)
//!     10     n  body, bincode 2 (fixed-width ints, little endian)
//! ```
//!
//! Loading goes through [`Grid::from_cells`], so a file cannot smuggle in
//! an open border or an unknown wall type.

use bincode::{Decode, Encode, config};
use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};
use thiserror::Error;

use crate::world::{Grid, GridError, Rgb};

pub const MAGIC: &[u8; 4] = b"GRID";
pub const VERSION: u16 = 1;

/// Bodies larger than this are rejected before allocating.
const MAX_BODY: u32 = 64 << 20;

/// Grid-file errors.
#[derive(Error, Debug)]
pub enum MapFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file is not a grid file")]
    BadMagic,

    #[error("unsupported grid file version {0}")]
    BadVersion(u16),

    #[error("grid body of {0} bytes exceeds limit")]
    BodyTooLarge(usize),

    #[error("grid body: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("grid body: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("grid body has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// On-disk body.
#[derive(Encode, Decode, Debug, PartialEq)]
struct GridRecord {
    width: u32,
    height: u32,
    palette: Vec<[u8; 3]>,
    cells: Vec<u8>,
}

#[inline]
fn body_config() -> impl config::Config {
    config::standard()
        .with_fixed_int_encoding()
        .with_little_endian()
}

/// Serialise `grid` into any writer.
pub fn write_grid<W: Write>(mut out: W, grid: &Grid) -> Result<(), MapFileError> {
    let record = GridRecord {
        width: grid.width() as u32,
        height: grid.height() as u32,
        palette: grid.palette().iter().map(|c| c.0).collect(),
        cells: grid.cells().to_vec(),
    };
    let body = bincode::encode_to_vec(&record, body_config())?;
    if body.len() > MAX_BODY as usize {
        return Err(MapFileError::BodyTooLarge(body.len()));
    }

    out.write_all(MAGIC)?;
    out.write_u16::<LE>(VERSION)?;
    out.write_u32::<LE>(body.len() as u32)?;
    out.write_all(&body)?;
    out.flush()?;
    Ok(())
}

/// Parse and validate a grid from any reader.
pub fn read_grid<R: Read>(mut input: R) -> Result<Grid, MapFileError> {
    let mut magic = [0u8; 4];
    input.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(MapFileError::BadMagic);
    }

    let version = input.read_u16::<LE>()?;
    if version != VERSION {
        return Err(MapFileError::BadVersion(version));
    }

    let len = input.read_u32::<LE>()?;
    if len > MAX_BODY {
        return Err(MapFileError::BodyTooLarge(len as usize));
    }
    let mut body = vec![0u8; len as usize];
    input.read_exact(&mut body)?;

    let (record, read): (GridRecord, _) = bincode::decode_from_slice(&body, body_config())?;
    if read != body.len() {
        return Err(MapFileError::TrailingBytes(body.len() - read));
    }

    let palette = record.palette.into_iter().map(Rgb).collect();
    let grid = Grid::from_cells(
        record.width as usize,
        record.height as usize,
        palette,
        record.cells,
    )?;
    Ok(grid)
}

/// Write `grid` to `path`, replacing any existing file.
pub fn save<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<(), MapFileError> {
    let path = path.as_ref();
    write_grid(BufWriter::new(File::create(path)?), grid)?;
    log::info!(
        "saved {}x{} grid to {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(())
}

/// Read a grid previously written by [`save`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Grid, MapFileError> {
    let path = path.as_ref();
    let grid = read_grid(BufReader::new(File::open(path)?))?;
    log::info!(
        "loaded {}x{} grid from {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(grid)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
