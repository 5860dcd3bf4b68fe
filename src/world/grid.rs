// Occupancy grid shared read-only by the casters once generation is done.
// Cells live in one flat arena indexed `y * stride + x`.

use glam::Vec2;
use once_cell::sync::Lazy;

use crate::renderer::Rgba;

/// Occupancy code of a passable cell.
pub const EMPTY: u8 = 0;

/// Floor colour used by the minimap for passable cells.
pub const FLOOR_RGB: Rgb = Rgb([63, 63, 63]);

/// 3-channel wall colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb([r, g, b])
    }

    /// Pack into the frame-buffer format (0x00RRGGBB).
    #[inline]
    pub fn to_rgba(self) -> Rgba {
        let [r, g, b] = self.0;
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Halve every channel; used for y-side shading.
    #[inline]
    pub fn darken(self) -> Self {
        let [r, g, b] = self.0;
        Rgb([r / 2, g / 2, b / 2])
    }
}

/// Wall colours, index `i` belongs to wall type `i + 1`.
pub type Palette = Vec<Rgb>;

/// Eight-colour palette used when the caller does not bring its own.
pub static DEFAULT_PALETTE: Lazy<Palette> = Lazy::new(|| {
    vec![
        Rgb::new(255, 0, 0),
        Rgb::new(0, 255, 0),
        Rgb::new(0, 0, 255),
        Rgb::new(255, 255, 0),
        Rgb::new(255, 0, 255),
        Rgb::new(0, 255, 255),
        Rgb::new(127, 255, 255),
        Rgb::new(255, 127, 255),
    ]
});

/// Things that make a grid unusable for rendering.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("wall type count must be at least 1")]
    NoWallTypes,

    #[error("{0} wall types requested, at most 255 fit in a cell")]
    TooManyWallTypes(usize),

    #[error("palette holds {got} colours, {need} wall types requested")]
    PaletteTooShort { need: usize, got: usize },

    #[error("grid {width}x{height} is too small (need at least 2x2)")]
    TooSmall { width: usize, height: usize },

    #[error("grid {width}x{height} does not fit in memory")]
    TooLarge { width: usize, height: usize },

    #[error("cell data holds {got} entries, expected {expected}")]
    BadCellCount { expected: usize, got: usize },

    #[error("cell ({x}, {y}) holds wall type {value} but only {wall_types} exist")]
    UnknownWallType {
        x: usize,
        y: usize,
        value: u8,
        wall_types: usize,
    },

    #[error("border cell ({x}, {y}) is passable")]
    OpenBorder { x: usize, y: usize },

    #[error("grid has no passable interior cell")]
    NoFreeCell,
}

/// Occupancy matrix plus its wall palette.
///
/// * Cells exist for `0 ..= width` × `0 ..= height`.
/// * `0` is passable, `1 ..= wall_types()` is a wall material.
/// * Every border cell is a wall; the casters rely on this to stop
///   marching without bounds checks.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    palette: Palette,
    cells: Vec<u8>,
}

impl Grid {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Every cell set to `fill`. Generator substrate, not validated.
    pub(crate) fn filled(
        width: usize,
        height: usize,
        wall_types: usize,
        palette: &[Rgb],
        fill: u8,
    ) -> Result<Self, GridError> {
        if wall_types == 0 {
            return Err(GridError::NoWallTypes);
        }
        if wall_types > u8::MAX as usize {
            return Err(GridError::TooManyWallTypes(wall_types));
        }
        if palette.len() < wall_types {
            return Err(GridError::PaletteTooShort {
                need: wall_types,
                got: palette.len(),
            });
        }
        if width < 2 || height < 2 {
            return Err(GridError::TooSmall { width, height });
        }
        let count = Self::cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            palette: palette[..wall_types].to_vec(),
            cells: vec![fill; count],
        })
    }

    /// `(width + 1) * (height + 1)`, or `TooLarge` if that overflows.
    fn cell_count(width: usize, height: usize) -> Result<usize, GridError> {
        width
            .checked_add(1)
            .zip(height.checked_add(1))
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(GridError::TooLarge { width, height })
    }

    /// Empty interior enclosed by walls of type 1.
    pub fn bordered(
        width: usize,
        height: usize,
        wall_types: usize,
        palette: &[Rgb],
    ) -> Result<Self, GridError> {
        let mut grid = Self::filled(width, height, wall_types, palette, EMPTY)?;
        grid.seal_border(1);
        Ok(grid)
    }

    /// Rebuild a grid from raw parts (e.g. a grid file), checking every
    /// invariant the renderer depends on.
    pub fn from_cells(
        width: usize,
        height: usize,
        palette: Palette,
        cells: Vec<u8>,
    ) -> Result<Self, GridError> {
        let expected = Self::cell_count(width, height)?;
        if cells.len() != expected {
            return Err(GridError::BadCellCount {
                expected,
                got: cells.len(),
            });
        }
        let mut grid = Self::filled(width, height, palette.len(), &palette, EMPTY)?;
        grid.cells = cells;
        grid.validate()?;
        Ok(grid)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of distinct wall materials.
    #[inline]
    pub fn wall_types(&self) -> usize {
        self.palette.len()
    }

    #[inline]
    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Raw cells, row-major with stride `width + 1`.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    fn stride(&self) -> usize {
        self.width + 1
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x <= self.width && y <= self.height
    }

    #[inline]
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width || y == self.height
    }

    /// Occupancy code at `(x, y)`; `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if self.in_bounds(x, y) {
            Some(self.cells[y * self.stride() + x])
        } else {
            None
        }
    }

    /// Unchecked-by-contract lookup used by the casters.
    ///
    /// Panics outside the grid; a sealed border keeps the DDA inside.
    #[inline(always)]
    pub fn cell(&self, x: i32, y: i32) -> u8 {
        self.cells[y as usize * self.stride() + x as usize]
    }

    /// True if `(x, y)` exists and is passable.
    #[inline]
    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(EMPTY)
    }

    /// Passability of the cell containing world point `p`
    /// (coordinates truncated). Anything outside the grid is solid.
    #[inline]
    pub fn is_passable_at(&self, p: Vec2) -> bool {
        if p.x < 0.0 || p.y < 0.0 {
            return false;
        }
        self.is_passable(p.x as usize, p.y as usize)
    }

    /// Palette colour of wall type `wall` (1-based).
    #[inline]
    pub fn wall_color(&self, wall: u8) -> Option<Rgb> {
        (wall as usize)
            .checked_sub(1)
            .and_then(|i| self.palette.get(i))
            .copied()
    }

    /// First passable interior cell, scanning x-major.
    pub fn first_free_cell(&self) -> Option<(usize, usize)> {
        (1..self.width)
            .flat_map(|x| (1..self.height).map(move |y| (x, y)))
            .find(|&(x, y)| self.is_passable(x, y))
    }

    /// Check the invariants of a finished grid.
    pub fn validate(&self) -> Result<(), GridError> {
        let wall_types = self.wall_types();
        for y in 0..=self.height {
            for x in 0..=self.width {
                let value = self.cells[y * self.stride() + x];
                if value as usize > wall_types {
                    return Err(GridError::UnknownWallType {
                        x,
                        y,
                        value,
                        wall_types,
                    });
                }
                if value == EMPTY && self.is_border(x, y) {
                    return Err(GridError::OpenBorder { x, y });
                }
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Generator-only mutation
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: u8) {
        let stride = self.stride();
        self.cells[y * stride + x] = value;
    }

    /// Force every passable border cell to `wall`.
    pub(crate) fn seal_border(&mut self, wall: u8) {
        for x in 0..=self.width {
            for y in [0, self.height] {
                if self.get(x, y) == Some(EMPTY) {
                    self.set(x, y, wall);
                }
            }
        }
        for y in 1..self.height {
            for x in [0, self.width] {
                if self.get(x, y) == Some(EMPTY) {
                    self.set(x, y, wall);
                }
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
