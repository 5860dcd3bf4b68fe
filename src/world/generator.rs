//! Procedural grid generation.
//!
//! Every mode starts from a solid substrate (or a hollow box) and ends with
//! [`Grid::seal_border`], so the casters can march without bounds checks.
//!
//! * [`GenMode::Carve`] is a drunkard's walk: cheap, always terminates in
//!   practice, but only guarantees that the far corner is reachable.
//! * [`GenMode::Maze`] is a randomised recursive backtracker over the odd
//!   cells; every odd interior cell is reachable from `(1, 1)`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use smallvec::SmallVec;

use super::grid::{EMPTY, Grid, GridError, Rgb};

/// How the interior of a new grid is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GenMode {
    /// Empty interior, border of wall type 1.
    Bordered,
    /// Every cell is wall type 1.
    Solid,
    /// Nested rings, one random wall type per ring. Fully solid.
    Rings,
    /// Random walk from `(1, 1)` until `(width-1, height-1)` is cleared.
    #[default]
    Carve,
    /// Spanning tree over the odd cells.
    Maze,
}

/// Unit steps, West/East/North/South.
const STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Owns the random source so a seed reproduces the same map.
pub struct GridGenerator<R: Rng> {
    rng: R,
}

impl GridGenerator<Pcg32> {
    /// Deterministic generator for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GridGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Build a finished, border-sealed grid.
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        wall_types: usize,
        palette: &[Rgb],
        mode: GenMode,
    ) -> Result<Grid, GridError> {
        let grid = match mode {
            GenMode::Bordered => Grid::bordered(width, height, wall_types, palette)?,
            GenMode::Solid => Grid::filled(width, height, wall_types, palette, 1)?,
            GenMode::Rings => self.rings(width, height, wall_types, palette)?,
            GenMode::Carve => {
                let mut grid = self.rings(width, height, wall_types, palette)?;
                self.carve(&mut grid);
                grid
            }
            GenMode::Maze => {
                let mut grid = self.rings(width, height, wall_types, palette)?;
                self.maze(&mut grid);
                grid
            }
        };
        debug_assert!(grid.validate().is_ok());
        log::info!("generated {width}x{height} grid ({mode:?}, {wall_types} wall types)");
        Ok(grid)
    }

    fn random_wall(&mut self, wall_types: usize) -> u8 {
        self.rng.random_range(1..=wall_types as u8)
    }

    /// Solid grid made of concentric rings, ring `r` being every cell whose
    /// distance to the nearest edge is `r`.
    fn rings(
        &mut self,
        width: usize,
        height: usize,
        wall_types: usize,
        palette: &[Rgb],
    ) -> Result<Grid, GridError> {
        let mut grid = Grid::filled(width, height, wall_types, palette, 1)?;
        let ring_count = width.min(height) / 2 + 1;
        let walls: Vec<u8> = (0..ring_count)
            .map(|_| self.random_wall(wall_types))
            .collect();

        for y in 0..=height {
            for x in 0..=width {
                let ring = x.min(y).min(width - x).min(height - y);
                grid.set(x, y, walls[ring]);
            }
        }
        Ok(grid)
    }

    /// Drunkard's walk over the interior. No iteration cap: the walk is a
    /// recurrent random walk on a finite set, so it reaches the target.
    fn carve(&mut self, grid: &mut Grid) {
        let (max_x, max_y) = (grid.width() - 1, grid.height() - 1);
        let target = (max_x, max_y);
        let mut cur = (1usize, 1usize);
        let mut steps = 0usize;

        loop {
            grid.set(cur.0, cur.1, EMPTY);
            if grid.is_passable(target.0, target.1) {
                break;
            }
            // retry until the step stays inside the interior
            loop {
                let (dx, dy) = STEPS[self.rng.random_range(0..STEPS.len())];
                let nx = cur.0.wrapping_add_signed(dx);
                let ny = cur.1.wrapping_add_signed(dy);
                if (1..=max_x).contains(&nx) && (1..=max_y).contains(&ny) {
                    cur = (nx, ny);
                    break;
                }
            }
            steps += 1;
        }

        grid.seal_border(1);
        log::debug!("carve walk reached {target:?} after {steps} steps");
    }

    /// Randomised recursive backtracker on odd coordinates, knocking out the
    /// wall cell between each pair of linked cells.
    fn maze(&mut self, grid: &mut Grid) {
        let (max_x, max_y) = (grid.width() - 1, grid.height() - 1);
        let is_node = |x: usize, y: usize| {
            x % 2 == 1 && y % 2 == 1 && (1..=max_x).contains(&x) && (1..=max_y).contains(&y)
        };

        let stride = grid.width() + 1;
        let mut visited = vec![false; stride * (grid.height() + 1)];
        let mut stack = vec![(1usize, 1usize)];
        visited[stride + 1] = true;
        grid.set(1, 1, EMPTY);

        while let Some(&(cx, cy)) = stack.last() {
            let options: SmallVec<[(usize, usize); 4]> = STEPS
                .iter()
                .map(|&(dx, dy)| {
                    (
                        cx.wrapping_add_signed(dx * 2),
                        cy.wrapping_add_signed(dy * 2),
                    )
                })
                .filter(|&(nx, ny)| is_node(nx, ny) && !visited[ny * stride + nx])
                .collect();

            if options.is_empty() {
                stack.pop();
                continue;
            }

            let (nx, ny) = options[self.rng.random_range(0..options.len())];
            visited[ny * stride + nx] = true;
            grid.set((cx + nx) / 2, (cy + ny) / 2, EMPTY);
            grid.set(nx, ny, EMPTY);
            stack.push((nx, ny));
        }

        grid.seal_border(1);
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::DEFAULT_PALETTE;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn generate(w: usize, h: usize, walls: usize, mode: GenMode, seed: u64) -> Grid {
        GridGenerator::seeded(seed)
            .generate(w, h, walls, &DEFAULT_PALETTE, mode)
            .unwrap()
    }

    fn border_sealed(grid: &Grid) -> bool {
        (0..=grid.height()).all(|y| {
            (0..=grid.width())
                .filter(|&x| grid.is_border(x, y))
                .all(|x| grid.get(x, y) != Some(EMPTY))
        })
    }

    fn reachable_from(grid: &Grid, start: (usize, usize)) -> Vec<(usize, usize)> {
        let mut seen = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in STEPS {
                let n = (x.wrapping_add_signed(dx), y.wrapping_add_signed(dy));
                if grid.is_passable(n.0, n.1) && !seen.contains(&n) {
                    seen.push(n);
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    #[test]
    fn solid_fill_is_all_ones() {
        let grid = generate(4, 4, 1, GenMode::Solid, 7);
        assert!(grid.cells().iter().all(|&c| c == 1));
    }

    #[test]
    fn single_type_rings_are_all_ones() {
        let grid = generate(4, 4, 1, GenMode::Rings, 7);
        assert!(grid.cells().iter().all(|&c| c == 1));
    }

    #[test]
    fn rings_share_one_type_per_ring() {
        let grid = generate(9, 9, 8, GenMode::Rings, 3);
        for y in 0..=9 {
            for x in 0..=9 {
                let ring = x.min(y).min(9 - x).min(9 - y);
                assert_eq!(grid.get(x, y), grid.get(ring, ring), "cell ({x}, {y})");
                assert_ne!(grid.get(x, y), Some(EMPTY));
            }
        }
    }

    #[test]
    fn carve_clears_start_and_far_corner() {
        let grid = generate(8, 8, 2, GenMode::Carve, 42);
        assert!(grid.is_passable(1, 1));
        assert!(grid.is_passable(7, 7));
        assert!(border_sealed(&grid));
        assert!(reachable_from(&grid, (1, 1)).contains(&(7, 7)));
    }

    #[test]
    fn carve_on_minimal_grid_terminates() {
        let grid = generate(2, 2, 1, GenMode::Carve, 0);
        assert!(grid.is_passable(1, 1));
        assert_eq!(grid.cells().iter().filter(|&&c| c == EMPTY).count(), 1);
    }

    #[test]
    fn same_seed_same_grid() {
        let a = generate(16, 12, 8, GenMode::Carve, 99);
        let b = generate(16, 12, 8, GenMode::Carve, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn maze_reaches_every_odd_cell() {
        let grid = generate(15, 11, 4, GenMode::Maze, 5);
        let reached = reachable_from(&grid, (1, 1));
        for y in (1..11).step_by(2) {
            for x in (1..15).step_by(2) {
                assert!(reached.contains(&(x, y)), "odd cell ({x}, {y}) unreachable");
            }
        }
        assert!(border_sealed(&grid));
    }

    #[test]
    fn zero_wall_types_fails() {
        let err = GridGenerator::seeded(1)
            .generate(8, 8, 0, &DEFAULT_PALETTE, GenMode::Carve)
            .unwrap_err();
        assert_eq!(err, GridError::NoWallTypes);
    }

    proptest! {
        #[test]
        fn every_mode_seals_the_border(
            w in 2usize..24,
            h in 2usize..24,
            walls in 1usize..=8,
            seed in any::<u64>(),
            mode in prop_oneof![
                Just(GenMode::Bordered),
                Just(GenMode::Solid),
                Just(GenMode::Rings),
                Just(GenMode::Carve),
                Just(GenMode::Maze),
            ],
        ) {
            let grid = generate(w, h, walls, mode, seed);
            prop_assert!(border_sealed(&grid));
            prop_assert!(grid.cells().iter().all(|&c| c as usize <= walls));
        }
    }
}
