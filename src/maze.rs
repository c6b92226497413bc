//! Wall layout generators.
//!
//! Provides two generators, both of which leave a traversable start to end
//! route behind:
//! - **Recursive division**: splits the grid with walls that each keep one
//!   hole, producing a maze.
//! - **Random obstacles**: every cell becomes a wall with a fixed
//!   probability.
//!
//! [`ensure_path_exists`] is the repair step that provides the guarantee.

use crate::grid::{Grid, Position};
use log::{debug, warn};
use pathfinding::prelude::bfs_reach;
use rand::Rng;

/// A rectangle of open cells still to be divided.
#[derive(Debug, Clone, Copy)]
struct Region {
    col: usize,
    row: usize,
    width: usize,
    height: usize,
}

/// Wall generator driving an [`Rng`].
pub struct MazeGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> MazeGen<R> {
    pub fn new(rng: R) -> Self {
        MazeGen { rng }
    }

    /// Replaces all walls with a recursive-division maze.
    ///
    /// Division walls sit on even coordinates and holes on odd ones, so a
    /// later wall never closes the hole of an earlier one. Start and end are
    /// never walled. Returns the number of walls left after repair.
    pub fn recursive_division(&mut self, grid: &mut Grid) -> usize {
        grid.clear_walls();
        grid.reset();

        let mut stack = vec![Region {
            col: 0,
            row: 0,
            width: grid.cols(),
            height: grid.rows(),
        }];
        let mut placed = 0;

        while let Some(region) = stack.pop() {
            if region.width < 2 || region.height < 2 {
                continue;
            }

            let prefer_horizontal = self.rng.gen_bool(0.5);

            let split = self
                .divide(grid, region, prefer_horizontal, &mut placed)
                .or_else(|| self.divide(grid, region, !prefer_horizontal, &mut placed));

            if let Some((first, second)) = split {
                stack.push(second);
                stack.push(first);
            }
        }

        debug!("Recursive division placed {} walls", placed);
        if ensure_path_exists(grid) {
            debug!("Recursive division needed a corridor repair");
        }
        grid.obstacles().len()
    }

    /// Draws one dividing wall across `region` and returns the two halves,
    /// or `None` when no even line fits strictly inside the region.
    fn divide(
        &mut self,
        grid: &mut Grid,
        region: Region,
        horizontal: bool,
        placed: &mut usize,
    ) -> Option<(Region, Region)> {
        let (lo, span, along_lo, along_span) = if horizontal {
            (region.row, region.height, region.col, region.width)
        } else {
            (region.col, region.width, region.row, region.height)
        };

        // Wall line must leave at least one line on each side.
        let walls: Vec<usize> = (lo + 1..lo + span - 1).filter(|v| v % 2 == 0).collect();
        if walls.is_empty() {
            return None;
        }
        let wall = walls[self.rng.gen_range(0..walls.len())];

        let holes: Vec<usize> = (along_lo..along_lo + along_span)
            .filter(|v| v % 2 == 1)
            .collect();
        let hole = if holes.is_empty() {
            along_lo + self.rng.gen_range(0..along_span)
        } else {
            holes[self.rng.gen_range(0..holes.len())]
        };

        for along in along_lo..along_lo + along_span {
            if along == hole {
                continue;
            }
            let pos = if horizontal {
                Position::new(along, wall)
            } else {
                Position::new(wall, along)
            };
            if grid.set_wall(pos, true) {
                *placed += 1;
            }
        }

        let halves = if horizontal {
            (
                Region { height: wall - region.row, ..region },
                Region {
                    row: wall + 1,
                    height: region.row + region.height - wall - 1,
                    ..region
                },
            )
        } else {
            (
                Region { width: wall - region.col, ..region },
                Region {
                    col: wall + 1,
                    width: region.col + region.width - wall - 1,
                    ..region
                },
            )
        };
        Some(halves)
    }

    /// Replaces all walls with a random field of the given density, then
    /// clears the endpoints' surroundings and repairs connectivity.
    ///
    /// A density outside `(0, 1)` leaves the grid untouched. Returns the
    /// number of walls remaining.
    pub fn random_obstacles(&mut self, grid: &mut Grid, density: f64) -> usize {
        if !(density > 0.0 && density < 1.0) {
            warn!("Ignoring obstacle density {} outside (0, 1)", density);
            return 0;
        }

        grid.clear_walls();
        grid.reset();

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let pos = Position::new(col, row);
                if pos == grid.start() || pos == grid.end() {
                    continue;
                }
                if self.rng.gen_bool(density) {
                    grid.set_wall(pos, true);
                }
            }
        }
        let generated = grid.obstacles().len();

        clear_breathing_room(grid);
        let repaired = ensure_path_exists(grid);
        debug!(
            "Random obstacles: density {:.2}, {} generated, {} kept, repaired: {}",
            density,
            generated,
            grid.obstacles().len(),
            repaired
        );
        grid.obstacles().len()
    }
}

/// Removes every wall in the 8-neighbourhood of start and end.
pub fn clear_breathing_room(grid: &mut Grid) {
    for center in [grid.start(), grid.end()] {
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                let (Some(col), Some(row)) = (
                    center.col.checked_add_signed(dc),
                    center.row.checked_add_signed(dr),
                ) else {
                    continue;
                };
                grid.set_wall(Position::new(col, row), false);
            }
        }
    }
}

/// Whether the end can be reached from the start with orthogonal moves.
pub fn is_connected(grid: &Grid) -> bool {
    let end = grid.end();
    bfs_reach(grid.start(), |p| grid.neighbors(*p, false)).any(|p| p == end)
}

/// Guarantees a start to end route. When the end is unreachable, carves a
/// 4-connected Bresenham corridor between the two. Returns whether a
/// repair was needed.
pub fn ensure_path_exists(grid: &mut Grid) -> bool {
    if is_connected(grid) {
        return false;
    }
    let line = corridor(grid.start(), grid.end());
    let mut cleared = 0;
    for &pos in &line {
        if grid.set_wall(pos, false) {
            cleared += 1;
        }
    }
    debug!("Carved corridor of {} cells, cleared {} walls", line.len(), cleared);
    true
}

/// Bresenham line from `from` to `to`. Whenever the line steps along both
/// axes at once the column step is emitted first, so consecutive cells are
/// always orthogonally adjacent.
pub fn corridor(from: Position, to: Position) -> Vec<Position> {
    let (mut x, mut y) = (from.col as i64, from.row as i64);
    let (x1, y1) = (to.col as i64, to.row as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = vec![from];
    while (x, y) != (x1, y1) {
        let e2 = 2 * err;
        let step_x = e2 >= dy;
        let step_y = e2 <= dx;
        if step_x {
            err += dy;
            x += sx;
        }
        if step_y {
            err += dx;
            y += sy;
            if step_x {
                cells.push(Position::new(x as usize, (y - sy) as usize));
            }
        }
        cells.push(Position::new(x as usize, y as usize));
    }
    cells
}
