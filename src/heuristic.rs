//! Distance estimates between two grid cells.
//!
//! All four estimates are admissible for unit-cost orthogonal movement.
//! With diagonal movement enabled (diagonal steps also cost 1) only
//! [`Heuristic::Chebyshev`] stays a lower bound; the others may overestimate.

use crate::grid::{Color, Position};
use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Heuristic {
    Manhattan,
    Euclidean,
    Octile,
    Chebyshev,
}

impl Heuristic {
    /// Every heuristic, in comparison order.
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Octile,
        Heuristic::Chebyshev,
    ];

    /// Estimated remaining cost from `a` to `b`.
    pub fn estimate(self, a: Position, b: Position) -> f64 {
        let dx = a.col.abs_diff(b.col) as f64;
        let dy = a.row.abs_diff(b.row) as f64;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Octile => (dx + dy) + (std::f64::consts::SQRT_2 - 2.0) * dx.min(dy),
            Heuristic::Chebyshev => dx.max(dy),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
            Heuristic::Octile => "octile",
            Heuristic::Chebyshev => "chebyshev",
        }
    }

    /// Colour used to tag cells explored under this heuristic in a comparison run.
    pub fn color(self) -> Color {
        match self {
            Heuristic::Manhattan => Color::new(231, 76, 60),
            Heuristic::Euclidean => Color::new(46, 204, 113),
            Heuristic::Octile => Color::new(52, 152, 219),
            Heuristic::Chebyshev => Color::new(241, 196, 15),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Free-function form of [`Heuristic::estimate`].
#[inline]
pub fn heuristic(kind: Heuristic, a: Position, b: Position) -> f64 {
    kind.estimate(a, b)
}
