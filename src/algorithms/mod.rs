//! Frontier-driven grid searches.
//!
//! | Algorithm | Frontier | Pops | Relaxation |
//! |---|---|---|---|
//! | A* | open set | min `g + h` | lower `g` wins |
//! | Dijkstra | open set | min `g` | lower `g` wins |
//! | BFS | FIFO queue | front | first discovery only |
//! | DFS | LIFO stack | top | first discovery only |
//! | Greedy | open set | min `h` | first discovery only |
//!
//! Equal priorities are broken by insertion order, so repeated runs on the
//! same grid yield identical traces.

pub mod common;
mod frontier;
pub mod search;

pub use common::{NodeScore, SearchConfig, SearchResult, SearchStatus, StepOutcome};
pub use search::SearchRun;

use crate::grid::{Grid, Position};
use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    #[value(name = "astar")]
    AStar,
    Dijkstra,
    Bfs,
    Dfs,
    Greedy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Greedy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "astar",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Greedy => "greedy",
        }
    }

    /// Whether the returned path is always a shortest one (given an
    /// admissible heuristic for A*).
    pub fn is_optimal(self) -> bool {
        matches!(self, Algorithm::AStar | Algorithm::Dijkstra | Algorithm::Bfs)
    }

    /// Whether the heuristic influences expansion order.
    pub fn uses_heuristic(self) -> bool {
        matches!(self, Algorithm::AStar | Algorithm::Greedy)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs a search between the grid's start and end to completion.
pub fn run(grid: &Grid, config: SearchConfig) -> SearchResult {
    SearchRun::new(grid, config).run_to_end()
}

/// Runs a search between two arbitrary cells to completion.
pub fn run_between(
    grid: &Grid,
    start: Position,
    end: Position,
    config: SearchConfig,
) -> SearchResult {
    SearchRun::between(grid, start, end, config).run_to_end()
}
