use crate::algorithms::Algorithm;
use crate::grid::Position;
use crate::heuristic::Heuristic;
use std::time::Duration;

/// Everything a single search needs besides the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    pub allow_diagonal: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            algorithm: Algorithm::AStar,
            heuristic: Heuristic::Manhattan,
            allow_diagonal: false,
        }
    }
}

/// Result of one call to [`SearchRun::advance`](crate::algorithms::SearchRun::advance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Success,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Ready,
    Running,
    Success,
    Exhausted,
    Cancelled,
}

impl SearchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchStatus::Success | SearchStatus::Exhausted | SearchStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    pub status: SearchStatus,
    /// Cells in expansion order.
    pub visited: Vec<Position>,
    /// Start to end inclusive; empty unless `status` is `Success`.
    pub path: Vec<Position>,
    pub nodes_visited: usize,
    /// Number of cells on `path`, endpoints included; 0 when not found.
    pub path_length: usize,
    /// Time spent inside search steps, excluding any pacing delay.
    pub duration: Duration,
    /// `false` when the run was cancelled before reaching a terminal state.
    pub is_final: bool,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.status == SearchStatus::Success
    }
}

/// Scores of one cell as seen by a running search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeScore {
    pub g: f64,
    pub h: f64,
    pub f: f64,
    pub previous: Option<Position>,
    pub closed: bool,
}

/// Per-run scratch table, one slot per grid cell.
#[derive(Debug, Clone)]
pub(crate) struct SearchState {
    pub(crate) g: Vec<f64>,
    pub(crate) h: Vec<f64>,
    pub(crate) f: Vec<f64>,
    /// Priority the cell currently holds in the open set.
    pub(crate) key: Vec<f64>,
    pub(crate) previous: Vec<Option<usize>>,
    pub(crate) discovered: Vec<bool>,
    pub(crate) closed: Vec<bool>,
    /// Insertion sequence of the first push, reused on priority updates.
    pub(crate) seq: Vec<u64>,
}

impl SearchState {
    pub(crate) fn new(len: usize) -> Self {
        SearchState {
            g: vec![f64::INFINITY; len],
            h: vec![0.0; len],
            f: vec![f64::INFINITY; len],
            key: vec![f64::INFINITY; len],
            previous: vec![None; len],
            discovered: vec![false; len],
            closed: vec![false; len],
            seq: vec![0; len],
        }
    }
}
