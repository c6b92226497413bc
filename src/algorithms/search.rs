use crate::algorithms::common::{
    NodeScore, SearchConfig, SearchResult, SearchState, SearchStatus, StepOutcome,
};
use crate::algorithms::frontier::Frontier;
use crate::algorithms::Algorithm;
use crate::grid::{neighbors_in, Grid, Position};
use log::trace;
use std::time::{Duration, Instant};

/// Every move costs one, diagonal or not.
const STEP_COST: f64 = 1.0;

/// An in-progress search, advanced one expansion at a time.
///
/// The run copies the grid's walkability when it is created, so edits made
/// to the grid afterwards only apply to the next run.
pub struct SearchRun {
    config: SearchConfig,
    cols: usize,
    rows: usize,
    walkable: Vec<bool>,
    start: Position,
    end: Position,
    end_idx: Option<usize>,
    state: SearchState,
    frontier: Frontier,
    next_seq: u64,
    status: SearchStatus,
    visited: Vec<Position>,
    discovered: Vec<Position>,
    path: Vec<Position>,
    elapsed: Duration,
}

impl SearchRun {
    /// Prepares a search between the grid's own start and end.
    pub fn new(grid: &Grid, config: SearchConfig) -> Self {
        Self::between(grid, grid.start(), grid.end(), config)
    }

    pub fn between(grid: &Grid, start: Position, end: Position, config: SearchConfig) -> Self {
        let mut run = SearchRun {
            config,
            cols: grid.cols(),
            rows: grid.rows(),
            walkable: grid.walkable_mask(),
            start,
            end,
            end_idx: grid.index(end),
            state: SearchState::new(grid.len()),
            frontier: Frontier::for_algorithm(config.algorithm),
            next_seq: 0,
            status: SearchStatus::Ready,
            visited: Vec::new(),
            discovered: Vec::new(),
            path: Vec::new(),
            elapsed: Duration::ZERO,
        };

        if let Some(si) = grid.index(start) {
            let h = run.estimate(start);
            run.state.g[si] = 0.0;
            run.state.h[si] = h;
            run.state.f[si] = h;
            run.open(si);
        }
        run
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Cells expanded so far, in order.
    pub fn visited(&self) -> &[Position] {
        &self.visited
    }

    /// Cells first discovered by the most recent step.
    pub fn last_discovered(&self) -> &[Position] {
        &self.discovered
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Scores recorded for `pos`, or `None` if it has not been discovered.
    pub fn score(&self, pos: Position) -> Option<NodeScore> {
        let i = self.index(pos)?;
        if !self.state.discovered[i] {
            return None;
        }
        Some(NodeScore {
            g: self.state.g[i],
            h: self.state.h[i],
            f: self.state.f[i],
            previous: self.state.previous[i].map(|p| self.position(p)),
            closed: self.state.closed[i],
        })
    }

    /// Pops one cell and relaxes its neighbours.
    ///
    /// Success is reported when the end is popped, not when it is first
    /// discovered. Once terminal, further calls repeat the terminal outcome.
    pub fn advance(&mut self) -> StepOutcome {
        match self.status {
            SearchStatus::Success => return StepOutcome::Success,
            SearchStatus::Exhausted | SearchStatus::Cancelled => return StepOutcome::Exhausted,
            SearchStatus::Ready | SearchStatus::Running => {}
        }

        let started = Instant::now();
        let outcome = self.expand_next();
        self.elapsed += started.elapsed();
        outcome
    }

    /// Runs to a terminal state and returns the result.
    pub fn run_to_end(mut self) -> SearchResult {
        while self.advance() == StepOutcome::Continue {}
        self.result()
    }

    /// Current state as a result. Only final once the run is terminal.
    pub fn result(&self) -> SearchResult {
        let final_status = matches!(self.status, SearchStatus::Success | SearchStatus::Exhausted);
        SearchResult {
            algorithm: self.config.algorithm,
            heuristic: self.config.heuristic,
            status: self.status,
            visited: self.visited.clone(),
            path: self.path.clone(),
            nodes_visited: self.visited.len(),
            path_length: self.path.len(),
            duration: self.elapsed,
            is_final: final_status,
        }
    }

    /// Stops the run where it is. The partial trace stays available.
    pub fn cancel(&mut self) -> SearchResult {
        if !self.status.is_terminal() {
            self.status = SearchStatus::Cancelled;
        }
        let mut result = self.result();
        result.is_final = false;
        result
    }

    fn expand_next(&mut self) -> StepOutcome {
        self.discovered.clear();
        self.status = SearchStatus::Running;

        let Some(current) = self.pop_open() else {
            trace!("{} exhausted after {} expansions", self.config.algorithm, self.visited.len());
            self.status = SearchStatus::Exhausted;
            return StepOutcome::Exhausted;
        };

        self.state.closed[current] = true;
        let pos = self.position(current);
        self.visited.push(pos);
        trace!("{} expands {}", self.config.algorithm, pos);

        if Some(current) == self.end_idx {
            self.path = self.reconstruct(current);
            self.status = SearchStatus::Success;
            return StepOutcome::Success;
        }

        let walkable = &self.walkable;
        let cols = self.cols;
        let neighbors = neighbors_in(self.cols, self.rows, pos, self.config.allow_diagonal, |p| {
            walkable[p.row * cols + p.col]
        });
        for np in neighbors {
            let ni = np.row * self.cols + np.col;
            self.relax(current, ni, np);
        }
        StepOutcome::Continue
    }

    /// Pops the next live frontier cell, skipping closed cells and entries
    /// superseded by a cheaper push.
    fn pop_open(&mut self) -> Option<usize> {
        while let Some((idx, priority)) = self.frontier.pop() {
            if self.state.closed[idx] {
                continue;
            }
            if self.frontier.is_lazy() && priority != self.state.key[idx] {
                continue;
            }
            return Some(idx);
        }
        None
    }

    fn relax(&mut self, current: usize, ni: usize, np: Position) {
        if self.state.closed[ni] {
            return;
        }
        let tentative_g = self.state.g[current] + STEP_COST;

        match self.config.algorithm {
            Algorithm::AStar | Algorithm::Dijkstra => {
                if self.state.discovered[ni] && tentative_g >= self.state.g[ni] {
                    return;
                }
                if !self.state.discovered[ni] && self.config.algorithm == Algorithm::AStar {
                    self.state.h[ni] = self.estimate(np);
                }
            }
            Algorithm::Bfs | Algorithm::Dfs | Algorithm::Greedy => {
                if self.state.discovered[ni] {
                    return;
                }
                if self.config.algorithm == Algorithm::Greedy {
                    self.state.h[ni] = self.estimate(np);
                }
            }
        }

        self.state.g[ni] = tentative_g;
        self.state.f[ni] = tentative_g + self.state.h[ni];
        self.state.previous[ni] = Some(current);

        if self.state.discovered[ni] {
            // Improved open cell: re-push with its original sequence.
            let key = self.priority(ni);
            self.state.key[ni] = key;
            self.frontier.push(ni, key, self.state.seq[ni]);
        } else {
            self.discovered.push(np);
            self.open(ni);
        }
    }

    /// First insertion of a cell into the frontier.
    fn open(&mut self, idx: usize) {
        let key = self.priority(idx);
        self.state.discovered[idx] = true;
        self.state.key[idx] = key;
        self.state.seq[idx] = self.next_seq;
        self.next_seq += 1;
        self.frontier.push(idx, key, self.state.seq[idx]);
    }

    fn priority(&self, idx: usize) -> f64 {
        match self.config.algorithm {
            Algorithm::AStar => self.state.f[idx],
            Algorithm::Dijkstra => self.state.g[idx],
            Algorithm::Greedy => self.state.h[idx],
            Algorithm::Bfs | Algorithm::Dfs => 0.0,
        }
    }

    fn estimate(&self, pos: Position) -> f64 {
        match self.config.algorithm {
            Algorithm::AStar | Algorithm::Greedy => self.config.heuristic.estimate(pos, self.end),
            Algorithm::Dijkstra | Algorithm::Bfs | Algorithm::Dfs => 0.0,
        }
    }

    fn reconstruct(&self, end: usize) -> Vec<Position> {
        let mut path = vec![self.position(end)];
        let mut cursor = end;
        while let Some(prev) = self.state.previous[cursor] {
            path.push(self.position(prev));
            cursor = prev;
        }
        path.reverse();
        path
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.col < self.cols && pos.row < self.rows).then(|| pos.row * self.cols + pos.col)
    }

    fn position(&self, idx: usize) -> Position {
        Position::new(idx % self.cols, idx / self.cols)
    }
}
