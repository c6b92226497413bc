use crate::algorithms::{Algorithm, SearchResult};
use crate::grid::{Color, Grid, Position};
use crate::heuristic::Heuristic;
use pathfinding::prelude::bfs;
use std::fmt;
use std::time::Duration;

/// Cell count of a shortest start to end path, endpoints included, computed
/// independently of the search engine. `None` when the end is unreachable.
pub fn reference_path_length(grid: &Grid, allow_diagonal: bool) -> Option<usize> {
    let end = grid.end();
    bfs(&grid.start(), |p: &Position| grid.neighbors(*p, allow_diagonal), |p| *p == end)
        .map(|path| path.len())
}

#[derive(Debug, Clone)]
pub struct SearchStats {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    pub found: bool,
    pub nodes_visited: usize,
    pub path_length: usize,
    pub optimal_path_length: Option<usize>,
    pub route_efficiency: f64,
    pub duration: Duration,
}

impl SearchStats {
    pub fn new(result: &SearchResult, optimal_path_length: Option<usize>) -> Self {
        let mut stats = SearchStats {
            algorithm: result.algorithm,
            heuristic: result.heuristic,
            found: result.found(),
            nodes_visited: result.nodes_visited,
            path_length: result.path_length,
            optimal_path_length,
            route_efficiency: 0.0,
            duration: result.duration,
        };
        stats.calculate_efficiency();
        stats
    }

    /// Path length relative to the shortest possible; 1.0 is optimal.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.optimal_path_length {
            Some(optimal) if self.found && optimal > 0 => {
                self.path_length as f64 / optimal as f64
            }
            _ => 0.0,
        };
    }

    pub fn is_optimal(&self) -> bool {
        self.found && self.optimal_path_length == Some(self.path_length)
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        if self.algorithm.uses_heuristic() {
            writeln!(f, "Heuristic: {}", self.heuristic)?;
        }
        writeln!(f, "Path found: {}", if self.found { "yes" } else { "no" })?;
        writeln!(f, "Nodes visited: {}", self.nodes_visited)?;
        writeln!(f, "Path length: {}", self.path_length)?;
        match self.optimal_path_length {
            Some(optimal) => writeln!(f, "Optimal path length: {}", optimal)?,
            None => writeln!(f, "Optimal path length: unreachable")?,
        }
        if self.route_efficiency > 0.0 {
            writeln!(f, "Route efficiency: {:.3}", self.route_efficiency)?;
            if self.route_efficiency > 1.0 {
                writeln!(
                    f,
                    "Note: {} extra cells over the shortest route",
                    self.path_length - self.optimal_path_length.unwrap_or(self.path_length)
                )?;
            }
        }
        writeln!(f, "Search time: {:.2?}", self.duration)?;
        Ok(())
    }
}

/// Outcome of one heuristic's stage in a comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub heuristic: Heuristic,
    pub found: bool,
    pub path_length: usize,
    pub nodes_visited: usize,
    pub duration: Duration,
    pub color: Color,
}

impl ComparisonRecord {
    pub fn new(result: &SearchResult) -> Self {
        ComparisonRecord {
            heuristic: result.heuristic,
            found: result.found(),
            path_length: result.path_length,
            nodes_visited: result.nodes_visited,
            duration: result.duration,
            color: result.heuristic.color(),
        }
    }
}

/// Prints comparison records as a table followed by a short analysis.
pub fn print_comparison_results(records: &[ComparisonRecord]) {
    print!("{}", ComparisonTable(records));
}

/// Table formatting of comparison records.
pub struct ComparisonTable<'a>(pub &'a [ComparisonRecord]);

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = self.0;
        writeln!(f, "=== HEURISTIC COMPARISON RESULTS ===")?;
        writeln!(
            f,
            "{:<12} {:<8} {:<12} {:<14} {:<14} {:<12}",
            "Heuristic", "Found", "Path Length", "Nodes Visited", "Duration", "Color"
        )?;
        writeln!(f, "{}", "-".repeat(76))?;

        for record in records {
            let Color { r, g, b } = record.color;
            let color = format!("#{:02x}{:02x}{:02x}", r, g, b);
            writeln!(
                f,
                "{:<12} {:<8} {:<12} {:<14} {:<14} {:<12}",
                record.heuristic.name(),
                if record.found { "yes" } else { "no" },
                record.path_length,
                record.nodes_visited,
                format!("{:.2?}", record.duration),
                color
            )?;
        }

        let found: Vec<_> = records.iter().filter(|r| r.found).collect();
        writeln!(f)?;
        if let Some(fewest) = found.iter().min_by_key(|r| r.nodes_visited) {
            writeln!(
                f,
                "Fewest nodes visited: {} ({})",
                fewest.heuristic, fewest.nodes_visited
            )?;
        }
        if let Some(shortest) = found.iter().min_by_key(|r| r.path_length) {
            writeln!(
                f,
                "Shortest path: {} ({} cells)",
                shortest.heuristic, shortest.path_length
            )?;
        }
        if let Some(fastest) = found.iter().min_by_key(|r| r.duration) {
            writeln!(f, "Fastest: {} ({:.2?})", fastest.heuristic, fastest.duration)?;
        }
        if found.is_empty() {
            writeln!(f, "No heuristic reached the end.")?;
        }
        Ok(())
    }
}
