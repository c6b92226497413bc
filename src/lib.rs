//! Grid shortest-path search.
//!
//! A [`grid::Grid`] of cells with walls, a start and an end is searched by
//! one of five [`algorithms::Algorithm`]s (A*, Dijkstra, BFS, DFS, greedy
//! best-first) guided by a [`heuristic::Heuristic`]. [`maze::MazeGen`]
//! builds wall layouts that always keep the end reachable, and
//! [`simulation::Controller`] runs searches step by step with pacing and
//! cancellation, either alone or as a comparison of all heuristics.

pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod maze;
pub mod simulation;
pub mod statistics;
