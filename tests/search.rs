use grid_search::algorithms::{self, Algorithm, SearchConfig, SearchRun, SearchStatus, StepOutcome};
use grid_search::grid::{Grid, Position};
use grid_search::heuristic::Heuristic;
use grid_search::maze::MazeGen;
use grid_search::statistics::reference_path_length;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn p(col: usize, row: usize) -> Position {
    Position::new(col, row)
}

fn config(algorithm: Algorithm, heuristic: Heuristic, allow_diagonal: bool) -> SearchConfig {
    SearchConfig {
        algorithm,
        heuristic,
        allow_diagonal,
    }
}

fn random_grid(seed: u64, density: f64) -> Grid {
    let mut grid = Grid::new(25, 18).unwrap();
    MazeGen::new(StdRng::seed_from_u64(seed)).random_obstacles(&mut grid, density);
    grid
}

/// Row 5 walled except column 9.
fn wall_row_grid() -> Grid {
    let mut grid = Grid::new(10, 10).unwrap();
    for col in 0..9 {
        grid.toggle_wall(p(col, 5));
    }
    grid
}

#[test]
fn bfs_on_empty_grid_matches_manhattan_distance() {
    let grid = Grid::new(10, 10).unwrap();
    let result = algorithms::run(&grid, config(Algorithm::Bfs, Heuristic::Manhattan, false));
    assert_eq!(result.status, SearchStatus::Success);
    assert_eq!(result.path_length, 19);
    assert_eq!(result.path.len(), 19);
    assert_eq!(result.path.first(), Some(&p(0, 0)));
    assert_eq!(result.path.last(), Some(&p(9, 9)));
    assert!(result.nodes_visited <= 100);
}

#[test]
fn wall_row_forces_route_through_gap() {
    let grid = wall_row_grid();
    let astar = algorithms::run(&grid, config(Algorithm::AStar, Heuristic::Manhattan, false));
    let dijkstra = algorithms::run(&grid, config(Algorithm::Dijkstra, Heuristic::Manhattan, false));
    let dfs = algorithms::run(&grid, config(Algorithm::Dfs, Heuristic::Manhattan, false));

    assert!(astar.path.contains(&p(9, 5)));
    assert!(dijkstra.path.contains(&p(9, 5)));
    assert_eq!(astar.path_length, dijkstra.path_length);
    assert_eq!(astar.path_length, 19);

    assert!(dfs.found());
    assert_eq!(dfs.path.last(), Some(&p(9, 9)));
    assert!(dfs.path_length >= astar.path_length);
}

#[test]
fn repeated_runs_are_identical() {
    let grid = random_grid(99, 0.3);
    for algorithm in Algorithm::ALL {
        for heuristic in Heuristic::ALL {
            for diagonal in [false, true] {
                let cfg = config(algorithm, heuristic, diagonal);
                let a = algorithms::run(&grid, cfg);
                let b = algorithms::run(&grid, cfg);
                assert_eq!(a.visited, b.visited, "{} {}", algorithm, heuristic);
                assert_eq!(a.path, b.path, "{} {}", algorithm, heuristic);
            }
        }
    }
}

#[test]
fn optimal_algorithms_match_reference_bfs() {
    for seed in 0..30 {
        let grid = random_grid(seed, 0.35);
        let expected = reference_path_length(&grid, false);
        assert!(expected.is_some());
        for algorithm in [Algorithm::AStar, Algorithm::Dijkstra, Algorithm::Bfs] {
            for heuristic in Heuristic::ALL {
                let result = algorithms::run(&grid, config(algorithm, heuristic, false));
                assert_eq!(
                    Some(result.path_length),
                    expected,
                    "seed {} {} {}",
                    seed,
                    algorithm,
                    heuristic
                );
            }
        }
    }
}

#[test]
fn diagonal_optimality_with_chebyshev() {
    for seed in 0..20 {
        let grid = random_grid(seed, 0.3);
        let expected = reference_path_length(&grid, true);
        let run = |algorithm| algorithms::run(&grid, config(algorithm, Heuristic::Chebyshev, true));
        let astar = run(Algorithm::AStar);
        let dijkstra = run(Algorithm::Dijkstra);
        let bfs = run(Algorithm::Bfs);
        assert_eq!(Some(astar.path_length), expected, "seed {}", seed);
        assert_eq!(Some(dijkstra.path_length), expected, "seed {}", seed);
        assert_eq!(Some(bfs.path_length), expected, "seed {}", seed);
    }
}

#[test]
fn every_path_is_a_valid_walk() {
    let grid = random_grid(4, 0.3);
    for algorithm in Algorithm::ALL {
        for diagonal in [false, true] {
            let result = algorithms::run(&grid, config(algorithm, Heuristic::Octile, diagonal));
            assert!(result.found());
            assert_eq!(result.path.first(), Some(&grid.start()));
            assert_eq!(result.path.last(), Some(&grid.end()));
            for pair in result.path.windows(2) {
                assert!(grid.neighbors(pair[0], diagonal).contains(&pair[1]));
            }
            // Every cell is expanded at most once.
            let mut seen = result.visited.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), result.visited.len());
            assert_eq!(result.visited.last(), Some(&grid.end()));
        }
    }
}

/// Expansion order of a priority search kept as a plain insertion-ordered
/// list: the lowest priority wins, the earliest entry on ties, and a cheaper
/// route updates an entry where it stands.
fn linear_scan_order(grid: &Grid, cfg: SearchConfig) -> Vec<Position> {
    let end = grid.end();
    let estimate = |pos| match cfg.algorithm {
        Algorithm::AStar | Algorithm::Greedy => cfg.heuristic.estimate(pos, end),
        _ => 0.0,
    };
    let priority = |g: f64, h: f64| match cfg.algorithm {
        Algorithm::AStar => g + h,
        Algorithm::Greedy => h,
        _ => g,
    };

    let mut g = vec![f64::INFINITY; grid.len()];
    let mut h = vec![0.0; grid.len()];
    let mut discovered = vec![false; grid.len()];
    let mut closed = vec![false; grid.len()];
    let mut open: Vec<(usize, f64)> = Vec::new();

    let si = grid.index(grid.start()).unwrap();
    g[si] = 0.0;
    h[si] = estimate(grid.start());
    discovered[si] = true;
    open.push((si, priority(0.0, h[si])));

    let mut order = Vec::new();
    while !open.is_empty() {
        let mut best = 0;
        for (k, entry) in open.iter().enumerate() {
            if entry.1 < open[best].1 {
                best = k;
            }
        }
        let (current, _) = open.remove(best);
        closed[current] = true;
        let pos = grid.position(current);
        order.push(pos);
        if pos == end {
            break;
        }

        for next in grid.neighbors(pos, cfg.allow_diagonal) {
            let ni = grid.index(next).unwrap();
            if closed[ni] {
                continue;
            }
            let tentative = g[current] + 1.0;
            let improves = match cfg.algorithm {
                Algorithm::Greedy => !discovered[ni],
                _ => !discovered[ni] || tentative < g[ni],
            };
            if !improves {
                continue;
            }
            if !discovered[ni] {
                h[ni] = estimate(next);
            }
            g[ni] = tentative;
            let key = priority(tentative, h[ni]);
            if discovered[ni] {
                if let Some(entry) = open.iter_mut().find(|entry| entry.0 == ni) {
                    entry.1 = key;
                }
            } else {
                discovered[ni] = true;
                open.push((ni, key));
            }
        }
    }
    order
}

#[test]
fn priority_searches_match_linear_scan_order() {
    for seed in 0..15 {
        let mut grid = Grid::new(14, 11).unwrap();
        MazeGen::new(StdRng::seed_from_u64(seed)).random_obstacles(&mut grid, 0.3);
        for algorithm in [Algorithm::AStar, Algorithm::Dijkstra, Algorithm::Greedy] {
            for heuristic in Heuristic::ALL {
                for diagonal in [false, true] {
                    let cfg = config(algorithm, heuristic, diagonal);
                    let result = algorithms::run(&grid, cfg);
                    assert_eq!(
                        result.visited,
                        linear_scan_order(&grid, cfg),
                        "seed {} {} {} diagonal {}",
                        seed,
                        algorithm,
                        heuristic,
                        diagonal
                    );
                }
            }
        }
    }
}

#[test]
fn lowered_cost_keeps_first_insertion_rank() {
    // With diagonals Manhattan and Euclidean overestimate, so A* reaches
    // some cells by a longer route first and lowers their cost while they
    // are still open.
    let mut grid = Grid::new(9, 9).unwrap();
    for row in 1..8 {
        grid.toggle_wall(p(4, row));
    }
    for algorithm in [Algorithm::AStar, Algorithm::Dijkstra] {
        for heuristic in Heuristic::ALL {
            let cfg = config(algorithm, heuristic, true);
            let result = algorithms::run(&grid, cfg);
            assert_eq!(result.visited, linear_scan_order(&grid, cfg));
        }
    }
}

#[test]
fn unreachable_end_exhausts_every_reachable_cell() {
    let mut grid = Grid::new(8, 8).unwrap();
    for col in 0..8 {
        grid.toggle_wall(p(col, 3));
    }
    for algorithm in Algorithm::ALL {
        let result = algorithms::run(&grid, config(algorithm, Heuristic::Euclidean, true));
        assert_eq!(result.status, SearchStatus::Exhausted);
        assert!(result.path.is_empty());
        assert_eq!(result.nodes_visited, 24);
        assert!(result.is_final);
    }
}

#[test]
fn step_count_is_bounded_by_grid_size() {
    let grid = random_grid(12, 0.2);
    for algorithm in Algorithm::ALL {
        let mut run = SearchRun::new(&grid, config(algorithm, Heuristic::Manhattan, true));
        let mut steps = 0;
        while run.advance() == StepOutcome::Continue {
            steps += 1;
            assert!(steps <= grid.len());
        }
    }
}

#[test]
fn greedy_heads_straight_for_the_end() {
    let grid = Grid::new(10, 10).unwrap();
    let greedy = algorithms::run(&grid, config(Algorithm::Greedy, Heuristic::Manhattan, false));
    let dijkstra = algorithms::run(&grid, config(Algorithm::Dijkstra, Heuristic::Manhattan, false));
    assert!(greedy.found());
    assert_eq!(greedy.nodes_visited, 19);
    assert!(greedy.nodes_visited < dijkstra.nodes_visited);
}

#[test]
fn search_between_custom_endpoints() {
    let grid = Grid::new(6, 6).unwrap();
    let result = algorithms::run_between(
        &grid,
        p(2, 2),
        p(4, 1),
        config(Algorithm::AStar, Heuristic::Manhattan, false),
    );
    assert_eq!(result.path_length, 4);
    assert_eq!(result.path.first(), Some(&p(2, 2)));
}
