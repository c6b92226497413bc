use grid_search::algorithms::{self, Algorithm, SearchConfig};
use grid_search::grid::{Grid, Position};
use grid_search::heuristic::Heuristic;

fn p(col: usize, row: usize) -> Position {
    Position::new(col, row)
}

#[test]
fn reset_is_idempotent() {
    let mut grid = Grid::new(8, 8).unwrap();
    grid.toggle_wall(p(3, 3));
    let result = algorithms::run(&grid, SearchConfig::default());
    for &cell in &result.visited {
        grid.mark_closed(cell, None);
    }
    grid.set_path(&result.path, None);

    grid.reset();
    let once = grid.snapshot();
    grid.reset();
    assert_eq!(once, grid.snapshot());
    assert!(once.path.is_empty());
    assert!(once.visited_order.is_empty());
    assert!(once.cells[3][3].is_wall);
}

#[test]
fn neighbor_relation_is_symmetric() {
    let mut grid = Grid::new(9, 7).unwrap();
    for cell in [p(2, 2), p(3, 4), p(6, 1), p(5, 5)] {
        grid.toggle_wall(cell);
    }
    for diagonal in [false, true] {
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let a = p(col, row);
                if !grid.is_walkable(a) {
                    continue;
                }
                for b in grid.neighbors(a, diagonal) {
                    assert!(grid.neighbors(b, diagonal).contains(&a), "{} {}", a, b);
                }
            }
        }
    }
}

#[test]
fn neighbor_order_is_fixed() {
    let grid = Grid::new(3, 3).unwrap();
    assert_eq!(grid.neighbors(p(1, 1), false), vec![p(1, 0), p(2, 1), p(1, 2), p(0, 1)]);
    assert_eq!(
        grid.neighbors(p(1, 1), true),
        vec![p(1, 0), p(2, 1), p(1, 2), p(0, 1), p(2, 0), p(2, 2), p(0, 2), p(0, 0)]
    );
}

#[test]
fn start_on_wall_is_ignored_and_search_still_runs() {
    let mut grid = Grid::new(10, 10).unwrap();
    grid.toggle_wall(p(4, 4));
    assert!(!grid.set_start(p(4, 4)));
    assert_eq!(grid.start(), p(0, 0));

    let result = algorithms::run(
        &grid,
        SearchConfig {
            algorithm: Algorithm::AStar,
            heuristic: Heuristic::Manhattan,
            allow_diagonal: false,
        },
    );
    assert!(result.found());
    assert_eq!(result.path.first(), Some(&p(0, 0)));
}

#[test]
fn endpoints_cannot_overlap_or_be_walled() {
    let mut grid = Grid::new(5, 5).unwrap();
    assert!(!grid.set_start(grid.end()));
    assert!(!grid.set_end(grid.start()));
    assert!(!grid.toggle_wall(grid.start()));
    assert!(!grid.toggle_wall(grid.end()));
    assert!(!grid.set_start(p(5, 0)));
    assert!(!grid.toggle_wall(p(0, 9)));

    assert!(grid.set_start(p(2, 2)));
    assert!(!grid.node(p(0, 0)).unwrap().is_start);
    assert!(grid.node(p(2, 2)).unwrap().is_start);
}

#[test]
fn snapshot_renders_markers() {
    let mut grid = Grid::new(4, 3).unwrap();
    grid.toggle_wall(p(1, 1));
    let result = algorithms::run(&grid, SearchConfig::default());
    grid.set_path(&result.path, None);
    let text = grid.snapshot().to_string();
    assert!(text.contains('S'));
    assert!(text.contains('E'));
    assert!(text.contains('#'));
    assert!(text.contains('*'));
}
