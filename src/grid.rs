use crate::error::ConfigError;
use log::debug;
use rustc_hash::FxHashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    pub const fn new(col: usize, row: usize) -> Self {
        Position { col, row }
    }

    /// Offset by `(dc, dr)`, or `None` when that would leave the first quadrant.
    fn offset(self, dc: isize, dr: isize) -> Option<Position> {
        Some(Position {
            col: self.col.checked_add_signed(dc)?,
            row: self.row.checked_add_signed(dr)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// Display colour attached to cells explored during a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Up, right, down, left. Expansion order of every search depends on it.
const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
/// Up-right, down-right, down-left, up-left.
const DIAGONAL: [(isize, isize); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// One grid cell.
///
/// `is_wall`, `is_start` and `is_end` persist across runs. The remaining
/// fields are the display overlay of the most recent run and are cleared
/// by [`Grid::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Position,
    pub is_wall: bool,
    pub is_start: bool,
    pub is_end: bool,
    pub visited: bool,
    pub closed: bool,
    pub visited_color: Option<Color>,
    pub path_color: Option<Color>,
}

impl Node {
    fn new(position: Position) -> Self {
        Node {
            position,
            is_wall: false,
            is_start: false,
            is_end: false,
            visited: false,
            closed: false,
            visited_color: None,
            path_color: None,
        }
    }

    fn clear_overlay(&mut self) {
        self.visited = false;
        self.closed = false;
        self.visited_color = None;
        self.path_color = None;
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    cols: usize,
    rows: usize,
    nodes: Vec<Node>,
    start: Position,
    end: Position,
    obstacles: FxHashSet<Position>,
    path: Vec<Position>,
    visited_order: Vec<Position>,
}

impl Grid {
    /// Creates an empty `cols x rows` grid with the start in the top-left
    /// corner and the end in the bottom-right corner.
    pub fn new(cols: usize, rows: usize) -> Result<Self, ConfigError> {
        if cols < 2 || rows < 2 {
            return Err(ConfigError::GridTooSmall { cols, rows });
        }

        let mut nodes = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                nodes.push(Node::new(Position::new(col, row)));
            }
        }

        let start = Position::new(0, 0);
        let end = Position::new(cols - 1, rows - 1);
        let mut grid = Grid {
            cols,
            rows,
            nodes,
            start,
            end,
            obstacles: FxHashSet::default(),
            path: Vec::new(),
            visited_order: Vec::new(),
        };
        grid.nodes[start.row * cols + start.col].is_start = true;
        grid.nodes[end.row * cols + end.col].is_end = true;
        Ok(grid)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn obstacles(&self) -> &FxHashSet<Position> {
        &self.obstacles
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.col < self.cols && pos.row < self.rows
    }

    /// Flat index of `pos`, or `None` when out of bounds.
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.row * self.cols + pos.col)
    }

    pub fn position(&self, index: usize) -> Position {
        Position::new(index % self.cols, index / self.cols)
    }

    pub fn node(&self, pos: Position) -> Option<&Node> {
        self.index(pos).map(|i| &self.nodes[i])
    }

    fn node_mut(&mut self, pos: Position) -> Option<&mut Node> {
        let i = self.index(pos)?;
        Some(&mut self.nodes[i])
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.node(pos).is_some_and(|n| !n.is_wall)
    }

    /// Walkability of every cell, indexed like [`Grid::index`].
    pub fn walkable_mask(&self) -> Vec<bool> {
        self.nodes.iter().map(|n| !n.is_wall).collect()
    }

    /// In-bounds, non-wall cells adjacent to `pos`, orthogonal first
    /// (up, right, down, left) then diagonal when `allow_diagonal` is set.
    pub fn neighbors(&self, pos: Position, allow_diagonal: bool) -> Vec<Position> {
        neighbors_in(self.cols, self.rows, pos, allow_diagonal, |p| {
            self.is_walkable(p)
        })
    }

    /// Moves the start marker and clears the previous run's overlay.
    /// Ignored when `pos` is out of bounds, a wall or the current end.
    pub fn set_start(&mut self, pos: Position) -> bool {
        let moved = self.place_start(pos);
        if moved {
            self.reset();
        }
        moved
    }

    /// Moves the end marker and clears the previous run's overlay.
    /// Ignored when `pos` is out of bounds, a wall or the current start.
    pub fn set_end(&mut self, pos: Position) -> bool {
        let moved = self.place_end(pos);
        if moved {
            self.reset();
        }
        moved
    }

    /// Like [`Grid::set_start`] but leaves the overlay alone.
    pub fn place_start(&mut self, pos: Position) -> bool {
        if !self.can_host_endpoint(pos, self.end) {
            debug!("Rejected start at {}", pos);
            return false;
        }
        let old = self.start;
        if let Some(n) = self.node_mut(old) {
            n.is_start = false;
        }
        if let Some(n) = self.node_mut(pos) {
            n.is_start = true;
        }
        self.start = pos;
        true
    }

    /// Like [`Grid::set_end`] but leaves the overlay alone.
    pub fn place_end(&mut self, pos: Position) -> bool {
        if !self.can_host_endpoint(pos, self.start) {
            debug!("Rejected end at {}", pos);
            return false;
        }
        let old = self.end;
        if let Some(n) = self.node_mut(old) {
            n.is_end = false;
        }
        if let Some(n) = self.node_mut(pos) {
            n.is_end = true;
        }
        self.end = pos;
        true
    }

    fn can_host_endpoint(&self, pos: Position, other: Position) -> bool {
        pos != other && self.node(pos).is_some_and(|n| !n.is_wall)
    }

    /// Flips the wall flag of `pos`. Start, end and out-of-bounds cells are
    /// left alone.
    pub fn toggle_wall(&mut self, pos: Position) -> bool {
        match self.node(pos) {
            Some(n) => {
                let wall = !n.is_wall;
                self.set_wall(pos, wall)
            }
            None => {
                debug!("Ignored wall toggle outside the grid at {}", pos);
                false
            }
        }
    }

    /// Sets the wall flag of `pos`, keeping the obstacle set in sync.
    /// Returns whether the cell changed.
    pub fn set_wall(&mut self, pos: Position, wall: bool) -> bool {
        let Some(node) = self.node_mut(pos) else {
            return false;
        };
        if node.is_start || node.is_end || node.is_wall == wall {
            return false;
        }
        node.is_wall = wall;
        if wall {
            self.obstacles.insert(pos);
        } else {
            self.obstacles.remove(&pos);
        }
        true
    }

    pub fn clear_walls(&mut self) {
        for n in self.nodes.iter_mut() {
            n.is_wall = false;
        }
        self.obstacles.clear();
    }

    /// Clears the overlay left by the previous run. Walls and endpoints are
    /// untouched.
    pub fn reset(&mut self) {
        for n in self.nodes.iter_mut() {
            n.clear_overlay();
        }
        self.path.clear();
        self.visited_order.clear();
    }

    /// Marks `pos` as discovered by the current run.
    pub fn mark_discovered(&mut self, pos: Position, color: Option<Color>) {
        if let Some(n) = self.node_mut(pos) {
            n.visited = true;
            if color.is_some() {
                n.visited_color = color;
            }
        }
    }

    /// Marks `pos` as expanded by the current run and appends it to the
    /// visitation trace.
    pub fn mark_closed(&mut self, pos: Position, color: Option<Color>) {
        if let Some(n) = self.node_mut(pos) {
            n.visited = true;
            n.closed = true;
            if color.is_some() {
                n.visited_color = color;
            }
            self.visited_order.push(pos);
        }
    }

    pub fn set_path(&mut self, path: &[Position], color: Option<Color>) {
        for &pos in path {
            if let Some(n) = self.node_mut(pos) {
                n.path_color = color;
            }
        }
        self.path = path.to_vec();
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn visited_order(&self) -> &[Position] {
        &self.visited_order
    }

    /// Read-only copy of everything a renderer needs.
    pub fn snapshot(&self) -> Snapshot {
        let cells = (0..self.cols)
            .map(|col| {
                (0..self.rows)
                    .map(|row| {
                        let n = &self.nodes[row * self.cols + col];
                        CellSnapshot {
                            is_wall: n.is_wall,
                            is_start: n.is_start,
                            is_end: n.is_end,
                            visited: n.visited,
                            closed: n.closed,
                            path_color: n.path_color,
                            visited_color: n.visited_color,
                        }
                    })
                    .collect()
            })
            .collect();

        Snapshot {
            cells,
            path: self.path.clone(),
            visited_order: self.visited_order.clone(),
        }
    }
}

/// Neighbour enumeration shared by [`Grid`] and running searches, which
/// consult their own copy of the walkability mask.
pub(crate) fn neighbors_in(
    cols: usize,
    rows: usize,
    pos: Position,
    allow_diagonal: bool,
    walkable: impl Fn(Position) -> bool,
) -> Vec<Position> {
    let diagonal: &[(isize, isize)] = if allow_diagonal { &DIAGONAL } else { &[] };

    ORTHOGONAL
        .iter()
        .chain(diagonal)
        .filter_map(|&(dc, dr)| pos.offset(dc, dr))
        .filter(|p| p.col < cols && p.row < rows && walkable(*p))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSnapshot {
    pub is_wall: bool,
    pub is_start: bool,
    pub is_end: bool,
    pub visited: bool,
    pub closed: bool,
    pub path_color: Option<Color>,
    pub visited_color: Option<Color>,
}

/// Frame-ready view of a grid. `cells` is indexed `[col][row]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cells: Vec<Vec<CellSnapshot>>,
    pub path: Vec<Position>,
    pub visited_order: Vec<Position>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.cells.len();
        let rows = self.cells.first().map_or(0, Vec::len);
        let on_path: FxHashSet<Position> = self.path.iter().copied().collect();

        writeln!(f, "Legend: S=Start, E=End, #=Wall, *=Path, o=Expanded, +=Frontier, .=Empty")?;
        write!(f, "   ")?;
        for col in 0..cols {
            write!(f, "{:2}", col % 10)?;
        }
        writeln!(f)?;

        for row in 0..rows {
            write!(f, "{:2} ", row)?;
            for col in 0..cols {
                let cell = &self.cells[col][row];
                let ch = if cell.is_start {
                    'S'
                } else if cell.is_end {
                    'E'
                } else if cell.is_wall {
                    '#'
                } else if on_path.contains(&Position::new(col, row)) {
                    '*'
                } else if cell.closed {
                    'o'
                } else if cell.visited {
                    '+'
                } else {
                    '.'
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
