use std::fmt;


/// Cost units per one pixel of Euclidean distance
pub const COST_SCALE: i32 = 100;


/// Discrete grid coordinate - a pixel position on the image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}


/// Cost of a single displacement: its Euclidean length scaled by COST_SCALE
/// and truncated to an integer
/// Unit steps cost 100, diagonal steps 141 and knight-like steps 223, so
/// routes are charged by distance covered rather than by step count
pub fn step_cost(dx: i32, dy: i32) -> i32 {
    (f64::from(dx * dx + dy * dy).sqrt() * f64::from(COST_SCALE)) as i32
}


/// A displacement with its precomputed cost
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub dx: i32,
    pub dy: i32,
    pub cost: i32,
}

impl Move {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy, cost: step_cost(dx, dy) }
    }
}


const ORTHOGONAL_STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const DIAGONAL_STEPS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2), (1, -2), (-1, 2), (-1, -2),
    (2, 1), (2, -1), (-2, 1), (-2, -1),
];


/// The displacements a route may take, with one cost per entry computed at
/// construction and reused for every expanded node
#[derive(Clone, Debug)]
pub struct MoveSet {
    moves: Vec<Move>,
}

impl MoveSet {

    /// Create a move set from arbitrary displacements
    pub fn new(deltas: &[(i32, i32)]) -> Self {
        Self {
            moves: deltas.iter().map(|&(dx, dy)| Move::new(dx, dy)).collect(),
        }
    }

    /// The 4 axis-aligned unit steps
    pub fn orthogonal() -> Self {
        Self::new(&ORTHOGONAL_STEPS)
    }

    /// The 8 unit steps, axis-aligned and diagonal
    pub fn kings() -> Self {
        let mut deltas = ORTHOGONAL_STEPS.to_vec();
        deltas.extend_from_slice(&DIAGONAL_STEPS);
        Self::new(&deltas)
    }

    /// The 8 unit steps plus the 8 knight-like moves with components in
    /// {1, 2}. The longer moves let routes approximate straight lines at
    /// angles a pure unit-step walk would render as staircases
    pub fn extended() -> Self {
        let mut deltas = ORTHOGONAL_STEPS.to_vec();
        deltas.extend_from_slice(&DIAGONAL_STEPS);
        deltas.extend_from_slice(&KNIGHT_STEPS);
        Self::new(&deltas)
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }
}


/// Occupancy grid over a bounded rectangle of cells
/// Cells are either open or blocked; routes only ever stand on open cells
#[derive(Clone, Debug)]
pub struct GridMap {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
}

impl GridMap {

    /// Create an all-open grid
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width >= 0 && height >= 0, "grid dimensions must be non-negative");
        Self {
            width,
            height,
            blocked: vec![false; (width * height) as usize],
        }
    }

    /// Create a grid by classifying every cell
    pub fn from_fn(width: i32, height: i32, mut is_blocked: impl FnMut(i32, i32) -> bool) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.blocked[(y * width + x) as usize] = is_blocked(x, y);
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of blocked cells
    pub fn blocked_cells(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }

    /// Mark a cell as blocked; out-of-bounds cells are ignored
    pub fn block(&mut self, cell: Cell) {
        if self.in_bounds(cell) {
            let index = self.index(cell);
            self.blocked[index] = true;
        }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// In bounds and not blocked
    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.blocked[self.index(cell)]
    }

    fn index(&self, cell: Cell) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    /// Successor function over this grid for the given move set: applies
    /// every displacement to the queried cell and keeps the open landing
    /// cells with their move costs
    /// Only landing cells are validated, so a longer move may pass over a
    /// blocked cell, and a blocked query cell still lists its open neighbors
    pub fn successors<'a>(&'a self, moves: &'a MoveSet) -> impl Fn(&Cell) -> Vec<(Cell, i32)> + 'a {
        move |cell: &Cell| {
            moves
                .moves()
                .iter()
                .map(|m| (Cell::new(cell.x + m.dx, cell.y + m.dy), m.cost))
                .filter(|&(landing, _)| self.is_open(landing))
                .collect()
        }
    }
}
