use rand::Rng;

use crate::types::{Cell, Position};

/// Scrolling obstacle lane.
///
/// Only obstacle state lives here; the ship and shots are tracked by position
/// elsewhere and never written into the grid. Column 0, column `width - 1`,
/// row 0 and row `height - 1` are walls and always read as empty.
pub struct AsteroidField {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl AsteroidField {
    pub fn new(width: u16, height: u16) -> Self {
        AsteroidField {
            cells: vec![Cell::Empty; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Column new obstacles enter through.
    pub fn trailing_column(&self) -> u16 {
        self.width - 2
    }

    /// Rows obstacles may occupy.
    pub fn rows(&self) -> std::ops::RangeInclusive<u16> {
        1..=self.height - 2
    }

    fn is_interior(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.x <= self.trailing_column() && self.rows().contains(&pos.y)
    }

    fn index(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    pub fn get(&self, pos: Position) -> Cell {
        if self.is_interior(pos) {
            self.cells[self.index(pos)]
        } else {
            Cell::Empty
        }
    }

    /// Writes an obstacle cell. Writes onto walls are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.is_interior(pos) {
            let index = self.index(pos);
            self.cells[index] = cell;
        }
    }

    /// Empties `pos`, returning what was there.
    pub fn take(&mut self, pos: Position) -> Cell {
        let cell = self.get(pos);
        self.set(pos, Cell::Empty);
        cell
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstacle()).count()
    }

    /// Refills the trailing column. Each row independently gets an obstacle
    /// with chance `1 / spawn_probability`, small or large with equal odds;
    /// the rest are cleared. Returns the new column, top row first.
    pub fn spawn_column(&mut self, spawn_probability: u32, rng: &mut impl Rng) -> Vec<Cell> {
        let column = self.trailing_column();
        let denominator = spawn_probability.max(1);
        let mut spawned = Vec::with_capacity(self.rows().count());
        for y in self.rows() {
            let cell = if rng.gen_range(1..=denominator) == 1 {
                if rng.gen_bool(0.5) {
                    Cell::Small
                } else {
                    Cell::Large
                }
            } else {
                Cell::Empty
            };
            self.set(Position::new(column, y), cell);
            spawned.push(cell);
        }
        spawned
    }

    /// Moves column `x + 1` into column `x` for one interior column. The
    /// trailing column keeps its old content until the next spawn rewrites it.
    pub fn shift_column(&mut self, x: u16) {
        if x < 1 || x >= self.trailing_column() {
            return;
        }
        for y in self.rows() {
            let next = self.get(Position::new(x + 1, y));
            self.set(Position::new(x, y), next);
        }
    }

    /// Columns shifted by one scroll step, in the order they must be visited.
    pub fn shift_order(&self) -> std::ops::Range<u16> {
        1..self.trailing_column()
    }
}
