//! Board geometry: discrete grids and continuous canvases
//!
//! Grid games address cells with `IVec2`, the canvas game uses `Vec2` pixel
//! coordinates. Both follow the same wrap/clamp boundary policy. Screen
//! coordinates: `y` grows downward.

use std::collections::HashSet;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_RANDOM_ATTEMPTS;
use crate::error::EngineError;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// True when `other` points exactly the other way
    pub fn is_opposite(self, other: Direction) -> bool {
        self != Direction::None && self.opposite() == other
    }

    /// One-cell step
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::None => IVec2::ZERO,
        }
    }

    /// Dominant direction of a step; horizontal wins ties
    pub fn from_delta(delta: IVec2) -> Self {
        if delta.x == 0 && delta.y == 0 {
            Direction::None
        } else if delta.x.abs() >= delta.y.abs() {
            if delta.x > 0 { Direction::Right } else { Direction::Left }
        } else if delta.y > 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

/// Fixed-size discrete board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    /// Wrap around the edges instead of clamping
    pub wrap: bool,
}

impl Grid {
    pub fn new(width: i32, height: i32, wrap: bool) -> Self {
        Self {
            width,
            height,
            wrap,
        }
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Bring a cell back on the board (modulo when wrapping, clamp otherwise)
    pub fn apply_boundary(&self, cell: IVec2) -> IVec2 {
        if self.wrap {
            IVec2::new(cell.x.rem_euclid(self.width), cell.y.rem_euclid(self.height))
        } else {
            IVec2::new(
                cell.x.clamp(0, self.width - 1),
                cell.y.clamp(0, self.height - 1),
            )
        }
    }

    /// Apply one discrete step
    pub fn advance(&self, cell: IVec2, dir: Direction) -> IVec2 {
        self.apply_boundary(cell + dir.delta())
    }

    /// Apply an arbitrary (summed) step
    pub fn advance_by(&self, cell: IVec2, delta: IVec2) -> IVec2 {
        self.apply_boundary(cell + delta)
    }

    /// Row-major iteration over every cell
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| IVec2::new(x, y)))
    }

    /// Pick a uniformly random cell not in `occupied`.
    ///
    /// A bounded number of random attempts is tried first; after that the free
    /// cells are enumerated and one is chosen, so the call always terminates.
    /// A full grid yields `EngineError::GridFull`.
    pub fn spawn_free_cell<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        occupied: &HashSet<IVec2>,
    ) -> Result<IVec2, EngineError> {
        let full = EngineError::GridFull {
            width: self.width,
            height: self.height,
        };
        if self.area() == 0 {
            return Err(full);
        }

        for _ in 0..SPAWN_RANDOM_ATTEMPTS {
            let cell = IVec2::new(
                rng.random_range(0..self.width),
                rng.random_range(0..self.height),
            );
            if !occupied.contains(&cell) {
                return Ok(cell);
            }
        }

        log::debug!("Random spawn attempts exhausted, enumerating free cells");
        let free: Vec<IVec2> = self.cells().filter(|c| !occupied.contains(c)).collect();
        free.choose(rng).copied().ok_or(full)
    }
}

/// Continuous drawing surface (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub wrap: bool,
}

impl Canvas {
    pub fn new(width: f32, height: f32, wrap: bool) -> Self {
        Self {
            width,
            height,
            wrap,
        }
    }

    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width && pos.y >= 0.0 && pos.y < self.height
    }

    pub fn apply_boundary(&self, pos: Vec2) -> Vec2 {
        if self.wrap {
            Vec2::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
        } else {
            // Half-open range: keep a hair inside the far edge
            Vec2::new(
                pos.x.clamp(0.0, self.width - f32::EPSILON * self.width.max(1.0)),
                pos.y.clamp(0.0, self.height - f32::EPSILON * self.height.max(1.0)),
            )
        }
    }
}

/// The space a game is played in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Board {
    Grid(Grid),
    Canvas(Canvas),
}

impl Board {
    pub fn is_discrete(&self) -> bool {
        matches!(self, Board::Grid(_))
    }

    pub fn width(&self) -> f32 {
        match self {
            Board::Grid(g) => g.width as f32,
            Board::Canvas(c) => c.width,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            Board::Grid(g) => g.height as f32,
            Board::Canvas(c) => c.height,
        }
    }

    /// Whether an entity position lies on the board
    pub fn contains(&self, pos: Vec2) -> bool {
        match self {
            Board::Grid(g) => g.contains(pos.round().as_ivec2()),
            Board::Canvas(c) => c.contains(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_advance_wraps() {
        let grid = Grid::new(25, 25, true);
        assert_eq!(grid.advance(IVec2::new(0, 0), Direction::Up), IVec2::new(0, 24));
        assert_eq!(grid.advance(IVec2::new(24, 3), Direction::Right), IVec2::new(0, 3));
    }

    #[test]
    fn test_advance_clamps_without_bounce() {
        let grid = Grid::new(20, 20, false);
        assert_eq!(grid.advance(IVec2::new(0, 5), Direction::Left), IVec2::new(0, 5));
        assert_eq!(
            grid.advance_by(IVec2::new(19, 19), IVec2::new(1, 1)),
            IVec2::new(19, 19)
        );
    }

    #[test]
    fn test_opposites() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::None.is_opposite(Direction::None));
    }

    #[test]
    fn test_from_delta() {
        assert_eq!(Direction::from_delta(IVec2::new(0, -3)), Direction::Up);
        assert_eq!(Direction::from_delta(IVec2::new(2, 2)), Direction::Right);
        assert_eq!(Direction::from_delta(IVec2::ZERO), Direction::None);
    }

    #[test]
    fn test_spawn_avoids_occupied() {
        let grid = Grid::new(3, 3, false);
        let occupied: HashSet<IVec2> = grid.cells().filter(|c| *c != IVec2::new(2, 1)).collect();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(grid.spawn_free_cell(&mut rng, &occupied).unwrap(), IVec2::new(2, 1));
        }
    }

    #[test]
    fn test_spawn_on_full_grid_fails() {
        let grid = Grid::new(2, 2, true);
        let occupied: HashSet<IVec2> = grid.cells().collect();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            grid.spawn_free_cell(&mut rng, &occupied),
            Err(EngineError::GridFull { .. })
        ));
    }

    #[test]
    fn test_canvas_clamp_stays_inside() {
        let canvas = Canvas::new(480.0, 640.0, false);
        let p = canvas.apply_boundary(Vec2::new(500.0, -3.0));
        assert!(canvas.contains(p));
        assert_eq!(p.y, 0.0);
    }
}
