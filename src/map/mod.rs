pub mod generator;

use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;

pub const DEFAULT_MAP_WIDTH: i32 = 100;
pub const DEFAULT_MAP_HEIGHT: i32 = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Terrain {
    #[default]
    None,
    Cave,
    Rock,
    Tunnel,
    Bombed,
}

impl Terrain {
    /// Glyph and color class for a cell, a pure function of terrain kind.
    pub fn appearance(self) -> (char, RGB) {
        match self {
            Terrain::Rock => ('#', RGB::from_u8(128, 128, 128)),
            Terrain::Cave => (',', RGB::from_u8(84, 84, 84)),
            Terrain::Tunnel => (',', RGB::from_u8(84, 84, 84)),
            Terrain::Bombed => ('.', RGB::from_u8(84, 84, 84)),
            Terrain::None => (' ', RGB::from_u8(0, 0, 0)),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Cell {
    pub terrain: Terrain,
    pub blocking: bool,
}

impl Cell {
    fn rock() -> Self {
        Self {
            terrain: Terrain::Rock,
            blocking: true,
        }
    }
}

/// The terrain grid. Fixed size for the session lifetime; all carving goes
/// through `dig` or `carve_point`.
#[derive(Clone, Debug)]
pub struct CaveMap {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Cell>,
}

impl CaveMap {
    pub fn solid_rock(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::rock(); size],
        }
    }

    /// The zero row and column act as a permanent border: a cell at x == 0
    /// or y == 0 is never in bounds.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x > 0 && x < self.width && y > 0 && y < self.height
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Carves an axis-aligned region to the given terrain. The bottom and
    /// right stops clamp to two cells inside the map edge when the region
    /// overruns it; loop ends are exclusive.
    pub fn dig(&mut self, region: Rect, terrain: Terrain) {
        let stop_y = if region.y2 > self.height {
            self.height - 2
        } else {
            region.y2
        };
        let stop_x = if region.x2 > self.width {
            self.width - 2
        } else {
            region.x2
        };
        for y in region.y1..stop_y {
            for x in region.x1..stop_x {
                if let Some(idx) = self.idx(x, y) {
                    self.cells[idx].blocking = false;
                    self.cells[idx].terrain = terrain;
                }
            }
        }
    }

    pub fn carve_point(&mut self, point: Point, terrain: Terrain) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.cells[idx].blocking = false;
            self.cells[idx].terrain = terrain;
        }
    }

    pub fn cell_at(&self, point: Point) -> Option<&Cell> {
        self.idx(point.x, point.y).map(|idx| &self.cells[idx])
    }

    pub fn is_blocking(&self, point: Point) -> bool {
        self.cell_at(point).map_or(true, |cell| cell.blocking)
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.in_bounds(point.x, point.y) && !self.is_blocking(point)
    }

    /// First open cell in row-major order. Used for the player spawn.
    pub fn first_walkable(&self) -> Point {
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.is_walkable(point) {
                    return point;
                }
            }
        }
        Point::new(0, 0)
    }

    /// Last open cell scanning backward from the far corner. Keeps the
    /// enemy spawn row far from the player start.
    pub fn last_walkable(&self) -> Point {
        for y in (1..self.height).rev() {
            for x in (1..self.width).rev() {
                let point = Point::new(x, y);
                if self.is_walkable(point) {
                    return point;
                }
            }
        }
        Point::new(0, 0)
    }

    /// Resamples until it lands on a non-rock cell, inside a 3-cell margin.
    /// Callers must pass a carved map; on solid rock this would spin
    /// forever.
    pub fn random_open_point(&self, rng: &mut RandomNumberGenerator) -> Point {
        loop {
            let x = rng.range(3, self.width - 3);
            let y = rng.range(3, self.height - 3);
            if let Some(cell) = self.cell_at(Point::new(x, y)) {
                if cell.terrain != Terrain::Rock {
                    return Point::new(x, y);
                }
            }
        }
    }
}
