use serde::{Deserialize, Serialize};

use crate::api::TileQuery;

/// What cells outside the grid report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutOfBounds {
    /// Map edges behave like walls.
    #[default]
    Solid,
    /// Bodies can leave the map.
    Open,
}

/// Minimal row-major solid map (non-zero = solid).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    solids: Vec<u8>,
    pub out_of_bounds: OutOfBounds,
}

impl TileGrid {
    /// All-open grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            solids: vec![0; (width * height) as usize],
            out_of_bounds: OutOfBounds::default(),
        }
    }

    /// Build from text rows; `#` is solid, anything else is open. Short rows
    /// are padded with open cells.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set_solid(x as i32, y as i32, true);
                }
            }
        }
        grid
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Returns false (and changes nothing) for out-of-grid cells.
    pub fn set_solid(&mut self, x: i32, y: i32, solid: bool) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.solids[i] = solid as u8;
                true
            }
            None => false,
        }
    }
}

impl TileQuery for TileGrid {
    fn is_solid(&self, grid_x: i32, grid_y: i32) -> bool {
        match self.index(grid_x, grid_y) {
            Some(i) => self.solids[i] != 0,
            None => self.out_of_bounds == OutOfBounds::Solid,
        }
    }
}
