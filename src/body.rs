use glam::IVec2;
use log::{debug, trace};

use crate::api::TileQuery;
use crate::types::*;

/// A body moving through the tile grid, with the movement primitives that step
/// policies compose.
///
/// Two rounding rules coexist on purpose:
/// - the simulated path (`integrate_position`) floors `(grid + ratio) * tile_size`;
/// - `teleport_to` truncates `pixel / tile_size` toward zero.
///
/// They disagree for negative coordinates and are kept that way.
pub struct PhysicsBody<Q> {
    pub position: Position,
    pub dimensions: Dimensions,
    pub velocity: Velocity,
    pub neighbours: Neighbours,
    pub events: Events,
    query: Q,
}

impl<Q: TileQuery> PhysicsBody<Q> {
    /// Body centred in cell `(grid_x, grid_y)`. Bounds are the caller's concern.
    pub fn new(grid_x: i32, grid_y: i32, tile_size: u32, query: Q) -> Self {
        let mut position = Position {
            grid_x,
            grid_y,
            grid_cell_ratio_x: 0.5,
            grid_cell_ratio_y: 0.5,
            x: 0.0,
            y: 0.0,
            x_previous: 0.0,
            y_previous: 0.0,
        };
        sync_pixels(&mut position, tile_size);
        position.snapshot_previous();
        debug!("body created at cell ({grid_x}, {grid_y}) tile_size={tile_size}");

        Self {
            position,
            dimensions: Dimensions::new(tile_size),
            velocity: Velocity::default(),
            neighbours: Neighbours::default(),
            events: Events::default(),
            query,
        }
    }

    /// Like [`PhysicsBody::new`], taking geometry and damping from a validated config.
    pub fn with_config(
        grid_x: i32,
        grid_y: i32,
        config: &BodyConfig,
        query: Q,
    ) -> Result<Self> {
        config.validate()?;
        let mut body = Self::new(grid_x, grid_y, config.tile_size, query);
        body.dimensions.edge_left = config.edge_left;
        body.dimensions.edge_right = config.edge_right;
        body.dimensions.edge_top = config.edge_top;
        body.dimensions.edge_bottom = config.edge_bottom;
        body.velocity.friction_x = config.friction_x;
        body.velocity.friction_y = config.friction_y;
        body.velocity.gravity = config.gravity;
        Ok(body)
    }

    // --- Primitives --------------------------------------------------------

    /// Move the ratio by this tick's delta, then damp the delta for the next tick.
    pub fn apply_velocity(&mut self) {
        let v = &mut self.velocity;
        self.position.grid_cell_ratio_x += v.delta_x;
        self.position.grid_cell_ratio_y += v.delta_y;
        v.delta_x *= 1.0 - v.friction_x;
        v.delta_y *= 1.0 - v.friction_y;
    }

    /// Refresh the four orthogonal neighbours. Diagonals are never consulted.
    pub fn query_neighbours(&mut self) {
        let (gx, gy) = (self.position.grid_x, self.position.grid_y);
        self.neighbours = Neighbours {
            wall_left: self.query.is_solid(gx - 1, gy),
            wall_right: self.query.is_solid(gx + 1, gy),
            wall_up: self.query.is_solid(gx, gy - 1),
            wall_down: self.query.is_solid(gx, gy + 1),
        };
    }

    /// Clamp the ratio against each solid side it has crossed.
    ///
    /// The four checks are independent, so a corner hit resolves one x side and
    /// one y side in the same tick.
    pub fn resolve_collisions(&mut self) {
        let d = self.dimensions;
        let n = self.neighbours;
        let pos = &mut self.position;
        let vel = &mut self.velocity;

        if pos.grid_cell_ratio_x < d.edge_left && n.wall_left {
            pos.grid_cell_ratio_x = d.edge_left;
            vel.delta_x = 0.0;
            collide(&mut self.events, IVec2::NEG_X);
        }
        if pos.grid_cell_ratio_x > d.edge_right && n.wall_right {
            pos.grid_cell_ratio_x = d.edge_right;
            vel.delta_x = 0.0;
            collide(&mut self.events, IVec2::X);
        }
        if pos.grid_cell_ratio_y < d.edge_top && n.wall_up {
            pos.grid_cell_ratio_y = d.edge_top;
            vel.delta_y = 0.0;
            collide(&mut self.events, IVec2::NEG_Y);
        }
        if pos.grid_cell_ratio_y > d.edge_bottom && n.wall_down {
            pos.grid_cell_ratio_y = d.edge_bottom;
            vel.delta_y = 0.0;
            collide(&mut self.events, IVec2::Y);
        }
    }

    /// Carry whole cells out of the ratio into the grid, then recompute pixels.
    pub fn integrate_position(&mut self) {
        let pos = &mut self.position;
        carry(&mut pos.grid_cell_ratio_x, &mut pos.grid_x);
        carry(&mut pos.grid_cell_ratio_y, &mut pos.grid_y);
        sync_pixels(pos, self.dimensions.tile_size());
    }

    /// Resting on a solid tile below, as of the last neighbour query.
    pub fn on_ground(&self) -> bool {
        self.neighbours.wall_down
            && self.position.grid_cell_ratio_y >= self.dimensions.edge_bottom
    }

    /// The injected tile occupancy query.
    pub fn query(&self) -> &Q {
        &self.query
    }
}

impl<Q> PhysicsBody<Q> {
    /// Relocate in pixel space without simulating the move.
    ///
    /// The cell is `trunc(pixel / tile_size)`, so `-1` px lands in cell 0 where
    /// the simulated path would floor to -1. No collisions or callbacks run and
    /// the previous position is left alone.
    pub fn teleport_to(&mut self, x: f32, y: f32) {
        let ts = self.dimensions.tile_size() as f32;
        let pos = &mut self.position;
        pos.x = x;
        pos.y = y;
        pos.grid_x = (x / ts).trunc() as i32;
        pos.grid_y = (y / ts).trunc() as i32;
        pos.grid_cell_ratio_x = 0.5;
        pos.grid_cell_ratio_y = 0.5;
        debug!("teleport to ({x}, {y}) -> cell ({}, {})", pos.grid_x, pos.grid_y);
    }

    /// Circle test on pixel positions and radii. Ignores the collision edges.
    pub fn overlaps<R>(&self, other: &PhysicsBody<R>) -> bool {
        let reach = self.dimensions.radius + other.dimensions.radius;
        self.distance_squared(other) <= reach * reach
    }

    /// `(r_a + r_b)^2 - dist^2`: positive when overlapping. Squared units, so
    /// only good for ranking overlaps.
    pub fn overlaps_by<R>(&self, other: &PhysicsBody<R>) -> f32 {
        let reach = self.dimensions.radius + other.dimensions.radius;
        reach * reach - self.distance_squared(other)
    }

    fn distance_squared<R>(&self, other: &PhysicsBody<R>) -> f32 {
        self.position.pixel().distance_squared(other.position.pixel())
    }
}

impl<Q> std::fmt::Debug for PhysicsBody<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsBody")
            .field("position", &self.position)
            .field("dimensions", &self.dimensions)
            .field("velocity", &self.velocity)
            .field("neighbours", &self.neighbours)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

fn collide(events: &mut Events, side: IVec2) {
    trace!("collision side=({}, {})", side.x, side.y);
    events.notify(side);
}

/// 2^24: beyond this an f32 no longer holds every integer, so unit steps can stall.
const BULK_CARRY: f32 = 16_777_216.0;

// One step per whole cell crossed; a ratio of exactly 1.0 is left in place.
// Per-tick deltas are expected to stay far below 2^24 cells. Beyond that the
// whole part is moved in one jump (saturating the cell index) so the loops
// still terminate; infinite ratios end up NaN.
fn carry(ratio: &mut f32, grid: &mut i32) {
    if ratio.abs() >= BULK_CARRY {
        let whole = ratio.floor();
        *grid = grid.saturating_add(whole as i32);
        *ratio -= whole;
    }
    while *ratio > 1.0 {
        *ratio -= 1.0;
        *grid += 1;
    }
    while *ratio < 0.0 {
        *ratio += 1.0;
        *grid -= 1;
    }
}

fn sync_pixels(pos: &mut Position, tile_size: u32) {
    let ts = tile_size as f32;
    pos.x = ((pos.grid_x as f32 + pos.grid_cell_ratio_x) * ts).floor();
    pos.y = ((pos.grid_y as f32 + pos.grid_cell_ratio_y) * ts).floor();
}
