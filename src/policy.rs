//! Step policies: fixed compositions of the body primitives.

use crate::api::{Steppable, TileQuery};
use crate::body::PhysicsBody;
use crate::types::*;

/// Platformer body: velocity, neighbours, gravity, collisions, position.
///
/// Gravity is added after `apply_velocity`, so it moves the body on the next
/// tick. Collisions see this tick's movement against neighbours queried from
/// the cell the body started the tick in.
#[derive(Debug)]
pub struct SimpleBody<Q> {
    pub body: PhysicsBody<Q>,
}

impl<Q: TileQuery> SimpleBody<Q> {
    /// See [`PhysicsBody::new`].
    pub fn new(grid_x: i32, grid_y: i32, tile_size: u32, query: Q) -> Self {
        Self {
            body: PhysicsBody::new(grid_x, grid_y, tile_size, query),
        }
    }

    /// See [`PhysicsBody::with_config`].
    pub fn with_config(
        grid_x: i32,
        grid_y: i32,
        config: &BodyConfig,
        query: Q,
    ) -> Result<Self> {
        Ok(Self {
            body: PhysicsBody::with_config(grid_x, grid_y, config, query)?,
        })
    }
}

impl<Q: TileQuery> Steppable for SimpleBody<Q> {
    fn update(&mut self) {
        let b = &mut self.body;
        b.position.snapshot_previous();
        b.apply_velocity();
        b.query_neighbours();
        b.velocity.delta_y += b.velocity.gravity;
        b.resolve_collisions();
        b.integrate_position();
    }
}

/// Gravity-free body (top-down movers, flyers). `velocity.gravity` is ignored.
#[derive(Debug)]
pub struct FloatingBody<Q> {
    pub body: PhysicsBody<Q>,
}

impl<Q: TileQuery> FloatingBody<Q> {
    /// See [`PhysicsBody::new`].
    pub fn new(grid_x: i32, grid_y: i32, tile_size: u32, query: Q) -> Self {
        Self {
            body: PhysicsBody::new(grid_x, grid_y, tile_size, query),
        }
    }

    /// See [`PhysicsBody::with_config`].
    pub fn with_config(
        grid_x: i32,
        grid_y: i32,
        config: &BodyConfig,
        query: Q,
    ) -> Result<Self> {
        Ok(Self {
            body: PhysicsBody::with_config(grid_x, grid_y, config, query)?,
        })
    }
}

impl<Q: TileQuery> Steppable for FloatingBody<Q> {
    fn update(&mut self) {
        let b = &mut self.body;
        b.position.snapshot_previous();
        b.apply_velocity();
        b.query_neighbours();
        b.resolve_collisions();
        b.integrate_position();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::step_all;
    use glam::IVec2;
    use std::sync::{Arc, Mutex};

    fn open(_x: i32, _y: i32) -> bool {
        false
    }

    #[test]
    fn test_right_wall_clamps_within_one_step() {
        let mut s = SimpleBody::new(0, 0, 16, |x: i32, _y: i32| x == 1);
        let hits = Arc::new(Mutex::new(Vec::new()));
        let sink = hits.clone();
        s.body.events.set_on_collide(move |side| sink.lock().unwrap().push(side));
        s.body.position.grid_cell_ratio_x = 0.9;
        s.body.velocity.delta_x = 0.5;

        s.update();

        assert_eq!(s.body.position.grid_cell_ratio_x, 0.7);
        assert_eq!(s.body.position.grid_x, 0);
        assert_eq!(s.body.velocity.delta_x, 0.0);
        assert_eq!(*hits.lock().unwrap(), vec![IVec2::new(1, 0)]);
    }

    #[test]
    fn test_free_fall_accelerates_under_damping() {
        let mut s = SimpleBody::new(0, 0, 16, open);
        s.body.velocity.gravity = 0.05;
        s.body.velocity.friction_y = 0.06;
        s.body.velocity.delta_y = 0.0;

        let height =
            |b: &PhysicsBody<_>| b.position.grid_y as f32 + b.position.grid_cell_ratio_y;
        let mut last_delta = s.body.velocity.delta_y;
        let mut last_height = height(&s.body);
        for tick in 0..10 {
            s.update();
            let delta = s.body.velocity.delta_y;
            let gain = delta - last_delta;
            assert!(gain > 0.0, "tick {tick}: delta_y did not grow");
            if tick == 0 {
                // Nothing to damp yet.
                assert_eq!(gain, 0.05);
            } else {
                assert!(gain < 0.05, "tick {tick}: gain {gain} not damped");
            }

            let h = height(&s.body);
            if tick == 0 {
                assert_eq!(h, last_height);
            } else {
                assert!(h > last_height, "tick {tick}: body did not fall");
            }
            let r = s.body.position.grid_cell_ratio_y;
            assert!((0.0..1.0).contains(&r));
            last_delta = delta;
            last_height = h;
        }
        assert!(s.body.position.grid_y >= 1);
        assert!(s.body.position.y > s.body.position.y_previous);
    }

    #[test]
    fn test_lands_on_floor() {
        let mut s = SimpleBody::new(0, 0, 16, |_x: i32, y: i32| y >= 3);
        let hits = Arc::new(Mutex::new(Vec::new()));
        let sink = hits.clone();
        s.body.events.set_on_collide(move |side| sink.lock().unwrap().push(side));

        for _ in 0..200 {
            s.update();
        }

        assert_eq!(s.body.position.grid_y, 2);
        assert_eq!(s.body.position.grid_cell_ratio_y, 0.5);
        assert!(s.body.on_ground());
        // Resting: gravity is re-added and cleared each tick.
        assert_eq!(s.body.position.y, s.body.position.y_previous);
        assert!(hits.lock().unwrap().iter().all(|side| *side == IVec2::new(0, 1)));
    }

    #[test]
    fn test_floating_ignores_gravity() {
        let mut f = FloatingBody::new(0, 0, 16, open);
        f.body.velocity.gravity = 1.0;
        f.body.velocity.delta_x = 0.375;
        f.body.velocity.friction_x = 0.0;
        f.update();
        f.update();
        assert_eq!(f.body.velocity.delta_y, 0.0);
        assert_eq!(f.body.position.grid_cell_ratio_y, 0.5);
        assert_eq!(f.body.position.grid_x, 1);
        assert_eq!(f.body.position.grid_cell_ratio_x, 0.25);
    }

    #[test]
    fn test_carry_invariant_over_random_walk() {
        let mut bodies: Vec<FloatingBody<fn(i32, i32) -> bool>> = (0..4)
            .map(|i| FloatingBody::new(i, -i, 16, open as fn(i32, i32) -> bool))
            .collect();
        let mut seed = 0x2545_f491_u32;
        for _ in 0..500 {
            for f in bodies.iter_mut() {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                let dx = (seed % 1000) as f32 / 250.0 - 2.0;
                let dy = ((seed / 1000) % 1000) as f32 / 250.0 - 2.0;
                f.body.velocity.delta_x = dx;
                f.body.velocity.delta_y = dy;
            }
            step_all(&mut bodies);
            for f in &bodies {
                let p = f.body.position;
                assert!((0.0..=1.0).contains(&p.grid_cell_ratio_x));
                assert!((0.0..=1.0).contains(&p.grid_cell_ratio_y));
                let ts = f.body.dimensions.tile_size() as f32;
                assert_eq!(p.x, ((p.grid_x as f32 + p.grid_cell_ratio_x) * ts).floor());
                assert_eq!(p.y, ((p.grid_y as f32 + p.grid_cell_ratio_y) * ts).floor());
            }
        }
    }
}
