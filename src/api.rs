/// Read-only tile occupancy, injected into every body.
///
/// Called with coordinates that may lie outside the map; the implementor owns
/// the out-of-bounds policy. Must answer consistently within a tick.
pub trait TileQuery {
    /// Whether cell `(grid_x, grid_y)` blocks movement.
    fn is_solid(&self, grid_x: i32, grid_y: i32) -> bool;
}

impl<F> TileQuery for F
where
    F: Fn(i32, i32) -> bool,
{
    fn is_solid(&self, grid_x: i32, grid_y: i32) -> bool {
        self(grid_x, grid_y)
    }
}

/// One fixed-step movement rule.
///
/// Implementors compose the primitives of [`crate::PhysicsBody`] in the order
/// that defines their policy. `update` always runs to completion and is not
/// reentrant.
pub trait Steppable {
    /// Advance the body by one tick.
    fn update(&mut self);
}

/// Advance every body by one tick, in slice order.
pub fn step_all<S: Steppable>(bodies: &mut [S]) {
    for body in bodies.iter_mut() {
        body.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Steppable for Counter {
        fn update(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_closure_is_tile_query() {
        let floor = |_x: i32, y: i32| y >= 4;
        assert!(floor.is_solid(-100, 4));
        assert!(!floor.is_solid(0, 3));
    }

    #[test]
    fn test_step_all_updates_each_once() {
        let mut bodies = [Counter(0), Counter(5)];
        step_all(&mut bodies);
        step_all(&mut bodies);
        assert_eq!(bodies[0].0, 2);
        assert_eq!(bodies[1].0, 7);
    }
}
