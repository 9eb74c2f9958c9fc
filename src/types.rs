use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the body sits: a grid cell, a fractional offset inside it, and the
/// derived pixel position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Position {
    pub grid_x: i32,
    pub grid_y: i32,
    /// Offset inside the cell, nominally in [0,1). May leave that range
    /// mid-step until `integrate_position` carries it back.
    pub grid_cell_ratio_x: f32,
    pub grid_cell_ratio_y: f32,
    /// Pixel position, `floor((grid + ratio) * tile_size)`.
    pub x: f32,
    pub y: f32,
    /// Pixel position at the start of the current tick (render interpolation).
    pub x_previous: f32,
    pub y_previous: f32,
}

impl Position {
    /// Current grid cell.
    pub fn cell(&self) -> IVec2 {
        IVec2::new(self.grid_x, self.grid_y)
    }

    /// Current pixel position.
    pub fn pixel(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Pixel position captured at the start of the tick.
    pub fn previous_pixel(&self) -> Vec2 {
        Vec2::new(self.x_previous, self.y_previous)
    }

    /// Copy the current pixel position into the previous slot.
    pub fn snapshot_previous(&mut self) {
        self.x_previous = self.x;
        self.y_previous = self.y;
    }

    /// Sub-frame render position; `alpha` 0 is last tick, 1 is this tick.
    pub fn interpolate(&self, alpha: f32) -> Vec2 {
        self.previous_pixel().lerp(self.pixel(), alpha)
    }
}

/// Cell size and the collision box, expressed in ratio space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dimensions {
    tile_size: u32,
    /// Used by the circular overlap tests only.
    pub radius: f32,
    pub edge_left: f32,
    pub edge_right: f32,
    pub edge_top: f32,
    pub edge_bottom: f32,
}

impl Dimensions {
    pub const DEFAULT_EDGE_LEFT: f32 = 0.3;
    pub const DEFAULT_EDGE_RIGHT: f32 = 0.7;
    pub const DEFAULT_EDGE_TOP: f32 = 0.2;
    pub const DEFAULT_EDGE_BOTTOM: f32 = 0.5;

    /// Default collision box for the given cell size.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            radius: tile_size as f32 / 2.0,
            edge_left: Self::DEFAULT_EDGE_LEFT,
            edge_right: Self::DEFAULT_EDGE_RIGHT,
            edge_top: Self::DEFAULT_EDGE_TOP,
            edge_bottom: Self::DEFAULT_EDGE_BOTTOM,
        }
    }

    /// Grid cell edge length in pixels. Fixed for the body's lifetime.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

/// Per-tick displacement in ratio space plus its damping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Velocity {
    pub delta_x: f32,
    pub delta_y: f32,
    /// 0 = no damping, 1 = velocity zeroed every tick.
    pub friction_x: f32,
    pub friction_y: f32,
    pub gravity: f32,
}

impl Velocity {
    pub const DEFAULT_FRICTION: f32 = 0.06;
    pub const DEFAULT_GRAVITY: f32 = 0.05;
}

impl Default for Velocity {
    fn default() -> Self {
        Self {
            delta_x: 0.0,
            delta_y: 0.0,
            friction_x: Self::DEFAULT_FRICTION,
            friction_y: Self::DEFAULT_FRICTION,
            gravity: Self::DEFAULT_GRAVITY,
        }
    }
}

/// Solid tiles orthogonally adjacent to the current cell. Only valid for the
/// tick in which they were queried.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighbours {
    pub wall_left: bool,
    pub wall_right: bool,
    pub wall_up: bool,
    pub wall_down: bool,
}

impl Neighbours {
    /// True if any side is solid.
    pub fn any(&self) -> bool {
        self.wall_left || self.wall_right || self.wall_up || self.wall_down
    }

    /// Number of solid sides.
    pub fn count(&self) -> usize {
        [self.wall_left, self.wall_right, self.wall_up, self.wall_down]
            .iter()
            .filter(|w| **w)
            .count()
    }
}

/// Side vector handed to the collision sink, e.g. `(-1, 0)` for a left wall.
pub type CollideFn = Box<dyn FnMut(IVec2)>;

/// Optional notification hooks. Never used for control flow.
#[derive(Default)]
pub struct Events {
    on_collide: Option<CollideFn>,
}

impl Events {
    /// Install the collision sink, replacing any previous one.
    pub fn set_on_collide(&mut self, f: impl FnMut(IVec2) + 'static) {
        self.on_collide = Some(Box::new(f));
    }

    /// Remove the collision sink.
    pub fn clear_on_collide(&mut self) {
        self.on_collide = None;
    }

    /// Whether a collision sink is installed.
    pub fn has_on_collide(&self) -> bool {
        self.on_collide.is_some()
    }

    /// Invoke the sink if one is set.
    pub fn notify(&mut self, side: IVec2) {
        if let Some(f) = self.on_collide.as_mut() {
            f(side);
        }
    }
}

impl std::fmt::Debug for Events {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("on_collide", &self.on_collide.is_some())
            .finish()
    }
}

/// Tuning values for building a body.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Grid cell edge length in pixels.
    pub tile_size: u32,

    // Collision box in ratio space
    pub edge_left: f32,
    pub edge_right: f32,
    pub edge_top: f32,
    pub edge_bottom: f32,

    // Motion
    pub friction_x: f32,
    pub friction_y: f32,
    pub gravity: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            edge_left: Dimensions::DEFAULT_EDGE_LEFT,
            edge_right: Dimensions::DEFAULT_EDGE_RIGHT,
            edge_top: Dimensions::DEFAULT_EDGE_TOP,
            edge_bottom: Dimensions::DEFAULT_EDGE_BOTTOM,
            friction_x: Velocity::DEFAULT_FRICTION,
            friction_y: Velocity::DEFAULT_FRICTION,
            gravity: Velocity::DEFAULT_GRAVITY,
        }
    }
}

impl BodyConfig {
    /// Reject geometry and damping values the step cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        let values = [
            ("edge_left", self.edge_left),
            ("edge_right", self.edge_right),
            ("edge_top", self.edge_top),
            ("edge_bottom", self.edge_bottom),
            ("friction_x", self.friction_x),
            ("friction_y", self.friction_y),
            ("gravity", self.gravity),
        ];
        if let Some((name, _)) = values.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }
        let frictions = [("friction_x", self.friction_x), ("friction_y", self.friction_y)];
        for (name, f) in frictions {
            if !(0.0..=1.0).contains(&f) {
                return Err(ConfigError::FrictionOutOfRange { name, value: f });
            }
        }
        let ordered = |low: f32, high: f32| {
            (0.0..=1.0).contains(&low) && (0.0..=1.0).contains(&high) && low < high
        };
        if !ordered(self.edge_left, self.edge_right) {
            return Err(ConfigError::InvalidEdges {
                axis: 'x',
                low: self.edge_left,
                high: self.edge_right,
            });
        }
        if !ordered(self.edge_top, self.edge_bottom) {
            return Err(ConfigError::InvalidEdges {
                axis: 'y',
                low: self.edge_top,
                high: self.edge_bottom,
            });
        }
        Ok(())
    }
}

/// Rejected body configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("tile size must be positive")]
    ZeroTileSize,

    #[error("{0} is not finite")]
    NonFinite(&'static str),

    #[error("{name} = {value} is outside [0, 1]")]
    FrictionOutOfRange { name: &'static str, value: f32 },

    #[error("{axis} edges {low}..{high} must be ordered inside [0, 1]")]
    InvalidEdges { axis: char, low: f32, high: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
