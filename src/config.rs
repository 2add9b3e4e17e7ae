//! Configuration types for the solver.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec2;

/// Smallest allowed grid border, in particle diameters.
///
/// One diameter is two cells: the look-back window reaches two cells past
/// the particle's own cell on each axis.
pub const MIN_BORDER: usize = 1;

/// What happens when a particle overlaps a [`Circle`](crate::Obstacle::Circle) obstacle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CircleResponse {
    /// Overlap is detected but the particle is left alone.
    #[default]
    Ignore,
    /// Push the particle out to the rim and reflect its normal velocity.
    Elastic,
}

/// Resolved numeric constants consumed by the solver.
///
/// All lengths are in particle diameters (the diameter is 1, the radius 0.5).
///
/// # Builder Pattern
/// ```
/// use granule::config::SolverConfig;
/// use granule::vec::Vec2;
///
/// let config: SolverConfig<f32> = SolverConfig::new()
///     .with_world_size(200.0, 150.0)
///     .with_capacity(20_000)
///     .with_sub_steps(8)
///     .with_gravity(Vec2::new(0.0, 0.002));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig<F: Float> {
    /// World width. Default: 100.
    pub world_width: F,
    /// World height. Default: 100.
    pub world_height: F,
    /// Maximum number of live particles. Default: 1000.
    pub capacity: usize,
    /// Number of sub-steps per `update`. Default: 8.
    pub sub_steps: usize,
    /// Gravity as a position delta added once per sub-step. Default: (0, 0.001).
    pub gravity: Vec2<F>,
    /// Particle-particle positional correction weight. Default: 0.25.
    pub response: F,
    /// Fraction of normal velocity kept after hitting a static edge. Default: 0.85.
    pub static_restitution: F,
    /// Tangential velocity kept when sliding along a side or ceiling. Default: 0.995.
    pub static_friction: F,
    /// Tangential velocity kept when sliding along the max-y edge of a boundary. Default: 0.96.
    pub floor_friction: F,
    /// Half the particle mass, used by the kinetic energy query. Default: pi / 8.
    pub particle_half_mass: F,
    /// Padding around the world, in diameters. Default: 8.
    pub border: usize,
    /// Circle obstacle behaviour. Default: [`CircleResponse::Ignore`].
    pub circle_response: CircleResponse,
    /// Seed for `spawn_random`. Default: 0.
    pub seed: u64,
}

impl<F: Float> SolverConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SolverConfig {
            world_width: F::from_f32(100.0),
            world_height: F::from_f32(100.0),
            capacity: 1000,
            sub_steps: 8,
            gravity: Vec2::new(F::zero(), F::from_f32(0.001)),
            response: F::from_f32(0.25),
            static_restitution: F::from_f32(0.85),
            static_friction: F::from_f32(0.995),
            floor_friction: F::from_f32(0.96),
            particle_half_mass: F::pi() * F::from_f32(0.125),
            border: 8,
            circle_response: CircleResponse::Ignore,
            seed: 0,
        }
    }

    /// Set the world extent.
    pub fn with_world_size(mut self, width: F, height: F) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    /// Set the particle capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the number of sub-steps.
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    /// Set the per-sub-step gravity delta.
    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the particle-particle response weight.
    pub fn with_response(mut self, response: F) -> Self {
        self.response = response;
        self
    }

    /// Set the static restitution.
    pub fn with_static_restitution(mut self, restitution: F) -> Self {
        self.static_restitution = restitution;
        self
    }

    /// Set the side/ceiling friction factor.
    pub fn with_static_friction(mut self, friction: F) -> Self {
        self.static_friction = friction;
        self
    }

    /// Set the floor friction factor.
    pub fn with_floor_friction(mut self, friction: F) -> Self {
        self.floor_friction = friction;
        self
    }

    /// Set the half mass used by the kinetic energy query.
    pub fn with_half_mass(mut self, half_mass: F) -> Self {
        self.particle_half_mass = half_mass;
        self
    }

    /// Set the grid border, in diameters.
    pub fn with_border(mut self, border: usize) -> Self {
        self.border = border;
        self
    }

    /// Set the circle obstacle policy.
    pub fn with_circle_response(mut self, response: CircleResponse) -> Self {
        self.circle_response = response;
        self
    }

    /// Set the spawn seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// How many particles one `spawn_random` row holds.
    pub fn particles_per_width(&self) -> usize {
        let w = self.world_width.to_i64();
        if w > 1 { (w - 1) as usize } else { 0 }
    }

    /// Check the invariants the grid and solver rely on.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let one = F::one();
        if !self.world_width.is_finite()
            || !self.world_height.is_finite()
            || self.world_width < one
            || self.world_height < one
        {
            return Err(PhysicsError::InvalidWorldSize);
        }
        if self.border < MIN_BORDER {
            return Err(PhysicsError::BorderTooSmall { border: self.border, min: MIN_BORDER });
        }
        if self.capacity > u32::MAX as usize {
            return Err(PhysicsError::CapacityTooLarge { capacity: self.capacity });
        }
        let coefficients = [
            ("gravity.x", self.gravity.x),
            ("gravity.y", self.gravity.y),
            ("response", self.response),
            ("static_restitution", self.static_restitution),
            ("static_friction", self.static_friction),
            ("floor_friction", self.floor_friction),
            ("particle_half_mass", self.particle_half_mass),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(PhysicsError::InvalidCoefficient { name });
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for SolverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// User-facing world settings, resolved into a normalized [`SolverConfig`].
///
/// Sizes are in arbitrary world units; `resolve` rescales everything so the
/// particle diameter becomes 1 and folds the time step into gravity.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSettings<F: Float> {
    pub width: F,
    pub height: F,
    pub radius: F,
    pub framerate: F,
    pub gravity: F,
    pub response: F,
    pub particles: usize,
    pub sub_steps: usize,
}

impl<F: Float> WorldSettings<F> {
    pub fn new() -> Self {
        WorldSettings {
            width: F::from_f32(1.5),
            height: F::one(),
            radius: F::from_f32(0.0035),
            framerate: F::from_f32(60.0),
            gravity: F::from_f32(1.3),
            response: F::one(),
            particles: 1000,
            sub_steps: 12,
        }
    }

    /// World units per particle diameter, inverted.
    pub fn scale(&self) -> F {
        F::half() / self.radius
    }

    /// Produce the normalized solver configuration.
    ///
    /// Coefficients not covered by the settings keep their `SolverConfig` defaults.
    pub fn resolve(&self) -> SolverConfig<F> {
        let scale = self.scale();
        let sub_steps = self.sub_steps.max(1);
        let sub_dt = F::one() / (self.framerate * F::from_f32(sub_steps as f32));
        SolverConfig::new()
            .with_world_size((scale * self.width).round(), (scale * self.height).round())
            .with_capacity(self.particles)
            .with_sub_steps(sub_steps)
            .with_gravity(Vec2::new(F::zero(), scale * self.gravity * sub_dt * sub_dt))
            .with_response(F::from_f32(0.25) * self.response)
    }
}

impl<F: Float> Default for WorldSettings<F> {
    fn default() -> Self {
        Self::new()
    }
}
