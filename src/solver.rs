//! Sub-stepped Verlet solver for equal-radius particles.

use crate::config::SolverConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::grid::{GridLayout, SpatialGrid};
use crate::obstacle::Obstacle;
use crate::observer::StepObserver;
use crate::particle::{Particle, ParticleStore, DIAMETER, RADIUS};
use crate::table::ObstacleTable;
use crate::vec::Vec2;
use alloc::sync::Arc;
use alloc::vec::Vec as AllocVec;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Particle world: store, spatial grid, and the static obstacle table.
///
/// Each [`update`](Solver::update) runs `sub_steps` passes of
/// rebuild grid, resolve collisions, integrate.
pub struct Solver<F: Float> {
    config: SolverConfig<F>,
    store: ParticleStore<F>,
    grid: SpatialGrid<F>,
    table: Arc<ObstacleTable<F>>,
    gravity: Vec2<F>,
    rng: Pcg32,
    updates: u64,
}

impl<F: Float> Solver<F> {
    /// Build a solver and its obstacle table.
    pub fn new(config: SolverConfig<F>, obstacles: AllocVec<Obstacle<F>>) -> Result<Self, PhysicsError> {
        let layout = GridLayout::new(&config)?;
        let table = ObstacleTable::build(layout, obstacles)?;
        Self::with_table(config, Arc::new(table))
    }

    /// Build a solver around an existing obstacle table.
    ///
    /// The table must have been built for the grid `config` describes.
    pub fn with_table(config: SolverConfig<F>, table: Arc<ObstacleTable<F>>) -> Result<Self, PhysicsError> {
        let layout = GridLayout::new(&config)?;
        if *table.layout() != layout {
            return Err(PhysicsError::LayoutMismatch);
        }
        Ok(Solver {
            store: ParticleStore::with_capacity(config.capacity),
            grid: SpatialGrid::new(layout, config.capacity),
            gravity: config.gravity,
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            table,
            updates: 0,
        })
    }

    /// Advance one frame.
    pub fn update<O: StepObserver>(&mut self, observer: &mut O) {
        for sub in 0..self.config.sub_steps {
            let particles = self.store.as_mut_slice();

            self.grid.reconstruct(particles);
            observer.on_grid_rebuilt(particles.len());

            self.grid.resolve(particles, &self.table, &self.config, observer);

            for p in particles.iter_mut() {
                p.integrate(self.gravity);
            }
            observer.on_integrate();
            observer.on_substep_complete(sub);
        }

        self.updates += 1;
        observer.on_step_complete();
    }

    /// Add a particle at rest. Returns `None` once capacity is reached.
    pub fn spawn(&mut self, pos: Vec2<F>) -> Option<usize> {
        self.store.push(Particle::new(pos))
    }

    /// Add a particle moving by `velocity` per sub-step.
    pub fn spawn_with_velocity(&mut self, pos: Vec2<F>, velocity: Vec2<F>) -> Option<usize> {
        self.store.push(Particle::with_velocity(pos, velocity))
    }

    /// Add a row of particles at rest across the world width, jittered by up
    /// to a radius horizontally and scattered over the top half.
    ///
    /// Stops early at capacity. Returns how many were added.
    pub fn spawn_random(&mut self) -> usize {
        let radius = F::from_f32(RADIUS);
        let diameter = F::from_f32(DIAMETER);
        let half_height = self.config.world_height * F::half();
        let mut spawned = 0;

        for i in 0..self.config.particles_per_width() {
            if self.store.is_full() {
                break;
            }
            let jitter: f32 = self.rng.gen();
            let depth: f32 = self.rng.gen();
            let x = radius + F::from_f32(i as f32) * diameter + (diameter * F::from_f32(jitter) - radius);
            let y = half_height * F::from_f32(depth);
            if self.store.push(Particle::new(Vec2::new(x, y))).is_some() {
                spawned += 1;
            }
        }
        spawned
    }

    /// `half_mass * sum |pos - prev_pos|^2` over the live particles.
    ///
    /// Not divided by the particle count; an empty world reports zero.
    pub fn kinetic_energy(&self) -> F {
        let half_mass = self.config.particle_half_mass;
        self.store
            .as_slice()
            .iter()
            .fold(F::zero(), |sum, p| sum + p.kinetic_energy(half_mass))
    }

    /// Kinetic energy per live particle, zero for an empty world.
    pub fn mean_kinetic_energy(&self) -> F {
        match self.active() {
            0 => F::zero(),
            n => self.kinetic_energy() / F::from_f32(n as f32),
        }
    }

    pub fn particles(&self) -> &[Particle<F>] { self.store.as_slice() }
    pub fn particle(&self, index: usize) -> &Particle<F> { &self.store.as_slice()[index] }
    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<F> { &mut self.store.as_mut_slice()[index] }

    /// Copy out the live positions, in index order.
    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.store.as_slice().iter().map(|p| p.pos).collect()
    }

    pub fn active(&self) -> usize { self.store.active() }
    pub fn capacity(&self) -> usize { self.store.capacity() }
    pub fn is_full(&self) -> bool { self.store.is_full() }

    pub fn obstacles(&self) -> &[Obstacle<F>] { self.table.obstacles() }
    pub fn table(&self) -> &Arc<ObstacleTable<F>> { &self.table }
    pub fn grid(&self) -> &SpatialGrid<F> { &self.grid }
    pub fn config(&self) -> &SolverConfig<F> { &self.config }

    /// Current per-sub-step gravity delta.
    pub fn gravity(&self) -> Vec2<F> { self.gravity }
    pub fn set_gravity(&mut self, gravity: Vec2<F>) { self.gravity = gravity; }
    /// Reverse gravity; the Galton demo uses this to recycle settled particles.
    pub fn flip_gravity(&mut self) { self.gravity = -self.gravity; }

    /// Number of completed `update` calls.
    pub fn updates(&self) -> u64 { self.updates }
}
