//! Verlet particles and the fixed-capacity store that holds them.

use crate::float::Float;
use crate::vec::Vec2;
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// Particle radius. All lengths are normalized so the diameter is 1.
pub const RADIUS: f32 = 0.5;
/// Particle diameter.
pub const DIAMETER: f32 = 1.0;

/// A Verlet particle; velocity is implicit in `pos - prev_pos`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Particle<F: Float> {
    pub pos: Vec2<F>,
    pub prev_pos: Vec2<F>,
}

impl<F: Float> Particle<F> {
    /// A particle at rest.
    pub fn new(pos: Vec2<F>) -> Self {
        Particle { pos, prev_pos: pos }
    }

    /// A particle moving by `velocity` per sub-step.
    pub fn with_velocity(pos: Vec2<F>, velocity: Vec2<F>) -> Self {
        Particle { pos, prev_pos: pos - velocity }
    }

    /// Semi-implicit Verlet step; `gravity` is already a position delta.
    #[inline]
    pub fn integrate(&mut self, gravity: Vec2<F>) {
        let velocity = self.pos - self.prev_pos;
        self.prev_pos = self.pos;
        self.pos = self.pos + velocity + gravity;
    }

    /// Displacement over the last sub-step.
    pub fn velocity_raw(&self) -> Vec2<F> {
        self.pos - self.prev_pos
    }

    /// `half_mass * |pos - prev_pos|^2`.
    pub fn kinetic_energy(&self, half_mass: F) -> F {
        half_mass * self.pos.distance_sq(self.prev_pos)
    }
}

/// Preallocated particle arena with a monotonically growing active count.
///
/// Slots past `active` are never read by the solver.
pub struct ParticleStore<F: Float> {
    particles: AllocVec<Particle<F>>,
    active: usize,
}

impl<F: Float> ParticleStore<F> {
    pub fn with_capacity(capacity: usize) -> Self {
        ParticleStore {
            particles: vec![Particle::default(); capacity],
            active: 0,
        }
    }

    /// Append a particle. Returns its index, or `None` once the store is full.
    pub fn push(&mut self, particle: Particle<F>) -> Option<usize> {
        if self.active >= self.particles.len() {
            return None;
        }
        let idx = self.active;
        self.particles[idx] = particle;
        self.active += 1;
        Some(idx)
    }

    pub fn active(&self) -> usize { self.active }
    pub fn capacity(&self) -> usize { self.particles.len() }
    pub fn is_full(&self) -> bool { self.active == self.particles.len() }
    pub fn is_empty(&self) -> bool { self.active == 0 }

    /// The live particles.
    pub fn as_slice(&self) -> &[Particle<F>] {
        &self.particles[..self.active]
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle<F>] {
        &mut self.particles[..self.active]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_adds_velocity_and_gravity() {
        let mut p = Particle::with_velocity(Vec2::new(1.0f32, 2.0), Vec2::new(0.5, 0.0));
        p.integrate(Vec2::new(0.0, 0.25));
        assert_eq!(p.prev_pos, Vec2::new(1.0, 2.0));
        assert_eq!(p.pos, Vec2::new(1.5, 2.25));
    }

    #[test]
    fn store_saturates_at_capacity() {
        let mut store: ParticleStore<f32> = ParticleStore::with_capacity(2);
        assert_eq!(store.push(Particle::new(Vec2::zero())), Some(0));
        assert_eq!(store.push(Particle::new(Vec2::zero())), Some(1));
        assert!(store.is_full());
        assert_eq!(store.push(Particle::new(Vec2::zero())), None);
        assert_eq!(store.active(), 2);
        assert_eq!(store.as_slice().len(), 2);
    }

    #[test]
    fn kinetic_energy_uses_squared_displacement() {
        let p = Particle::with_velocity(Vec2::new(0.0f32, 0.0), Vec2::new(3.0, 4.0));
        assert!((p.kinetic_energy(0.5) - 12.5).abs() < 1e-6);
    }
}
