//! Narrow phase: particle-particle separation and particle-obstacle response.

use crate::config::{CircleResponse, SolverConfig};
use crate::float::Float;
use crate::obstacle::Obstacle;
use crate::particle::{Particle, RADIUS};
use crate::vec::Vec2;

/// Push particles `a` and `b` apart if they overlap.
///
/// Each particle moves by `response * (1 - dist)` along the line between
/// the centres, so repeated passes converge on contact without overshoot.
/// Coincident centres separate along a fixed +y/-y direction.
///
/// Returns `true` if the pair overlapped.
#[inline]
pub fn collide_pair<F: Float>(particles: &mut [Particle<F>], a: usize, b: usize, response: F) -> bool {
    let delta = particles[a].pos - particles[b].pos;
    let dist_sq = delta.length_sq();
    // Diameter is 1, so diameter squared is 1 too. NaN fails the comparison,
    // so a non-finite neighbour is skipped instead of pushed.
    if !(dist_sq < F::one()) {
        return false;
    }

    let correction = if dist_sq > F::EPSILON {
        delta * (response * (F::one() - F::one() / dist_sq.sqrt()))
    } else {
        Vec2::new(F::zero(), -response)
    };
    particles[a].pos -= correction;
    particles[b].pos += correction;
    true
}

/// Resolve one particle against one obstacle. Returns `true` if it moved.
#[inline]
pub fn resolve<F: Float>(obstacle: &Obstacle<F>, particle: &mut Particle<F>, config: &SolverConfig<F>) -> bool {
    match *obstacle {
        Obstacle::Box { center, half_extent } => resolve_box(center, half_extent, particle),
        Obstacle::InverseBox { center, half_extent } => resolve_inverse_box(
            center - half_extent,
            center + half_extent,
            particle,
            config,
        ),
        Obstacle::Circle { center, radius } => match config.circle_response {
            CircleResponse::Ignore => false,
            CircleResponse::Elastic => {
                resolve_circle(center, radius, particle, config.static_restitution)
            }
        },
    }
}

/// Eject a particle centre from a solid box through the nearest face.
///
/// Equal clearances on both axes eject along x; a centre exactly on the
/// box's vertical midline goes out the `+x` face.
pub fn resolve_box<F: Float>(center: Vec2<F>, half_extent: Vec2<F>, particle: &mut Particle<F>) -> bool {
    let min = center - half_extent;
    let max = center + half_extent;
    let p = particle.pos;
    if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
        return false;
    }

    let mut offset = p - center;
    if half_extent.y - offset.y.abs() >= half_extent.x - offset.x.abs() {
        offset.x = half_extent.x.copysign(offset.x);
    } else {
        offset.y = half_extent.y.copysign(offset.y);
    }
    particle.pos = center + offset;

    // Mirroring the clamp delta reflects the outward velocity component.
    let clamped = particle.prev_pos.clamp(min, max);
    particle.prev_pos = clamped + (clamped - particle.prev_pos);
    true
}

/// Keep a particle centre inside `[min, max]`, bouncing off each crossed edge.
///
/// X edges are handled before Y edges; the max-y edge uses `floor_friction`
/// for its tangential damping, every other edge `static_friction`.
pub fn resolve_inverse_box<F: Float>(
    min: Vec2<F>,
    max: Vec2<F>,
    particle: &mut Particle<F>,
    config: &SolverConfig<F>,
) -> bool {
    let restitution = config.static_restitution;
    let friction = config.static_friction;
    let p = &mut particle.pos;
    let prev = &mut particle.prev_pos;
    let mut hit = false;

    if p.x > max.x {
        prev.x = max.x + (max.x - prev.x) * restitution;
        prev.y = p.y - (p.y - prev.y) * friction;
        p.x = max.x;
        hit = true;
    } else if p.x < min.x {
        prev.x = min.x + (min.x - prev.x) * restitution;
        prev.y = p.y - (p.y - prev.y) * friction;
        p.x = min.x;
        hit = true;
    }

    if p.y > max.y {
        prev.y = max.y + (max.y - prev.y) * restitution;
        prev.x = p.x - (p.x - prev.x) * config.floor_friction;
        p.y = max.y;
        hit = true;
    } else if p.y < min.y {
        prev.y = min.y + (min.y - prev.y) * restitution;
        prev.x = p.x - (p.x - prev.x) * friction;
        p.y = min.y;
        hit = true;
    }

    hit
}

/// Push a particle out of a disc and reflect the normal part of its velocity.
pub fn resolve_circle<F: Float>(center: Vec2<F>, radius: F, particle: &mut Particle<F>, restitution: F) -> bool {
    let reach = radius + F::from_f32(RADIUS);
    let offset = particle.pos - center;
    let dist_sq = offset.length_sq();
    if dist_sq >= reach * reach {
        return false;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > F::EPSILON {
        offset * (F::one() / dist)
    } else {
        Vec2::new(F::zero(), F::one())
    };

    let velocity = particle.velocity_raw();
    let along = velocity.dot(normal);
    let velocity = if along < F::zero() {
        velocity - normal * (along * (F::one() + restitution))
    } else {
        velocity
    };

    particle.pos = center + normal * reach;
    particle.prev_pos = particle.pos - velocity;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SolverConfig<f32> {
        SolverConfig::new()
    }

    #[test]
    fn overlapping_pair_moves_symmetrically() {
        let mut ps = [
            Particle::new(Vec2::new(0.0f32, 0.0)),
            Particle::new(Vec2::new(0.5, 0.0)),
        ];
        assert!(collide_pair(&mut ps, 0, 1, 0.25));
        // Each side moves 0.25 * (1 - 0.5) = 0.125.
        assert!((ps[0].pos.x + 0.125).abs() < 1e-6);
        assert!((ps[1].pos.x - 0.625).abs() < 1e-6);
        assert_eq!(ps[0].prev_pos, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn coincident_pair_uses_fixed_direction() {
        let mut ps = [
            Particle::new(Vec2::new(3.0f32, 3.0)),
            Particle::new(Vec2::new(3.0, 3.0)),
        ];
        assert!(collide_pair(&mut ps, 0, 1, 0.25));
        assert_eq!(ps[0].pos, Vec2::new(3.0, 3.25));
        assert_eq!(ps[1].pos, Vec2::new(3.0, 2.75));
        assert!(ps[0].pos.is_finite() && ps[1].pos.is_finite());
    }

    #[test]
    fn touching_pair_is_left_alone() {
        let mut ps = [
            Particle::new(Vec2::new(0.0f32, 0.0)),
            Particle::new(Vec2::new(1.0, 0.0)),
        ];
        assert!(!collide_pair(&mut ps, 0, 1, 0.25));
        assert_eq!(ps[1].pos, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn nan_neighbour_is_skipped() {
        let mut ps = [
            Particle::new(Vec2::new(f32::NAN, 2.0)),
            Particle::new(Vec2::new(2.0f32, 2.0)),
        ];
        assert!(!collide_pair(&mut ps, 0, 1, 0.25));
        assert!(!collide_pair(&mut ps, 1, 0, 0.25));
        assert_eq!(ps[1].pos, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn box_ejects_through_nearest_face() {
        let b: Obstacle<f32> = Obstacle::boxed(0.0, 0.0, 4.0, 2.0);
        let mut p = Particle::new(Vec2::new(3.0, 1.8));
        assert!(resolve(&b, &mut p, &config()));
        assert_eq!(p.pos, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn box_reflects_incoming_velocity() {
        let b: Obstacle<f32> = Obstacle::boxed(0.0, 0.0, 4.0, 4.0);
        // Entered from the left moving +x by 0.5 per step.
        let mut p = Particle::with_velocity(Vec2::new(0.2, 2.0), Vec2::new(0.5, 0.0));
        assert!(resolve(&b, &mut p, &config()));
        assert_eq!(p.pos, Vec2::new(0.0, 2.0));
        assert!(p.velocity_raw().x < 0.0, "velocity should point back out: {:?}", p.velocity_raw());
    }

    #[test]
    fn box_centre_tie_goes_to_positive_x() {
        let b: Obstacle<f32> = Obstacle::boxed(4.0, 4.0, 6.0, 6.0);
        for _ in 0..3 {
            let mut p = Particle::new(Vec2::new(5.0, 5.0));
            assert!(resolve(&b, &mut p, &config()));
            assert_eq!(p.pos, Vec2::new(6.0, 5.0));
        }
    }

    #[test]
    fn inverse_box_floor_bounce() {
        let bounds: Obstacle<f32> = Obstacle::world_bounds(10.0, 10.0);
        let cfg = config();
        let mut p = Particle::with_velocity(Vec2::new(5.0, 10.5), Vec2::new(0.1, 1.0));
        assert!(resolve(&bounds, &mut p, &cfg));
        assert_eq!(p.pos.y, 10.0);
        // prev.y = 10 + (10 - 9.5) * 0.85
        assert!((p.prev_pos.y - 10.425).abs() < 1e-5);
        // prev.x = 5 - 0.1 * 0.96
        assert!((p.prev_pos.x - 4.904).abs() < 1e-5);
    }

    #[test]
    fn inverse_box_corner_hits_both_axes() {
        let bounds: Obstacle<f32> = Obstacle::world_bounds(10.0, 10.0);
        let mut p = Particle::with_velocity(Vec2::new(-0.5, -0.5), Vec2::new(-1.0, -1.0));
        assert!(resolve(&bounds, &mut p, &config()));
        assert_eq!(p.pos, Vec2::new(0.0, 0.0));
        let v = p.velocity_raw();
        assert!(v.x > 0.0 && v.y > 0.0, "both components should point inward: {:?}", v);
    }

    #[test]
    fn circle_ignored_by_default() {
        let c: Obstacle<f32> = Obstacle::circle(Vec2::new(0.0, 0.0), 1.0);
        let mut p = Particle::new(Vec2::new(0.5, 0.0));
        assert!(c.intersects(p.pos));
        assert!(!resolve(&c, &mut p, &config()));
        assert_eq!(p.pos, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn circle_elastic_pushes_to_rim() {
        let c: Obstacle<f32> = Obstacle::circle(Vec2::new(0.0, 0.0), 1.0);
        let cfg = config().with_circle_response(CircleResponse::Elastic);
        let mut p = Particle::with_velocity(Vec2::new(1.0, 0.0), Vec2::new(-0.2, 0.1));
        assert!(resolve(&c, &mut p, &cfg));
        assert!((p.pos.x - 1.5).abs() < 1e-6);
        let v = p.velocity_raw();
        assert!((v.x - 0.17).abs() < 1e-5, "normal part reflected and damped: {:?}", v);
        assert!((v.y - 0.1).abs() < 1e-5, "tangential part kept: {:?}", v);
    }
}
