use granule::{
    NoOpStepObserver, Obstacle, ObstacleKind, PhysicsError, Solver, SolverConfig, StepObserver,
    Vec2, WorldSettings,
};
use granule::collision;
use granule::particle::RADIUS;
use std::sync::Arc;

#[test]
fn particles_stay_inside_world_bounds() {
    let (w, h) = (40.0f32, 30.0);
    let config = SolverConfig::<f32>::new()
        .with_world_size(w, h)
        .with_capacity(400)
        .with_seed(3);
    let bounds = Obstacle::world_bounds(w, h);
    let mut solver = Solver::new(config, vec![bounds]).unwrap();

    let outside = |pos: Vec2<f32>| {
        (-pos.x).max(pos.x - w).max(-pos.y).max(pos.y - h).max(0.0)
    };

    let mut worst = 0.0f32;
    for frame in 0..300 {
        if frame % 10 == 0 {
            solver.spawn_random();
        }
        solver.update(&mut NoOpStepObserver);
        for (i, p) in solver.particles().iter().enumerate() {
            assert!(p.pos.is_finite(), "frame {}: particle {} is not finite", frame, i);
            worst = worst.max(outside(p.pos));

            // Integration may carry a particle past the wall until the next
            // resolve; the boundary response itself must land it inside.
            let mut resolved = *p;
            collision::resolve(&bounds, &mut resolved, solver.config());
            assert!(
                outside(resolved.pos) <= 1e-5,
                "frame {}: particle {} left at {:?} after the boundary response",
                frame,
                i,
                resolved.pos
            );
        }
    }
    assert!(worst < RADIUS, "post-integration overshoot {} reached a radius", worst);
    assert_eq!(solver.active(), 400);
}

#[test]
fn active_count_grows_monotonically_up_to_capacity() {
    let config = SolverConfig::<f32>::new().with_world_size(30.0, 20.0).with_capacity(100);
    let mut solver = Solver::new(config, vec![Obstacle::world_bounds(30.0, 20.0)]).unwrap();

    let mut last = solver.active();
    assert_eq!(last, 0);
    for _ in 0..8 {
        let spawned = solver.spawn_random();
        solver.update(&mut NoOpStepObserver);
        assert_eq!(solver.active(), last + spawned);
        assert!(solver.active() <= solver.capacity());
        last = solver.active();
    }
    // 29 per row: 29, 58, 87, then 13 to fill.
    assert_eq!(last, 100);
    assert_eq!(solver.spawn_random(), 0);
}

#[test]
fn integration_is_exact() {
    let config = SolverConfig::<f32>::new()
        .with_world_size(20.0, 20.0)
        .with_sub_steps(1)
        .with_gravity(Vec2::new(0.0, 0.001));
    let mut solver = Solver::new(config, vec![]).unwrap();
    solver.spawn_with_velocity(Vec2::new(5.0, 5.0), Vec2::new(0.25, -0.125));

    let before = *solver.particle(0);
    let expected = before.pos + (before.pos - before.prev_pos) + solver.gravity();
    solver.update(&mut NoOpStepObserver);
    assert_eq!(solver.particle(0).pos, expected);
    assert_eq!(solver.particle(0).prev_pos, before.pos);
}

#[test]
fn kinetic_energy_sums_over_particles() {
    let config = SolverConfig::<f32>::new().with_world_size(20.0, 20.0).with_half_mass(0.5);
    let mut solver = Solver::new(config, vec![]).unwrap();
    solver.spawn_with_velocity(Vec2::new(2.0, 2.0), Vec2::new(0.3, 0.4));
    solver.spawn_with_velocity(Vec2::new(8.0, 8.0), Vec2::new(0.0, 0.2));
    solver.spawn(Vec2::new(14.0, 14.0));

    let ke = solver.kinetic_energy();
    // 0.5 * (0.25 + 0.04 + 0)
    assert!((ke - 0.145).abs() < 1e-5, "ke = {}", ke);
    assert!((solver.mean_kinetic_energy() - 0.145 / 3.0).abs() < 1e-5);
}

#[test]
fn observer_sees_every_substep() {
    #[derive(Default)]
    struct Tally {
        integrations: usize,
        substeps: Vec<usize>,
        steps: usize,
    }
    impl StepObserver for Tally {
        fn on_integrate(&mut self) {
            self.integrations += 1;
        }
        fn on_substep_complete(&mut self, substep: usize) {
            self.substeps.push(substep);
        }
        fn on_step_complete(&mut self) {
            self.steps += 1;
        }
    }

    let config = SolverConfig::<f32>::new().with_world_size(10.0, 10.0).with_sub_steps(4);
    let mut solver = Solver::new(config, vec![]).unwrap();
    let mut tally = Tally::default();
    solver.update(&mut tally);
    solver.update(&mut tally);
    assert_eq!(tally.integrations, 8);
    assert_eq!(tally.substeps, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    assert_eq!(tally.steps, 2);
    assert_eq!(solver.updates(), 2);
}

#[test]
fn obstacle_table_is_shared() {
    let config = SolverConfig::<f32>::new().with_world_size(32.0, 24.0);
    let obstacles = vec![
        Obstacle::world_bounds(32.0, 24.0),
        Obstacle::boxed(10.0, 10.0, 14.0, 12.0),
    ];
    let first = Solver::new(config.clone(), obstacles).unwrap();
    let second = Solver::with_table(config.with_seed(9), Arc::clone(first.table())).unwrap();

    assert!(Arc::ptr_eq(first.table(), second.table()));
    assert_eq!(Arc::strong_count(first.table()), 2);
    let kinds: Vec<_> = second.obstacles().iter().map(|o| o.kind()).collect();
    assert_eq!(kinds, vec![ObstacleKind::InverseBox, ObstacleKind::Box]);
}

#[test]
fn mismatched_table_is_rejected() {
    let small = Solver::new(SolverConfig::<f32>::new().with_world_size(16.0, 16.0), vec![]).unwrap();
    let result = Solver::with_table(
        SolverConfig::new().with_world_size(16.0, 16.0).with_border(3),
        Arc::clone(small.table()),
    );
    assert_eq!(result.err(), Some(PhysicsError::LayoutMismatch));
}

#[test]
fn invalid_config_is_rejected() {
    let result = Solver::new(SolverConfig::<f32>::new().with_world_size(0.0, 10.0), vec![]);
    assert_eq!(result.err(), Some(PhysicsError::InvalidWorldSize));

    let result = Solver::new(SolverConfig::<f32>::new().with_border(0), vec![]);
    assert!(matches!(result.err(), Some(PhysicsError::BorderTooSmall { .. })));
}

#[test]
fn world_settings_drive_a_solver() {
    let settings: WorldSettings<f32> = WorldSettings {
        particles: 500,
        ..WorldSettings::new()
    };
    let config = settings.resolve();
    let (w, h) = (config.world_width, config.world_height);
    let mut solver = Solver::new(config, vec![Obstacle::world_bounds(w, h)]).unwrap();
    assert_eq!(solver.spawn_random(), 213);
    for _ in 0..5 {
        solver.update(&mut NoOpStepObserver);
    }
    assert_eq!(solver.active(), 213);
    assert_eq!(solver.capacity(), 500);
    assert!(solver.kinetic_energy() >= 0.0);
}
