//! Fixed-radius 2D particle engine for games and demos.
//!
//! `granule` simulates many equal-sized particles with sub-stepped Verlet
//! integration. Neighbours are found through a uniform grid rebuilt by
//! counting sort every sub-step; static obstacles are pre-binned into a
//! per-cell table once.
//!
//! # Features
//!
//! - **Counting-sort grid**: Half-diameter cells, no per-step allocation
//! - **Look-back traversal**: Every nearby pair is tested exactly once per pass
//! - **Static obstacles**: Solid boxes, containing boxes, and circles
//! - **Deterministic**: Same config and seed give bit-identical runs
//! - **Observable**: Monitor grid rebuilds and pair tests via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments
//!
//! # Example
//! ```
//! use granule::{NoOpStepObserver, Obstacle, Solver, SolverConfig};
//!
//! let config: SolverConfig<f32> = SolverConfig::new().with_world_size(64.0, 48.0);
//! let mut solver = Solver::new(config, vec![Obstacle::world_bounds(64.0, 48.0)]).unwrap();
//! solver.spawn_random();
//! for _ in 0..10 {
//!     solver.update(&mut NoOpStepObserver);
//! }
//! assert_eq!(solver.active(), 63);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod obstacle;
pub mod collision;
pub mod grid;
pub mod table;
pub mod solver;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use particle::{Particle, ParticleStore};
pub use obstacle::{Obstacle, ObstacleKind};
pub use grid::{GridLayout, SpatialGrid};
pub use table::{ObstacleTable, TableStats};
pub use solver::Solver;
pub use config::{CircleResponse, SolverConfig, WorldSettings};
pub use observer::{StepObserver, NoOpStepObserver, PairCounter};
pub use error::PhysicsError;
