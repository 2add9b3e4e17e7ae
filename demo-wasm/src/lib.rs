use granule::{NoOpStepObserver, Obstacle, ObstacleKind, Solver, WorldSettings};
use wasm_bindgen::prelude::*;

// ---- Galton Board Demo ----

const BIN_SIZE: f32 = 4.0;
const BIN_WALL: f32 = 0.5;
const SETTLED_KE: f32 = 0.008;

#[wasm_bindgen]
pub struct GaltonDemo {
    solver: Solver<f32>,
    flipped: bool,
}

#[wasm_bindgen]
impl GaltonDemo {
    /// `radius` is the particle radius as a fraction of the world height.
    #[wasm_bindgen(constructor)]
    pub fn new(particles: usize, radius: f32, sub_steps: usize) -> Result<GaltonDemo, JsValue> {
        let settings = WorldSettings {
            particles,
            radius,
            sub_steps,
            ..WorldSettings::new()
        };
        let config = settings.resolve();
        let (width, height) = (config.world_width, config.world_height);

        let pitch = BIN_SIZE + BIN_WALL;
        let top = height * 0.7;
        let bins = ((width - pitch) / pitch) as usize;
        let mut obstacles: Vec<Obstacle<f32>> = (0..bins)
            .map(|i| {
                let x = pitch + pitch * i as f32;
                Obstacle::boxed(x, top, x + BIN_WALL, height)
            })
            .collect();
        obstacles.push(Obstacle::world_bounds(width, height));

        let solver = Solver::new(config, obstacles).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(GaltonDemo { solver, flipped: false })
    }

    /// Spawn a row, step one frame, and flip gravity once the board settles.
    pub fn update(&mut self) {
        self.solver.spawn_random();
        self.solver.update(&mut NoOpStepObserver);

        if self.solver.mean_kinetic_energy() * 1000.0 < SETTLED_KE {
            if !self.flipped {
                self.solver.flip_gravity();
                self.flipped = true;
            }
        } else {
            self.flipped = false;
        }
    }

    pub fn world_width(&self) -> f32 {
        self.solver.config().world_width
    }
    pub fn world_height(&self) -> f32 {
        self.solver.config().world_height
    }

    /// Returns flat [x0, y0, x1, y1, ...] in diameters
    pub fn positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.solver.active() * 2);
        for p in self.solver.particles() {
            out.push(p.pos.x);
            out.push(p.pos.y);
        }
        out
    }

    /// Returns flat [x0, y0, x1, y1, ...] for every solid box
    pub fn boxes(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for o in self.solver.obstacles() {
            if o.kind() == ObstacleKind::Box {
                let (min, max) = o.min_max();
                out.extend_from_slice(&[min.x, min.y, max.x, max.y]);
            }
        }
        out
    }

    pub fn particle_count(&self) -> usize {
        self.solver.active()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.solver.kinetic_energy()
    }
}
