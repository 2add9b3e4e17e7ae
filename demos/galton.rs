//! Headless Galton board: particles rain into a row of bins until the
//! capacity is reached, and gravity flips whenever the pile settles.
//!
//! Run with `cargo run --release --example galton [frames]`.

use granule::{NoOpStepObserver, Obstacle, Solver, WorldSettings};

/// Bin pitch is four diameters plus one wall.
const BIN_SIZE: f32 = 4.0;
const BIN_WALL: f32 = 0.5;
/// Mean kinetic energy (x1000) below which the board counts as settled.
const SETTLED_KE: f32 = 0.008;

fn bins(width: f32, height: f32) -> Vec<Obstacle<f32>> {
    let pitch = BIN_SIZE + BIN_WALL;
    let top = height * 0.7;
    let count = ((width - pitch) / pitch) as usize;
    (0..count)
        .map(|i| {
            let x = pitch + pitch * i as f32;
            Obstacle::boxed(x, top, x + BIN_WALL, height)
        })
        .collect()
}

fn main() {
    let frames: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2000);

    let config = WorldSettings::<f32>::new().resolve();
    let (width, height) = (config.world_width, config.world_height);

    let mut obstacles = bins(width, height);
    let bin_count = obstacles.len();
    obstacles.push(Obstacle::world_bounds(width, height));

    let mut solver = match Solver::new(config, obstacles) {
        Ok(solver) => solver,
        Err(err) => {
            eprintln!("failed to build solver: {}", err);
            std::process::exit(1);
        }
    };
    let stats = solver.table().stats();
    println!(
        "world {}x{}, {} bins, {} table references in {} cells (max {} per cell)",
        width, height, bin_count, stats.references, stats.occupied_cells, stats.max_per_cell
    );

    let mut flipped = false;
    for frame in 0..frames {
        solver.spawn_random();
        solver.update(&mut NoOpStepObserver);

        let ke = solver.mean_kinetic_energy() * 1000.0;
        if ke < SETTLED_KE {
            if !flipped {
                solver.flip_gravity();
                flipped = true;
                println!("frame {}: settled at {} particles, flipping gravity", frame, solver.active());
            }
        } else {
            flipped = false;
        }
    }

    let pitch = BIN_SIZE + BIN_WALL;
    let floor = height * 0.7;
    let mut counts = vec![0usize; bin_count + 1];
    for p in solver.particles() {
        if p.pos.y >= floor {
            let bin = ((p.pos.x / pitch).max(0.0) as usize).min(bin_count);
            counts[bin] += 1;
        }
    }

    let most = counts.iter().copied().max().unwrap_or(0).max(1);
    for (i, &n) in counts.iter().enumerate() {
        println!("{:3} {:5} {}", i, n, "#".repeat(n * 60 / most));
    }
    println!(
        "{} updates, {} particles, kinetic energy {:.6}",
        solver.updates(),
        solver.active(),
        solver.kinetic_energy()
    );
}
