//! Uniform spatial grid: cell hashing, per-sub-step counting sort, and the
//! look-back pair traversal.
//!
//! Cells are half a particle diameter wide, so two touching particles are
//! never more than two cells apart on either axis. Cells are numbered
//! column-major (`ix * rows + iy`).
//!
//! # Traversal
//!
//! Cells are visited in ascending order and, inside a cell, dense slots in
//! ascending order. The particle in slot `g` of cell `c` is tested against
//!
//! 1. every slot in `[start(c - 2), g)`: the two cells below it in its own
//!    column plus the earlier slots of its own cell, and
//! 2. every slot of cells `iy - 2 ..= iy + 2` in columns `ix - 1` and `ix - 2`.
//!
//! Only earlier particles are ever visited, so each unordered pair inside
//! the 5x5-cell window is tested exactly once per pass.

use crate::collision;
use crate::config::SolverConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::table::ObstacleTable;
use crate::vec::Vec2;
use alloc::vec;
use alloc::vec::Vec as AllocVec;
use core::ops::Range;

/// How far the traversal reaches from a particle's own cell, in cells.
pub const WINDOW: usize = 2;

/// Geometry of the padded grid shared by the dynamic grid and the obstacle table.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout<F: Float> {
    cols: usize,
    rows: usize,
    border_cells: usize,
    offset: F,
}

impl<F: Float> GridLayout<F> {
    /// Grid covering the configured world plus its border on every side.
    pub fn new(config: &SolverConfig<F>) -> Result<Self, PhysicsError> {
        config.validate()?;
        let overflow = PhysicsError::GridTooLarge { cells: usize::MAX };
        let border_cells = config.border.checked_mul(2).ok_or_else(|| overflow.clone())?;
        let span = |extent: F| {
            let inner = (extent * F::two()).ceil().to_i64() as usize;
            border_cells.checked_mul(2).and_then(|pad| inner.checked_add(pad))
        };
        let (cols, rows) = match (span(config.world_width), span(config.world_height)) {
            (Some(cols), Some(rows)) => (cols, rows),
            _ => return Err(overflow),
        };
        let cells = cols.checked_mul(rows).unwrap_or(usize::MAX);
        if cells >= u32::MAX as usize {
            return Err(PhysicsError::GridTooLarge { cells });
        }
        Ok(GridLayout {
            cols,
            rows,
            border_cells,
            offset: F::from_f32(border_cells as f32),
        })
    }

    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }
    pub fn cell_count(&self) -> usize { self.cols * self.rows }
    pub fn border_cells(&self) -> usize { self.border_cells }

    /// Axis index of a coordinate, clamped so the traversal window stays in range.
    #[inline]
    fn axis(&self, v: F, dim: usize) -> usize {
        let i = (v * F::two() + self.offset).to_i64();
        i.clamp(WINDOW as i64, (dim - 1 - WINDOW) as i64) as usize
    }

    /// `(ix, iy)` of the cell containing `pos`.
    ///
    /// Positions that have escaped the padded grid are pinned to its
    /// outermost usable cells instead of producing an out-of-range index.
    #[inline]
    pub fn cell_coords(&self, pos: Vec2<F>) -> (usize, usize) {
        (self.axis(pos.x, self.cols), self.axis(pos.y, self.rows))
    }

    /// Linear cell index of `pos`.
    #[inline]
    pub fn cell_of(&self, pos: Vec2<F>) -> usize {
        let (ix, iy) = self.cell_coords(pos);
        self.index(ix, iy)
    }

    #[inline]
    pub fn index(&self, ix: usize, iy: usize) -> usize {
        ix * self.rows + iy
    }

    /// World position of the lower-left corner of cell `(x, y)`.
    ///
    /// `x` may equal `cols` (and `y` `rows`) to address the far corners.
    pub fn corner(&self, x: usize, y: usize) -> Vec2<F> {
        let fx = F::from_f32(x as f32) - self.offset;
        let fy = F::from_f32(y as f32) - self.offset;
        Vec2::new(fx * F::half(), fy * F::half())
    }
}

/// Dense cell-to-particle partition, rebuilt every sub-step without allocating.
pub struct SpatialGrid<F: Float> {
    layout: GridLayout<F>,
    /// One counter per cell plus a sentinel; start offsets after `reconstruct`.
    cell_start: AllocVec<u32>,
    /// Particle indices grouped by cell.
    dense: AllocVec<u32>,
    active: usize,
}

impl<F: Float> SpatialGrid<F> {
    pub fn new(layout: GridLayout<F>, capacity: usize) -> Self {
        let cells = layout.cell_count();
        SpatialGrid {
            layout,
            cell_start: vec![0; cells + 1],
            dense: vec![0; capacity],
            active: 0,
        }
    }

    pub fn layout(&self) -> &GridLayout<F> { &self.layout }
    pub fn capacity(&self) -> usize { self.dense.len() }

    /// Counting-sort `particles` into cells.
    ///
    /// `particles.len()` must not exceed the capacity the grid was built with.
    pub fn reconstruct(&mut self, particles: &[Particle<F>]) {
        assert!(
            particles.len() <= self.dense.len(),
            "grid holds {} particles, got {}",
            self.dense.len(),
            particles.len()
        );

        self.cell_start.fill(0);
        for p in particles {
            let cell = self.layout.cell_of(p.pos);
            self.cell_start[cell] += 1;
        }

        // Running sum: each counter becomes the end of its cell's run.
        let mut sum = 0u32;
        for count in self.cell_start.iter_mut() {
            sum += *count;
            *count = sum;
        }

        // Filling each run back to front leaves every counter at its cell's start.
        for (i, p) in particles.iter().enumerate() {
            let cell = self.layout.cell_of(p.pos);
            let slot = &mut self.cell_start[cell];
            *slot -= 1;
            self.dense[*slot as usize] = i as u32;
        }
        self.active = particles.len();
    }

    /// Number of particles sorted by the last `reconstruct`.
    pub fn active(&self) -> usize { self.active }

    /// Particle indices grouped by cell.
    pub fn dense_order(&self) -> &[u32] {
        &self.dense[..self.active]
    }

    /// Dense slots holding the particles of `cell`.
    pub fn cell_range(&self, cell: usize) -> Range<usize> {
        self.cell_start[cell] as usize..self.cell_start[cell + 1] as usize
    }

    /// Particle indices in `cell`.
    pub fn cell_particles(&self, cell: usize) -> &[u32] {
        &self.dense[self.cell_range(cell)]
    }

    /// Resolve static obstacles and all nearby particle pairs, in traversal order.
    ///
    /// `particles` must be the slice passed to the last `reconstruct`.
    pub fn resolve<O: StepObserver>(
        &self,
        particles: &mut [Particle<F>],
        table: &ObstacleTable<F>,
        config: &SolverConfig<F>,
        observer: &mut O,
    ) {
        debug_assert_eq!(particles.len(), self.active);
        debug_assert_eq!(table.layout(), &self.layout, "obstacle table built for another grid");
        let rows = self.layout.rows;
        let starts = &self.cell_start;
        let dense = &self.dense;
        let response = config.response;

        for cell in 0..self.layout.cell_count() {
            let run = self.cell_range(cell);
            if run.is_empty() {
                continue;
            }

            for g in run {
                let a = dense[g] as usize;

                // Statics are looked up where the particle is now, which may
                // differ from its sorted cell after earlier pairs pushed it.
                let here = self.layout.cell_of(particles[a].pos);
                for obstacle in table.candidates(here) {
                    collision::resolve(obstacle, &mut particles[a], config);
                }

                // Own column: two cells below, then earlier slots of this cell.
                for &b in &dense[starts[cell - WINDOW] as usize..g] {
                    let b = b as usize;
                    observer.on_pair_tested(a, b);
                    collision::collide_pair(particles, a, b, response);
                }

                // The two columns to the left, full five-cell span.
                let mut column = cell;
                for _ in 0..WINDOW {
                    column -= rows;
                    let lo = starts[column - WINDOW] as usize;
                    let hi = starts[column + WINDOW + 1] as usize;
                    for &b in &dense[lo..hi] {
                        let b = b as usize;
                        observer.on_pair_tested(a, b);
                        collision::collide_pair(particles, a, b, response);
                    }
                }
            }
        }
    }
}
