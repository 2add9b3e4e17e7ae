//! Per-cell candidate lists for the static obstacles.
//!
//! Built once from grid corner samples. A cell lists an obstacle if any of
//! its four corners lies within one cell of the shape; the narrow phase then
//! only sees the handful of obstacles near each particle.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::grid::GridLayout;
use crate::obstacle::Obstacle;
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// Summary of a built table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Total number of cell-to-obstacle references.
    pub references: usize,
    /// Cells with at least one candidate.
    pub occupied_cells: usize,
    /// Largest candidate list of any single cell.
    pub max_per_cell: usize,
}

/// Immutable obstacle lookup keyed by grid cell.
///
/// Cheap to share between solvers with the same [`GridLayout`] through an `Arc`.
#[derive(Clone, Debug)]
pub struct ObstacleTable<F: Float> {
    layout: GridLayout<F>,
    obstacles: AllocVec<Obstacle<F>>,
    /// `cells + 1` offsets into `refs`.
    starts: AllocVec<u32>,
    refs: AllocVec<u32>,
}

impl<F: Float> ObstacleTable<F> {
    /// Sample every grid corner against every obstacle and record, per cell,
    /// the obstacles any of its corners could touch.
    ///
    /// Candidates within a cell keep the order of `obstacles`.
    pub fn build(layout: GridLayout<F>, obstacles: AllocVec<Obstacle<F>>) -> Result<Self, PhysicsError> {
        let cells = layout.cell_count();
        let count = obstacles.len();
        let bitmap_len = cells
            .checked_mul(count)
            .filter(|&n| n < u32::MAX as usize)
            .ok_or(PhysicsError::TooManyObstacles { count })?;

        let (cols, rows) = (layout.cols(), layout.rows());
        let margin = F::half();
        let mut marks = vec![false; bitmap_len];

        // Corner (x, y) is shared by cells (x-1..=x, y-1..=y).
        for x in 0..=cols {
            for y in 0..=rows {
                let point = layout.corner(x, y);
                for (i, obstacle) in obstacles.iter().enumerate() {
                    if !obstacle.could_touch(point, margin) {
                        continue;
                    }
                    for cx in x.saturating_sub(1)..=x.min(cols - 1) {
                        for cy in y.saturating_sub(1)..=y.min(rows - 1) {
                            marks[layout.index(cx, cy) * count + i] = true;
                        }
                    }
                }
            }
        }

        let mut starts = AllocVec::with_capacity(cells + 1);
        let mut refs = AllocVec::new();
        for cell in 0..cells {
            starts.push(refs.len() as u32);
            let row = &marks[cell * count..(cell + 1) * count];
            refs.extend(row.iter().enumerate().filter(|(_, m)| **m).map(|(i, _)| i as u32));
        }
        starts.push(refs.len() as u32);

        Ok(ObstacleTable { layout, obstacles, starts, refs })
    }

    /// Obstacles a particle in `cell` may have to be resolved against.
    #[inline]
    pub fn candidates(&self, cell: usize) -> impl Iterator<Item = &Obstacle<F>> + '_ {
        self.cell_refs(cell).iter().map(move |&i| &self.obstacles[i as usize])
    }

    /// Obstacle indices listed for `cell`.
    #[inline]
    pub fn cell_refs(&self, cell: usize) -> &[u32] {
        let lo = self.starts[cell] as usize;
        let hi = self.starts[cell + 1] as usize;
        &self.refs[lo..hi]
    }

    pub fn obstacles(&self) -> &[Obstacle<F>] {
        &self.obstacles
    }

    pub fn layout(&self) -> &GridLayout<F> {
        &self.layout
    }

    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats { references: self.refs.len(), ..TableStats::default() };
        for window in self.starts.windows(2) {
            let n = (window[1] - window[0]) as usize;
            if n > 0 {
                stats.occupied_cells += 1;
                stats.max_per_cell = stats.max_per_cell.max(n);
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::vec::Vec2;

    fn layout() -> GridLayout<f32> {
        GridLayout::new(&SolverConfig::new().with_world_size(20.0, 20.0).with_border(2)).unwrap()
    }

    #[test]
    fn empty_table_has_no_candidates() {
        let table = ObstacleTable::build(layout(), vec![]).unwrap();
        assert_eq!(table.stats(), TableStats::default());
        assert_eq!(table.candidates(100).count(), 0);
    }

    #[test]
    fn box_is_listed_only_nearby() {
        let l = layout();
        let table = ObstacleTable::build(l.clone(), vec![Obstacle::boxed(8.0, 8.0, 12.0, 12.0)]).unwrap();
        assert_eq!(table.cell_refs(l.cell_of(Vec2::new(10.0, 10.0))), &[0]);
        assert_eq!(table.cell_refs(l.cell_of(Vec2::new(12.2, 10.0))), &[0]);
        assert!(table.cell_refs(l.cell_of(Vec2::new(2.0, 2.0))).is_empty());
    }

    #[test]
    fn boundary_is_listed_along_edges_not_centre() {
        let l = layout();
        let table = ObstacleTable::build(l.clone(), vec![Obstacle::world_bounds(20.0, 20.0)]).unwrap();
        assert_eq!(table.cell_refs(l.cell_of(Vec2::new(0.1, 10.0))), &[0]);
        assert_eq!(table.cell_refs(l.cell_of(Vec2::new(10.0, 19.9))), &[0]);
        // Escaped particles clamp into border cells, which still see the boundary.
        assert_eq!(table.cell_refs(l.cell_of(Vec2::new(-50.0, 10.0))), &[0]);
        assert!(table.cell_refs(l.cell_of(Vec2::new(10.0, 10.0))).is_empty());
    }

    #[test]
    fn candidates_keep_obstacle_order() {
        let l = layout();
        let obstacles = vec![
            Obstacle::world_bounds(20.0, 20.0),
            Obstacle::circle(Vec2::new(1.0, 1.0), 1.0),
        ];
        let table = ObstacleTable::build(l.clone(), obstacles).unwrap();
        assert_eq!(table.cell_refs(l.cell_of(Vec2::new(0.2, 0.2))), &[0, 1]);
        let stats = table.stats();
        assert!(stats.max_per_cell == 2);
        assert!(stats.references > stats.occupied_cells);
    }
}
