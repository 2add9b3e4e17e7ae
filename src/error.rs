//! Error types for solver construction.

use core::fmt;

/// Errors that can occur while configuring a solver or building its tables.
///
/// Nothing in the per-step path returns an error; these are all raised at setup.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// World width and height must be finite and at least one diameter.
    InvalidWorldSize,
    /// The grid border is too thin for the two-cell look-back window.
    BorderTooSmall { border: usize, min: usize },
    /// Particle indices are stored as `u32`.
    CapacityTooLarge { capacity: usize },
    /// Cell indices are stored as `u32`.
    GridTooLarge { cells: usize },
    /// The per-cell obstacle table would overflow 32-bit indices.
    TooManyObstacles { count: usize },
    /// A coefficient is NaN or infinite.
    InvalidCoefficient { name: &'static str },
    /// A shared obstacle table was built for a different grid.
    LayoutMismatch,
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidWorldSize => {
                write!(f, "world size must be finite and at least one particle diameter")
            }
            PhysicsError::BorderTooSmall { border, min } => {
                write!(f, "grid border {} is below the minimum of {} diameters", border, min)
            }
            PhysicsError::CapacityTooLarge { capacity } => {
                write!(f, "particle capacity {} does not fit in 32-bit indices", capacity)
            }
            PhysicsError::GridTooLarge { cells } => {
                write!(f, "grid of {} cells does not fit in 32-bit indices", cells)
            }
            PhysicsError::TooManyObstacles { count } => {
                write!(f, "{} obstacles overflow the per-cell obstacle table", count)
            }
            PhysicsError::InvalidCoefficient { name } => {
                write!(f, "coefficient `{}` must be finite", name)
            }
            PhysicsError::LayoutMismatch => {
                write!(f, "obstacle table was built for a different grid layout")
            }
        }
    }
}
