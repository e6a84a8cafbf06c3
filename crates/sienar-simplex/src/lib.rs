mod entry;
mod error;
mod problem;
mod row;
mod solution;
mod tableau;

pub use entry::Entry;
pub use error::SimplexError;
pub use problem::Constraint;
pub use row::{Row, RowState};
pub use solution::{BasicSolution, RowSnapshot, TableauSnapshot};
pub use tableau::{Pivot, Tableau, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
