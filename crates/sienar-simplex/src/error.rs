use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimplexError {
    #[error("Constraints must all be of same length: row {row} has {found} entries, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Column {name} appears more than once")]
    DuplicateColumn { name: String },
    #[error("Row {row} references unknown column {name}")]
    UnknownColumn { row: usize, name: String },
    #[error("Target function references unknown column {name}")]
    UnknownTargetColumn { name: String },
    #[error("Row {row} has a negative right-hand side but no negative entry to pivot on")]
    NoEligibleColumn { row: usize },
    #[error("Decimal arithmetic overflowed")]
    Overflow,
    #[error("Did not reach a non-negative right-hand side within {iterations} iterations")]
    DidNotConverge { iterations: usize },
}
