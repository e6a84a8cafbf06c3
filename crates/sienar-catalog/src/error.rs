use std::path::PathBuf;

use sienar_simplex::SimplexError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate bundle: {0}")]
    DuplicateBundle(String),
    #[error("Bundle name {0} is reserved for helper columns")]
    ReservedName(String),
    #[error("No bundle contains item {0}")]
    UnknownItem(String),
    #[error("Solver error: {0}")]
    Simplex(#[from] SimplexError),
}
