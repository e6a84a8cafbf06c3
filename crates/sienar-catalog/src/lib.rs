pub mod catalog;
pub mod error;
pub mod plan;
pub mod provider;
pub mod request;

pub use catalog::{Bundle, Catalog, Content, ContentKind};
pub use error::CatalogError;
pub use plan::{Coverage, Plan, Planner, Purchase, REPORT_SCALE};
pub use provider::CatalogProvider;
pub use request::{build_constraints, build_cost_row, Request, Requirement, HELPER_PREFIX};
