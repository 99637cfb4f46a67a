pub mod check;
pub mod checks;
pub mod error;
pub mod finding;
pub mod project;
pub mod table;

// Convenient re-exports to simplify imports elsewhere
pub use check::{Check, CheckMetadata, CheckParams, CheckRegistry, discover};
pub use error::DomainError;
pub use finding::{DATASET_SUBJECT, Finding, Severity, UNKNOWN_SUBJECT};
pub use table::{Table, Tables, Value};
