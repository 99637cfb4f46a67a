// assetguard-core/src/ports/mod.rs

pub mod execution;
pub mod source;

pub use execution::{ExecutionEvent, ExecutionSink};
pub use source::{TableSource, load_tables};
