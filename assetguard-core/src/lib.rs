// assetguard-core/src/lib.rs

// 1. Documentation is uneven for now, matching the rest of the workspace
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts the core needs from the outside: table sources, execution sinks, exporters.
pub mod ports;

// 2. Domain (Business core)
// Findings, tables, the check abstraction, the rule set and the registry.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB source, YAML config, SQL templating, CSV execution log, JSON export.
pub mod infrastructure;

// 4. Application (Use Cases)
// Engine, reporting and the verification pipeline.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::{AssetGuardError, RunStage};
