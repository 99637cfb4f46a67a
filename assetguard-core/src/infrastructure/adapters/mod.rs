pub mod duckdb;

pub use self::duckdb::DuckDbSource;
