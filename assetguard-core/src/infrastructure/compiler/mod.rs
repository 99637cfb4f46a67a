pub mod jinja;
pub mod sql_guard;

pub use jinja::QueryRenderer;
pub use sql_guard::ensure_read_only;
