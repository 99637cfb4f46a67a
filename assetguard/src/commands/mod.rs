// assetguard/src/commands/mod.rs

pub mod checks;
pub mod inspect;
pub mod run;

use assetguard_core::AssetGuardError;
use assetguard_core::domain::table::Table;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table as Grid};

/// Terminal rendering of the first `limit` rows of a table.
pub fn grid(table: &Table, limit: usize) -> Grid {
    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(table.column_names());
    for row in table.rows().take(limit) {
        grid.add_row(row.values().map(|v| v.to_string()).collect::<Vec<_>>());
    }
    grid
}

/// Prints the failure with its diagnostic chain and exits with status 1.
pub fn fail(err: AssetGuardError) -> ! {
    eprintln!("\n💥 VERIFICATION FAILED: {}", err);
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(1)
}
