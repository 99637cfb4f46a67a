// assetguard/src/commands/checks.rs
//
// USE CASE: List every discovered check.

use assetguard_core::application::CheckEngine;
use comfy_table::Table as Grid;
use comfy_table::presets::UTF8_FULL;

pub fn execute() -> anyhow::Result<()> {
    let engine = CheckEngine::discover()?;

    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Name", "Severity", "Description"]);
    for descriptor in engine.registry().iter() {
        let meta = descriptor.metadata;
        grid.add_row(vec![
            meta.id.to_string(),
            meta.name.to_string(),
            meta.severity_default.to_string(),
            meta.description.to_string(),
        ]);
    }

    println!("{grid}");
    println!("{} checks available", engine.registry().len());
    Ok(())
}
