//! Currency catalog command, with optional text search.

use anyhow::Result;

use crate::cli::ui;
use crate::core::currency::{all_currencies, filter_currencies};

pub fn run(query: Option<&str>) -> Result<()> {
    let list = all_currencies();
    let matches = match query {
        Some(q) => filter_currencies(q, list),
        None => list.iter().collect(),
    };

    if matches.is_empty() {
        println!("No currencies match \"{}\"", query.unwrap_or_default());
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Digits"),
    ]);

    for meta in matches {
        table.add_row(vec![
            comfy_table::Cell::new(meta.flag.as_deref().unwrap_or("")),
            comfy_table::Cell::new(&meta.code),
            comfy_table::Cell::new(&meta.name),
            comfy_table::Cell::new(meta.symbol_native.as_deref().unwrap_or("")),
            comfy_table::Cell::new(meta.decimal_digits)
                .set_alignment(comfy_table::CellAlignment::Right),
        ]);
    }

    println!("{table}");
    Ok(())
}
