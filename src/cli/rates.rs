//! Rate table command: show every known rate against a base currency.

use anyhow::{Result, bail};

use crate::App;
use crate::cli::ui::{self, StyleType};
use crate::core::currency::find_currency;

pub async fn run(app: &App, base: Option<&str>) -> Result<()> {
    let spinner = ui::new_spinner("Fetching rates...");
    app.orchestrator.start().await;
    spinner.finish_and_clear();

    if !app.online.is_online() {
        println!("{}", ui::offline_banner());
    }

    let snapshot = app.orchestrator.snapshot();
    if let Some(error) = &snapshot.error {
        eprintln!("{}", ui::style_text(error, StyleType::Error));
    }
    let Some(rate_table) = &snapshot.data else {
        bail!("No rates available");
    };

    let base = base
        .map(str::to_uppercase)
        .unwrap_or_else(|| rate_table.base.clone());
    if !rate_table.supports(&base) {
        bail!("Unknown currency code: {base}");
    }

    let mut codes: Vec<&str> = rate_table.rates.keys().map(String::as_str).collect();
    codes.sort_unstable();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell(&format!("1 {base} =")),
    ]);

    for code in codes {
        if code == base {
            continue;
        }
        let rate = rate_table.convert(1.0, &base, code)?;
        let meta = find_currency(code);
        table.add_row(vec![
            comfy_table::Cell::new(meta.and_then(|m| m.flag.as_deref()).unwrap_or("")),
            comfy_table::Cell::new(code),
            comfy_table::Cell::new(meta.map_or("", |m| m.name.as_str())),
            ui::rate_cell(rate),
        ]);
    }

    println!("{table}");
    print_footer(app, &snapshot);

    Ok(())
}

fn print_footer(app: &App, snapshot: &crate::orchestrator::RatesSnapshot) {
    let mut parts = Vec::new();
    if let Some(entry) = app.cache.read() {
        if let Some(source) = &entry.source {
            parts.push(format!("Source: {source}"));
        }
        if app.cache.is_stale(&entry) {
            parts.push("stale".to_string());
        }
    }
    if let Some(updated_at) = snapshot.updated_at {
        parts.push(format!("Updated: {}", ui::format_timestamp(updated_at)));
    }
    if !parts.is_empty() {
        println!("{}", ui::style_text(&parts.join(" | "), StyleType::Subtle));
    }
}
