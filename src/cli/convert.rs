//! One-shot conversion command.

use anyhow::{Result, bail};

use crate::App;
use crate::cli::ui::{self, StyleType};
use crate::core::amount::parse_amount;
use crate::core::money::{FormatOptions, format_money};
use crate::core::prefs::Preferences;
use crate::orchestrator::RatesSnapshot;

pub async fn run(app: &App, amount: &str, from: &str, to: &str) -> Result<()> {
    let value = parse_amount(amount);
    if !value.is_finite() {
        bail!("Could not parse amount: {amount}");
    }

    let from = from.to_uppercase();
    let to = to.to_uppercase();

    let spinner = ui::new_spinner("Fetching rates...");
    app.orchestrator.start().await;
    spinner.finish_and_clear();

    let snapshot = app.orchestrator.snapshot();
    print_conversion(app, &snapshot, value, &from, &to)?;

    Preferences {
        from,
        to,
        amount: Some(value),
    }
    .save(app.storage.as_ref());

    Ok(())
}

/// Render one conversion from the current snapshot. Shared with the
/// interactive session.
pub(crate) fn print_conversion(
    app: &App,
    snapshot: &RatesSnapshot,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<()> {
    if let Some(error) = &snapshot.error {
        eprintln!("{}", ui::style_text(error, StyleType::Error));
    }

    let Some(table) = &snapshot.data else {
        bail!("No rates available");
    };

    let converted = table.convert(amount, from, to)?;
    let unit_rate = table.convert(1.0, from, to)?;

    let options = FormatOptions {
        locale: app.config.locale.clone(),
        ..Default::default()
    };
    let amount_fmt = format_money(amount, from, &options);
    let converted_fmt = format_money(converted, to, &options);

    println!(
        "{amount_fmt} {from} = {}",
        ui::style_text(&format!("{converted_fmt} {to}"), StyleType::ResultValue)
    );
    println!(
        "{}",
        ui::style_text(&format!("1 {from} = {unit_rate:.4} {to}"), StyleType::Subtle)
    );
    if let Some(updated_at) = snapshot.updated_at {
        println!(
            "{}",
            ui::style_text(
                &format!("Rates as of {}", ui::format_timestamp(updated_at)),
                StyleType::Subtle
            )
        );
    }

    Ok(())
}
