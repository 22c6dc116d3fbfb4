//! Interactive conversion session over stdin.
//!
//! Typed amounts are debounced so a burst of keystrokes / pasted lines
//! results in a single conversion. `pair`, `reload`, and `quit` are handled
//! immediately.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::App;
use crate::cli::convert::print_conversion;
use crate::cli::ui::{self, StyleType};
use crate::core::amount::parse_amount;
use crate::core::currency::find_currency;
use crate::core::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::core::prefs::Preferences;

pub async fn run(app: &App) -> Result<()> {
    let spinner = ui::new_spinner("Fetching rates...");
    app.orchestrator.start().await;
    spinner.finish_and_clear();

    let watcher = app.orchestrator.spawn_online_watcher();

    let mut prefs = Preferences::load(app.storage.as_ref()).unwrap_or(Preferences {
        from: app.config.defaults.from.clone(),
        to: app.config.defaults.to.clone(),
        amount: None,
    });

    if !app.online.is_online() {
        println!("{}", ui::offline_banner());
    }
    println!(
        "{}",
        ui::style_text(
            &format!("Converting {} -> {}", prefs.from, prefs.to),
            StyleType::Title
        )
    );
    println!(
        "{}",
        ui::style_text(
            "Type an amount, 'pair FROM TO', 'reload', or 'quit'.",
            StyleType::Subtle
        )
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut debouncer: Debouncer<String> = Debouncer::new(DEFAULT_DEBOUNCE);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                match parse_command(input) {
                    Command::Quit => break,
                    Command::Pair(from, to) => {
                        prefs.from = from;
                        prefs.to = to;
                        println!(
                            "{}",
                            ui::style_text(
                                &format!("Converting {} -> {}", prefs.from, prefs.to),
                                StyleType::Title
                            )
                        );
                    }
                    Command::Reload => {
                        let spinner = ui::new_spinner("Refreshing rates...");
                        app.orchestrator.reload().await;
                        spinner.finish_and_clear();
                        let snapshot = app.orchestrator.snapshot();
                        if let Some(error) = &snapshot.error {
                            eprintln!("{}", ui::style_text(error, StyleType::Error));
                        } else if let Some(updated_at) = snapshot.updated_at {
                            println!(
                                "{}",
                                ui::style_text(
                                    &format!("Rates as of {}", ui::format_timestamp(updated_at)),
                                    StyleType::Subtle
                                )
                            );
                        }
                    }
                    Command::Invalid(message) => {
                        eprintln!("{}", ui::style_text(&message, StyleType::Error));
                    }
                    Command::Amount(raw) => debouncer.push(raw),
                }
            }
            raw = debouncer.settled() => {
                let value = parse_amount(&raw);
                if !value.is_finite() {
                    eprintln!(
                        "{}",
                        ui::style_text(&format!("Could not parse amount: {raw}"), StyleType::Error)
                    );
                    continue;
                }
                prefs.amount = Some(value);
                let snapshot = app.orchestrator.snapshot();
                if let Err(e) = print_conversion(app, &snapshot, value, &prefs.from, &prefs.to) {
                    eprintln!("{}", ui::style_text(&e.to_string(), StyleType::Error));
                }
            }
        }
    }

    watcher.abort();
    app.orchestrator.shutdown();
    if !prefs.save(app.storage.as_ref()) {
        debug!("Could not persist preferences");
    }
    Ok(())
}

enum Command {
    Quit,
    Reload,
    Pair(String, String),
    Amount(String),
    Invalid(String),
}

fn parse_command(input: &str) -> Command {
    match input.to_lowercase().as_str() {
        "quit" | "exit" | "q" => return Command::Quit,
        "reload" | "refresh" => return Command::Reload,
        _ => {}
    }

    if let Some(rest) = input
        .strip_prefix("pair ")
        .or_else(|| input.strip_prefix("PAIR "))
    {
        let codes: Vec<&str> = rest.split_whitespace().collect();
        let [from, to] = codes.as_slice() else {
            return Command::Invalid("Usage: pair FROM TO".to_string());
        };
        let (from, to) = (from.to_uppercase(), to.to_uppercase());
        for code in [&from, &to] {
            if find_currency(code).is_none() {
                return Command::Invalid(format!("Unknown currency code: {code}"));
            }
        }
        return Command::Pair(from, to);
    }

    Command::Amount(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_keywords() {
        assert!(matches!(parse_command("quit"), Command::Quit));
        assert!(matches!(parse_command("EXIT"), Command::Quit));
        assert!(matches!(parse_command("reload"), Command::Reload));
    }

    #[test]
    fn test_parse_command_pair() {
        match parse_command("pair usd inr") {
            Command::Pair(from, to) => {
                assert_eq!(from, "USD");
                assert_eq!(to, "INR");
            }
            _ => panic!("expected a pair command"),
        }
    }

    #[test]
    fn test_parse_command_pair_rejects_unknown_codes() {
        assert!(matches!(parse_command("pair usd xxx"), Command::Invalid(_)));
        assert!(matches!(parse_command("pair usd"), Command::Invalid(_)));
    }

    #[test]
    fn test_parse_command_amounts_pass_through() {
        assert!(matches!(parse_command("1,234.56"), Command::Amount(_)));
    }
}
