// ==========================================
// Stock Ledger - command line entry point
// ==========================================
// Usage:
//   stock-ledger preview <file>
//   stock-ledger import <file> [add|replace]
//   stock-ledger history <item-id>
//   stock-ledger critical [--mark]
//   stock-ledger schedule
//   stock-ledger filters
//   stock-ledger config [<key> <value>]
// Output is JSON on stdout; logs go to stderr.
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use stock_ledger::app::{get_default_db_path, AppState};
use stock_ledger::domain::ImportMode;
use stock_ledger::logging;

const USAGE: &str = "usage: stock-ledger <preview <file> | import <file> [add|replace] | \
history <item-id> | critical [--mark] | schedule | filters | config [<key> <value>]>";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    let db_path = get_default_db_path();
    tracing::info!(db_path = %db_path, version = stock_ledger::VERSION, "starting");
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "preview" => {
            let file = args.get(1).context(USAGE)?;
            let preview = state.import_api.preview_file(file)?;
            print_json(&preview)?;
        }
        "import" => {
            let file = args.get(1).context(USAGE)?;
            let mode = match args.get(2) {
                Some(raw) => raw.parse::<ImportMode>().map_err(|e| anyhow!(e))?,
                None => ImportMode::default(),
            };
            let (preview, result) = state.import_api.import_file(file, mode)?;
            print_json(&serde_json::json!({
                "warnings": preview.warnings,
                "result": result,
            }))?;
        }
        "history" => {
            let id: i64 = args
                .get(1)
                .context(USAGE)?
                .parse()
                .context("item id must be an integer")?;
            print_json(&state.stock_api.history(id)?)?;
        }
        "critical" => {
            let items = state.stock_api.critical()?;
            if args.get(1).map(String::as_str) == Some("--mark") {
                let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
                let marked = state.stock_api.mark_notified(&ids)?;
                tracing::info!(marked, "critical items marked as notified");
            }
            print_json(&items)?;
        }
        "schedule" => {
            print_json(&state.schedule_api.list_by_month()?)?;
        }
        "filters" => {
            print_json(&serde_json::json!({
                "stock": state.stock_api.filter_values()?,
                "schedule": state.schedule_api.filter_values()?,
            }))?;
        }
        "config" => match (args.get(1), args.get(2)) {
            (Some(key), Some(value)) => {
                state.config_manager.set_config_value(key, value)?;
                print_json(&state.config_manager.list_configs()?)?;
            }
            (None, None) => print_json(&state.config_manager.list_configs()?)?,
            _ => bail!(USAGE),
        },
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}
