//! EQUIPVAL: Depreciation-based equipment valuation
//!
//! Entry point. Loads configuration, initialises structured logging,
//! loads the reference table once, then prints valuations.
//!
//! Usage:
//!   equipval                 run the reference examples
//!   equipval <id>            print equipment information
//!   equipval <id> <year>     print market and auction values

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use equipval::config::AppConfig;
use equipval::dataset::DatasetSource;
use equipval::engine::ValuationEngine;
use equipval::report::{info_text, ValuationReport};

/// Scenarios printed when no arguments are given.
const EXAMPLES: &[(&str, i32)] = &[("87390", 2016), ("67352", 2016)];
const EXAMPLE_INFO_ID: &str = "87390";

fn main() {
    if let Err(e) = run() {
        error!(error = %format!("{e:#}"), "equipval failed");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path = AppConfig::resolve_path();
    let mut cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %config_path, error = %format!("{e:#}"), "Using default configuration");
            AppConfig::default()
        }
    };
    cfg.apply_env();
    cfg.valuation.validate()?;

    info!(
        book_path = %cfg.data.book_path,
        min_model_year = cfg.valuation.min_model_year,
        max_model_year = cfg.valuation.max_model_year,
        "EQUIPVAL starting up"
    );

    let engine = ValuationEngine::from_source(
        DatasetSource::Path(cfg.data.book_path.clone().into()),
        cfg.valuation.engine_config(),
    )
    .with_context(|| format!("Failed to load equipment data from {}", cfg.data.book_path))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => run_examples(&engine),
        [id] => print_info(&engine, id),
        [id, year] => {
            let year: i32 = year
                .parse()
                .with_context(|| format!("Model year must be an integer, got {year:?}"))?;
            print_valuation(&engine, id, year)
        }
        _ => anyhow::bail!("usage: equipval [<classification-id> [<model-year>]]"),
    }
}

fn run_examples(engine: &ValuationEngine) -> Result<()> {
    for (i, (id, year)) in EXAMPLES.iter().enumerate() {
        println!("Example {}:", i + 1);
        print_valuation(engine, id, *year)?;
        println!();
    }

    println!("Example {}: Equipment Information for ID {EXAMPLE_INFO_ID}", EXAMPLES.len() + 1);
    print_info(engine, EXAMPLE_INFO_ID)
}

fn print_valuation(engine: &ValuationEngine, id: &str, year: i32) -> Result<()> {
    let report = ValuationReport::build(engine, id, year)?;
    print!("{}", report.to_text());
    Ok(())
}

fn print_info(engine: &ValuationEngine, id: &str) -> Result<()> {
    match engine.equipment_info(id) {
        Some(info) => print!("{}", info_text(info)),
        None => println!("  No equipment information for Classification ID {id}"),
    }
    if let Some(years) = engine.available_years(id) {
        if let (Some(first), Some(last)) = (years.first(), years.last()) {
            println!("  Schedule years: {first}-{last} ({} entries)", years.len());
        }
    }
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("equipval=info"));

    let json_logging = std::env::var("EQUIPVAL_LOG_JSON").is_ok();

    // Logs go to stderr so stdout stays clean for the printed values.
    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
