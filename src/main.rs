// Copyright 2026 Dinegrab Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;

use dinegrab::browser::chromium::ChromiumEngine;
use dinegrab::config::{self, ScrapeConfig};
use dinegrab::menu::{self, MealPeriod, NormalizedMenu};
use dinegrab::scrape;
use dinegrab::store::MenuStore;

#[derive(Parser)]
#[command(
    name = "dinegrab",
    about = "Dinegrab — scrape a dining hall's daily menu into JSON",
    version
)]
struct Cli {
    /// Menu date (YYYY-MM-DD); defaults to today in the hall's time zone
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Meal periods to scrape, in serving order
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = MealPeriod::ALL)]
    periods: Vec<MealPeriod>,

    /// Output directory for raw and normalized menu documents
    #[arg(long, default_value = "public/menu")]
    out: PathBuf,

    /// Enable verbose/debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "dinegrab=debug"
    } else {
        "dinegrab=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .init();

    let result = run(&cli).await;

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }
    result
}

/// Scrape each requested period in turn, persisting both artifacts per
/// period. The first failure aborts the run; files already written for
/// earlier periods are left in place.
async fn run(cli: &Cli) -> Result<()> {
    let config = ScrapeConfig::default();
    let date = cli.date.unwrap_or_else(config::today_at_hall);
    let store = MenuStore::new(cli.out.clone());
    let engine = ChromiumEngine::new()?;

    for period in &cli.periods {
        let raw = scrape::scrape_one(&engine, &config, date, *period).await?;
        let raw_path = store.save_raw(date, *period, &config.hall_name, &raw)?;

        let normalized = NormalizedMenu {
            date,
            period: *period,
            hall: config.hall_name.clone(),
            stations: menu::normalize(&raw),
        };
        let menu_path = store.save_normalized(&normalized)?;

        println!(
            "Saved {} and {}",
            menu_path.display(),
            raw_path.display()
        );
    }

    Ok(())
}
