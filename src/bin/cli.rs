//! Options Dashboard CLI
//!
//! Prints the smile, Greeks and IV-evolution views for one expiration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use tracing::Level;

use options_dashboard::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON snapshot of the record collections (uses SUPABASE_URL when omitted)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expiration date (YYYY-MM-DD); defaults to the earliest available
    #[arg(short, long)]
    expiration: Option<NaiveDate>,

    /// Sensitivity for the Greeks view
    #[arg(short, long, default_value = "delta")]
    greek: Greek,

    /// Strike for the IV evolution view
    #[arg(long)]
    strike: Option<f64>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };

    let source: Arc<dyn DataSource> = match &args.snapshot {
        Some(path) => Arc::new(
            MemorySource::from_json_file(path, &config.source.collections)
                .with_context(|| format!("loading snapshot {}", path.display()))?,
        ),
        None => {
            if config.source.base_url.is_empty() {
                let collections = config.source.collections.clone();
                config.source = SourceConfig::from_env()?;
                config.source.collections = collections;
            }
            Arc::new(RestSource::new(&config.source)?)
        }
    };

    let dashboard = Dashboard::new(source, &config);

    let expiration = match args.expiration {
        Some(date) => date,
        None => match dashboard.expirations.build() {
            ViewState::Data(Expirations { default: Some(date), dates }) => {
                println!("Expirations: {} available, using {}", dates.len(), date);
                date
            }
            ViewState::Unavailable(reason) => bail!("could not list expirations: {}", reason),
            _ => bail!("no expirations available"),
        },
    };

    println!("Options Dashboard");
    println!("=================");
    println!("Expiration: {}\n", expiration);

    dashboard.smile.refresh(expiration);
    print_smile(dashboard.smile.latest());

    dashboard.greeks.refresh(expiration, args.greek);
    print_greeks(dashboard.greeks.latest());

    dashboard.evolution.refresh(expiration, args.strike);
    let mut evolution = dashboard.evolution.latest();

    // Follow the suggested strike when none was given
    if args.strike.is_none() {
        let suggested = evolution
            .as_ref()
            .and_then(|state| state.data())
            .and_then(|evo| evo.default_strike);
        if let Some(strike) = suggested {
            println!("(IV evolution: defaulting to strike {})\n", strike);
            dashboard.evolution.refresh(expiration, Some(strike));
            evolution = dashboard.evolution.latest();
        }
    }
    print_evolution(evolution);

    println!("--- Done ---");
    Ok(())
}

fn placeholder<T>(state: &ViewState<T>, what: &str) -> bool {
    match state {
        ViewState::Data(_) => false,
        ViewState::Empty => {
            println!("  No {} data available for this expiration date\n", what);
            true
        }
        ViewState::Unavailable(reason) => {
            println!("  {} unavailable: {}\n", what, reason);
            true
        }
    }
}

fn print_series(series: &Series, x_label: &str, y_label: &str, precision: usize) {
    println!("  {} ({} points)", series.name, series.len());
    if series.is_empty() {
        return;
    }
    println!("  {:>12} | {:>12}", x_label, y_label);
    println!("  -------------+-------------");
    for p in &series.points {
        println!("  {:>12.2} | {:>12.*}", p.x, precision, p.y);
    }
    println!();
}

fn print_smile(state: Option<ViewState<SmileCurve>>) {
    println!("Volatility Smile");
    println!("----------------");
    let Some(state) = state else { return };
    if placeholder(&state, "smile") {
        return;
    }
    if let Some(curve) = state.data() {
        println!("  Strike axis: {:.2} .. {:.2}\n", curve.domain.min, curve.domain.max);
        print_series(&curve.calls, "Strike", "IV (%)", 2);
        print_series(&curve.puts, "Strike", "IV (%)", 2);
    }
}

fn print_greeks(state: Option<ViewState<GreeksSeries>>) {
    println!("Greeks");
    println!("------");
    let Some(state) = state else { return };
    if placeholder(&state, "Greeks") {
        return;
    }
    if let Some(series) = state.data() {
        let label = series.greek.label();
        print_series(&series.calls, "Strike", label, 4);
        print_series(&series.puts, "Strike", label, 4);
    }
}

fn print_evolution(state: Option<ViewState<IvEvolution>>) {
    println!("IV Evolution");
    println!("------------");
    let Some(state) = state else { return };
    if placeholder(&state, "IV evolution") {
        return;
    }
    if let Some(evo) = state.data() {
        let strikes: Vec<String> = evo.available_strikes.iter().map(|s| s.to_string()).collect();
        println!("  Strikes: {}\n", strikes.join(", "));
        if let (true, Some(strike)) = (evo.is_empty(), evo.strike_filter) {
            println!("  No samples for strike {}\n", strike);
        }
        for series in evo.series_by_group.values() {
            print_series(series, "Days", "IV (%)", 2);
        }
    }
}
