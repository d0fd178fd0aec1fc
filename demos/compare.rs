//! Compares LogLog and HyperLogLog relative errors over the cardinalities around `m * ln(m)`.
//!
//! Environment variables:
//! - `RUNS`: samples averaged per point (default 5)
//! - `MAX_N`: skip cardinalities above this value (default 100000)
//! - `RUST_LOG`: tracing filter, e.g. `cardinality_sketches=debug`
use cardinality_sketches::trials::default_cardinalities;
use cardinality_sketches::{run_trials, TrialConfig};
use tabled::settings::{Settings, Style};
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const REGISTERS: [usize; 8] = [16, 32, 64, 128, 256, 512, 1024, 2048];

#[derive(Tabled)]
struct Row {
    n: usize,
    loglog: String,
    hyperloglog: String,
}

fn env_or(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let runs = env_or("RUNS", 5);
    let max_n = env_or("MAX_N", 100_000);

    for m in REGISTERS {
        let cardinalities = default_cardinalities(m)
            .into_iter()
            .filter(|&n| n <= max_n)
            .collect();
        let config = TrialConfig::new(vec![m])
            .with_cardinalities(cardinalities)
            .with_runs(runs);
        let rows: Vec<Row> = run_trials(&config)?
            .into_iter()
            .map(|point| Row {
                n: point.cardinality,
                loglog: format!("{:.4}", point.loglog_error),
                hyperloglog: format!("{:.4}", point.hyperloglog_error),
            })
            .collect();

        let center = m as f64 * (m as f64).ln();
        println!("## m = {m} (m ln m = {center:.0})\n");
        let table_config = Settings::default().with(Style::markdown());
        println!("{}\n", Table::new(rows).with(table_config));
    }
    Ok(())
}
