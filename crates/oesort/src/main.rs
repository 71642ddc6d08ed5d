//! # OESORT Driver
//!
//! Fills a seeded random vector, sorts it with the chosen strategy, and
//! logs the wall-clock time and run report.
//!
//! ```text
//! oesort --strategy farm --workers 4 --len 100000 --blocks 16
//! oesort --config sort.toml --len 5000
//! RUST_LOG=oesort_core=trace oesort --strategy async --len 64
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use oesort_core::{is_sorted, sort, SortConfig, SortResult, Strategy};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Strategy: sequential, parallel-for, async, barrier, farm
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Farm block count (defaults to twice the workers)
    #[arg(short, long)]
    blocks: Option<usize>,

    /// Array length
    #[arg(short, long, default_value_t = 10_000)]
    len: usize,

    /// Seed for the input vector
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// TOML config file; command line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn sort_config(&self) -> SortResult<SortConfig> {
        let mut config = match &self.config {
            Some(path) => SortConfig::load(path)?,
            None => SortConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.blocks.is_some() {
            config.blocks = self.blocks;
        }
        Ok(config)
    }
}

fn random_input(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = match args.sort_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut v = random_input(args.len, args.seed);
    info!(
        strategy = %config.strategy,
        workers = config.workers,
        len = args.len,
        seed = args.seed,
        "sorting"
    );

    let started = Instant::now();
    let report = match sort(&config, &mut v) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = started.elapsed();

    info!(
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        blocks = report.blocks,
        swaps = report.swaps,
        "sort finished"
    );
    info!(detail = ?report.detail, "report");

    if !is_sorted(&v) {
        error!("output is not sorted");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
