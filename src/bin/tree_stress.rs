use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gentree::stress::{StressConfig, StressError, StressTest};
use gentree::{KdTreeSplit, MetricTreeSplit, SplitPolicy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TreeKind {
    Metric,
    Kd,
    Both,
}

/// Stress test for metric trees and kd-trees over large random tables.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with harness parameters; flags below override it.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Which tree types to test.
    #[clap(long, value_enum, default_value = "both")]
    tree: TreeKind,

    /// Number of random tables per tree type.
    #[clap(long)]
    trials: Option<usize>,

    /// Seed for the random generator.
    #[clap(long)]
    seed: Option<u64>,

    /// Minimum number of rows (inclusive).
    #[clap(long)]
    min_points: Option<usize>,

    /// Maximum number of rows (exclusive).
    #[clap(long)]
    max_points: Option<usize>,

    /// Directory for the persisted tables.
    #[clap(long)]
    workdir: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<StressConfig> {
    let mut config = match &cli.config {
        Some(path) => StressConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StressConfig::default(),
    };
    if let Some(trials) = cli.trials {
        config.trials = trials;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(min) = cli.min_points {
        config.points[0] = min;
    }
    if let Some(max) = cli.max_points {
        config.points[1] = max;
    }
    if let Some(workdir) = &cli.workdir {
        config.workdir = Some(workdir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn run_suite<P: SplitPolicy>(name: &str, config: &StressConfig, rng: &mut StdRng) -> Result<(), StressError> {
    info!("starting the {} test", name);
    let reports = StressTest::<P>::new(config.clone()).run(rng)?;
    for report in &reports {
        info!(
            dims = report.dimensions,
            points = report.points,
            leaf_size = report.leaf_size,
            nodes = report.nodes,
            depth = report.depth,
            "trial passed"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "seeding random generator");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut result = Ok(());
    if matches!(cli.tree, TreeKind::Metric | TreeKind::Both) {
        result = run_suite::<MetricTreeSplit>("generic metric tree", &config, &mut rng);
    }
    if result.is_ok() && matches!(cli.tree, TreeKind::Kd | TreeKind::Both) {
        result = run_suite::<KdTreeSplit>("generic kd tree", &config, &mut rng);
    }

    match result {
        Ok(()) => {
            info!("all tests passed");
            ExitCode::SUCCESS
        }
        Err(StressError::Violation(v)) => {
            error!(seed, "failed: {}", v);
            ExitCode::from(1)
        }
        Err(e) => {
            error!(seed, "error: {}", e);
            ExitCode::from(2)
        }
    }
}
