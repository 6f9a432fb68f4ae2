//! Stress harness: builds trees over large random tables and verifies them.

use crate::error::TableError;
use crate::metric::{L2Metric, Metric};
use crate::table::Table;
use crate::tree::SplitPolicy;
use rand::Rng;
use std::fs;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::info;

pub mod checks;
pub mod config;

pub use checks::Violation;
pub use config::{ConfigError, StressConfig};

const REFERENCES_FILE: &str = "random.csv";
const WEIGHTS_FILE: &str = "weights.csv";

#[derive(Debug, Error)]
pub enum StressError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("invariant violated: {0}")]
    Violation(#[from] Violation),

    #[error("failed to prepare working directory: {0}")]
    Workdir(#[source] std::io::Error),
}

/// Summary of one verified trial.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialReport {
    pub dimensions: usize,
    pub points: usize,
    pub leaf_size: usize,
    pub nodes: usize,
    pub depth: usize,
    pub degenerate_leaves: usize,
}

/// Fills a new table with values and weights drawn uniformly from the given ranges.
pub fn generate_random_table<P, R>(
    rng: &mut R,
    dimensions: usize,
    points: usize,
    values: [f64; 2],
    weights: [f64; 2],
) -> Result<Table<P>, TableError>
where
    P: SplitPolicy,
    R: Rng + ?Sized,
{
    let mut table = Table::<P>::new(dimensions, points)?;
    for j in 0..points {
        for v in table.row_mut(j)?.iter_mut() {
            *v = rng.gen_range(values[0]..values[1]);
        }
        table.set_weight(j, rng.gen_range(weights[0]..weights[1]))?;
    }
    Ok(table)
}

/// Runs the stress trials for one split policy.
pub struct StressTest<P: SplitPolicy> {
    config: StressConfig,
    _policy: PhantomData<P>,
}

impl<P: SplitPolicy> StressTest<P> {
    pub fn new(config: StressConfig) -> Self {
        Self {
            config,
            _policy: PhantomData,
        }
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }

    /// Runs every configured trial, stopping at the first failure.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<TrialReport>, StressError> {
        let mut reports = Vec::with_capacity(self.config.trials);
        for trial in 0..self.config.trials {
            let dims = rng.gen_range(self.config.dimensions[0]..=self.config.dimensions[1]);
            let points = rng.gen_range(self.config.points[0]..self.config.points[1]);
            let leaf_size = rng.gen_range(self.config.leaf_size[0]..=self.config.leaf_size[1]);
            info!(trial, dims, points, leaf_size, "starting trial");
            reports.push(self.run_trial(rng, dims, points, leaf_size)?);
        }
        Ok(reports)
    }

    /// Generates, persists and reloads one random table, indexes one copy and verifies it.
    pub fn run_trial<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dimensions: usize,
        points: usize,
        leaf_size: usize,
    ) -> Result<TrialReport, StressError> {
        let workdir = self.config.workdir();
        fs::create_dir_all(&workdir).map_err(StressError::Workdir)?;
        let references = workdir.join(REFERENCES_FILE);
        let weights = workdir.join(WEIGHTS_FILE);

        let random_table: Table<P> =
            generate_random_table(rng, dimensions, points, self.config.values, self.config.weights)?;
        random_table.save(&references, Some(weights.as_path()))?;

        // Reload the table twice and build the tree on one of them.
        let mut reordered = Table::<P>::load(&references, Some(weights.as_path()))?;
        let original = Table::<P>::load(&references, Some(weights.as_path()))?;
        let metric = L2Metric::default();
        reordered.index_data(&metric, leaf_size)?;

        self.verify(&reordered, &original, &metric, rng, leaf_size)?;

        let root = reordered.tree().ok_or(Violation::MissingTree)?;
        let mut degenerate_leaves = 0;
        root.visit(&mut |node| {
            if node.is_degenerate() {
                degenerate_leaves += 1;
            }
        });
        Ok(TrialReport {
            dimensions,
            points,
            leaf_size,
            nodes: root.node_count(),
            depth: root.depth(),
            degenerate_leaves,
        })
    }

    /// Runs every invariant check on an indexed table against its un-indexed twin.
    pub fn verify<M: Metric, R: Rng + ?Sized>(
        &self,
        indexed: &Table<P>,
        original: &Table<P>,
        metric: &M,
        rng: &mut R,
        leaf_size: usize,
    ) -> Result<(), Violation> {
        checks::check_row_preservation(indexed, original)?;
        checks::check_row_conservation(indexed, original)?;
        checks::check_bound_samples(indexed, metric, rng, self.config.bound_samples)?;
        checks::check_iterators(indexed)?;
        checks::check_partition(indexed)?;
        checks::check_containment(indexed, metric)?;
        checks::check_leaf_sizes(indexed, leaf_size)?;
        Ok(())
    }
}
