//! Batch runs of the Christofides pipeline over a manifest of instances.
//!
//! A manifest is a CSV file with the columns `name,matrix,optimal`, one row per
//! instance. Relative matrix paths are resolved against the manifest directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::christofides::{Christofides, SolverConfig};
use crate::error::Result;
use crate::instance::MatrixInstance;

/// One manifest row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Instance name
    pub name: String,
    /// Path to the matrix file
    pub matrix: PathBuf,
    /// Known optimal tour cost
    pub optimal: f64,
}

/// Result of running Christofides on a single instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceResult {
    /// Instance name
    pub instance: String,
    /// Number of vertices
    pub dimension: usize,
    /// Minimum spanning tree weight
    pub mst_weight: f64,
    /// Tour cost
    pub tour_cost: f64,
    /// Known optimal cost
    pub optimal: f64,
    /// Percentage error against the optimum
    pub percentage_error: f64,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated figures over the solved instances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    /// Number of instances solved
    pub num_solved: usize,
    /// Number of entries skipped after an error
    pub num_skipped: usize,
    /// Average percentage error
    pub avg_error: f64,
    /// Smallest percentage error
    pub best_error: f64,
    /// Largest percentage error
    pub worst_error: f64,
    /// Average time per instance in seconds
    pub avg_time: f64,
    /// Total time in seconds
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone, Default)]
pub struct BenchmarkConfig {
    /// Options passed to every run
    pub solver: SolverConfig,
    /// Read off-diagonal zero cells as absent edges instead of zero-cost edges
    pub zero_is_absent: bool,
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<InstanceResult>,
    skipped: Vec<(String, String)>,
}

/// Read a manifest, resolving relative matrix paths against its directory.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<BenchmarkEntry>> {
    let path = path.as_ref();
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(File::open(path)?);

    let mut entries = Vec::new();
    for row in reader.deserialize() {
        let mut entry: BenchmarkEntry = row?;
        if entry.matrix.is_relative() {
            entry.matrix = base.join(&entry.matrix);
        }
        entries.push(entry);
    }
    Ok(entries)
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Load and solve one entry, recording the result.
    pub fn run_entry(&mut self, entry: &BenchmarkEntry) -> Result<&InstanceResult> {
        let instance = MatrixInstance::from_file(&entry.matrix)?;
        let graph = if self.config.zero_is_absent {
            instance.to_sparse_graph()?
        } else {
            instance.to_graph()?
        };
        let result = Christofides::new(self.config.solver).run(&graph, entry.optimal)?;

        self.results.push(InstanceResult {
            instance: entry.name.clone(),
            dimension: result.num_vertices,
            mst_weight: result.tree_weight,
            tour_cost: result.tour_cost,
            optimal: entry.optimal,
            percentage_error: result.percentage_error,
            time: result.computation_time,
        });
        Ok(&self.results[self.results.len() - 1])
    }

    /// Run every entry in order. Failing entries are logged and skipped.
    pub fn run_entries(&mut self, entries: &[BenchmarkEntry]) {
        for (i, entry) in entries.iter().enumerate() {
            info!("[{}/{}] Processing {}", i + 1, entries.len(), entry.name);
            let outcome = self.run_entry(entry).map(|_| ());
            if let Err(e) = outcome {
                warn!("Skipping {}: {}", entry.name, e);
                self.skipped.push((entry.name.clone(), e.to_string()));
            }
        }
    }

    /// Summary over the solved instances, `None` when nothing was solved.
    pub fn summary(&self) -> Option<BenchmarkSummary> {
        if self.results.is_empty() {
            return None;
        }
        let errors: Vec<f64> = self.results.iter().map(|r| r.percentage_error).collect();
        let total_time: f64 = self.results.iter().map(|r| r.time).sum();
        let count = self.results.len() as f64;

        Some(BenchmarkSummary {
            num_solved: self.results.len(),
            num_skipped: self.skipped.len(),
            avg_error: errors.iter().sum::<f64>() / count,
            best_error: errors.iter().cloned().fold(f64::INFINITY, f64::min),
            worst_error: errors.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            avg_time: total_time / count,
            total_time,
        })
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("     Christofides Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str(&"-".repeat(80));
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>6} {:>12} {:>12} {:>12} {:>8} {:>6}\n",
            "Instance", "n", "MST", "Tour", "Optimal", "Error%", "Time"
        ));
        report.push_str(&"-".repeat(80));
        report.push('\n');

        for r in &self.results {
            report.push_str(&format!(
                "{:<20} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>8.2} {:>6.3}\n",
                r.instance, r.dimension, r.mst_weight, r.tour_cost, r.optimal, r.percentage_error, r.time
            ));
        }
        report.push_str(&"-".repeat(80));
        report.push('\n');

        if let Some(summary) = self.summary() {
            report.push_str(&format!(
                "\nSolved: {}  Skipped: {}\n",
                summary.num_solved, summary.num_skipped
            ));
            report.push_str(&format!("Average error: {:.2}%\n", summary.avg_error));
            report.push_str(&format!("Best error: {:.2}%\n", summary.best_error));
            report.push_str(&format!("Worst error: {:.2}%\n", summary.worst_error));
            report.push_str(&format!("Total time: {:.4}s\n", summary.total_time));
        } else {
            report.push_str("\nNo instance solved.\n");
        }

        if !self.skipped.is_empty() {
            report.push_str("\nSkipped instances:\n");
            for (name, reason) in &self.skipped {
                report.push_str(&format!("  {}: {}\n", name, reason));
            }
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[InstanceResult] {
        &self.results
    }

    /// Names and error messages of skipped entries
    pub fn skipped(&self) -> &[(String, String)] {
        &self.skipped
    }
}
