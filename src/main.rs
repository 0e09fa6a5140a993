//! Christofides TSP - Command Line Interface
//!
//! Approximate metric TSP tours with the Christofides–Serdyukov algorithm.

use clap::{Parser, Subcommand, ValueEnum};
use christofides_tsp::algorithms::MatchingStrategy;
use christofides_tsp::benchmark::{load_manifest, Benchmark, BenchmarkConfig};
use christofides_tsp::christofides::{Christofides, SolverConfig};
use christofides_tsp::instance::MatrixInstance;
use christofides_tsp::{report, tsplib};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "christofides-tsp")]
#[command(version = "1.0")]
#[command(about = "Christofides approximation for the metric Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a distance-matrix instance
    Solve {
        /// Path to the matrix file
        #[arg(short, long)]
        matrix: PathBuf,

        /// Known optimal tour cost
        #[arg(long)]
        optimal: f64,

        /// Root vertex of the spanning tree
        #[arg(short, long, default_value = "0")]
        root: usize,

        /// Matching algorithm
        #[arg(long, value_enum, default_value = "blossom")]
        matching: Matching,

        /// Output result to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read off-diagonal zeros as missing edges
        #[arg(long)]
        zero_is_absent: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert TSPLIB coordinate files into matrix files
    Convert {
        /// A .tsp file, or a directory of .tsp files and subdirectories
        #[arg(short, long)]
        input: PathBuf,

        /// Output matrix file, or output directory when the input is a directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run the solver over every instance of a CSV manifest
    Benchmark {
        /// Manifest with columns name,matrix,optimal
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Matching algorithm
        #[arg(long, value_enum, default_value = "blossom")]
        matching: Matching,

        /// Read off-diagonal zeros as missing edges
        #[arg(long)]
        zero_is_absent: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Matching {
    /// Edmonds blossom algorithm
    Blossom,
    /// Exact bitmask search, up to 20 odd vertices
    Exhaustive,
}

impl From<Matching> for MatchingStrategy {
    fn from(matching: Matching) -> Self {
        match matching {
            Matching::Blossom => MatchingStrategy::Blossom,
            Matching::Exhaustive => MatchingStrategy::Exhaustive,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { matrix, optimal, root, matching, output, zero_is_absent, verbose } => {
            let config = SolverConfig {
                root,
                matching: matching.into(),
            };
            solve_instance(&matrix, optimal, config, zero_is_absent, output, verbose);
        }

        Commands::Convert { input, output } => {
            convert(&input, &output);
        }

        Commands::Benchmark { manifest, output, matching, zero_is_absent } => {
            let config = BenchmarkConfig {
                solver: SolverConfig {
                    matching: matching.into(),
                    ..Default::default()
                },
                zero_is_absent,
            };
            run_benchmark(&manifest, &output, config);
        }
    }
}

fn solve_instance(
    path: &Path,
    optimal: f64,
    config: SolverConfig,
    zero_is_absent: bool,
    output: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);

    let instance = match MatrixInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    let graph = if zero_is_absent {
        instance.to_sparse_graph()
    } else {
        instance.to_graph()
    };
    let graph = match graph {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match Christofides::new(config).run(&graph, optimal) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n{}", report::render(&result));
    if verbose {
        println!("{}", report::render_details(&result));
    }

    if let Some(out_path) = output {
        let written = serde_json::to_string_pretty(&result)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&out_path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("Result saved to {:?}", out_path),
            Err(e) => {
                eprintln!("Failed to write output: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn convert(input: &Path, output: &Path) {
    if input.is_dir() {
        match tsplib::convert_directory(input, output) {
            Ok(converted) => {
                for (source, target) in &converted {
                    println!("Converted: {:?} -> {:?}", source, target);
                }
                println!("{} files converted", converted.len());
            }
            Err(e) => {
                eprintln!("Conversion failed: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match tsplib::convert_file(input, output) {
            Ok(n) => println!("Converted: {:?} -> {:?} ({} vertices)", input, output, n),
            Err(e) => {
                eprintln!("Conversion failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_benchmark(manifest: &Path, output: &Path, config: BenchmarkConfig) {
    println!("Loading manifest from {:?}...", manifest);

    let entries = match load_manifest(manifest) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading manifest: {}", e);
            std::process::exit(1);
        }
    };

    println!("Found {} instances", entries.len());

    if entries.is_empty() {
        eprintln!("No instances found!");
        return;
    }

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    let mut benchmark = Benchmark::new(config);
    benchmark.run_entries(&entries);

    let results_path = output.join("results.csv");
    if let Err(e) = benchmark.export_to_csv(&results_path) {
        eprintln!("Failed to export results: {}", e);
        std::process::exit(1);
    }
    println!("\nResults exported to {:?}", results_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    match std::fs::write(&report_path, &report) {
        Ok(()) => println!("Report saved to {:?}", report_path),
        Err(e) => {
            eprintln!("Failed to save report: {}", e);
            std::process::exit(1);
        }
    }
}
