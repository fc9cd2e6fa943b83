use faultgen::config::PipelineConfig;
use faultgen::mutators::{self, MutatorKind, Outcome};
use faultgen::output;
use faultgen::pipeline::Pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "faultgen", version, about = "Synthetic buggy/fixed Python pair generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a mutated dataset from a directory of Python files
    Generate {
        /// Directory of correct input programs
        input_dir: PathBuf,
        /// Directory receiving the *_err_*.py / *_info_*.json artifacts
        output_dir: PathBuf,
        /// Variants per input program (default: 10)
        #[arg(short, long)]
        count: Option<usize>,
        /// Rng seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Keep only samples that fail to parse and stay similar enough
        #[arg(long)]
        validate: bool,
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
        /// Exit code only, no output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Report which mutators consider a file mutable
    Probe {
        file: PathBuf,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply one mutation to a file and print the result
    Sample {
        file: PathBuf,
        /// Mutator to use (e.g. operator, bracket); default picks one that applies
        #[arg(short, long)]
        kind: Option<String>,
        /// Rng seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Generate { input_dir, output_dir, count, seed, validate, json, quiet } => {
            cmd_generate(input_dir, output_dir, count, seed, validate, json, quiet)
        }
        Commands::Probe { file, json } => cmd_probe(file, json),
        Commands::Sample { file, kind, seed, json } => cmd_sample(file, kind, seed, json),
    };

    process::exit(exit_code);
}

fn cmd_generate(
    input_dir: PathBuf,
    output_dir: PathBuf,
    count: Option<usize>,
    seed: Option<u64>,
    validate: bool,
    json_mode: bool,
    quiet: bool,
) -> i32 {
    if !input_dir.is_dir() {
        output::print_error(&format!(
            "Input directory not found: {}. Check the path and try again.",
            input_dir.display()
        ));
        return 2;
    }

    let mut config = PipelineConfig { validate, seed, ..PipelineConfig::default() };
    if let Some(count) = count {
        config.mutation_size = count;
    }

    let mut pipeline = Pipeline::new(config);
    match pipeline.generate_dataset(&input_dir, &output_dir) {
        Ok(report) => {
            if quiet {
                return 0;
            }
            if json_mode {
                println!("{}", serde_json::to_string(&report).unwrap());
            } else {
                output::print_generate_report(&report);
            }
            0
        }
        Err(e) => {
            output::print_error(&e);
            3
        }
    }
}

fn cmd_probe(file: PathBuf, json_mode: bool) -> i32 {
    let source = match std::fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            output::print_error(&format!("Failed to read {}: {}", file.display(), e));
            return 2;
        }
    };

    let results: Vec<(&'static str, bool)> = mutators::roster()
        .iter()
        .map(|m| (m.label(), m.can_mutate(&source)))
        .collect();

    if json_mode {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|(label, can)| {
                serde_json::json!({ "mutator": label, "can_mutate": can })
            })
            .collect();
        let doc = serde_json::json!({
            "file": file.display().to_string(),
            "mutators": entries,
        });
        println!("{}", serde_json::to_string(&doc).unwrap());
    } else {
        output::print_probe(&file.display().to_string(), &results);
    }
    0
}

fn cmd_sample(file: PathBuf, kind: Option<String>, seed: Option<u64>, json_mode: bool) -> i32 {
    let source = match std::fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            output::print_error(&format!("Failed to read {}: {}", file.display(), e));
            return 2;
        }
    };

    let mut rng = match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };

    let mut mutator = match kind {
        Some(name) => match MutatorKind::from_name(&name) {
            Some(kind) => mutators::Mutator::new(kind),
            None => {
                let valid: Vec<&str> =
                    MutatorKind::ALL.iter().map(|k| k.short_name()).collect();
                output::print_error(&format!(
                    "Unknown mutator '{}'. Valid kinds: {}",
                    name,
                    valid.join(", ")
                ));
                return 2;
            }
        },
        None => {
            let active: Vec<MutatorKind> = mutators::roster()
                .iter()
                .filter(|m| m.can_mutate(&source))
                .map(|m| m.kind())
                .collect();
            if active.is_empty() {
                output::print_error("No mutator applies to this file.");
                return 2;
            }
            mutators::Mutator::new(active[rng.usize(..active.len())])
        }
    };

    match mutator.mutate(&source, &mut rng) {
        Ok(Outcome::Applied(applied)) => {
            if json_mode {
                let doc = serde_json::json!({
                    "mutator": mutator.label(),
                    "record": applied.record,
                    "mutated_code": applied.code,
                });
                println!("{}", serde_json::to_string(&doc).unwrap());
            } else {
                output::print_sample(&applied.record, &applied.code);
            }
            0
        }
        Ok(Outcome::NoSite) => {
            output::print_error(&format!(
                "{} found no eligible site in {}.",
                mutator.label(),
                file.display()
            ));
            2
        }
        Err(e) => {
            output::print_error(&format!("{} failed: {}", mutator.label(), e));
            3
        }
    }
}
