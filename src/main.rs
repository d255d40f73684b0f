use anyhow::Context;
use clap::Parser;
use log::info;
use pbemine::extract::{self, Repository, Sink};
use pbemine::Config;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::thread;

/// Mine programming-by-example problems from the history of a git repository.
#[derive(Parser)]
#[command(name = "pbemine", version, about, long_about = None)]
struct Cli {
    /// Path to the git repository to mine
    repo: PathBuf,

    /// File to write problems to, one JSON object per line
    #[arg(short, long, default_value = "pbemine.jsonl")]
    output: PathBuf,

    /// JSON configuration file (maxEditSize, maxSampleDistance, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of worker threads [default: available parallelism]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(level));

    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    let jobs = cli
        .jobs
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()));

    let file = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let sink = Sink::new(BufWriter::new(file));
    let repo = Repository::new(&cli.repo);
    let summary = extract::extract_repository(&repo, config, jobs, &sink)
        .with_context(|| format!("failed to mine {}", cli.repo.display()))?;
    sink.into_inner()
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(
        "{} problems from {} commits written to {}",
        summary.problems,
        summary.commits,
        cli.output.display()
    );
    Ok(())
}
