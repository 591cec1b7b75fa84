use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use context_relations::{
    build_relationship_docs, build_relationships_from_value, BuildReport, RelationConfig,
    RelationshipDocConfig,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "context-relations")]
#[command(about = "Infer relationships between the functions of an API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build relationship maps and print the report as JSON
    Build(BuildArgs),

    /// Print deterministic relationship documents for search indexing
    Docs(DocsArgs),
}

#[derive(Args)]
struct InputArgs {
    /// JSON file with `functions` and `corpus` members ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Engine configuration (JSON or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Include engine statistics in the report
    #[arg(long)]
    stats: bool,
}

#[derive(Args)]
struct DocsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Maximum neighbours listed per relationship type
    #[arg(long, default_value_t = 12)]
    max_neighbors: usize,
}

/// Request body accepted on `--input`
#[derive(Debug, Deserialize)]
struct BuildRequest {
    #[serde(default)]
    functions: Value,
    #[serde(default)]
    corpus: Value,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Docs(args) => run_docs(args),
    }
}

fn run_build(args: BuildArgs) -> Result<()> {
    let mut report = build_report(&args.input)?;
    if !args.stats {
        report.stats = None;
    }
    print_json(&serde_json::to_value(&report)?, args.input.pretty)
}

fn run_docs(args: DocsArgs) -> Result<()> {
    let report = build_report(&args.input)?;
    let Some(maps) = report.data.as_deref() else {
        // Processing failures are part of the output contract, not a CLI error
        return print_json(&serde_json::to_value(&report)?, args.input.pretty);
    };

    let config = RelationshipDocConfig {
        max_neighbors_per_relation: args.max_neighbors,
        ..RelationshipDocConfig::default()
    };
    let docs: Vec<Value> = build_relationship_docs(maps, config)
        .into_iter()
        .map(|doc| {
            json!({
                "functionName": doc.function_name,
                "docHash": format!("{:016x}", doc.doc_hash),
                "doc": doc.doc,
            })
        })
        .collect();
    log::info!("Rendered {} relationship documents", docs.len());
    print_json(&Value::Array(docs), args.input.pretty)
}

fn build_report(args: &InputArgs) -> Result<BuildReport> {
    let config = match &args.config {
        Some(path) => RelationConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RelationConfig::default(),
    };

    let raw = read_input(&args.input)?;
    let request: BuildRequest =
        serde_json::from_str(&raw).context("Input is not a valid build request")?;
    log::debug!("Loaded build request from {}", args.input);

    Ok(build_relationships_from_value(
        &request.functions,
        &request.corpus,
        &config,
    ))
}

fn read_input(input: &str) -> Result<String> {
    if input != "-" {
        let path = Path::new(input);
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Build request is empty. Provide --input <file> or pipe JSON via stdin.");
    }

    Ok(buffer)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
