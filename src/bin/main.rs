//! entitygraph CLI - Build and query relationship graphs over data sources
//!
//! Usage:
//!   entitygraph sources
//!   entitygraph build <source> [--json]
//!   entitygraph path <source> <from> <to> [--all]
//!   entitygraph export <source>
//!
//! Examples:
//!   entitygraph build shop
//!   entitygraph path shop shop.main.order_lines shop.main.customers --all
//!   entitygraph --config ./lake.toml export lake

use clap::{Parser, Subcommand};
use entitygraph::config::{file_source, Settings, SourceSettings};
use entitygraph::{EntityGraph, InferenceConfig, PathOutcome, SourceAdapter};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "entitygraph")]
#[command(about = "entitygraph - Discover and traverse relationships among tables and files")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ENTITYGRAPH_CONFIG, ./entitygraph.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured sources
    Sources,

    /// Build the graph and print its nodes, edges, and diagnostics
    Build {
        /// Name of the configured source
        source: String,

        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find paths between two entities
    Path {
        /// Name of the configured source
        source: String,

        /// Identifier of the start entity
        from: String,

        /// Identifier of the end entity
        to: String,

        /// Print every discovered path, not only the shortest
        #[arg(short, long)]
        all: bool,
    },

    /// Print the identifier-only graph as JSON
    Export {
        /// Name of the configured source
        source: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("entitygraph=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.command {
        Commands::Sources => cmd_sources(&settings),
        Commands::Build { source, .. }
        | Commands::Path { source, .. }
        | Commands::Export { source } => dispatch(&settings, source, &cli.command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, Box<dyn Error>> {
    Ok(match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    })
}

fn cmd_sources(settings: &Settings) -> Result<(), Box<dyn Error>> {
    if settings.sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }
    for name in settings.source_names() {
        let source = settings.get_source(name)?;
        match source {
            SourceSettings::Sqlite(sqlite) => println!("  {} ({}: {})", name, source.kind(), sqlite.path),
            SourceSettings::Files(files) => println!(
                "  {} ({}: {}{})",
                name,
                source.kind(),
                files.provider.prefix(),
                files.root
            ),
        }
    }
    Ok(())
}

/// Construct the configured adapter and run the command against it.
fn dispatch(settings: &Settings, name: &str, command: &Commands) -> Result<(), Box<dyn Error>> {
    let config = settings.inference_config();
    match settings.get_source(name)? {
        SourceSettings::Sqlite(sqlite) => run(sqlite.to_source(name)?, config, command),
        SourceSettings::Files(files) => run(file_source(name, files)?, config, command),
    }
}

fn run<S: SourceAdapter>(
    source: S,
    config: InferenceConfig,
    command: &Commands,
) -> Result<(), Box<dyn Error>> {
    let mut graph = EntityGraph::with_config(source, config);
    graph.build()?;

    match command {
        Commands::Build { json, .. } => print_build(&graph, *json),
        Commands::Path { from, to, all, .. } => print_paths(&graph, from, to, *all),
        Commands::Export { .. } => {
            println!("{}", graph.export().to_json()?);
            Ok(())
        }
        Commands::Sources => Ok(()),
    }
}

fn print_build<S: SourceAdapter>(graph: &EntityGraph<S>, json: bool) -> Result<(), Box<dyn Error>> {
    let report = graph.report();
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Source: {}", graph.source().name());
    println!(
        "{} entities, {} edges ({} schema, {} inferred, {} classified)",
        report.nodes,
        graph.edge_count(),
        report.schema_edges,
        report.inferred_edges,
        report.classified_edges
    );
    println!();

    println!("Entities:");
    for entity in graph.entities() {
        println!("  {} ({} columns)", entity.identifier(), entity.columns().len());
    }

    if graph.edge_count() > 0 {
        println!();
        println!("Edges:");
        for edge in graph.edges() {
            let cardinality = edge
                .cardinality()
                .map(|c| c.as_str())
                .unwrap_or("unknown");
            println!(
                "  {}.{} <-> {}.{} [{}, {}]",
                edge.left(),
                edge.key_for(edge.left()).unwrap_or("?"),
                edge.right(),
                edge.key_for(edge.right()).unwrap_or("?"),
                edge.origin().as_str(),
                cardinality
            );
        }
    }

    if report.has_diagnostics() {
        println!();
        println!("Diagnostics:");
        for diagnostic in &report.diagnostics {
            println!("  {}", diagnostic);
        }
    }
    Ok(())
}

fn print_paths<S: SourceAdapter>(
    graph: &EntityGraph<S>,
    from: &str,
    to: &str,
    all: bool,
) -> Result<(), Box<dyn Error>> {
    match graph.find_paths(from, to)? {
        PathOutcome::Found(record) => {
            println!("{}", record.best_path().join(" -> "));
            if all {
                for path in record.all_paths() {
                    if path.as_slice() != record.best_path() {
                        println!("  alt: {}", path.join(" -> "));
                    }
                }
            }
        }
        PathOutcome::NoPath { from, to } => {
            println!("No path from {} to {}", from, to);
        }
    }
    Ok(())
}
