// crates/treecli/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use treeanalyzer::{AnalyzerConfig, JsonSnapshotSource, OutputFormat, TreeAnalyzer};
use treecore::{ExecutionRecord, Snapshot, SubscriptionRecord};

#[derive(Parser)]
#[command(name = "exectree")]
#[command(about = "Reconstructs and prints process engine execution trees", long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the execution forest of a snapshot
    Show {
        /// Path to snapshot JSON file
        #[arg(short, long)]
        file: PathBuf,
        
        /// Output format: text, dot or json
        #[arg(long)]
        format: Option<OutputFormat>,
        
        /// Only show executions of this process instance
        #[arg(short, long)]
        instance: Option<String>,
        
        /// Leave event subscriptions out
        #[arg(long)]
        no_subscriptions: bool,
        
        /// Hide active/concurrent/scope annotations
        #[arg(long)]
        no_flags: bool,
    },
    
    /// Check that a snapshot forms a consistent forest
    Validate {
        /// Path to snapshot JSON file
        #[arg(short, long)]
        file: PathBuf,
    },
    
    /// Write an example snapshot
    Init {
        /// Output file path
        #[arg(short, long, default_value = "snapshot.json")]
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "info" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level))
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    
    match cli.command {
        Commands::Show { file, format, instance, no_subscriptions, no_flags } => {
            let mut config = AnalyzerConfig::from_env();
            if let Some(format) = format {
                config.format = format;
            }
            if instance.is_some() {
                config.process_instance = instance;
            }
            if no_subscriptions {
                config.include_subscriptions = false;
            }
            if no_flags {
                config.show_flags = false;
            }
            show(file, config).await?;
        }
        
        Commands::Validate { file } => {
            validate(file).await?;
        }
        
        Commands::Init { output } => {
            create_example_snapshot(output)?;
        }
    }
    
    Ok(())
}

async fn show(file: PathBuf, config: AnalyzerConfig) -> Result<()> {
    let source = JsonSnapshotSource::open(&file).await?;
    let analyzer = TreeAnalyzer::with_config(Arc::new(source), config);
    
    // A partial forest is never printed
    let forest = analyzer.analyze().await?;
    print!("{}", analyzer.render(&forest)?);
    
    Ok(())
}

async fn validate(file: PathBuf) -> Result<()> {
    println!("🔍 Validating snapshot: {}", file.display());
    
    let source = JsonSnapshotSource::open(&file).await?;
    if let Some(captured_at) = source.snapshot().captured_at {
        println!("   Captured: {}", captured_at.to_rfc3339());
    }
    
    let analyzer = TreeAnalyzer::new(Arc::new(source));
    let forest = analyzer.analyze().await?;
    
    println!("✅ Snapshot is consistent:");
    println!("   Trees: {}", forest.roots().count());
    println!("   Vertices: {}", forest.vertex_count());
    println!("   Edges: {}", forest.edge_count());
    println!("   Depth: {}", forest.depth());
    
    Ok(())
}

fn create_example_snapshot(output: PathBuf) -> Result<()> {
    // Process instance waiting on a message in one concurrent branch
    // and on a timer in the other
    let snapshot = Snapshot {
        captured_at: Some(chrono::Utc::now()),
        ..Snapshot::new()
    }
    .with_execution(ExecutionRecord::root("1", "1").with_flags(false, false, true))
    .with_execution(ExecutionRecord::child("2", "1", "1").with_flags(true, true, false))
    .with_execution(ExecutionRecord::child("3", "1", "1").with_flags(false, true, false))
    .with_execution(ExecutionRecord::child("4", "3", "1").with_flags(true, false, true))
    .with_subscription(SubscriptionRecord::new("101", "2", "message", "PaymentReceived"))
    .with_subscription(SubscriptionRecord::new("102", "4", "timer", "Reminder"))
    .with_subscription(SubscriptionRecord::new("103", "1", "signal", "Cancel"));
    
    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(&output, json)?;
    
    println!("✨ Created example snapshot: {}", output.display());
    println!();
    println!("Show it with:");
    println!("  exectree show --file {}", output.display());
    
    Ok(())
}
