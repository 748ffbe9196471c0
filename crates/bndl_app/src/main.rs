// SPDX-License-Identifier: MIT OR Apache-2.0
//! `bndl` - BNDL exporter for node graph snapshots
//!
//! Loads a RON or JSON snapshot of a node graph library, encodes it as a
//! BNDL document and writes the text to stdout or a file.
//!
//! # Usage
//!
//! ```bash
//! bndl scene.ron
//! bndl scene.json --config encoder.ron --output scene.bndl -v
//! ```

use anyhow::{Context, Result};
use bndl_encoder::{export_graph, export_subject, EncoderConfig, ExportOutput};
use bndl_graph::{LoadedSnapshot, Snapshot};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bndl")]
#[command(version, about = "Export node graph snapshots as BNDL text", long_about = None)]
struct Args {
    /// Snapshot file (.ron or .json)
    snapshot: PathBuf,

    /// Encoder configuration (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export this graph instead of the snapshot's subject or root
    #[arg(long)]
    graph: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("bndl_app={level},bndl_encoder={level},bndl_graph={level}"))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn export(
    loaded: &LoadedSnapshot,
    graph: Option<&str>,
    config: &EncoderConfig,
) -> Result<ExportOutput> {
    let library = &loaded.library;
    let output = if let Some(name) = graph {
        let graph = library
            .find_by_name(name)
            .with_context(|| format!("No graph named '{name}' in snapshot"))?;
        export_graph(library, graph.id, config)?
    } else if loaded.subject.is_some() {
        export_subject(library, loaded.subject.as_ref(), config)?
    } else if let Some(root) = loaded.root {
        export_graph(library, root, config)?
    } else {
        export_subject(library, None, config)?
    };
    Ok(output)
}

fn run(args: &Args) -> Result<()> {
    let snapshot = Snapshot::load(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let loaded = snapshot.build().context("Snapshot is inconsistent")?;
    tracing::debug!("Loaded {} graphs", loaded.library.len());

    let config = match &args.config {
        Some(path) => EncoderConfig::load(path)
            .with_context(|| format!("Failed to load encoder config {}", path.display()))?,
        None => EncoderConfig::default(),
    };

    let output = export(&loaded, args.graph.as_deref(), &config)?;
    if !output.warnings.is_empty() {
        tracing::info!("Export finished with {} warnings", output.warnings.len());
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output.text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.text.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    tracing::debug!("Starting bndl v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        tracing::error!("Export failed: {e:#}");
        std::process::exit(1);
    }
}
