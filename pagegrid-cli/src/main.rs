//! # PageGrid CLI
//!
//! Replays a scripted editing session and prints the final layout.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pagegrid_cli::{load_config, load_layout, load_script, replay};
use pagegrid_core::{Editor, EditorConfig, Outcome, Rect};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default canvas width: A4 at 96 dpi.
const DEFAULT_WIDTH: &str = "794";
/// Default canvas height: A4 at 96 dpi.
const DEFAULT_HEIGHT: &str = "1123";

/// Command-line arguments for pagegrid.
#[derive(Debug, Parser)]
#[command(name = "pagegrid")]
#[command(about = "PageGrid page layout editor engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Replay a JSON script of editor steps and print the resulting layout.
    Replay {
        /// Script file (JSON array of steps)
        #[arg(long)]
        script: PathBuf,

        /// Canvas width in pixels
        #[arg(long, env = "PAGEGRID_WIDTH", default_value = DEFAULT_WIDTH)]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, env = "PAGEGRID_HEIGHT", default_value = DEFAULT_HEIGHT)]
        height: f64,

        /// Editor configuration file (JSON)
        #[arg(long, env = "PAGEGRID_CONFIG")]
        config: Option<PathBuf>,

        /// Saved layout to start from instead of a blank canvas (its bounds
        /// replace --width and --height)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
}

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,pagegrid_core=debug,pagegrid_cli=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pagegrid_core=debug,pagegrid_cli=debug"));

    // Logs go to stderr so stdout carries only the layout.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        CliCommand::Replay {
            script,
            width,
            height,
            config,
            layout,
            compact,
        } => {
            let config = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => EditorConfig::default(),
            };
            let steps = load_script(&script)
                .with_context(|| format!("Failed to load script {}", script.display()))?;

            let mut editor = match layout {
                Some(path) => {
                    let layout = load_layout(&path)
                        .with_context(|| format!("Failed to load layout {}", path.display()))?;
                    Editor::from_layout(layout, config)?
                }
                None => {
                    let bounds =
                        Rect::new(0.0, 0.0, width, height).context("Invalid canvas size")?;
                    Editor::try_new(bounds, config)?
                }
            };
            let bounds = editor.layout().bounds();
            tracing::info!(
                "Replaying {} steps on a {}x{} canvas",
                steps.len(),
                bounds.width,
                bounds.height
            );

            let outcomes = replay(&mut editor, &steps).context("Replay failed")?;
            let changes = outcomes
                .iter()
                .filter(|o| **o == Outcome::LayoutChanged)
                .count();
            tracing::info!("{changes} layout changes");

            let layout = editor.layout();
            let json = if compact {
                serde_json::to_string(layout)
            } else {
                serde_json::to_string_pretty(layout)
            }
            .context("Failed to serialize layout")?;
            println!("{json}");
        }
    }
    Ok(())
}
