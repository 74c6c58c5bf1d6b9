//! CLI entry point for the homicide dashboard.
//!
//! Downloads the ISP-RJ monthly crime series, aggregates intentional homicides
//! by municipality and by year, prints a quartile report and shows a
//! four-panel chart dashboard.

use anyhow::Result;
use clap::{Parser, Subcommand};
use homicide_dashboard::{
    analyzers::{Aggregates, summarize},
    dashboard::{
        RANKING_SIZE,
        display::{self, Figure},
        render_dashboard,
    },
    fetch::{BasicClient, DATASET_URL},
    output::{format_ranking, format_yearly, print_json, print_report},
    pipeline::acquire,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "homicide_dashboard")]
#[command(about = "Quartile report and chart dashboard of intentional homicides in Rio de Janeiro", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the quartile report and show the four-panel dashboard (default)
    Dashboard {
        /// Path to file or URL to fetch (defaults to ISP_DATASET_URL or the ISP portal)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Write the PNG here instead of a temporary file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render without opening the image viewer
        #[arg(long, default_value_t = false)]
        no_display: bool,
    },
    /// Print the quartile report only
    Summary {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the municipalities with the most homicides
    Ranking {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Number of municipalities to list
        #[arg(short = 'n', long, default_value_t = RANKING_SIZE)]
        limit: usize,
    },
    /// Print the statewide total per year
    Yearly {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/homicide_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("homicide_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard {
        source: None,
        output: None,
        no_display: false,
    });

    if let Err(e) = run(command).await {
        error!(error = %format!("{e:#}"), "Run failed");
        eprintln!("Error: {e:#}");
        drop(file_guard);
        std::process::exit(1);
    }

    Ok(())
}

/// Runs one subcommand. Acquisition errors return before any report or
/// figure is produced.
async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Dashboard {
            source,
            output,
            no_display,
        } => {
            let aggregates = load(source).await?;
            let summary = summarize(&aggregates.by_municipality)?;
            print_report(&summary);

            if no_display && output.is_none() {
                warn!("--no-display without --output: the figure will be discarded");
            }

            let figure = match output {
                Some(path) => Figure::at(path),
                None => Figure::temporary()?,
            };
            render_dashboard(&aggregates, &summary, figure.path())?;

            if no_display {
                info!(path = %figure.path().display(), "Viewer skipped");
            } else {
                display::show(figure)?;
            }
            info!("Dashboard finished");
        }
        Commands::Summary { source, json } => {
            let aggregates = load(source).await?;
            let summary = summarize(&aggregates.by_municipality)?;

            if json {
                print_json(&summary)?;
            } else {
                print_report(&summary);
            }
        }
        Commands::Ranking { source, limit } => {
            let aggregates = load(source).await?;
            print!("{}", format_ranking(&aggregates.by_municipality, limit));
        }
        Commands::Yearly { source } => {
            let aggregates = load(source).await?;
            print!("{}", format_yearly(&aggregates.by_year));
        }
    }

    Ok(())
}

/// Resolves the source (argument, `ISP_DATASET_URL`, then the ISP portal) and
/// runs the acquisition stage.
async fn load(source: Option<String>) -> Result<Aggregates> {
    let source = source
        .or_else(|| std::env::var("ISP_DATASET_URL").ok())
        .unwrap_or_else(|| DATASET_URL.to_string());

    let client = BasicClient::new();
    acquire(&client, &source).await
}
