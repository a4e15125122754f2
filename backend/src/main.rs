//! Vault Report CLI - summarise terminal settlement CSV exports
//!
//! ```bash
//! vaultreport serve                         # Start HTTP server (port 8000)
//! vaultreport summarize june.csv            # Print the summary report as CSV
//! vaultreport summarize june.csv --json     # ... or as JSON
//! vaultreport report june.csv --to ops@example.com   # Render and deliver
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use vaultreport::{
    process_report, summarize_csv_file, ConsoleSink, OutboxDelivery, Settings, TextRenderer,
    NO_DATA_MESSAGE,
};

#[derive(Parser)]
#[command(name = "vaultreport")]
#[command(about = "Summarise ATM terminal settlement reports", long_about = None)]
struct Cli {
    /// Formatting-hint file (overrides VAULTREPORT_FORMATTING_FILE)
    #[arg(long, global = true)]
    formatting: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the transform and print the summary report
    Summarize {
        /// Input CSV file
        input: PathBuf,

        /// Print JSON instead of CSV
        #[arg(long)]
        json: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transform, render and deliver a report
    Report {
        /// Input CSV file
        input: PathBuf,

        /// Recipient address (overrides VAULTREPORT_RECIPIENT)
        #[arg(long)]
        to: Option<String>,

        /// Outbox directory (overrides VAULTREPORT_OUTBOX_DIR)
        #[arg(long)]
        outbox: Option<PathBuf>,

        /// Lines per rendered page
        #[arg(long, default_value = "50")]
        lines_per_page: usize,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings = Settings::from_env().with_formatting_file(cli.formatting);
    let sink = ConsoleSink { verbose: cli.verbose };

    let result = match cli.command {
        Commands::Summarize { input, json, output } => {
            cmd_summarize(&input, json, output.as_deref(), &settings, &sink)
        }

        Commands::Report {
            input,
            to,
            outbox,
            lines_per_page,
        } => {
            let settings = settings.with_recipient(to).with_outbox_dir(outbox);
            cmd_report(&input, lines_per_page, &settings, &sink)
        }

        Commands::Serve { port } => {
            let mut settings = settings;
            if let Some(port) = port {
                settings.port = port;
            }
            vaultreport::server::start_server(settings).await
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_summarize(
    input: &Path,
    json: bool,
    output: Option<&Path>,
    settings: &Settings,
    sink: &ConsoleSink,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = summarize_csv_file(input, &settings.formatting_file, sink);

    if summary.table.is_empty() {
        eprintln!("{}", NO_DATA_MESSAGE);
        std::process::exit(1);
    }

    let content = if json {
        serde_json::to_string_pretty(&summary.table.to_json())?
    } else {
        summary.table.to_csv()?
    };
    write_output(&content, output)?;

    Ok(())
}

fn cmd_report(
    input: &Path,
    lines_per_page: usize,
    settings: &Settings,
    sink: &ConsoleSink,
) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = TextRenderer {
        lines_per_page,
        ..TextRenderer::default()
    };
    let delivery = OutboxDelivery::new(&settings.outbox_dir);

    let message = process_report(input, settings, &renderer, &delivery, sink)?;
    eprintln!("✅ {}", message);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
