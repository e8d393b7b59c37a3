use std::{fs, path::Path, sync::Mutex, time::Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use userfinder::{
    config::{apply_site_filter, load_config},
    core::{
        engine::{check_username, Engine},
        error::FinderError,
        output::write_results,
        types::OutputFormat,
    },
    ui::{banner::render_banner, report::print_report},
};

#[derive(Parser, Debug)]
#[command(
    name = "userfinder",
    version,
    about = "Check whether a username exists across popular web platforms"
)]
struct Cli {
    /// Username to look up
    #[arg(short, long, required_unless_present = "list_sites")]
    username: Option<String>,
    /// Save results to this file (json, txt or csv)
    #[arg(short, long)]
    output: Option<String>,
    /// Output file format; inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,
    /// Number of probes run at once (default 15)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    workers: Option<u16>,
    /// Path to config file (TOML). Default: config/userfinder.toml
    #[arg(long)]
    config: Option<String>,
    /// Comma-separated site names to check (case-insensitive)
    #[arg(long, value_delimiter = ',')]
    sites: Option<Vec<String>>,
    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Print the configured sites and exit
    #[arg(long)]
    list_sites: bool,
    /// Skip the banner
    #[arg(long)]
    no_banner: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
    /// Increase verbosity (info, debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Optional log file path
    #[arg(long)]
    log_file: Option<String>,
}

#[derive(ValueEnum, Clone, Debug)]
enum FormatArg {
    Json,
    Txt,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Txt => OutputFormat::Txt,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli)?;
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut cfg = load_config(cli.config.as_deref())?;
    cfg = apply_site_filter(cfg, cli.sites.as_deref());
    if let Some(workers) = cli.workers {
        cfg.max_concurrent_requests = usize::from(workers);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        cfg.timeout_ms = timeout_ms;
    }
    let engine = Engine::new(&cfg)?;

    if cli.list_sites {
        for entry in engine.catalog().iter() {
            println!("{:<14} {}", entry.name, entry.template);
        }
        return Ok(());
    }

    let username = cli
        .username
        .as_deref()
        .ok_or_else(|| FinderError::Config("missing --username".into()))?;
    check_username(username)?;

    if !cli.no_banner {
        println!("{}", render_banner());
    }
    println!("Checking username: {}\n", username);

    let start = Instant::now();
    let results = engine.scan_username(username).await?;
    print_report(&results, start.elapsed());

    if let Some(output) = &cli.output {
        let path = Path::new(output);
        let format = cli
            .format
            .clone()
            .map(OutputFormat::from)
            .unwrap_or_else(|| OutputFormat::from_path(path));
        write_results(&results, format, path)
            .with_context(|| format!("saving results to {}", path.display()))?;
        println!("Results saved to: {}", path.display());
    }
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<(), FinderError> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match &cli.log_file {
        Some(log_file) => {
            let log_path = Path::new(log_file);
            if let Some(parent) = log_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| FinderError::Config(e.to_string()))?;
                }
            }
            if let Ok(meta) = fs::metadata(log_path) {
                if meta.len() > 1_000_000 {
                    let rotated = log_path.with_extension("log.1");
                    let _ = fs::rename(log_path, rotated);
                }
            }
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(|e| FinderError::Config(e.to_string()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| FinderError::Config(e.to_string()))
}
