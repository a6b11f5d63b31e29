use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use powervs_janitor::cleanup;
use powervs_janitor::config::Config;
use powervs_janitor::pool::Resource;
use powervs_janitor::{CleanupOptions, PowerVsClient};

/// Reclaim stale PowerVS resources from a pool lease
#[derive(Parser, Debug)]
#[command(name = "powervs-janitor", version, about, long_about = None)]
struct Args {
    /// Lease record (JSON) to clean
    #[arg(short, long)]
    resource: PathBuf,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// IAM endpoint override
    #[arg(long)]
    iam_endpoint: Option<String>,

    /// PowerVS endpoint override
    #[arg(long)]
    power_endpoint: Option<String>,

    /// Log provider requests and responses
    #[arg(long)]
    debug: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the instances, networks and ports of the lease
    List,
    /// Delete every instance, port and network of the lease
    Clean {
        /// Only report what would be deleted
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(log_file.is_none())
        .with_target(true)
        .init();

    tracing::debug!("powervs-janitor started with log level: {:?}", level);

    Ok(Some(guard))
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load(),
    };

    if let Some(endpoint) = &args.iam_endpoint {
        config.iam_endpoint = Some(endpoint.clone());
    }
    if let Some(endpoint) = &args.power_endpoint {
        config.power_endpoint = Some(endpoint.clone());
    }
    Ok(config)
}

async fn run(args: Args) -> Result<bool> {
    let config = load_config(&args)?;
    let resource = Resource::from_file(&args.resource)?;

    let mut options = CleanupOptions::new(resource);
    options.debug = args.debug;
    if let Command::Clean { dry_run } = args.command {
        options.dry_run = dry_run;
    }

    let client = PowerVsClient::connect(&options, &config).await?;

    match args.command {
        Command::List => {
            let instances = client.get_instances().await?;
            for instance in &instances.pvm_instances {
                println!(
                    "instance  {}  {}  {}",
                    instance.pvm_instance_id, instance.server_name, instance.status
                );
            }
            let networks = client.get_networks().await?;
            for network in &networks.networks {
                println!("network   {}  {}  {}", network.network_id, network.name, network.kind);
                for port in client.get_ports(&network.network_id).await?.ports {
                    println!("  port    {}  {}  {}", port.port_id, port.ip_address, port.status);
                }
            }
            Ok(true)
        }
        Command::Clean { .. } => {
            let report = cleanup::clean(&client, options.dry_run).await;
            println!("{}", report);
            Ok(report.is_clean())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level, args.log_file.as_ref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
