use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use maskcalc_cidr::parse_input;
use maskcalc_core::config::Settings;
use maskcalc_core::CalcError;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod report;

use report::{print_report, OutputFormat, Report};

const USAGE: &str = "maskcalc [-4|-6] [-o FORMAT] [-v] <MASK_OR_SUBNET>";

/// Subnet calculator for netmasks, wildcard masks and CIDR blocks
#[derive(Parser)]
#[command(name = "maskcalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Force IPv6 interpretation
    #[arg(short = '6', long = "ipv6", conflicts_with = "ipv4")]
    ipv6: bool,

    /// IPv4 only: reject IPv6 input and prefix lengths above 32
    #[arg(short = '4', long = "ipv4")]
    ipv4: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Netmask, wildcard mask, /prefix, prefix, 0x hex mask, or address/prefix
    #[arg(value_name = "MASK_OR_SUBNET")]
    target: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let usage = CalcError::Usage(format!("{} ({})", USAGE, err.kind()));
            eprintln!("{} {}", "error:".red().bold(), usage);
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env()?;
    init_logging(cli.verbose, settings.log_filter.as_deref());

    let mode = settings.family_with(cli.ipv4, cli.ipv6);
    debug!(%mode, input = %cli.target, "resolved family mode");

    let parsed = parse_input(&cli.target, mode)?;
    let report = Report::from_parsed(&parsed);
    print_report(&report, cli.output)?;
    Ok(())
}

fn init_logging(verbose: bool, filter: Option<&str>) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
