use anyhow::Result;
use clap::{Parser, Subcommand};

mod scan;
mod telemetry;

/// Allowed-types directive scanner
///
/// Resolves each content-type property's allowed-types directive from its
/// three sources (legacy attribute, code-declared registry entry, injected
/// attribute), merges them, and checks the result against the scanning rules.
///
/// EXAMPLES:
///
///   injected-types check --config injected-types.toml --model model.toml
///
///   injected-types resolve --model model.toml ArticlePage MainContentArea
#[derive(Parser)]
#[command(name = "injected-types")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log output format on stderr. Filter with INJECTED_TYPES_LOG.
    #[arg(long, global = true, value_enum, default_value_t)]
    log_format: telemetry::LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every content type in the model and print the property definitions
    ///
    /// Exits non-zero on the first property that fails to scan.
    Check(scan::ScanInputs),

    /// Print the effective allowed-types directive for one property
    ///
    /// The property is assigned exactly as `check` would assign it, so
    /// conflicts under `fail_on_conflict` and scanning-rule violations fail here
    /// too.
    Resolve(scan::ResolveArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    match cli.command {
        Commands::Check(ref inputs) => scan::check(inputs),
        Commands::Resolve(ref args) => scan::resolve(args),
    }
}
