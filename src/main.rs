use clap::Parser;
use tracing_subscriber::EnvFilter;

use vcf2dtc::cli::{self, stage::StageKind};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("vcf2dtc=debug,info")
    } else {
        EnvFilter::new("vcf2dtc=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Run(args) => {
            cli::run::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Normalize(args) => {
            cli::stage::run(StageKind::Normalize, args, cli.format)?;
        }
        cli::Commands::HardFilter(args) => {
            cli::stage::run(StageKind::HardFilter, args, cli.format)?;
        }
        cli::Commands::AnnotateRsids(args) => {
            cli::stage::annotate(args, cli.format)?;
        }
        cli::Commands::Emit(args) => {
            cli::stage::run(StageKind::Emit, args, cli.format)?;
        }
    }

    Ok(())
}
