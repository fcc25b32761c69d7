//! Run command - the full four-stage conversion.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{print_report, OutputFormat};
use crate::core::types::GenomeBuild;
use crate::pipeline::PipelineConfig;

#[derive(Args)]
pub struct RunArgs {
    /// Directory containing the input VCF
    #[arg(required = true)]
    pub input_dir: PathBuf,

    /// Directory for the genotype file (created if missing)
    #[arg(required = true)]
    pub output_dir: PathBuf,

    /// Genome build of the input, selecting the dbSNP release
    #[arg(required = true, value_enum)]
    pub genome_build: GenomeBuild,

    /// VCF file name inside the input directory
    #[arg(required = true)]
    pub vcf_filename: String,

    /// Directory holding the dbSNP releases
    /// (default: the input directory with "vcf" replaced by "dbSNP")
    #[arg(long)]
    pub dbsnp_dir: Option<PathBuf>,

    /// Explicit reference database, overriding the build's dbSNP release.
    /// Bgzipped files need a tabix index; plain VCFs are loaded into memory
    #[arg(long, conflicts_with = "dbsnp_dir")]
    pub dbsnp: Option<PathBuf>,

    /// Also write the VCF produced after each stage
    #[arg(long)]
    pub keep_intermediates: bool,
}

/// Execute the run command
///
/// # Errors
///
/// Returns an error if the inputs are missing or any stage fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: RunArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = PipelineConfig::new(
        &args.input_dir,
        &args.output_dir,
        args.genome_build,
        &args.vcf_filename,
    )?
    .with_intermediates(args.keep_intermediates);

    if let Some(dir) = &args.dbsnp_dir {
        config = config.with_dbsnp_dir(dir);
    }
    if let Some(path) = args.dbsnp {
        config = config.with_dbsnp(path);
    }

    if verbose {
        eprintln!("Input: {}", config.input.display());
        eprintln!("Reference database: {}", config.dbsnp.display());
    }

    let report = config
        .run()
        .with_context(|| format!("Failed to convert {}", config.input.display()))?;

    print_report(&report, &config.output_path(), format)
}
