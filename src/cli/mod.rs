//! Command-line interface for vcf2dtc.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run**: Convert a VCF into a 23andMe-style genotype file
//! - **normalize**: Normalize chromosome names and promote `FT=LowGQ` into FILTER
//! - **hard-filter**: Keep `PASS` records only
//! - **annotate-rsids**: Fill missing rsIDs from a dbSNP VCF
//! - **emit**: Write genotype rows from an already-prepared VCF
//!
//! ## Usage
//!
//! ```text
//! # Full conversion, dbSNP looked up in /data/dbSNP
//! vcf2dtc run /data/vcf /data/out GRCh38 NA12878.vcf.gz
//!
//! # Keep the VCF produced after each stage
//! vcf2dtc run /data/vcf /data/out GRCh38 NA12878.vcf.gz --keep-intermediates
//!
//! # Single stage, JSON report for scripting
//! vcf2dtc --format json normalize NA12878.vcf -o NA12878_modified_format.vcf
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::pipeline::PipelineReport;

pub mod run;
pub mod stage;

#[derive(Parser)]
#[command(name = "vcf2dtc")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Convert single-sample VCFs into 23andMe-style genotype files")]
#[command(
    long_about = "vcf2dtc turns a single-sample VCF into a direct-to-consumer genotype table.\n\nRecords are passed through four stages:\n- Chromosome normalization, with FT=LowGQ promoted into FILTER\n- A hard filter keeping PASS records only\n- rsID reconciliation against dbSNP\n- Genotype emission as rsid, chromosome, position, genotype rows"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Report format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full VCF to genotype-file conversion
    Run(run::RunArgs),

    /// Normalize chromosome names and promote sample-level LowGQ
    Normalize(stage::StageArgs),

    /// Keep only records whose FILTER is PASS
    HardFilter(stage::StageArgs),

    /// Fill missing rsIDs from a reference database
    AnnotateRsids(stage::AnnotateArgs),

    /// Write genotype rows from a prepared VCF
    Emit(stage::StageArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Print a run report in the requested format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_report(
    report: &PipelineReport,
    output: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for summary in &report.stages {
                println!("{summary}");
            }
            if report.malformed > 0 {
                println!("malformed records skipped: {}", report.malformed);
            }
            println!("Output written to: {}", output.display());
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "output": output.display().to_string(),
                "stages": report.stages,
                "malformed": report.malformed,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("stage\tcounter\tvalue");
            for summary in &report.stages {
                for (counter, value) in summary.counts() {
                    println!("{}\t{counter}\t{value}", summary.name());
                }
            }
            println!("pipeline\tmalformed\t{}", report.malformed);
        }
    }
    Ok(())
}
