//! Single-stage commands.
//!
//! Each runs one stage over a VCF and writes the result, so a run can be
//! replayed or inspected one step at a time.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{print_report, OutputFormat};
use crate::database;
use crate::pipeline::{
    DtcWriter, FilterNormalizer, HardFilter, Pipeline, RecordSink, RsidReconciler, VcfWriter,
};

#[derive(Args)]
pub struct StageArgs {
    /// Input VCF (plain or gzip-compressed)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct AnnotateArgs {
    /// Input VCF (plain or gzip-compressed)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Reference database: a tabix-indexed .vcf.gz or a plain VCF
    #[arg(long, required = true)]
    pub dbsnp: PathBuf,

    /// Output VCF
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

/// Which stage a [`StageArgs`] command runs
#[derive(Clone, Copy, Debug)]
pub enum StageKind {
    Normalize,
    HardFilter,
    Emit,
}

/// Execute a stage that needs no reference database
///
/// # Errors
///
/// Returns an error if the input is missing or the output cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(kind: StageKind, args: StageArgs, format: OutputFormat) -> anyhow::Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pipeline = match kind {
        StageKind::Normalize => Pipeline::new().stage(FilterNormalizer::new()),
        StageKind::HardFilter => Pipeline::new().stage(HardFilter::new()),
        // The emitter is the sink itself
        StageKind::Emit => Pipeline::new(),
    };
    let mut sink: Box<dyn RecordSink> = match kind {
        StageKind::Emit => Box::new(DtcWriter::create(&args.output)?),
        StageKind::Normalize | StageKind::HardFilter => {
            Box::new(VcfWriter::create(&args.output)?)
        }
    };

    let report = pipeline
        .run_path(&args.input, &mut *sink)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    print_report(&report, &args.output, format)
}

/// Execute the annotate-rsids command
///
/// # Errors
///
/// Returns an error if the input or database is missing, or a write fails.
#[allow(clippy::needless_pass_by_value)]
pub fn annotate(args: AnnotateArgs, format: OutputFormat) -> anyhow::Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let db = database::open(&args.dbsnp)
        .with_context(|| format!("Failed to open reference database {}", args.dbsnp.display()))?;
    let mut sink = VcfWriter::create(&args.output)?;

    let report = Pipeline::new()
        .stage(RsidReconciler::new(db))
        .run_path(&args.input, &mut sink)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    print_report(&report, &args.output, format)
}
