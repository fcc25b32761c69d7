//! The variant transformation pipeline.
//!
//! Records flow through a fixed chain of stages:
//!
//! 1. [`FilterNormalizer`]: chromosome normalization and `FT=LowGQ` promotion
//! 2. [`HardFilter`]: keep `FILTER == PASS` only
//! 3. [`RsidReconciler`]: borrow missing rsIDs from a reference database
//! 4. [`DtcWriter`]: emit one genotype row per surviving record
//!
//! Stages are composed in process. A single [`Reader`] produces records in file
//! order, each record is moved through the stage chain, and whatever survives
//! reaches the final [`RecordSink`]. A stage either hands the record on
//! (possibly modified) or drops it; a dropped record never reappears.
//!
//! Intermediate VCFs can still be materialized by attaching a tap sink after
//! any stage.
//!
//! ## Errors
//!
//! Data-quality exclusions (non-primary contigs, failed filters, unmatched
//! rsIDs) are not errors: they are counted in each stage's [`StageSummary`].
//! Malformed lines are logged, counted and skipped. Only setup problems and
//! I/O failures abort the run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcf2dtc::database;
//! use vcf2dtc::pipeline::{DtcWriter, FilterNormalizer, HardFilter, Pipeline, RsidReconciler};
//!
//! let db = database::open(Path::new("dbsnp.vcf.gz")).unwrap();
//! let mut output = DtcWriter::create(Path::new("sample.23andme.txt")).unwrap();
//!
//! let report = Pipeline::new()
//!     .stage(FilterNormalizer::new())
//!     .stage(HardFilter::new())
//!     .stage(RsidReconciler::new(db))
//!     .run_path(Path::new("sample.vcf"), &mut output)
//!     .unwrap();
//!
//! for summary in &report.stages {
//!     println!("{summary}");
//! }
//! ```

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::record::VariantRecord;
use crate::database::DatabaseError;
use crate::parsing::vcf::{self, ParseError, Reader, VcfLine};
use crate::utils::validation::ValidationError;

pub mod config;
pub mod emit;
pub mod hard_filter;
pub mod normalize;
pub mod reconcile;
pub mod sink;

pub use config::PipelineConfig;
pub use emit::{DtcWriter, EmitStats};
pub use hard_filter::{HardFilter, HardFilterStats};
pub use normalize::{FilterNormalizer, NormalizeStats};
pub use reconcile::{ReconcileStats, RsidReconciler};
pub use sink::VcfWriter;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input: {0}")]
    Read(#[from] ParseError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One step of the pipeline.
pub trait Stage {
    /// Decide the fate of one record: `Some` forwards it, `None` drops it.
    ///
    /// # Errors
    ///
    /// Only unrecoverable failures (e.g. an unreadable database) are errors.
    fn process(&mut self, record: VariantRecord) -> Result<Option<VariantRecord>, PipelineError>;

    /// Counters accumulated so far
    fn summary(&self) -> StageSummary;
}

/// Destination for the lines that survive the pipeline (or a prefix of it).
pub trait RecordSink {
    /// Receive a header line, without its terminator
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Write` if the line cannot be written.
    fn write_header(&mut self, line: &str) -> Result<(), PipelineError>;

    /// Receive a record
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Write` if the record cannot be written.
    fn write_record(&mut self, record: &VariantRecord) -> Result<(), PipelineError>;

    /// Flush buffered output
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Write` if flushing fails.
    fn finish(&mut self) -> Result<(), PipelineError>;

    /// Counters for sinks that are themselves a pipeline step
    fn summary(&self) -> Option<StageSummary> {
        None
    }
}

/// Per-stage counters, tagged by stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageSummary {
    Normalize(NormalizeStats),
    HardFilter(HardFilterStats),
    Reconcile(ReconcileStats),
    Emit(EmitStats),
}

impl StageSummary {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normalize(_) => "normalize",
            Self::HardFilter(_) => "hard_filter",
            Self::Reconcile(_) => "reconcile",
            Self::Emit(_) => "emit",
        }
    }

    /// Counter names and values in reporting order
    #[must_use]
    pub fn counts(&self) -> Vec<(&'static str, u64)> {
        match self {
            Self::Normalize(s) => vec![
                ("seen", s.seen),
                ("retained", s.retained),
                ("dropped_contig", s.dropped_contig),
                ("modified", s.modified),
            ],
            Self::HardFilter(s) => vec![("processed", s.processed), ("passed", s.passed)],
            Self::Reconcile(s) => vec![
                ("kept", s.kept),
                ("updated", s.updated),
                ("dropped", s.dropped),
            ],
            Self::Emit(s) => vec![("written", s.written), ("no_calls", s.no_calls)],
        }
    }
}

impl fmt::Display for StageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name())?;
        for (name, value) in self.counts() {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Summaries in pipeline order, ending with the sink's when it has one
    pub stages: Vec<StageSummary>,
    /// Data lines skipped because they could not be parsed
    pub malformed: u64,
}

/// A chain of stages with optional taps after each
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    taps: Vec<Option<Box<dyn RecordSink>>>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage
    #[must_use]
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self.taps.push(None);
        self
    }

    /// Copy everything leaving the most recently added stage to `sink`.
    ///
    /// Ignored if no stage has been added yet.
    #[must_use]
    pub fn tap(mut self, sink: impl RecordSink + 'static) -> Self {
        if let Some(slot) = self.taps.last_mut() {
            *slot = Some(Box::new(sink));
        }
        self
    }

    /// Run the pipeline over the VCF at `path`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::NotFound` before producing any output if `path`
    /// does not exist, and otherwise any error from [`run`](Self::run).
    pub fn run_path(
        self,
        path: &Path,
        sink: &mut dyn RecordSink,
    ) -> Result<PipelineReport, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::NotFound(path.to_path_buf()));
        }
        let reader = vcf::open(path).map_err(|source| PipelineError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(input = %path.display(), "processing VCF");
        self.run(reader, sink)
    }

    /// Run the pipeline over `reader`, writing survivors to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first I/O, database or write failure; output written up to
    /// that point is left as-is.
    pub fn run<R: BufRead>(
        mut self,
        mut reader: Reader<R>,
        sink: &mut dyn RecordSink,
    ) -> Result<PipelineReport, PipelineError> {
        let mut malformed = 0_u64;

        for line in reader.by_ref() {
            match line {
                Ok(VcfLine::Header(header)) => {
                    for tap in self.taps.iter_mut().flatten() {
                        tap.write_header(&header)?;
                    }
                    sink.write_header(&header)?;
                }
                Ok(VcfLine::Record(record)) => {
                    if let Some(record) = self.advance(record)? {
                        sink.write_record(&record)?;
                    }
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    malformed += 1;
                    warn!(line = e.line, "skipping malformed record: {}", e.kind);
                    debug!(line = e.line, raw = %e.raw, "malformed record text");
                }
            }
        }

        for tap in self.taps.iter_mut().flatten() {
            tap.finish()?;
        }
        sink.finish()?;

        info!(lines = reader.line_number(), "finished reading input");

        let mut stages: Vec<StageSummary> = self.stages.iter().map(|s| s.summary()).collect();
        stages.extend(sink.summary());
        for summary in &stages {
            info!("{summary}");
        }
        if malformed > 0 {
            warn!(malformed, "malformed records were skipped");
        }

        Ok(PipelineReport { stages, malformed })
    }

    /// Move one record through every stage, stopping at the first drop
    fn advance(&mut self, record: VariantRecord) -> Result<Option<VariantRecord>, PipelineError> {
        let mut current = record;
        for (stage, tap) in self.stages.iter_mut().zip(self.taps.iter_mut()) {
            match stage.process(current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
            if let Some(tap) = tap {
                tap.write_record(&current)?;
            }
        }
        Ok(Some(current))
    }
}
