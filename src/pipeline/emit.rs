//! Emission of 23andMe-style genotype rows.
//!
//! Output layout:
//!
//! ```text
//! # This data file generated by vcf2dtc at: 2025-01-01 00:00:00 UTC
//! # rsid	chromosome	position	genotype
//! rs123	1	500	TT
//! ```
//!
//! ## Genotype encoding
//!
//! Allele indices from the first sample's `GT` are translated through REF/ALT.
//! Single-base alleles are written as the base. For indels the DTC convention
//! applies: an allele longer than REF is `I`, shorter is `D`, and REF itself
//! takes the opposite letter of the first ALT. Missing or untranslatable
//! alleles turn the whole call into `--` (diploid) or `-` (haploid).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::core::record::VariantRecord;
use crate::core::types::{GT_KEY, MISSING};
use crate::pipeline::{PipelineError, RecordSink, StageSummary};

/// Diploid no-call
pub const NO_CALL: &str = "--";

/// Haploid no-call
pub const HAPLOID_NO_CALL: &str = "-";

/// Column header written after the generation line
pub const COLUMN_HEADER: &str = "# rsid\tchromosome\tposition\tgenotype";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitStats {
    /// Rows written
    pub written: u64,
    /// Rows written as a no-call
    pub no_calls: u64,
}

/// Writes one genotype row per record; VCF header lines are not copied.
pub struct DtcWriter<W: Write> {
    inner: W,
    path: PathBuf,
    stats: EmitStats,
}

impl DtcWriter<BufWriter<File>> {
    /// Create (or truncate) a genotype file at `path` and write its header.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Write` if the file cannot be created or written.
    pub fn create(path: &Path) -> Result<Self, PipelineError> {
        let file = File::create(path).map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufWriter::new(file), path)
    }
}

impl<W: Write> DtcWriter<W> {
    /// Wrap any writer and write the file header; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Write` if the header cannot be written.
    pub fn new(inner: W, path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let mut writer = Self {
            inner,
            path: path.into(),
            stats: EmitStats::default(),
        };
        writer.write_preamble().map_err(|e| writer.wrap(e))?;
        Ok(writer)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    #[must_use]
    pub fn stats(&self) -> &EmitStats {
        &self.stats
    }

    fn write_preamble(&mut self) -> io::Result<()> {
        writeln!(
            self.inner,
            "# This data file generated by {} at: {}",
            env!("CARGO_PKG_NAME"),
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.inner, "{COLUMN_HEADER}")
    }

    fn wrap(&self, source: io::Error) -> PipelineError {
        PipelineError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl<W: Write> RecordSink for DtcWriter<W> {
    fn write_header(&mut self, _line: &str) -> Result<(), PipelineError> {
        Ok(())
    }

    fn write_record(&mut self, record: &VariantRecord) -> Result<(), PipelineError> {
        let call = genotype_call(record);
        if call == NO_CALL || call == HAPLOID_NO_CALL {
            self.stats.no_calls += 1;
        }

        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}",
            record.id.as_deref().unwrap_or(MISSING),
            record.chromosome,
            record.position,
            call
        )
        .map_err(|e| self.wrap(e))?;

        self.stats.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PipelineError> {
        self.inner.flush().map_err(|e| self.wrap(e))
    }

    fn summary(&self) -> Option<StageSummary> {
        Some(StageSummary::Emit(self.stats.clone()))
    }
}

/// Genotype string for the first sample of `record`
#[must_use]
pub fn genotype_call(record: &VariantRecord) -> String {
    let Some(gt) = record.first_sample_value(GT_KEY) else {
        return NO_CALL.to_string();
    };

    let alleles: Vec<&str> = gt.split(|c: char| c == '/' || c == '|').collect();
    let no_call = if alleles.len() == 1 {
        HAPLOID_NO_CALL
    } else {
        NO_CALL
    };

    let mut call = String::with_capacity(alleles.len());
    for allele in alleles {
        match allele_code(record, allele) {
            Some(code) => call.push(code),
            None => return no_call.to_string(),
        }
    }
    call
}

/// One-letter code for a GT allele index, or `None` if missing or untranslatable
fn allele_code(record: &VariantRecord, allele: &str) -> Option<char> {
    let index: usize = allele.parse().ok()?;
    let reference_len = record.reference.len();

    if index == 0 {
        // REF of an indel takes the opposite letter of the first ALT
        if let Some(first) = record.alternates.first() {
            if !is_symbolic(first) && first.len() != reference_len {
                return indel_code(first.len(), reference_len)
                    .map(|c| if c == 'I' { 'D' } else { 'I' });
            }
        }
        return base_code(&record.reference);
    }

    let alternate = record.alternates.get(index - 1)?;
    if is_symbolic(alternate) {
        None
    } else if alternate.len() == reference_len {
        base_code(alternate)
    } else {
        indel_code(alternate.len(), reference_len)
    }
}

fn base_code(sequence: &str) -> Option<char> {
    let mut chars = sequence.chars();
    let base = chars.next()?.to_ascii_uppercase();
    (chars.next().is_none() && matches!(base, 'A' | 'C' | 'G' | 'T')).then_some(base)
}

/// Symbolic, breakend and spanning-deletion alleles
fn is_symbolic(allele: &str) -> bool {
    allele == "*" || allele.starts_with('<') || allele.contains(|c: char| c == '[' || c == ']')
}

fn indel_code(allele_len: usize, reference_len: usize) -> Option<char> {
    match allele_len.cmp(&reference_len) {
        std::cmp::Ordering::Greater => Some('I'),
        std::cmp::Ordering::Less => Some('D'),
        std::cmp::Ordering::Equal => None,
    }
}
