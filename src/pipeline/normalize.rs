//! Chromosome normalization and sample-level filter promotion.

use serde::Serialize;
use tracing::debug;

use crate::core::chromosome::ChromosomeScheme;
use crate::core::record::VariantRecord;
use crate::core::types::{FT_KEY, LOW_GQ, MISSING, PASS};
use crate::pipeline::{PipelineError, Stage, StageSummary};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    /// Data records read
    pub seen: u64,
    /// Records on primary chromosomes, forwarded
    pub retained: u64,
    /// Records dropped for being off the primary assembly
    pub dropped_contig: u64,
    /// Records whose FILTER gained the low-quality token
    pub modified: u64,
}

/// Rewrites CHROM to its canonical token, drops non-primary contigs and copies
/// a sample-level `FT=LowGQ` into FILTER.
///
/// Applying the normalizer to its own output changes nothing.
#[derive(Debug, Clone)]
pub struct FilterNormalizer {
    scheme: ChromosomeScheme,
    stats: NormalizeStats,
}

impl Default for FilterNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_scheme(ChromosomeScheme::HUMAN)
    }

    #[must_use]
    pub fn with_scheme(scheme: ChromosomeScheme) -> Self {
        Self {
            scheme,
            stats: NormalizeStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> &NormalizeStats {
        &self.stats
    }
}

impl Stage for FilterNormalizer {
    fn process(&mut self, mut record: VariantRecord) -> Result<Option<VariantRecord>, PipelineError> {
        self.stats.seen += 1;

        let Some(canonical) = self.scheme.normalize(&record.chromosome) else {
            debug!(chromosome = %record.chromosome, position = record.position, "dropping non-primary contig");
            self.stats.dropped_contig += 1;
            return Ok(None);
        };
        if record.chromosome != canonical {
            record.chromosome = canonical.to_string();
        }
        self.stats.retained += 1;

        if promote_low_quality(&mut record) {
            self.stats.modified += 1;
        }

        Ok(Some(record))
    }

    fn summary(&self) -> StageSummary {
        StageSummary::Normalize(self.stats.clone())
    }
}

/// Add `LowGQ` to FILTER when the first sample's FT is `LowGQ`.
///
/// `PASS` is replaced outright; any other FILTER is treated as a `;`-delimited
/// set that gains `LowGQ` only if absent. Records without an FT key (or whose
/// sample lacks the value) are left alone. Returns whether FILTER changed.
pub fn promote_low_quality(record: &mut VariantRecord) -> bool {
    if record.first_sample_value(FT_KEY) != Some(LOW_GQ) {
        return false;
    }

    if record.filter == PASS || record.filter == MISSING || record.filter.is_empty() {
        record.filter = LOW_GQ.to_string();
        return true;
    }

    if record.filter.split(';').any(|f| f == LOW_GQ) {
        return false;
    }

    record.filter.push(';');
    record.filter.push_str(LOW_GQ);
    true
}
