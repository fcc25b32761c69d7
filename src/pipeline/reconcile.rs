//! rsID reconciliation against a reference variant database.
//!
//! Records that already carry an identifier pass through untouched. For the
//! rest, the database is queried at the record's exact position and the first
//! candidate (in database file order) with the same reference allele and at
//! least one shared alternate allele lends its identifier. Records with no such
//! candidate are dropped.

use serde::Serialize;
use tracing::debug;

use crate::core::record::VariantRecord;
use crate::database::{DatabaseEntry, VariantDatabase};
use crate::pipeline::{PipelineError, Stage, StageSummary};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Records that already had an identifier
    pub kept: u64,
    /// Records that borrowed an identifier from the database
    pub updated: u64,
    /// Records with no matching database entry
    pub dropped: u64,
}

pub struct RsidReconciler {
    database: Box<dyn VariantDatabase>,
    stats: ReconcileStats,
}

impl RsidReconciler {
    #[must_use]
    pub fn new(database: Box<dyn VariantDatabase>) -> Self {
        Self {
            database,
            stats: ReconcileStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> &ReconcileStats {
        &self.stats
    }
}

impl Stage for RsidReconciler {
    fn process(&mut self, mut record: VariantRecord) -> Result<Option<VariantRecord>, PipelineError> {
        if record.id.is_some() {
            self.stats.kept += 1;
            return Ok(Some(record));
        }

        // Single-base window: zero-based [pos - 1, pos)
        let candidates = self.database.fetch(
            &record.chromosome,
            record.position - 1,
            record.position,
        )?;

        match find_rsid(&record, &candidates) {
            Some(id) => {
                debug!(
                    chromosome = %record.chromosome,
                    position = record.position,
                    id,
                    "borrowed identifier from reference database"
                );
                record.id = Some(id.to_string());
                self.stats.updated += 1;
                Ok(Some(record))
            }
            None => {
                debug!(
                    chromosome = %record.chromosome,
                    position = record.position,
                    candidates = candidates.len(),
                    "no matching identifier, dropping record"
                );
                self.stats.dropped += 1;
                Ok(None)
            }
        }
    }

    fn summary(&self) -> StageSummary {
        StageSummary::Reconcile(self.stats.clone())
    }
}

/// Identifier of the first candidate matching `record`, if any
#[must_use]
pub fn find_rsid<'a>(record: &VariantRecord, candidates: &'a [DatabaseEntry]) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|c| c.position == record.position && alleles_match(record, c))
        .find_map(|c| c.id.as_deref())
}

/// Reference alleles are identical and at least one alternate allele is shared.
///
/// An empty alternate list on either side never matches.
#[must_use]
pub fn alleles_match(record: &VariantRecord, candidate: &DatabaseEntry) -> bool {
    record.reference == candidate.reference
        && record
            .alternates
            .iter()
            .any(|alt| candidate.alternates.contains(alt))
}
