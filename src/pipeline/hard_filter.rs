use serde::Serialize;
use tracing::debug;

use crate::core::record::VariantRecord;
use crate::pipeline::{PipelineError, Stage, StageSummary};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HardFilterStats {
    pub processed: u64,
    pub passed: u64,
}

/// Keeps records whose FILTER is exactly `PASS`.
///
/// There is no partial matching: `PASS;LowGQ` is dropped.
#[derive(Debug, Clone, Default)]
pub struct HardFilter {
    stats: HardFilterStats,
}

impl HardFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> &HardFilterStats {
        &self.stats
    }
}

impl Stage for HardFilter {
    fn process(&mut self, record: VariantRecord) -> Result<Option<VariantRecord>, PipelineError> {
        self.stats.processed += 1;

        if !record.is_pass() {
            debug!(
                chromosome = %record.chromosome,
                position = record.position,
                filter = %record.filter,
                "dropping filtered record"
            );
            return Ok(None);
        }

        self.stats.passed += 1;
        Ok(Some(record))
    }

    fn summary(&self) -> StageSummary {
        StageSummary::HardFilter(self.stats.clone())
    }
}
