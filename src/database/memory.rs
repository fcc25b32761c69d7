use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::core::record::VariantRecord;
use crate::database::{ContigNames, DatabaseEntry, DatabaseError, VariantDatabase};
use crate::parsing::vcf::{self, VcfLine};

/// An uncompressed VCF held in memory, indexed by contig and position.
#[derive(Debug)]
pub struct MemoryDatabase {
    /// Per-contig entries, sorted by position and otherwise in file order
    entries: HashMap<String, Vec<DatabaseEntry>>,
    contigs: ContigNames,
}

impl MemoryDatabase {
    /// Build a database from entries given in file order
    pub fn from_entries(entries: impl IntoIterator<Item = DatabaseEntry>) -> Self {
        let mut by_contig: HashMap<String, Vec<DatabaseEntry>> = HashMap::new();
        for entry in entries {
            by_contig
                .entry(entry.chromosome.clone())
                .or_default()
                .push(entry);
        }
        // Stable sort keeps file order among entries at the same position
        for list in by_contig.values_mut() {
            list.sort_by_key(|e| e.position);
        }

        let contigs = ContigNames::new(by_contig.keys().cloned());
        Self {
            entries: by_contig,
            contigs,
        }
    }

    /// Load a plain-text VCF.
    ///
    /// Malformed lines are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the file does not exist or
    /// `DatabaseError::Io` if it cannot be read.
    pub fn load(path: &Path) -> Result<Self, DatabaseError> {
        if !path.is_file() {
            return Err(DatabaseError::NotFound(path.to_path_buf()));
        }

        let io_error = |source| DatabaseError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        let mut skipped = 0_u64;
        for line in vcf::open(path).map_err(io_error)? {
            match line {
                Ok(VcfLine::Record(record)) => entries.push(DatabaseEntry::from(record)),
                Ok(VcfLine::Header(_)) => {}
                Err(e) if e.is_fatal() => {
                    return Err(DatabaseError::Io {
                        path: path.to_path_buf(),
                        source: std::io::Error::other(e),
                    })
                }
                Err(e) => {
                    skipped += 1;
                    warn!(path = %path.display(), "skipping malformed database line: {e}");
                }
            }
        }

        let database = Self::from_entries(entries);
        info!(
            path = %path.display(),
            entries = database.len(),
            skipped,
            "loaded reference database into memory"
        );
        Ok(database)
    }

    /// Total number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<VariantRecord> for DatabaseEntry {
    fn from(record: VariantRecord) -> Self {
        Self {
            chromosome: record.chromosome,
            position: record.position,
            reference: record.reference,
            alternates: record.alternates,
            id: record.id,
        }
    }
}

impl VariantDatabase for MemoryDatabase {
    fn contig_names(&self) -> &ContigNames {
        &self.contigs
    }

    fn query(
        &mut self,
        contig: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<DatabaseEntry>, DatabaseError> {
        let Some(list) = self.entries.get(contig) else {
            return Ok(Vec::new());
        };

        let first = list.partition_point(|e| e.position <= start);
        let hits = list[first..]
            .iter()
            .take_while(|e| e.position <= end)
            .cloned()
            .collect();
        Ok(hits)
    }
}
