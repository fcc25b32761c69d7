use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use noodles::bgzf;
use noodles::core::{Position, Region};
use noodles::csi::BinningIndex;
use noodles::vcf;
use tracing::{debug, info};

use crate::database::{
    tabix_index_path, ContigNames, DatabaseEntry, DatabaseError, VariantDatabase,
};

/// A bgzipped, tabix-indexed VCF queried through noodles
pub struct TabixDatabase {
    path: PathBuf,
    reader: vcf::io::IndexedReader<bgzf::Reader<File>>,
    header: vcf::Header,
    contigs: ContigNames,
    /// Reference sequences present in the tabix index
    indexed: HashSet<String>,
}

impl TabixDatabase {
    /// Open `path` and its `.tbi` index, reading the VCF header.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the file does not exist,
    /// `DatabaseError::MissingIndex` if the `.tbi` is absent, or
    /// `DatabaseError::Io` if either cannot be read.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if !path.is_file() {
            return Err(DatabaseError::NotFound(path.to_path_buf()));
        }

        let index = tabix_index_path(path);
        if !index.is_file() {
            return Err(DatabaseError::MissingIndex {
                path: path.to_path_buf(),
                index,
            });
        }

        let mut reader = vcf::io::indexed_reader::Builder::default()
            .build_from_path(path)
            .map_err(|e| io_error(path, e))?;
        let header = reader.read_header().map_err(|e| io_error(path, e))?;

        let indexed = indexed_contigs(reader.index()).ok_or_else(|| {
            io_error(
                path,
                io::Error::new(io::ErrorKind::InvalidData, "tabix index has no header"),
            )
        })?;

        let contigs = ContigNames::new(header.contigs().keys().cloned());
        info!(
            path = %path.display(),
            contigs = header.contigs().len(),
            convention = ?contigs.convention(),
            "opened indexed reference database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            header,
            contigs,
            indexed,
        })
    }
}

fn indexed_contigs(index: &dyn BinningIndex) -> Option<HashSet<String>> {
    let header = index.header()?;
    Some(
        header
            .reference_sequence_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
    )
}

fn io_error(path: &Path, source: io::Error) -> DatabaseError {
    DatabaseError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl VariantDatabase for TabixDatabase {
    fn contig_names(&self) -> &ContigNames {
        &self.contigs
    }

    fn query(
        &mut self,
        contig: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<DatabaseEntry>, DatabaseError> {
        // Zero-based half-open [start, end) is 1-based closed [start + 1, end]
        let (Some(first), Some(last)) = (to_position(start + 1), to_position(end)) else {
            return Ok(Vec::new());
        };
        if first > last {
            return Ok(Vec::new());
        }
        // The index only lists contigs that carry records
        if !self.indexed.contains(contig) {
            debug!(contig, "contig not present in tabix index");
            return Ok(Vec::new());
        }
        let region = Region::new(contig, first..=last);

        let query = self
            .reader
            .query(&self.header, &region)
            .map_err(|e| io_error(&self.path, e))?;

        let mut entries = Vec::new();
        for result in query {
            let record = result
                .and_then(|record| {
                    vcf::variant::RecordBuf::try_from_variant_record(&self.header, &record)
                })
                .map_err(|e| io_error(&self.path, e))?;

            // The index returns overlapping records; keep only those starting in range
            let Some(position) = record.variant_start().map(|p| usize::from(p) as u64) else {
                continue;
            };
            if position <= start || position > end {
                continue;
            }

            let ids: Vec<&str> = record.ids().as_ref().iter().map(String::as_str).collect();
            entries.push(DatabaseEntry {
                chromosome: record.reference_sequence_name().to_string(),
                position,
                reference: record.reference_bases().to_string(),
                alternates: record.alternate_bases().as_ref().to_vec(),
                id: if ids.is_empty() { None } else { Some(ids.join(";")) },
            });
        }

        Ok(entries)
    }
}

fn to_position(n: u64) -> Option<Position> {
    usize::try_from(n).ok().and_then(Position::new)
}
