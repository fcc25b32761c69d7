//! Reference variant databases (dbSNP) queried by position.
//!
//! Two backends implement [`VariantDatabase`]:
//!
//! - [`TabixDatabase`]: a bgzipped VCF with a `.tbi` index, queried through noodles.
//!   This is how dbSNP releases are distributed.
//! - [`MemoryDatabase`]: an uncompressed VCF loaded into a per-contig position index.
//!   Useful for small panels and for tests.
//!
//! Both return candidates in file order, which makes "first matching candidate
//! wins" deterministic.
//!
//! ## Contig names
//!
//! The pipeline works with normalized tokens (`1`..`22`, `23`, `24`, `25`), while
//! databases name contigs `1`/`X`/`MT` or `chr1`/`chrX`/`chrM`. [`ContigNames`]
//! detects the database's convention and translates tokens before each query.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::chromosome::{detect_naming_convention, ChromosomeScheme};
use crate::core::types::NamingConvention;
use crate::parsing::vcf::is_gzipped;

pub mod memory;
pub mod tabix;

pub use memory::MemoryDatabase;
pub use tabix::TabixDatabase;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Reference database not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Reference database {} is not indexed (expected {})", .path.display(), .index.display())]
    MissingIndex { path: PathBuf, index: PathBuf },

    #[error("Failed to read reference database {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A known variant from the reference database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub chromosome: String,
    /// 1-based position
    pub position: u64,
    pub reference: String,
    pub alternates: Vec<String>,
    /// `None` when the entry carries no identifier
    pub id: Option<String>,
}

/// A positional index over known variants.
pub trait VariantDatabase {
    /// Contig names known to this database
    fn contig_names(&self) -> &ContigNames;

    /// Entries on `contig` (in the database's own naming) whose 1-based position
    /// `p` satisfies `start < p <= end`, i.e. zero-based half-open `[start, end)`.
    /// Entries are returned in file order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Io` if the underlying file cannot be read.
    fn query(
        &mut self,
        contig: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<DatabaseEntry>, DatabaseError>;

    /// Like [`query`](Self::query), but `chromosome` may be a normalized token or
    /// any spelling of a primary chromosome. Unknown contigs yield no entries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Io` if the underlying file cannot be read.
    fn fetch(
        &mut self,
        chromosome: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<DatabaseEntry>, DatabaseError> {
        let Some(contig) = self.contig_names().resolve(chromosome) else {
            debug!(chromosome, "contig not present in reference database");
            return Ok(Vec::new());
        };
        self.query(&contig, start, end)
    }
}

/// Contig names of a database together with their detected naming convention
#[derive(Debug, Clone)]
pub struct ContigNames {
    names: HashSet<String>,
    convention: NamingConvention,
}

impl ContigNames {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let names: HashSet<String> = names.into_iter().collect();
        let convention = detect_naming_convention(names.iter().map(String::as_str));
        Self { names, convention }
    }

    #[must_use]
    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Translate `chromosome` into the name this database uses for it.
    ///
    /// When no names are known (a header without `##contig` lines) the most
    /// likely spelling is returned and the index decides.
    #[must_use]
    pub fn resolve(&self, chromosome: &str) -> Option<String> {
        if self.names.contains(chromosome) {
            return Some(chromosome.to_string());
        }

        let scheme = ChromosomeScheme::HUMAN;
        let canonical = scheme.normalize(chromosome)?;
        let candidates = scheme.database_names(canonical, self.convention);

        if self.names.is_empty() {
            return candidates.into_iter().next();
        }
        candidates.into_iter().find(|c| self.names.contains(c))
    }
}

/// Path of the tabix index expected next to a bgzipped database
#[must_use]
pub fn tabix_index_path(path: &Path) -> PathBuf {
    let mut index = path.as_os_str().to_owned();
    index.push(".tbi");
    PathBuf::from(index)
}

/// Open a reference database, choosing the backend from the file extension.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the file does not exist,
/// `DatabaseError::MissingIndex` for a bgzipped file without a `.tbi`, or
/// `DatabaseError::Io` if the file cannot be read.
pub fn open(path: &Path) -> Result<Box<dyn VariantDatabase>, DatabaseError> {
    if is_gzipped(path) {
        Ok(Box::new(TabixDatabase::open(path)?))
    } else {
        Ok(Box::new(MemoryDatabase::load(path)?))
    }
}
