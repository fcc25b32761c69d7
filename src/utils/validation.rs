//! Centralized validation and helper functions.

use std::path::{Path, PathBuf};

use crate::database::{tabix_index_path, DatabaseError};
use crate::parsing::vcf::is_gzipped;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename {0:?}: expected a bare file name inside the input directory")]
    InvalidFilename(String),
    #[error("Empty filename provided")]
    EmptyFilename,
}

/// Validate the VCF file name given alongside the input directory.
///
/// The name must be a single path component: no directory separators, no
/// traversal, no control characters.
///
/// # Examples
///
/// ```
/// use vcf2dtc::utils::validation::validate_filename;
///
/// assert!(validate_filename("sample.vcf").is_ok());
/// assert!(validate_filename("../sample.vcf").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it is not a plain file name.
pub fn validate_filename(filename: &str) -> Result<&str, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if filename == "."
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.chars().any(|c| c.is_ascii_control())
    {
        return Err(ValidationError::InvalidFilename(filename.to_string()));
    }

    Ok(filename)
}

/// Sample name of a VCF file name: the name without `.gz` and its extension.
///
/// # Examples
///
/// ```
/// use vcf2dtc::utils::validation::sample_name;
///
/// assert_eq!(sample_name("NA12878.vcf"), "NA12878");
/// assert_eq!(sample_name("NA12878.vcf.gz"), "NA12878");
/// assert_eq!(sample_name("NA12878"), "NA12878");
/// ```
#[must_use]
pub fn sample_name(filename: &str) -> String {
    let path = Path::new(filename);
    let path = if is_gzipped(path) {
        Path::new(path.file_stem().unwrap_or(path.as_os_str()))
    } else {
        path
    };

    path.file_stem()
        .map_or_else(|| filename.to_string(), |s| s.to_string_lossy().into_owned())
}

/// Default dbSNP directory: the input directory with `vcf` replaced by `dbSNP`.
///
/// Mirrors the deployment layout `<root>/vcf/...` next to `<root>/dbSNP/...`.
#[must_use]
pub fn default_dbsnp_dir(input_dir: &Path) -> PathBuf {
    PathBuf::from(input_dir.to_string_lossy().replace("vcf", "dbSNP"))
}

/// Check that a reference database exists and, when bgzipped, is tabix-indexed.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` or `DatabaseError::MissingIndex`.
pub fn validate_database_path(path: &Path) -> Result<(), DatabaseError> {
    if !path.is_file() {
        return Err(DatabaseError::NotFound(path.to_path_buf()));
    }

    if is_gzipped(path) {
        let index = tabix_index_path(path);
        if !index.is_file() {
            return Err(DatabaseError::MissingIndex {
                path: path.to_path_buf(),
                index,
            });
        }
    }

    Ok(())
}
