use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::types::{MISSING, PASS};

/// Number of fixed columns every VCF data line carries (CHROM..INFO)
pub const FIXED_COLUMNS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected at least {FIXED_COLUMNS} tab-delimited fields, found {0}")]
    FieldCount(usize),

    #[error("invalid position: {0:?}")]
    InvalidPosition(String),
}

/// A single VCF data line.
///
/// Only the columns the pipeline inspects or rewrites are decoded; QUAL, INFO,
/// FORMAT and the sample columns are kept as raw text so an untouched record
/// serializes back to the exact input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub chromosome: String,
    /// 1-based position
    pub position: u64,
    /// `None` when the ID column holds the missing sentinel
    pub id: Option<String>,
    pub reference: String,
    /// Alternate alleles in listed order; empty when ALT is `.`
    pub alternates: Vec<String>,
    pub quality: String,
    pub filter: String,
    pub info: String,
    pub format: Option<String>,
    pub samples: Vec<String>,
}

impl VariantRecord {
    /// True if FILTER is exactly `PASS`
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.filter == PASS
    }

    /// FORMAT keys in column order
    pub fn format_keys(&self) -> impl Iterator<Item = &str> {
        self.format.as_deref().into_iter().flat_map(|f| f.split(':'))
    }

    /// Value of `key` in the first sample column, located by its position in FORMAT.
    ///
    /// Returns `None` when FORMAT lacks the key or the sample has fewer values
    /// than FORMAT has keys.
    #[must_use]
    pub fn first_sample_value(&self, key: &str) -> Option<&str> {
        let index = self.format_keys().position(|k| k == key)?;
        self.samples.first()?.split(':').nth(index)
    }
}

impl FromStr for VariantRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < FIXED_COLUMNS {
            return Err(RecordError::FieldCount(fields.len()));
        }

        let position = fields[1]
            .parse::<u64>()
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| RecordError::InvalidPosition(fields[1].to_string()))?;

        let id = match fields[2] {
            MISSING | "" => None,
            id => Some(id.to_string()),
        };

        let alternates = match fields[4] {
            MISSING | "" => Vec::new(),
            alts => alts.split(',').map(str::to_string).collect(),
        };

        Ok(Self {
            chromosome: fields[0].to_string(),
            position,
            id,
            reference: fields[3].to_string(),
            alternates,
            quality: fields[5].to_string(),
            filter: fields[6].to_string(),
            info: fields[7].to_string(),
            format: fields.get(8).map(|f| (*f).to_string()),
            samples: fields.iter().skip(9).map(|s| (*s).to_string()).collect(),
        })
    }
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alternates = if self.alternates.is_empty() {
            MISSING.to_string()
        } else {
            self.alternates.join(",")
        };

        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chromosome,
            self.position,
            self.id.as_deref().unwrap_or(MISSING),
            self.reference,
            alternates,
            self.quality,
            self.filter,
            self.info,
        )?;

        if let Some(format) = &self.format {
            write!(f, "\t{format}")?;
        }
        for sample in &self.samples {
            write!(f, "\t{sample}")?;
        }

        Ok(())
    }
}
