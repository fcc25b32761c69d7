//! # vcf2dtc
//!
//! A library for converting single-sample VCFs into 23andMe-style
//! direct-to-consumer (DTC) genotype files.
//!
//! Variant callers report far more than a DTC genotype table holds: alternate
//! contigs, filtered calls, records without a dbSNP identifier. `vcf2dtc`
//! narrows a VCF down to the rows a DTC consumer expects and writes them as
//! `rsid`, `chromosome`, `position`, `genotype`.
//!
//! ## Features
//!
//! - **Chromosome normalization**: `chr` prefixes stripped, X/Y/MT renumbered to 23/24/25
//! - **Filter promotion**: a sample-level `FT=LowGQ` is copied into FILTER
//! - **Hard filtering**: only `PASS` records survive
//! - **rsID reconciliation**: missing identifiers are borrowed from dbSNP by exact allele match
//! - **Streaming**: stages are composed in process over a single pass of the input
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcf2dtc::{GenomeBuild, PipelineConfig};
//!
//! let config = PipelineConfig::new(
//!     Path::new("/data/vcf"),
//!     Path::new("/data/out"),
//!     GenomeBuild::Grch38,
//!     "NA12878.vcf.gz",
//! )
//! .unwrap();
//!
//! let report = config.run().unwrap();
//! for summary in &report.stages {
//!     println!("{summary}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Variant records, chromosome scheme and shared constants
//! - [`parsing`]: Line-oriented VCF reader
//! - [`database`]: Reference databases queried by position
//! - [`pipeline`]: The four stages and their composition
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod database;
pub mod parsing;
pub mod pipeline;
pub mod utils;

pub use crate::core::record::VariantRecord;
pub use crate::core::types::GenomeBuild;
pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineReport};
