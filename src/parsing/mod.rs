//! Input parsers.
//!
//! - [`vcf`]: Line-oriented VCF reader, plain or gzip-compressed

pub mod vcf;
