//! Core data types for the variant transformation pipeline.
//!
//! - [`VariantRecord`]: a single VCF data line, decoded just far enough to be rewritten
//! - [`ChromosomeScheme`]: the primary-contig whitelist and numeric remapping
//! - [`GenomeBuild`], [`NamingConvention`]: build selection and contig naming styles
//!
//! ## Contig Naming
//!
//! Input VCFs and dbSNP releases use different naming conventions, and the
//! emitted genotype files use a third, purely numeric one:
//!
//! | Source  | Chromosome 1 | X      | Mitochondrial |
//! |---------|--------------|--------|---------------|
//! | UCSC    | chr1         | chrX   | chrM          |
//! | NCBI    | 1            | X      | MT            |
//! | Output  | 1            | 23     | 25            |

pub mod chromosome;
pub mod record;
pub mod types;

pub use chromosome::ChromosomeScheme;
pub use record::VariantRecord;
pub use types::{GenomeBuild, NamingConvention};
