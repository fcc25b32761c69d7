use serde::{Deserialize, Serialize};

/// FILTER value meaning no filters were applied
pub const PASS: &str = "PASS";

/// Low genotype quality tag, used both as a sample-level FT value and as a FILTER token
pub const LOW_GQ: &str = "LowGQ";

/// FORMAT key for the per-sample filter tag
pub const FT_KEY: &str = "FT";

/// FORMAT key for the genotype call
pub const GT_KEY: &str = "GT";

/// VCF missing-value sentinel
pub const MISSING: &str = ".";

/// Genome build of the input, selecting which dbSNP release to annotate from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum GenomeBuild {
    #[value(name = "GRCh37")]
    #[serde(rename = "GRCh37")]
    Grch37,
    #[value(name = "GRCh38")]
    #[serde(rename = "GRCh38")]
    Grch38,
}

impl GenomeBuild {
    /// File name of the bgzipped dbSNP VCF distributed for this build
    #[must_use]
    pub fn dbsnp_filename(self) -> &'static str {
        match self {
            Self::Grch37 => "Homo_sapiens_assembly19.dbsnplatest.vcf.gz",
            Self::Grch38 => "Homo_sapiens_assembly38.dbsnplatest.vcf.gz",
        }
    }
}

impl std::fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grch37 => write!(f, "GRCh37"),
            Self::Grch38 => write!(f, "GRCh38"),
        }
    }
}

/// Naming convention used for contigs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// UCSC style: chr1, chr2, ..., chrX, chrY, chrM
    Ucsc,
    /// NCBI/Ensembl style: 1, 2, ..., X, Y, MT
    Ncbi,
    /// Mixed or unknown
    Mixed,
}
