//! Resolution of the command-line surface into a runnable pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::types::GenomeBuild;
use crate::database::{self, DatabaseError};
use crate::pipeline::{
    DtcWriter, FilterNormalizer, HardFilter, Pipeline, PipelineError, PipelineReport,
    RsidReconciler, VcfWriter,
};
use crate::utils::validation::{
    default_dbsnp_dir, sample_name, validate_database_path, validate_filename,
};

/// Suffix of the final genotype file
pub const OUTPUT_SUFFIX: &str = ".23andme.txt";

/// Paths and options for one end-to-end run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Input VCF
    pub input: PathBuf,
    /// Directory receiving the genotype file and any intermediates
    pub output_dir: PathBuf,
    /// Sample name, used to derive every output file name
    pub sample: String,
    pub genome_build: GenomeBuild,
    /// Reference database used by the reconciler
    pub dbsnp: PathBuf,
    /// Also write the VCF produced after each stage
    pub keep_intermediates: bool,
}

impl PipelineConfig {
    /// Resolve a run from the input directory, the output directory, the build
    /// and the VCF file name.
    ///
    /// The database defaults to the build's dbSNP release inside
    /// [`default_dbsnp_dir`] of the input directory.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` if `filename` is not a bare file name.
    pub fn new(
        input_dir: &Path,
        output_dir: &Path,
        genome_build: GenomeBuild,
        filename: &str,
    ) -> Result<Self, PipelineError> {
        let filename = validate_filename(filename)?;

        Ok(Self {
            input: input_dir.join(filename),
            output_dir: output_dir.to_path_buf(),
            sample: sample_name(filename),
            genome_build,
            dbsnp: default_dbsnp_dir(input_dir).join(genome_build.dbsnp_filename()),
            keep_intermediates: false,
        })
    }

    /// Look for the build's dbSNP release in `dir` instead
    #[must_use]
    pub fn with_dbsnp_dir(mut self, dir: &Path) -> Self {
        self.dbsnp = dir.join(self.genome_build.dbsnp_filename());
        self
    }

    /// Use an explicit database file
    #[must_use]
    pub fn with_dbsnp(mut self, path: PathBuf) -> Self {
        self.dbsnp = path;
        self
    }

    #[must_use]
    pub fn with_intermediates(mut self, keep: bool) -> Self {
        self.keep_intermediates = keep;
        self
    }

    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}{OUTPUT_SUFFIX}", self.sample))
    }

    /// VCF after chromosome normalization
    #[must_use]
    pub fn normalized_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_modified_format.vcf", self.sample))
    }

    /// VCF after the hard filter
    #[must_use]
    pub fn hard_filtered_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_modified_format_hardfiltered.vcf", self.sample))
    }

    /// VCF after rsID reconciliation
    #[must_use]
    pub fn rsid_checked_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.rsid_checked.vcf", self.sample))
    }

    /// Check that the input and the database are present.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::NotFound` naming the missing file, or
    /// `PipelineError::Database` when a bgzipped database has no index.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.input.is_file() {
            return Err(PipelineError::NotFound(self.input.clone()));
        }

        match validate_database_path(&self.dbsnp) {
            Ok(()) => Ok(()),
            Err(DatabaseError::NotFound(path)) => Err(PipelineError::NotFound(path)),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate, then run all four stages and write the genotype file.
    ///
    /// # Errors
    ///
    /// Returns any validation failure before output is created, then any
    /// error raised while running.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        self.validate()?;

        fs::create_dir_all(&self.output_dir).map_err(|source| PipelineError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        info!(
            build = %self.genome_build,
            dbsnp = %self.dbsnp.display(),
            "opening reference database"
        );
        let database = database::open(&self.dbsnp)?;

        let mut pipeline = Pipeline::new().stage(FilterNormalizer::new());
        if self.keep_intermediates {
            pipeline = pipeline.tap(VcfWriter::create(&self.normalized_path())?);
        }
        pipeline = pipeline.stage(HardFilter::new());
        if self.keep_intermediates {
            pipeline = pipeline.tap(VcfWriter::create(&self.hard_filtered_path())?);
        }
        pipeline = pipeline.stage(RsidReconciler::new(database));
        if self.keep_intermediates {
            pipeline = pipeline.tap(VcfWriter::create(&self.rsid_checked_path())?);
        }

        let output = self.output_path();
        let mut sink = DtcWriter::create(&output)?;
        let report = pipeline.run_path(&self.input, &mut sink)?;

        info!(output = %output.display(), "genotype file written");
        Ok(report)
    }
}
