use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::record::VariantRecord;
use crate::pipeline::{PipelineError, RecordSink};

/// Writes header lines and records back out as VCF text
pub struct VcfWriter<W: Write> {
    inner: W,
    path: PathBuf,
}

impl VcfWriter<BufWriter<File>> {
    /// Create (or truncate) a VCF at `path`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Write` if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, PipelineError> {
        let file = File::create(path).map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: Write> VcfWriter<W> {
    /// Wrap any writer; `path` is only used in error messages
    pub fn new(inner: W, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn wrap(&self, source: io::Error) -> PipelineError {
        PipelineError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl<W: Write> RecordSink for VcfWriter<W> {
    fn write_header(&mut self, line: &str) -> Result<(), PipelineError> {
        writeln!(self.inner, "{line}").map_err(|e| self.wrap(e))
    }

    fn write_record(&mut self, record: &VariantRecord) -> Result<(), PipelineError> {
        writeln!(self.inner, "{record}").map_err(|e| self.wrap(e))
    }

    fn finish(&mut self) -> Result<(), PipelineError> {
        self.inner.flush().map_err(|e| self.wrap(e))
    }
}
