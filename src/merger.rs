//! Ordered staged files merger.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use log;

use crate::selection::{Selection, SelectionError};
use crate::staging::{StagingArea, StagingError, SORTED_SUFFIX};

/// Default output compression level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Merging error.
#[derive(Debug)]
pub enum MergeError {
    /// Selection list error.
    Selection(SelectionError),
    /// Staged file reading error.
    Staging(StagingError),
    /// Output creation or writing error.
    Output(io::Error),
}

impl Error for MergeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(match &self {
            MergeError::Selection(err) => err,
            MergeError::Staging(err) => err,
            MergeError::Output(err) => err,
        })
    }
}

impl Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            MergeError::Selection(err) => write!(f, "selection error: {}", err),
            MergeError::Staging(err) => write!(f, "staging error: {}", err),
            MergeError::Output(err) => write!(f, "output writing failed: {}", err),
        }
    }
}

impl From<SelectionError> for MergeError {
    fn from(err: SelectionError) -> Self {
        MergeError::Selection(err)
    }
}

impl From<StagingError> for MergeError {
    fn from(err: StagingError) -> Self {
        MergeError::Staging(err)
    }
}

/// Merging run statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Chromosomes whose staged file has been appended.
    pub merged: usize,
    /// Chromosomes without a staged file.
    pub missing: usize,
    /// Lines written to the output.
    pub lines: u64,
}

/// Merger builder. Provides methods for [`Merger`] initialization.
#[derive(Clone)]
pub struct MergerBuilder {
    /// Staged file name suffix.
    suffix: String,
    /// Staged and output files read/write buffer size.
    rw_buf_size: Option<usize>,
    /// Output gzip compression level.
    compression_level: u32,
}

impl MergerBuilder {
    /// Creates an instance of a builder with default parameters.
    pub fn new() -> Self {
        MergerBuilder::default()
    }

    /// Builds a [`Merger`] instance using provided configuration.
    pub fn build(self) -> Merger {
        Merger::new(self.suffix, self.rw_buf_size, Compression::new(self.compression_level))
    }

    /// Sets staged file name suffix.
    pub fn with_suffix(mut self, suffix: &str) -> MergerBuilder {
        self.suffix = suffix.to_owned();
        return self;
    }

    /// Sets staged and output files read/write buffer size.
    pub fn with_rw_buf_size(mut self, buf_size: usize) -> MergerBuilder {
        self.rw_buf_size = Some(buf_size);
        return self;
    }

    /// Sets output compression level (0-9). Out of range levels are clamped.
    pub fn with_compression_level(mut self, level: u32) -> MergerBuilder {
        self.compression_level = level.min(9);
        return self;
    }
}

impl Default for MergerBuilder {
    fn default() -> Self {
        MergerBuilder {
            suffix: SORTED_SUFFIX.to_owned(),
            rw_buf_size: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// Ordered merger.
/// Concatenates per-chromosome staged files in selection order into a single gzip-compressed output.
pub struct Merger {
    /// Staged file name suffix.
    suffix: String,
    /// Staged and output files read/write buffer size.
    rw_buf_size: Option<usize>,
    /// Output compression.
    compression: Compression,
}

impl Merger {
    /// Creates a new merger instance.
    ///
    /// # Arguments
    /// * `suffix` - Staged file name suffix appended to the chromosome key
    /// * `rw_buf_size` - Staged and output files read/write buffer size. If the parameter is [`None`]
    ///   the default buffer size is used.
    /// * `compression` - Output compression level
    pub fn new(suffix: String, rw_buf_size: Option<usize>, compression: Compression) -> Self {
        Merger {
            suffix,
            rw_buf_size,
            compression,
        }
    }

    /// Merges staged files using a selection list file.
    pub fn merge_with_list(
        &self,
        selection_path: &Path,
        staging_dir: &Path,
        output: &Path,
    ) -> Result<MergeSummary, MergeError> {
        let selection = Selection::from_path(selection_path)?;
        self.merge(&selection, staging_dir, output)
    }

    /// Writes the staged files of the selected chromosomes to a gzip-compressed output file.
    ///
    /// # Arguments
    /// * `selection` - Chromosomes to be merged in the output order
    /// * `staging_dir` - Directory holding the staged files
    /// * `output` - Output file. Created or truncated.
    pub fn merge(&self, selection: &Selection, staging_dir: &Path, output: &Path) -> Result<MergeSummary, MergeError> {
        log::info!("merging {} chromosomes into {}", selection.len(), output.display());

        let file = fs::File::create(output).map_err(MergeError::Output)?;
        let writer = match self.rw_buf_size {
            Some(buf_size) => io::BufWriter::with_capacity(buf_size, file),
            None => io::BufWriter::new(file),
        };

        let mut encoder = GzEncoder::new(writer, self.compression);
        let summary = self.merge_into(selection, staging_dir, &mut encoder)?;

        let mut writer = encoder.finish().map_err(MergeError::Output)?;
        writer.flush().map_err(MergeError::Output)?;

        return Ok(summary);
    }

    /// Writes the staged files of the selected chromosomes to an uncompressed output stream.
    /// Chromosomes without a staged file are skipped. Every written line is newline-terminated.
    pub fn merge_into<W: Write>(
        &self,
        selection: &Selection,
        staging_dir: &Path,
        output: &mut W,
    ) -> Result<MergeSummary, MergeError> {
        let area = StagingArea::new(staging_dir, self.suffix.as_str());
        let mut summary = MergeSummary::default();
        let mut line = Vec::new();

        for key in selection.iter() {
            let mut reader = match area.open(key, self.rw_buf_size)? {
                Some(reader) => reader,
                None => {
                    log::debug!("no staged file for {}, skipping", key);
                    summary.missing += 1;
                    continue;
                }
            };
            log::debug!("merging {} ...", key);

            loop {
                line.clear();
                let read = reader
                    .read_until(b'\n', &mut line)
                    .map_err(|err| StagingError::new(area.path_for(key), err))?;
                if read == 0 {
                    break;
                }
                if line.last() != Some(&b'\n') {
                    line.push(b'\n');
                }

                output.write_all(&line).map_err(MergeError::Output)?;
                summary.lines += 1;
            }
            summary.merged += 1;
        }

        log::debug!("merging done: {:?}", summary);

        return Ok(summary);
    }
}
