//! Chromosome partitioner.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log;

use crate::record::Record;
use crate::selection::{Selection, SelectionError};
use crate::staging::{StagingArea, StagingError, StagingWriters, PARTITION_SUFFIX};

/// Partitioning error.
#[derive(Debug)]
pub enum PartitionError {
    /// Selection list error.
    Selection(SelectionError),
    /// Staging directory or file error.
    Staging(StagingError),
    /// Input stream opening or decoding error.
    Input(PathBuf, io::Error),
}

impl Error for PartitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(match &self {
            PartitionError::Selection(err) => err,
            PartitionError::Staging(err) => err,
            PartitionError::Input(_, err) => err,
        })
    }
}

impl Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            PartitionError::Selection(err) => write!(f, "selection error: {}", err),
            PartitionError::Staging(err) => write!(f, "staging error: {}", err),
            PartitionError::Input(path, err) => write!(f, "input {} reading failed: {}", path.display(), err),
        }
    }
}

impl From<SelectionError> for PartitionError {
    fn from(err: SelectionError) -> Self {
        PartitionError::Selection(err)
    }
}

impl From<StagingError> for PartitionError {
    fn from(err: StagingError) -> Self {
        PartitionError::Staging(err)
    }
}

/// Partitioning run statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionSummary {
    /// Lines read from all the inputs.
    pub lines: u64,
    /// Records written to the staging files.
    pub staged: u64,
    /// Blank lines and lines with too few fields.
    pub malformed: u64,
    /// Records whose chromosome is not selected.
    pub unselected: u64,
}

/// Partitioner builder. Provides methods for [`Partitioner`] initialization.
#[derive(Clone)]
pub struct PartitionerBuilder {
    /// Staged file name suffix.
    suffix: String,
    /// Input and staged files read/write buffer size.
    rw_buf_size: Option<usize>,
}

impl PartitionerBuilder {
    /// Creates an instance of a builder with default parameters.
    pub fn new() -> Self {
        PartitionerBuilder::default()
    }

    /// Builds a [`Partitioner`] instance using provided configuration.
    pub fn build(self) -> Partitioner {
        Partitioner::new(self.suffix, self.rw_buf_size)
    }

    /// Sets staged file name suffix.
    pub fn with_suffix(mut self, suffix: &str) -> PartitionerBuilder {
        self.suffix = suffix.to_owned();
        return self;
    }

    /// Sets input and staged files read/write buffer size.
    pub fn with_rw_buf_size(mut self, buf_size: usize) -> PartitionerBuilder {
        self.rw_buf_size = Some(buf_size);
        return self;
    }
}

impl Default for PartitionerBuilder {
    fn default() -> Self {
        PartitionerBuilder {
            suffix: PARTITION_SUFFIX.to_owned(),
            rw_buf_size: None,
        }
    }
}

/// Chromosome partitioner.
/// Splits gzip-compressed BED streams into per-chromosome staged files.
pub struct Partitioner {
    /// Staged file name suffix.
    suffix: String,
    /// Input and staged files read/write buffer size.
    rw_buf_size: Option<usize>,
}

impl Partitioner {
    /// Creates a new partitioner instance.
    ///
    /// # Arguments
    /// * `suffix` - Staged file name suffix appended to the chromosome key
    /// * `rw_buf_size` - Input and staged files read/write buffer size. If the parameter is [`None`]
    ///   the default buffer size is used.
    pub fn new(suffix: String, rw_buf_size: Option<usize>) -> Self {
        Partitioner { suffix, rw_buf_size }
    }

    /// Partitions the inputs using a selection list file.
    pub fn partition_with_list<P: AsRef<Path>>(
        &self,
        selection_path: &Path,
        staging_dir: &Path,
        inputs: &[P],
    ) -> Result<PartitionSummary, PartitionError> {
        let selection = Selection::from_path(selection_path)?;
        self.partition(&selection, staging_dir, inputs)
    }

    /// Routes every record of the inputs to the staged file of its chromosome.
    /// Inputs are consumed one after another in the order they are provided.
    ///
    /// Every selected chromosome gets a staged file, previously staged files are overwritten.
    /// Blank lines, lines with too few fields and records of unselected chromosomes are skipped.
    ///
    /// # Arguments
    /// * `selection` - Chromosomes to be staged
    /// * `staging_dir` - Directory the staged files are created in. Created if missing.
    /// * `inputs` - Gzip-compressed BED files
    pub fn partition<P: AsRef<Path>>(
        &self,
        selection: &Selection,
        staging_dir: &Path,
        inputs: &[P],
    ) -> Result<PartitionSummary, PartitionError> {
        let area = StagingArea::new(staging_dir, self.suffix.as_str());
        area.create()?;
        log::info!("staging {} chromosomes in {}", selection.len(), area.dir().display());

        let mut writers = StagingWriters::create(&area, selection, self.rw_buf_size)?;
        let mut summary = PartitionSummary::default();

        for input in inputs {
            let path = input.as_ref();
            log::debug!("partitioning {} ...", path.display());

            let reader = self.open_input(path).map_err(|err| PartitionError::Input(path.into(), err))?;
            self.route(path, reader, &mut writers, &mut summary)?;
        }

        writers.close()?;
        log::debug!("partitioning done: {:?}", summary);

        return Ok(summary);
    }

    fn open_input(&self, path: &Path) -> io::Result<io::BufReader<MultiGzDecoder<fs::File>>> {
        let decoder = MultiGzDecoder::new(fs::File::open(path)?);

        return Ok(match self.rw_buf_size {
            Some(buf_size) => io::BufReader::with_capacity(buf_size, decoder),
            None => io::BufReader::new(decoder),
        });
    }

    fn route<R: BufRead>(
        &self,
        path: &Path,
        mut reader: R,
        writers: &mut StagingWriters,
        summary: &mut PartitionSummary,
    ) -> Result<(), PartitionError> {
        let mut line = String::new();

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|err| PartitionError::Input(path.into(), err))?;
            if read == 0 {
                break;
            }
            summary.lines += 1;

            let record = match Record::parse(&line) {
                Some(record) => record,
                None => {
                    summary.malformed += 1;
                    continue;
                }
            };

            if writers.write(&record)? {
                summary.staged += 1;
            } else {
                log::trace!("chromosome {} is not selected", record.chrom());
                summary.unselected += 1;
            }
        }

        return Ok(());
    }
}
