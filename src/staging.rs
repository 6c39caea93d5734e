//! Staging area.
//!
//! The staging area is a flat directory holding one file per chromosome key. The file name is
//! the key followed by a suffix: the partitioner writes `<key>.bed` files, the merger by default
//! reads `<key>_sorted.bed` files produced by an intermediate per-chromosome sort.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use log;

use crate::record::Record;
use crate::selection::Selection;

/// Suffix of the files written by the partitioner.
pub const PARTITION_SUFFIX: &str = ".bed";
/// Suffix of the per-chromosome sorted files read by the merger.
pub const SORTED_SUFFIX: &str = "_sorted.bed";

/// Staging directory or file error.
#[derive(Debug)]
pub struct StagingError {
    path: PathBuf,
    err: io::Error,
}

impl StagingError {
    pub fn new(path: impl Into<PathBuf>, err: io::Error) -> Self {
        StagingError { path: path.into(), err }
    }

    /// Path of the file or directory the error occurred on.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Error for StagingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.err)
    }
}

impl Display for StagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "staging I/O operation on {} failed: {}", self.path.display(), self.err)
    }
}

/// Staging area layout: a directory and a file name suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingArea {
    dir: PathBuf,
    suffix: String,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        StagingArea {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the path of the staged file for the key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", key, self.suffix))
    }

    /// Creates the staging directory and all of its parents if they are missing.
    pub fn create(&self) -> Result<(), StagingError> {
        fs::create_dir_all(&self.dir).map_err(|err| StagingError::new(&self.dir, err))
    }

    /// Opens the staged file of the key for reading.
    /// Returns [`None`] if the file doesn't exist.
    pub fn open(&self, key: &str, buf_size: Option<usize>) -> Result<Option<io::BufReader<fs::File>>, StagingError> {
        let path = self.path_for(key);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StagingError::new(path, err)),
        };

        let reader = match buf_size {
            Some(buf_size) => io::BufReader::with_capacity(buf_size, file),
            None => io::BufReader::new(file),
        };

        return Ok(Some(reader));
    }
}

struct StagedFile {
    path: PathBuf,
    writer: io::BufWriter<fs::File>,
}

/// Staged file writers of a single partitioning run, keyed by chromosome.
///
/// Every file is created (or truncated) when the registry is opened, so a key that receives no records
/// still gets an empty file. Files are closed when the registry is dropped; [`StagingWriters::close`]
/// additionally reports flush errors.
pub struct StagingWriters {
    files: HashMap<String, StagedFile>,
}

impl StagingWriters {
    /// Creates one staged file per selected key.
    pub fn create(area: &StagingArea, selection: &Selection, buf_size: Option<usize>) -> Result<Self, StagingError> {
        let mut files = HashMap::with_capacity(selection.len());

        for key in selection.iter() {
            let path = area.path_for(key);
            let file = fs::File::create(&path).map_err(|err| StagingError::new(&path, err))?;
            let writer = match buf_size {
                Some(buf_size) => io::BufWriter::with_capacity(buf_size, file),
                None => io::BufWriter::new(file),
            };

            log::trace!("staged file {} created", path.display());
            files.insert(key.to_owned(), StagedFile { path, writer });
        }

        return Ok(StagingWriters { files });
    }

    /// Appends the record to the file of its chromosome.
    /// Returns `false` if the chromosome is not staged.
    pub fn write(&mut self, record: &Record) -> Result<bool, StagingError> {
        let staged = match self.files.get_mut(record.chrom()) {
            Some(staged) => staged,
            None => return Ok(false),
        };

        writeln!(staged.writer, "{}", record.as_str()).map_err(|err| StagingError::new(&staged.path, err))?;

        return Ok(true);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Flushes and closes all the staged files.
    pub fn close(self) -> Result<(), StagingError> {
        for (_, mut staged) in self.files.into_iter() {
            staged.writer.flush().map_err(|err| StagingError::new(&staged.path, err))?;
        }

        return Ok(());
    }
}
