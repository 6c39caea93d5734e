//! Chromosome selection list.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use log;

/// Selection list error.
#[derive(Debug)]
pub enum SelectionError {
    /// Selection list reading error.
    IO(io::Error),
    /// Chromosome key that can't be used as a staging file name.
    InvalidKey(String),
}

impl Error for SelectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self {
            SelectionError::IO(err) => Some(err),
            SelectionError::InvalidKey(_) => None,
        }
    }
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            SelectionError::IO(err) => write!(f, "selection list reading failed: {}", err),
            SelectionError::InvalidKey(key) => write!(f, "chromosome key {:?} is not a valid file name", key),
        }
    }
}

/// Ordered set of chromosome keys.
///
/// The selection defines both which records are accepted by the partitioner and the order
/// in which the merger emits the per-chromosome blocks. A key listed more than once keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<String>,
    lookup: HashSet<String>,
}

impl Selection {
    /// Reads a selection list from a file.
    pub fn from_path(path: &Path) -> Result<Self, SelectionError> {
        let file = fs::File::open(path).map_err(SelectionError::IO)?;
        let selection = Self::from_reader(io::BufReader::new(file))?;

        log::info!("{} chromosomes selected from {}", selection.len(), path.display());

        return Ok(selection);
    }

    /// Reads a selection list from a reader.
    /// The key is the first tab-delimited field of every non-blank line.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SelectionError> {
        let mut selection = Selection::default();

        for line in reader.lines() {
            let line = line.map_err(SelectionError::IO)?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let key = line.split('\t').next().unwrap_or(line);
            selection.insert(key)?;
        }

        return Ok(selection);
    }

    /// Builds a selection from a list of keys.
    pub fn from_keys<I, S>(keys: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Selection::default();
        for key in keys.into_iter() {
            selection.insert(key.as_ref())?;
        }

        return Ok(selection);
    }

    fn insert(&mut self, key: &str) -> Result<(), SelectionError> {
        validate_key(key)?;

        if self.lookup.insert(key.to_owned()) {
            self.keys.push(key.to_owned());
        } else {
            log::debug!("duplicate chromosome {} ignored", key);
        }

        return Ok(());
    }

    /// Checks if the key is selected.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains(key)
    }

    /// Returns the selected keys in selection order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// keys become flat file names inside the staging directory
fn validate_key(key: &str) -> Result<(), SelectionError> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\', '\0']) {
        return Err(SelectionError::InvalidKey(key.to_owned()));
    }

    return Ok(());
}

#[cfg(test)]
mod test {
    use std::io;

    use rstest::*;

    use super::{Selection, SelectionError};

    #[rstest]
    #[case("chr1\nchr2\nchr3\n", vec!["chr1", "chr2", "chr3"])]
    #[case("chr2\t0\t242193529\nchr1\t0\t248956422\n", vec!["chr2", "chr1"])]
    #[case("\nchrX\n\n   \nchr1", vec!["chrX", "chr1"])]
    #[case("  chr7  \r\n", vec!["chr7"])]
    #[case("chr1\nchr2\nchr1\n", vec!["chr1", "chr2"])]
    #[case("", vec![])]
    fn test_selection_from_reader(#[case] input: &str, #[case] expected: Vec<&str>) {
        let selection = Selection::from_reader(io::Cursor::new(input)).unwrap();

        assert_eq!(selection.keys(), expected.as_slice());
        assert_eq!(selection.len(), expected.len());
        assert_eq!(selection.is_empty(), expected.is_empty());
    }

    #[rstest]
    #[case("chr1\n../etc\n")]
    #[case("..\n")]
    #[case("chrUn\\1\n")]
    fn test_selection_invalid_key(#[case] input: &str) {
        let result = Selection::from_reader(io::Cursor::new(input));

        assert!(matches!(result, Err(SelectionError::InvalidKey(_))));
    }

    #[test]
    fn test_selection_contains() {
        let selection = Selection::from_keys(["chr2", "chr1"]).unwrap();

        assert!(selection.contains("chr1"));
        assert!(selection.contains("chr2"));
        assert!(!selection.contains("chrX"));
        assert!(!selection.contains("chr"));
        assert_eq!(Vec::from_iter(selection.iter()), vec!["chr2", "chr1"]);
    }

    #[test]
    fn test_selection_missing_file() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let result = Selection::from_path(&tmp_dir.path().join("missing.txt"));

        assert!(matches!(result, Err(SelectionError::IO(_))));
    }
}
