//! BED record.

/// Minimal number of tab-delimited fields of a usable record (chrom, start, end).
pub const MIN_FIELDS: usize = 3;

/// A single BED line. Only the chromosome key is extracted, the rest of the line is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    line: &'a str,
    chrom: &'a str,
}

impl<'a> Record<'a> {
    /// Parses a raw line. Trailing whitespace is dropped.
    /// Returns [`None`] for blank lines and lines having less than [`MIN_FIELDS`] fields.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_end();
        if line.is_empty() {
            return None;
        }

        let mut fields = line.split('\t');
        let chrom = fields.next()?;
        if fields.take(MIN_FIELDS - 1).count() < MIN_FIELDS - 1 {
            return None;
        }

        return Some(Record { line, chrom });
    }

    /// Chromosome key (the first field).
    pub fn chrom(&self) -> &'a str {
        self.chrom
    }

    /// Trimmed line.
    pub fn as_str(&self) -> &'a str {
        self.line
    }
}
