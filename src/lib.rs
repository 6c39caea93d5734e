//! `bed-split` splits BED files into per-chromosome staged files and merges them back in a given chromosome order.
//!
//! Sorting genome-wide interval data is usually done by bucketing: records are first partitioned by chromosome,
//! every bucket is sorted independently (by start coordinate, with any external tool), and the sorted buckets are
//! finally concatenated in the desired chromosome order. This crate implements the first and the last step of that
//! pipeline, the per-chromosome staging area being the hand-off between them.
//!
//! # Overview
//!
//! * **Selection list:**
//!   a text file whose first tab-delimited column lists chromosome keys. It defines both which records are kept
//!   and the chromosome order of the merged output.
//! * **Partitioning:**
//!   [`Partitioner`] reads gzip-compressed BED files and appends every record to the staged file of its
//!   chromosome (`<key>.bed`), preserving the input order. Records of unselected chromosomes and lines having
//!   less than three fields are dropped.
//! * **Merging:**
//!   [`Merger`] concatenates staged files (`<key>_sorted.bed` by default) in selection order into a single
//!   gzip-compressed output. Chromosomes without a staged file are skipped.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use env_logger;
//! use log;
//!
//! use bed_split::{MergerBuilder, PartitionerBuilder, Selection};
//!
//! fn main() {
//!     env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();
//!
//!     let selection = Selection::from_path(Path::new("chromosomes.txt")).unwrap();
//!     let staging_dir = Path::new("./staging");
//!
//!     PartitionerBuilder::new()
//!         .build()
//!         .partition(&selection, staging_dir, &["a.bed.gz", "b.bed.gz"])
//!         .unwrap();
//!
//!     // staged files are merged as is, without an intermediate sorting step
//!     MergerBuilder::new()
//!         .with_suffix(".bed")
//!         .build()
//!         .merge(&selection, staging_dir, Path::new("merged.bed.gz"))
//!         .unwrap();
//! }
//! ```

pub mod merger;
pub mod partition;
pub mod record;
pub mod selection;
pub mod staging;

pub use merger::{MergeError, MergeSummary, Merger, MergerBuilder};
pub use partition::{PartitionError, PartitionSummary, Partitioner, PartitionerBuilder};
pub use record::Record;
pub use selection::{Selection, SelectionError};
pub use staging::{StagingArea, StagingError, StagingWriters, PARTITION_SUFFIX, SORTED_SUFFIX};

#[cfg(test)]
mod test {
    use std::fs;
    use std::io::prelude::*;
    use std::path::Path;

    use flate2::read::MultiGzDecoder;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rand::seq::SliceRandom;
    use rstest::*;

    use super::{MergerBuilder, PartitionerBuilder, Selection, PARTITION_SUFFIX};

    #[fixture]
    fn tmp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_gz(path: &Path, lines: &[String]) {
        let mut encoder = GzEncoder::new(fs::File::create(path).unwrap(), Compression::fast());
        for line in lines {
            writeln!(encoder, "{}", line).unwrap();
        }
        encoder.finish().unwrap();
    }

    fn read_gz_lines(path: &Path) -> Vec<String> {
        let mut content = String::new();
        MultiGzDecoder::new(fs::File::open(path).unwrap())
            .read_to_string(&mut content)
            .unwrap();

        return content.lines().map(String::from).collect();
    }

    fn chrom(line: &str) -> &str {
        line.split('\t').next().unwrap()
    }

    #[rstest]
    fn test_partition_merge_scenario(tmp_dir: tempfile::TempDir) {
        let input = tmp_dir.path().join("input.bed.gz");
        write_gz(
            &input,
            &["chr1\t10\t20", "chr2\t5\t9", "chrX\t1\t2", "chr1\t10"].map(String::from),
        );
        let staging_dir = tmp_dir.path().join("staging");
        let output = tmp_dir.path().join("merged.bed.gz");
        let selection = Selection::from_keys(["chr2", "chr1"]).unwrap();

        PartitionerBuilder::new()
            .build()
            .partition(&selection, &staging_dir, &[input])
            .unwrap();
        MergerBuilder::new()
            .with_suffix(PARTITION_SUFFIX)
            .build()
            .merge(&selection, &staging_dir, &output)
            .unwrap();

        assert_eq!(read_gz_lines(&output), vec!["chr2\t5\t9", "chr1\t10\t20"]);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn test_partition_merge_round_trip(tmp_dir: tempfile::TempDir, #[case] inputs_number: usize) {
        let chroms = ["chr1", "chr2", "chr3", "chrX", "chrM", "chrUn"];
        let mut records = Vec::from_iter((0..600).map(|i| format!("{}\t{}\t{}\tid{}", chroms[i % 6], i, i + 10, i)));
        records.shuffle(&mut rand::thread_rng());

        let mut inputs = Vec::new();
        for (idx, part) in records.chunks(records.len() / inputs_number).enumerate() {
            let path = tmp_dir.path().join(format!("input{}.bed.gz", idx));
            write_gz(&path, part);
            inputs.push(path);
        }

        let mut selected = Vec::from_iter(chroms[..4].iter().copied());
        selected.shuffle(&mut rand::thread_rng());
        let selection = Selection::from_keys(&selected).unwrap();

        let staging_dir = tmp_dir.path().join("staging");
        let output = tmp_dir.path().join("merged.bed.gz");

        let summary = PartitionerBuilder::new()
            .build()
            .partition(&selection, &staging_dir, &inputs)
            .unwrap();
        MergerBuilder::new()
            .with_suffix(PARTITION_SUFFIX)
            .build()
            .merge(&selection, &staging_dir, &output)
            .unwrap();

        let actual = read_gz_lines(&output);
        let expected = Vec::from_iter(
            selected
                .iter()
                .flat_map(|key| records.iter().filter(move |record| chrom(record) == *key))
                .cloned(),
        );

        assert_eq!(summary.staged as usize, expected.len());
        assert_eq!(summary.unselected, 200);
        assert_eq!(actual, expected);
        assert!(actual.iter().all(|record| chrom(record) != "chrM" && chrom(record) != "chrUn"));
    }
}
