use std::path;
use std::process;

use log;

use bed_split::{PartitionerBuilder, Selection, PARTITION_SUFFIX};

mod common;

fn main() {
    let arg_parser = common::get_matches(build_arg_parser());
    common::init_logger(&arg_parser);

    let selection = arg_parser.value_of("selection").expect("value is required");
    let staging_dir = arg_parser.value_of("staging_dir").expect("value is required");
    let inputs = Vec::from_iter(arg_parser.values_of("input").expect("value is required"));
    let suffix = arg_parser.value_of("suffix").expect("value has a default");

    let selection = match Selection::from_path(path::Path::new(selection)) {
        Ok(selection) => selection,
        Err(err) => {
            log::error!("selection list loading error: {}", err);
            process::exit(1);
        }
    };

    let mut partitioner_builder = PartitionerBuilder::new().with_suffix(suffix);
    if let Some(buf_size) = common::buf_size(&arg_parser) {
        partitioner_builder = partitioner_builder.with_rw_buf_size(buf_size);
    }
    let partitioner = partitioner_builder.build();

    match partitioner.partition(&selection, path::Path::new(staging_dir), &inputs) {
        Ok(summary) => log::debug!(
            "{} lines read, {} records staged, {} malformed lines and {} unselected records skipped",
            summary.lines,
            summary.staged,
            summary.malformed,
            summary.unselected
        ),
        Err(err) => {
            log::error!("partitioning error: {}", err);
            process::exit(1);
        }
    }
}

fn build_arg_parser() -> clap::App<'static> {
    clap::App::new("bed-partition")
        .about("splits BED files into per-chromosome staged files")
        .arg(
            clap::Arg::new("selection")
                .help("chromosome selection list, the first column is the chromosome name")
                .value_name("SELECTION_FILE")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("staging_dir")
                .help("directory to store staged files in, created if missing")
                .value_name("STAGING_DIR")
                .required(true)
                .index(2),
        )
        .arg(
            clap::Arg::new("input")
                .help("gzip-compressed BED files")
                .value_name("INPUT")
                .required(true)
                .multiple_values(true)
                .index(3),
        )
        .arg(common::suffix_arg(PARTITION_SUFFIX))
        .arg(common::buf_size_arg())
        .arg(common::log_level_arg())
}
