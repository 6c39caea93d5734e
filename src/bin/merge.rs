use std::path;
use std::process;

use log;

use bed_split::{MergerBuilder, Selection, SORTED_SUFFIX};

mod common;

fn main() {
    let arg_parser = common::get_matches(build_arg_parser());
    common::init_logger(&arg_parser);

    let selection = arg_parser.value_of("selection").expect("value is required");
    let staging_dir = arg_parser.value_of("staging_dir").expect("value is required");
    let output = arg_parser.value_of("output").expect("value is required");
    let suffix = arg_parser.value_of("suffix").expect("value has a default");
    let compression_level: u32 = arg_parser.value_of_t_or_exit("compression_level");

    let selection = match Selection::from_path(path::Path::new(selection)) {
        Ok(selection) => selection,
        Err(err) => {
            log::error!("selection list loading error: {}", err);
            process::exit(1);
        }
    };

    let mut merger_builder = MergerBuilder::new()
        .with_suffix(suffix)
        .with_compression_level(compression_level);
    if let Some(buf_size) = common::buf_size(&arg_parser) {
        merger_builder = merger_builder.with_rw_buf_size(buf_size);
    }
    let merger = merger_builder.build();

    match merger.merge(&selection, path::Path::new(staging_dir), path::Path::new(output)) {
        Ok(summary) => log::debug!(
            "{} chromosomes merged, {} missing, {} lines written",
            summary.merged,
            summary.missing,
            summary.lines
        ),
        Err(err) => {
            log::error!("merging error: {}", err);
            process::exit(1);
        }
    }
}

fn build_arg_parser() -> clap::App<'static> {
    clap::App::new("bed-merge")
        .about("merges per-chromosome staged files in selection list order")
        .arg(
            clap::Arg::new("selection")
                .help("chromosome selection list, defines the output chromosome order")
                .value_name("SELECTION_FILE")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("staging_dir")
                .help("directory holding staged files")
                .value_name("STAGING_DIR")
                .required(true)
                .index(2),
        )
        .arg(
            clap::Arg::new("output")
                .help("gzip-compressed result file")
                .value_name("OUTPUT_FILE")
                .required(true)
                .index(3),
        )
        .arg(
            clap::Arg::new("compression_level")
                .short('z')
                .long("compression-level")
                .help("output gzip compression level (0-9)")
                .takes_value(true)
                .default_value("6")
                .validator(|v| match v.parse::<u32>() {
                    Ok(level) if level <= 9 => Ok(()),
                    _ => Err(format!("Compression level must be in range 0-9: {}", v)),
                }),
        )
        .arg(common::suffix_arg(SORTED_SUFFIX))
        .arg(common::buf_size_arg())
        .arg(common::log_level_arg())
}
