mod args;
mod convert;

use clap::Parser;
use log::LevelFilter;
use std::error::Error;

use crate::args::Args;
use crate::convert::{run_conversion, ConvertSettings};

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = ConvertSettings {
        input: args.input,
        out_dir: args.out_dir,
        tables: args.tables,
        date: args.date,
    };

    match run_conversion(&settings) {
        Ok(report) => {
            for (path, rows) in report.files.iter() {
                println!("{}\t{} rows", path.display(), rows);
            }
            if !report.summary.skipped.is_empty() {
                println!("{} rows skipped", report.summary.skipped.len());
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  caused by: {}", s);
                source = s.source();
            }
            std::process::exit(2);
        }
    }
}
