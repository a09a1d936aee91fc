use clap::Parser;

/// Converts a LiveVox call results export into VAN bulk import files, one file per
/// state and per list (My Voters or My Campaign).
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The LiveVox export to convert. It is expected to be tab-separated,
    /// with a header row.
    #[clap(value_parser)]
    pub input: Option<String>,

    /// (directory, default: current directory) Where the import files are written.
    /// Files from an earlier run on the same day are overwritten.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// (file path, optional) A JSON file with the translation tables, in the same format as
    /// resources/livevox_tables.json. The built-in LiveVox to VAN tables are used otherwise.
    #[clap(short, long, value_parser)]
    pub tables: Option<String>,

    /// (YYYYMMDD, default today) The date used in the names of the import files.
    #[clap(long, value_parser)]
    pub date: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose (debug) logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
