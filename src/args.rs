use clap::Parser;

/// Renders local election results into the data file of the AWG website.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The snapshot of the election results, in JSON format.
    /// For more information about the file format, read the manual of the awg_website crate.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path, 'stdout' or empty) Where to write the data file. Defaults to the standard
    /// output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference data file. If provided, awgweb checks that the
    /// rendered file is identical and prints the differences otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
