use clap::Parser;

/// This is a Copeland ranking program: it counts ranked ballots stored as text files.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (files or directories) The ballots to count. Each file is one ballot, with one name per line
    /// from the most preferred to the least preferred. Directories are explored recursively.
    #[clap(value_parser, required_unless_present = "config")]
    pub paths: Vec<String>,

    /// (file path, optional) The file listing the names in the vote, one per line. If not specified,
    /// the names are inferred from the first ballot found.
    #[clap(short, long, value_parser)]
    pub names: Option<String>,

    /// (file path, optional) A JSON file with the settings of the count. Options passed on the
    /// command line take precedence over the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (default true) Converts all the names to upper case before counting.
    #[clap(long, value_parser)]
    pub normalize_case: Option<bool>,

    /// (default 1) The score for a win against an opponent.
    #[clap(long, value_parser)]
    pub score_win: Option<f64>,

    /// (default 0.5) The score for a tie against an opponent.
    #[clap(long, value_parser)]
    pub score_tie: Option<f64>,

    /// (default 0) The score for a loss against an opponent.
    #[clap(long, value_parser)]
    pub score_loss: Option<f64>,

    /// If passed as an argument, invalid ballots are reported and skipped instead of stopping the count.
    #[clap(long, takes_value = false)]
    pub skip_errors: bool,

    /// (file path, 'stdout' or empty) If specified, the summary of the count will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of a count in JSON format. If provided, copeland will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
