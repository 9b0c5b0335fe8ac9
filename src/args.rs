use clap::Parser;

/// This is a weighted leaderboard program for red-flower grants.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the run: inputs, weighting rules, column names.
    /// All the other options override what is written in this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The export of the flower grants, in CSV or Excel format.
    #[clap(short, long, value_parser)]
    pub grants: Option<String>,

    /// (file path) The employee roster, in CSV or Excel format.
    #[clap(short, long, value_parser)]
    pub roster: Option<String>,

    /// (number between 0.0 and 1.0, default 1.0) The value of a flower given within the same
    /// organization. 0 means that such flowers do not count, 1 means no discount.
    #[clap(short, long, value_parser)]
    pub weight: Option<f64>,

    /// (directory path or empty) If specified, the enriched grants, the summary and the report are
    /// written to this directory. Otherwise the report is printed in JSON format to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected report in JSON format. If provided,
    /// flowerboard will check that the computed report matches the reference.
    #[clap(long, value_parser)]
    pub reference: Option<String>,

    /// (csv or xlsx) The type of the inputs. By default, it is deduced from the file extensions.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the first worksheet) When using Excel files, indicates the name of the worksheet to use.
    /// Applies to both inputs, unless overridden by the options below.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// The worksheet of the grant log, when it differs from the roster's.
    #[clap(long, value_parser)]
    pub grants_worksheet_name: Option<String>,

    /// The worksheet of the roster, when it differs from the grant log's.
    #[clap(long, value_parser)]
    pub roster_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
