use std::path::PathBuf;

use clap::Parser;
use whr_processor::model::{
    constants::{DEFAULT_PRECISION, DEFAULT_TIME_LIMIT_SECS},
    structures::update_schedule::UpdateSchedule
};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "WHR Processor",
    long_about = "Computes Whole-History Ratings from a saved list of pairwise observations"
)]
pub struct Args {
    /// JSON file holding `{ "w2": .., "observations": [..] }`, as written by `SavedBase::write`
    #[arg(short, long, env = "WHR_INPUT", help = "Saved observation list")]
    pub input: PathBuf,

    /// Overrides the w2 stored in the input file
    #[arg(long, env = "WHR_W2", help = "Random walk variance per time step, in Elo²")]
    pub w2: Option<f64>,

    #[arg(
        short,
        long,
        env = "WHR_TIME_LIMIT",
        default_value_t = DEFAULT_TIME_LIMIT_SECS,
        help = "Seconds to iterate before giving up on convergence"
    )]
    pub time_limit: u64,

    #[arg(
        short,
        long,
        env = "WHR_PRECISION",
        default_value_t = DEFAULT_PRECISION,
        help = "Largest Elo change between batches that counts as converged"
    )]
    pub precision: f64,

    #[arg(
        short,
        long,
        env = "WHR_SCHEDULE",
        default_value_t = UpdateSchedule::Sequential,
        help = "Chain update schedule (sequential, simultaneous)"
    )]
    pub schedule: UpdateSchedule,

    /// Where to write the rating report. Nothing is written when omitted.
    #[arg(short, long, env = "WHR_OUTPUT", help = "Rating report path")]
    pub output: Option<PathBuf>,

    #[arg(
        short,
        long,
        env = "WHR_METRIC",
        default_value = "overall",
        help = "Metric name the ratings are reported under"
    )]
    pub metric: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    /// Logs the log likelihood after every iteration
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub debug: bool
}
