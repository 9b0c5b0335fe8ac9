mod args;
mod flowers;

use clap::Parser;
use log::{debug, error};
use snafu::ErrorCompat;

fn main() {
    let args = args::Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    if let Err(e) = flowers::run_from_args(&args) {
        error!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
