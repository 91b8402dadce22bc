mod app;

use clap::Parser;
use env_logger::Env;
use std::process::exit;

use app::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Settings decide the log level, so they are read before the logger exists.
    let config = app::resolve(&cli);
    let verbose = config.as_ref().is_ok_and(|config| config.verbose);
    env_logger::Builder::from_env(Env::default().default_filter_or(app::log_filter(verbose)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(err) = config.and_then(|config| app::run(cli, config)) {
        log::error!("{err:#}");
        exit(1);
    }
}
