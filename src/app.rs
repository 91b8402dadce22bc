// Declare modules
pub mod applier;
pub mod cli;
pub mod config;
pub mod formatter;
pub mod matcher;
pub mod models;
pub mod parser;
pub mod scanner;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};

use self::applier::{apply, apply_from_prompt};
use self::cli::{ApplyArgs, ApplyPromptArgs, Cli, Command};
use self::config::{resolve_config, CliOverrides};
use self::formatter::SummaryFormatter;
use self::models::{ApplyOptions, RuntimeConfig};

/// Merges the config file with the flags of whichever subcommand was given.
pub fn resolve(cli: &Cli) -> Result<RuntimeConfig> {
    let overrides = match &cli.command {
        Command::Apply(args) => CliOverrides {
            exclude: args.exclude.clone(),
            threshold: None,
            verbose: args.verbose,
        },
        Command::ApplyPrompt(args) => CliOverrides {
            exclude: None,
            threshold: args.threshold,
            verbose: args.verbose,
        },
    };
    resolve_config(cli.config.as_deref(), overrides)
}

/// Default log filter when `RUST_LOG` is unset.
pub fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Dispatches the parsed command line.
pub fn run(cli: Cli, config: RuntimeConfig) -> Result<()> {
    match cli.command {
        Command::Apply(args) => run_apply(config, args),
        Command::ApplyPrompt(args) => run_apply_prompt(config, args),
    }
}

fn run_apply(config: RuntimeConfig, args: ApplyArgs) -> Result<()> {
    let options = ApplyOptions {
        dry_run: args.dry_run,
        verbose: config.verbose,
    };

    println!("Applying code from {} to {}", args.source.display(), args.target.display());
    if options.dry_run {
        println!("Dry run mode - no changes will be made");
    }

    let mut stdout = io::stdout().lock();
    let files = apply(&args.source, &args.target, &config.exclude, options, &mut stdout)?;

    log::info!("{}", SummaryFormatter::apply_summary(files, options.dry_run));
    Ok(())
}

fn run_apply_prompt(config: RuntimeConfig, args: ApplyPromptArgs) -> Result<()> {
    let options = ApplyOptions {
        dry_run: args.dry_run,
        verbose: config.verbose,
    };

    let content = match &args.input_file {
        Some(path) => fs::read_to_string(path)
            .context(format!("Failed to read prompt output from {:?}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read prompt output from stdin")?;
            buf
        }
    };

    log::info!("Applying code from prompt to {}", args.target.display());
    log::info!("Similarity threshold: {}", config.threshold);
    if args.force {
        log::info!("Force mode enabled - will replace regardless of similarity");
    }
    if options.dry_run {
        println!("Dry run mode - no changes will be made");
    }

    let mut stdout = io::stdout().lock();
    let outcome = apply_from_prompt(
        &content,
        &args.target,
        config.threshold,
        args.force,
        options,
        &mut stdout,
    )?;

    log::info!("{}", SummaryFormatter::prompt_summary(&outcome, options.dry_run));
    Ok(())
}
