use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Apply code content from a source to a target"
)]
pub struct Cli {
    /// Read settings from this file instead of ~/.config/code_apply/config.toml
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply code from SOURCE to TARGET, file for file
    Apply(ApplyArgs),

    /// Apply file blocks from prompt output to a target directory
    ApplyPrompt(ApplyPromptArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// File or directory to copy from
    pub source: PathBuf,

    /// File or directory to copy to
    pub target: PathBuf,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Report every file as it is copied
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Patterns for files or directories to skip (e.g., '*.log')
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,
}

#[derive(Args, Debug)]
pub struct ApplyPromptArgs {
    /// File holding the prompt output; standard input when omitted
    pub input_file: Option<PathBuf>,

    /// Target directory to apply the code to
    #[arg(long, short = 't', value_name = "dir")]
    pub target: PathBuf,

    /// Similarity threshold for file matching (0.0 to 1.0)
    #[arg(long, value_name = "ratio")]
    pub threshold: Option<f64>,

    /// Create files even when no existing file is similar enough
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Report every file as it is written
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_apply_with_flags() {
        let cli = Cli::try_parse_from([
            "code_apply", "apply", "src", "dst", "--dry-run", "-v", "--exclude", "*.log",
        ])
        .unwrap();

        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        assert_eq!(args.source, PathBuf::from("src"));
        assert_eq!(args.target, PathBuf::from("dst"));
        assert!(args.dry_run);
        assert!(args.verbose);
        assert_eq!(args.exclude, Some(vec!["*.log".to_string()]));
    }

    #[test]
    fn apply_flags_default_off() {
        let cli = Cli::try_parse_from(["code_apply", "apply", "a", "b"]).unwrap();
        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        assert!(!args.dry_run);
        assert!(!args.verbose);
        assert_eq!(args.exclude, None);
    }

    #[test]
    fn apply_requires_both_paths() {
        assert!(Cli::try_parse_from(["code_apply", "apply", "only-source"]).is_err());
    }

    #[test]
    fn parses_apply_prompt() {
        let cli = Cli::try_parse_from([
            "code_apply", "--config", "c.toml", "apply-prompt", "-t", "out", "--threshold", "0.5", "-f",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        let Command::ApplyPrompt(args) = cli.command else {
            panic!("expected apply-prompt");
        };
        assert_eq!(args.input_file, None);
        assert_eq!(args.target, PathBuf::from("out"));
        assert_eq!(args.threshold, Some(0.5));
        assert!(args.force);
    }

    #[test]
    fn apply_prompt_requires_target() {
        assert!(Cli::try_parse_from(["code_apply", "apply-prompt", "input.md"]).is_err());
    }
}
