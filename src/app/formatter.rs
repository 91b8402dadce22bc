use crate::app::models::{ApplyError, PromptOutcome};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// A user-facing line describing one file-level action.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    WouldCopy { source: &'a Path, dest: &'a Path },
    Copying { source: &'a Path, dest: &'a Path },
    WouldCreate { dest: &'a Path },
    Created { dest: &'a Path },
    WouldUpdate { dest: &'a Path },
    Updated { dest: &'a Path },
    NoMatch { path: &'a str, score: f64 },
    OutsideTarget { path: &'a str },
}

impl Report<'_> {
    pub fn emit<W: Write>(&self, out: &mut W) -> Result<(), ApplyError> {
        writeln!(out, "{self}").map_err(ApplyError::Report)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldCopy { source, dest } => {
                write!(f, "Would copy {} to {}", source.display(), dest.display())
            }
            Self::Copying { source, dest } => {
                write!(f, "Copying {} to {}", source.display(), dest.display())
            }
            Self::WouldCreate { dest } => write!(f, "Would create {}", dest.display()),
            Self::Created { dest } => write!(f, "Created {}", dest.display()),
            Self::WouldUpdate { dest } => write!(f, "Would update {}", dest.display()),
            Self::Updated { dest } => write!(f, "Updated {}", dest.display()),
            Self::NoMatch { path, score } => write!(
                f,
                "No suitable match found for {path} (best similarity: {score:.2})"
            ),
            Self::OutsideTarget { path } => {
                write!(f, "Refusing to write outside the target directory: {path}")
            }
        }
    }
}

pub struct SummaryFormatter;

impl SummaryFormatter {
    pub fn apply_summary(files: usize, dry_run: bool) -> String {
        let verb = if dry_run { "Would apply" } else { "Applied" };
        format!("{verb} {files} file(s)")
    }

    pub fn prompt_summary(outcome: &PromptOutcome, dry_run: bool) -> String {
        let prefix = if dry_run { "Dry run: " } else { "" };
        format!(
            "{prefix}{} created, {} updated, {} skipped",
            outcome.created, outcome.updated, outcome.skipped
        )
    }
}
