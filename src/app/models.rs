use std::path::{Path, PathBuf};

use thiserror::Error;

/// Represents the final configuration after merging the config file and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub exclude: Vec<String>,
    pub threshold: f64,
    pub verbose: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            verbose: false,
        }
    }
}

pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Switches shared by both apply modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Report only, never touch the filesystem.
    pub dry_run: bool,
    /// Report every file-level action.
    pub verbose: bool,
}

/// What a path turned out to be when inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// A filesystem location tagged by inspection at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: PathBuf,
    pub kind: PathKind,
}

impl PathSpec {
    /// Inspects `path`, returning `None` when nothing exists there.
    pub fn inspect(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let meta = path.metadata().ok()?;
        let kind = if meta.is_dir() {
            PathKind::Directory
        } else {
            PathKind::File
        };

        Some(Self {
            path: path.to_path_buf(),
            kind,
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == PathKind::Directory
    }
}

/// A single source -> destination pair produced by planning a directory apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedEntry {
    Dir { dest: PathBuf },
    File { source: PathBuf, dest: PathBuf },
}

/// One file block extracted from prompt output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub path: String,
    pub content: String,
}

/// Counts of what an apply-prompt run did (or would do).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptOutcome {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Source path {} does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} and its destination are the same file", .0.display())]
    SameFile(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Invalid glob pattern {pattern}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to write report: {0}")]
    Report(#[source] std::io::Error),

    #[error("Similarity threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f64),
}

impl ApplyError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
