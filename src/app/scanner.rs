use crate::app::models::{ApplyError, PlannedEntry};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{Walk, WalkBuilder};
use pathdiff::diff_paths;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub struct Scanner {
    root: PathBuf,
    exclude_set: GlobSet,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, exclude: &[String]) -> Result<Self, ApplyError> {
        Ok(Self {
            root: root.into(),
            exclude_set: build_globset(exclude)?,
        })
    }

    /// Maps every entry under the root onto `target`, mirroring relative paths.
    ///
    /// The whole tree is walked before anything is returned, so callers that
    /// write into a target nested inside the root never see their own output.
    pub fn plan(&self, target: &Path) -> Result<Vec<PlannedEntry>, ApplyError> {
        let mut entries = Vec::new();

        for result in walker(&self.root, Some(&self.exclude_set)) {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if is_dangling(&err) => {
                    log::warn!("Skipping dangling link: {}", err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let path = entry.path();

            // Skip the root folder itself
            if path == self.root {
                continue;
            }

            let Some(relative) = diff_paths(path, &self.root) else {
                log::warn!("Skipping {}: not under {}", path.display(), self.root.display());
                continue;
            };

            let dest = target.join(&relative);
            if path.is_dir() {
                entries.push(PlannedEntry::Dir { dest });
            } else {
                entries.push(PlannedEntry::File {
                    source: path.to_path_buf(),
                    dest,
                });
            }
        }

        Ok(entries)
    }

    /// Every file under the root whose file name equals `file_name`.
    pub fn files_named(&self, file_name: &str) -> Vec<PathBuf> {
        let mut matches = Vec::new();

        for result in walker(&self.root, None) {
            match result {
                Ok(entry) => {
                    let path = entry.path();
                    let name_matches = path.file_name() == Some(OsStr::new(file_name));
                    if name_matches && path.is_file() {
                        matches.push(path.to_path_buf());
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        matches
    }
}

/// Name-sorted walk that follows links. Hidden and gitignored entries are
/// included; anything matching `exclude` is pruned along with its contents.
fn walker(root: &Path, exclude: Option<&GlobSet>) -> Walk {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b));

    if let Some(set) = exclude.filter(|set| !set.is_empty()) {
        let set = set.clone();
        let root = root.to_path_buf();
        builder.filter_entry(move |entry| {
            let excluded = diff_paths(entry.path(), &root)
                .is_some_and(|relative| set.is_match(&relative));
            if excluded {
                log::debug!("Excluded {}", entry.path().display());
            }
            !excluded
        });
    }

    builder.build()
}

/// A link whose target is gone shows up as a not-found error once links are followed.
fn is_dangling(err: &ignore::Error) -> bool {
    err.io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ApplyError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|source| ApplyError::InvalidGlob {
            pattern: pat.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ApplyError::InvalidGlob {
        pattern: patterns.join(","),
        source,
    })
}
