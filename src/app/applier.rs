use crate::app::formatter::Report;
use crate::app::matcher::find_best_match;
use crate::app::models::{ApplyError, ApplyOptions, PathSpec, PlannedEntry, PromptOutcome};
use crate::app::parser::get_parser;
use crate::app::scanner::Scanner;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Copies `source` onto `target`, file for file.
///
/// A file source lands on `target` (or inside it, when `target` is an existing
/// directory). A directory source is mirrored below `target`. Report lines go
/// to `out`; under `dry_run` nothing on disk changes. The first failing entry
/// aborts the run, leaving whatever was already copied in place.
///
/// Returns the number of files copied (or that would have been).
pub fn apply<W: Write>(
    source: &Path,
    target: &Path,
    exclude: &[String],
    options: ApplyOptions,
    out: &mut W,
) -> Result<usize, ApplyError> {
    let source = PathSpec::inspect(source)
        .ok_or_else(|| ApplyError::SourceNotFound(source.to_path_buf()))?;
    log::info!("Source: {}", source.path.display());
    log::info!("Target: {}", target.display());

    if !source.is_dir() {
        let dest = match PathSpec::inspect(target) {
            Some(existing) if existing.is_dir() => match source.path.file_name() {
                Some(name) => target.join(name),
                None => target.to_path_buf(),
            },
            _ => target.to_path_buf(),
        };
        apply_file(&source.path, &dest, options, out)?;
        return Ok(1);
    }

    let plan = Scanner::new(&source.path, exclude)?.plan(target)?;

    if !options.dry_run {
        ensure_directory(target)?;
    }

    let mut copied = 0;
    for entry in plan {
        match entry {
            PlannedEntry::Dir { dest } => {
                if !options.dry_run {
                    ensure_directory(&dest)?;
                }
            }
            PlannedEntry::File { source, dest } => {
                apply_file(&source, &dest, options, out)?;
                copied += 1;
            }
        }
    }

    Ok(copied)
}

fn apply_file<W: Write>(
    source: &Path,
    dest: &Path,
    options: ApplyOptions,
    out: &mut W,
) -> Result<(), ApplyError> {
    if is_same_file(source, dest) {
        return Err(ApplyError::SameFile(source.to_path_buf()));
    }

    if options.dry_run {
        return Report::WouldCopy { source, dest }.emit(out);
    }

    if options.verbose {
        Report::Copying { source, dest }.emit(out)?;
    }

    if let Some(parent) = dest.parent() {
        ensure_directory(parent)?;
    }
    fs::copy(source, dest).map_err(ApplyError::io(source))?;

    Ok(())
}

/// Writes each file block found in `content` into `target_dir`.
///
/// Blocks are matched against existing files of the same name below
/// `target_dir`; the most similar one is overwritten when it scores at least
/// `threshold`. Unmatched blocks become new files at their stated path, and
/// `force` does the same for blocks whose best match falls short.
pub fn apply_from_prompt<W: Write>(
    content: &str,
    target_dir: &Path,
    threshold: f64,
    force: bool,
    options: ApplyOptions,
    out: &mut W,
) -> Result<PromptOutcome, ApplyError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ApplyError::InvalidThreshold(threshold));
    }

    if !target_dir.exists() {
        log::info!("Target directory {} does not exist, creating it", target_dir.display());
        if !options.dry_run {
            ensure_directory(target_dir)?;
        }
    }

    let files = get_parser("prompt").parse(content);
    log::info!("Parsed {} files from prompt output", files.len());

    let mut outcome = PromptOutcome::default();
    for file in files {
        log::info!("Processing file: {}", file.path);

        if !stays_inside(&file.path) {
            Report::OutsideTarget { path: &file.path }.emit(out)?;
            outcome.skipped += 1;
            continue;
        }

        let found = find_best_match(&file.path, &file.content, target_dir, threshold)?;

        if found.candidates == 0 {
            log::info!("No matching files found for {}", file.path);
            create_file(target_dir, &file.path, &file.content, options, out)?;
            outcome.created += 1;
            continue;
        }

        match found.path {
            Some(best) => {
                log::info!("Found matching file: {} (similarity: {:.2})", best.display(), found.score);
                update_file(&best, &file.content, options, out)?;
                outcome.updated += 1;
            }
            None if force => {
                log::info!("Force mode enabled, creating {}", file.path);
                create_file(target_dir, &file.path, &file.content, options, out)?;
                outcome.created += 1;
            }
            None => {
                Report::NoMatch {
                    path: &file.path,
                    score: found.score,
                }
                .emit(out)?;
                outcome.skipped += 1;
            }
        }
    }

    Ok(outcome)
}

/// Block paths must be relative and never climb out of the target directory.
fn stays_inside(relative: &str) -> bool {
    let path = Path::new(relative);
    path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn create_file<W: Write>(
    target_dir: &Path,
    relative: &str,
    content: &str,
    options: ApplyOptions,
    out: &mut W,
) -> Result<(), ApplyError> {
    let dest: PathBuf = target_dir.join(relative);

    if options.dry_run {
        return Report::WouldCreate { dest: &dest }.emit(out);
    }

    if let Some(parent) = dest.parent() {
        ensure_directory(parent)?;
    }
    fs::write(&dest, content).map_err(ApplyError::io(&dest))?;

    if options.verbose {
        Report::Created { dest: &dest }.emit(out)?;
    }
    Ok(())
}

fn update_file<W: Write>(
    dest: &Path,
    content: &str,
    options: ApplyOptions,
    out: &mut W,
) -> Result<(), ApplyError> {
    if options.dry_run {
        return Report::WouldUpdate { dest }.emit(out);
    }

    fs::write(dest, content).map_err(ApplyError::io(dest))?;

    if options.verbose {
        Report::Updated { dest }.emit(out)?;
    }
    Ok(())
}

/// Copying a file onto itself would truncate it before reading.
fn is_same_file(source: &Path, dest: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(dest)) {
        (Ok(source), Ok(dest)) => source == dest,
        _ => false,
    }
}

fn ensure_directory(path: &Path) -> Result<(), ApplyError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(ApplyError::io(path))
}
