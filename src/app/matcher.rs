use crate::app::models::ApplyError;
use crate::app::scanner::Scanner;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Files under `dir` sharing the given file name, at any depth.
pub fn find_matching_files(file_name: &str, dir: &Path) -> Result<Vec<PathBuf>, ApplyError> {
    let scanner = Scanner::new(dir, &[])?;
    Ok(scanner.files_named(file_name))
}

/// Ratcliff/Obershelp similarity of two texts, compared character by character.
///
/// Returns `2 * M / T` where `T` is the combined length and `M` the number of
/// characters in matching blocks. Two empty strings are identical.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = SequenceMatcher::new(&a, &b).matching_chars();
    2.0 * matched as f64 / total as f64
}

/// Outcome of looking for an existing file to overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    /// Most similar candidate, present only when it reached the threshold.
    pub path: Option<PathBuf>,
    /// Best score seen, reported even for near misses.
    pub score: f64,
    /// How many files shared the file name.
    pub candidates: usize,
}

/// Picks the candidate most similar to `content` among files named like `path`.
pub fn find_best_match(
    path: &str,
    content: &str,
    dir: &Path,
    threshold: f64,
) -> Result<BestMatch, ApplyError> {
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let candidates = if dir.is_dir() {
        find_matching_files(&file_name, dir)?
    } else {
        Vec::new()
    };

    let mut best = None;
    let mut best_score = 0.0;

    for candidate in &candidates {
        let existing = match fs::read_to_string(candidate) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Skipping unreadable candidate {}: {}", candidate.display(), err);
                continue;
            }
        };

        let score = calculate_similarity(content, &existing);
        if score > best_score {
            best_score = score;
            best = Some(candidate.clone());
        }
    }

    Ok(BestMatch {
        path: best.filter(|_| best_score >= threshold),
        score: best_score,
        candidates: candidates.len(),
    })
}

/// Sequences at least this long get their most common elements left out of
/// match seeding.
const AUTOJUNK_MIN_LEN: usize = 200;

struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > limit)
                .map(|(&c, _)| c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest common block within the given ranges: `(i, j, size)`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                    } else {
                        1
                    };
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters never seed a block but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    fn matching_chars(&self) -> usize {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            matched += size;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                queue.push((i + size, ahi, j + size, bhi));
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn identical_texts_score_one() {
        assert_eq!(calculate_similarity("Hello World", "Hello World"), 1.0);
        assert_eq!(calculate_similarity("", ""), 1.0);
    }

    #[test]
    fn similar_texts_score_high_and_different_ones_low() {
        assert!(calculate_similarity("Hello World", "Hello World!") > 0.9);
        assert!(calculate_similarity("Hello World", "Something completely different") < 0.5);
        assert_eq!(calculate_similarity("abc", ""), 0.0);
    }

    #[test]
    fn ratio_counts_recursive_blocks() {
        // "Hello " plus the lone "r" out of 26 characters.
        let score = calculate_similarity("Hello World\n", "Hello Universe");
        assert!((score - 14.0 / 26.0).abs() < 1e-9);

        // "abcd" on both sides, split around the differing middle.
        let score = calculate_similarity("abXcd", "abYcd");
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn long_repetitive_texts_still_match_fully() {
        let text = "fn main() {}\n".repeat(40);
        assert_eq!(calculate_similarity(&text, &text), 1.0);
    }

    #[test]
    fn best_match_respects_threshold() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a/main.rs"), "fn main() { println!(\"hi\"); }").unwrap();
        fs::write(dir.path().join("b/main.rs"), "struct Unrelated;").unwrap();

        let content = "fn main() { println!(\"hello\"); }";
        let found = find_best_match("src/main.rs", content, dir.path(), 0.7).unwrap();
        assert_eq!(found.path, Some(dir.path().join("a/main.rs")));
        assert_eq!(found.candidates, 2);
        assert!(found.score >= 0.7);

        let found = find_best_match("main.rs", content, dir.path(), 0.99).unwrap();
        assert_eq!(found.path, None);
        assert!(found.score > 0.0);
    }

    #[test]
    fn best_match_without_candidates_scores_zero() {
        let dir = TempDir::new().unwrap();
        let found = find_best_match("missing.rs", "x", dir.path(), 0.0).unwrap();
        assert_eq!(found.path, None);
        assert_eq!(found.score, 0.0);
        assert_eq!(found.candidates, 0);
    }
}
