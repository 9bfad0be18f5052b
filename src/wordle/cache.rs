/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::{
    data::{Dictionary, Word},
    feedback::{FeedbackCode, FeedbackPattern},
};

/// Bumped whenever the on-disk layout changes; old artifacts rebuild instead of misparsing
pub const CACHE_FORMAT_VERSION: u32 = 1;

// Where the utility binaries keep the published artifact, and the key they build it under.
// The edge cap is a tunable, not a law: the library takes it as a parameter everywhere.
pub const DEFAULT_CACHE_DIRECTORY: &str = ".cache/";
pub const DEFAULT_CACHE_PATH: &str = ".cache/feedback_graph.json";
pub const DEFAULT_MAX_EDGES: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

///
/// A memory-bounded precomputed feedback lookup.
///
/// A full pairwise table is N² entries and becomes infeasible for large dictionaries, so each
/// word instead gets at most `max_edges` precomputed (other word -> feedback code) edges: the
/// mandatory self-edge plus a seeded sample of the rest. Lookups that miss fall back to the
/// evaluator directly: a miss is slower, never wrong, and never writes back (which is what
/// keeps the memory bound a bound).
///
/// The same (dictionary, max_edges, seed) always produces the identical graph, on any machine:
/// the sampler runs on a ChaCha stream whose output is specified independently of platform.
/// Benchmark runs rely on this to be comparable.
///
/// Once built the edge table is never mutated; the only interior state is a pair of relaxed
/// hit/miss counters, so sharing a built graph across concurrent searches is safe.
///
pub struct SparseFeedbackGraph {
    fingerprint: String,
    max_edges: usize,
    seed: u64,
    /// per word (by canonical index), its edges sorted by target index for binary search
    edges: Vec<Vec<(u32, FeedbackCode)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SparseFeedbackGraph {
    ///
    /// Precomputes the bounded feedback graph for a dictionary.
    ///
    /// Every word gets its self-edge (the all-Correct pattern), then up to `max_edges - 1`
    /// distinct other words sampled from the seeded stream. The whole build draws from one
    /// generator in canonical word order, so the sampled neighborhoods are a pure function of
    /// (dictionary, max_edges, seed).
    ///
    pub fn build(dict: &Dictionary, max_edges: usize, seed: u64) -> Self {
        let n = dict.len();
        let words = dict.words();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut edges = Vec::with_capacity(n);
        for (i, word) in words.iter().enumerate() {
            let sample_size = max_edges.saturating_sub(1).min(n - 1);
            let mut row: Vec<(u32, FeedbackCode)> = Vec::with_capacity(sample_size + 1);
            row.push((i as u32, FeedbackPattern::all_correct_code()));

            if sample_size > 0 {
                // sample over n-1 slots, then shift past the word's own slot so it can't be
                // drawn twice
                for j in index::sample(&mut rng, n - 1, sample_size) {
                    let other = if j >= i { j + 1 } else { j };
                    let code = FeedbackPattern::evaluate(*word, words[other]).to_code();
                    row.push((other as u32, code));
                }
            }

            row.sort_unstable_by_key(|(other, _)| *other);
            edges.push(row);
        }

        log::debug!(
            "built sparse feedback graph: {} words, max {} edges per word, seed {}",
            n,
            max_edges,
            seed,
        );

        Self {
            fingerprint: dict.fingerprint(),
            max_edges,
            seed,
            edges,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    ///
    /// The feedback for (guess, target): the precomputed edge when one exists, otherwise a
    /// direct evaluation. Words outside the dictionary simply take the evaluation path.
    ///
    pub fn get(&self, dict: &Dictionary, guess: Word, target: Word) -> FeedbackPattern {
        if let (Some(gi), Some(ti)) = (dict.index_of(guess), dict.index_of(target)) {
            let row = &self.edges[gi as usize];
            if let Ok(pos) = row.binary_search_by_key(&ti, |(other, _)| *other) {
                if let Some(pattern) = FeedbackPattern::from_code(row[pos].1) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return pattern;
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        FeedbackPattern::evaluate(guess, target)
    }

    /// (hits, misses) observed so far; purely informational
    pub fn counters(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// The dictionary fingerprint this graph was built against
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn max_edges(&self) -> usize {
        self.max_edges
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Total number of precomputed edges across all words
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(|row| row.len()).sum()
    }

    ///
    /// Serializes the graph to `path`, keyed by (dictionary fingerprint, max_edges, seed).
    ///
    /// The bytes are written to a sibling temp file first and published with a rename, so a
    /// concurrent builder (or a crash mid-write) can never leave a half-written artifact where
    /// a complete one used to be.
    ///
    pub fn save(&self, dict: &Dictionary, path: &Path) -> Result<(), CacheErr> {
        let dict_fingerprint = dict.fingerprint();
        if dict_fingerprint != self.fingerprint {
            return Err(CacheErr::stale("fingerprint", &self.fingerprint, dict_fingerprint));
        }

        let file = CacheFile {
            header: CacheHeader {
                version: CACHE_FORMAT_VERSION,
                fingerprint: self.fingerprint.clone(),
                max_edges: self.max_edges,
                seed: self.seed,
            },
            words: self
                .edges
                .iter()
                .enumerate()
                .map(|(i, row)| CacheRow {
                    word: dict.words()[i],
                    edges: row
                        .iter()
                        .map(|(other, code)| (dict.words()[*other as usize], *code))
                        .collect(),
                })
                .collect(),
        };

        let bytes = serde_json::to_vec(&file)?;
        let tmp = path.with_extension(format!("tmp-{}", std::process::id()));
        std::fs::write(&tmp, bytes)?;
        if let Err(err) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }

        log::debug!("published sparse feedback graph to {}", path.display());
        Ok(())
    }

    ///
    /// Loads a previously saved graph, trusting nothing: the version, fingerprint, edge bound,
    /// seed, row count, every word and every code are validated against the dictionary & the
    /// requested key before the payload is accepted.
    ///
    pub fn load(
        path: &Path,
        dict: &Dictionary,
        max_edges: usize,
        seed: u64,
    ) -> Result<Self, CacheErr> {
        let raw = std::fs::read_to_string(path)?;
        let file: CacheFile = serde_json::from_str(&raw)?;

        let expected_fingerprint = dict.fingerprint();
        if file.header.version != CACHE_FORMAT_VERSION {
            return Err(CacheErr::stale("version", CACHE_FORMAT_VERSION, file.header.version));
        }
        if file.header.fingerprint != expected_fingerprint {
            return Err(CacheErr::stale(
                "fingerprint",
                expected_fingerprint,
                file.header.fingerprint,
            ));
        }
        if file.header.max_edges != max_edges {
            return Err(CacheErr::stale("max_edges", max_edges, file.header.max_edges));
        }
        if file.header.seed != seed {
            return Err(CacheErr::stale("seed", seed, file.header.seed));
        }
        if file.words.len() != dict.len() {
            return Err(CacheErr::WrongRowCount {
                expected: dict.len(),
                found: file.words.len(),
            });
        }

        let mut edges = vec![Vec::new(); dict.len()];
        for row in file.words {
            let i = dict
                .index_of(row.word)
                .ok_or(CacheErr::UnknownWord(row.word))?;
            let mut out = Vec::with_capacity(row.edges.len());
            for (other, code) in row.edges {
                let oi = dict.index_of(other).ok_or(CacheErr::UnknownWord(other))?;
                if code as usize >= FeedbackPattern::NUM_STATES {
                    return Err(CacheErr::BadCode(code));
                }
                out.push((oi, code));
            }
            out.sort_unstable_by_key(|(other, _)| *other);
            edges[i as usize] = out;
        }

        log::debug!("loaded sparse feedback graph from {}", path.display());
        Ok(Self {
            fingerprint: expected_fingerprint,
            max_edges,
            seed,
            edges,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    ///
    /// The lifecycle most callers want: reuse the artifact at `path` when its key matches,
    /// otherwise rebuild from scratch & republish. A stale or corrupt artifact is never
    /// served; it's logged and replaced.
    ///
    pub fn load_or_build(path: &Path, dict: &Dictionary, max_edges: usize, seed: u64) -> Self {
        match Self::load(path, dict, max_edges, seed) {
            Ok(graph) => graph,
            Err(err) => {
                log::warn!(
                    "rebuilding sparse feedback graph ({}): {}",
                    path.display(),
                    err
                );
                let graph = Self::build(dict, max_edges, seed);
                if let Err(save_err) = graph.save(dict, path) {
                    log::warn!("unable to publish rebuilt graph: {}", save_err);
                }
                graph
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum CacheErr {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Malformed(#[from] serde_json::Error),
    #[error("cache key mismatch on {field}: expected {expected}, found {found}")]
    StaleKey {
        field: &'static str,
        expected: String,
        found: String,
    },
    #[error("cache artifact has {found} rows but the dictionary has {expected} words")]
    WrongRowCount { expected: usize, found: usize },
    #[error("cache artifact references '{0}' which is not in the dictionary")]
    UnknownWord(Word),
    #[error("cache artifact contains out-of-range feedback code {0}")]
    BadCode(FeedbackCode),
}

impl CacheErr {
    fn stale<E: ToString, F: ToString>(field: &'static str, expected: E, found: F) -> Self {
        Self::StaleKey {
            field,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// The persisted form: a keyed header plus one row of (word, edges) per dictionary word
#[derive(Serialize, Deserialize)]
struct CacheFile {
    header: CacheHeader,
    words: Vec<CacheRow>,
}

#[derive(Serialize, Deserialize)]
struct CacheHeader {
    version: u32,
    fingerprint: String,
    max_edges: usize,
    seed: u64,
}

#[derive(Serialize, Deserialize)]
struct CacheRow {
    word: Word,
    edges: Vec<(Word, FeedbackCode)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dict() -> Dictionary {
        Dictionary::from_words([
            "crane", "trace", "slate", "stare", "share", "geese", "eagle", "loyal",
        ])
        .expect("test dictionary should build")
    }

    fn temp_cache_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "wordle-search-cache-test-{}-{}.json",
            std::process::id(),
            tag
        ))
    }

    #[test]
    fn test_every_word_has_its_self_edge() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        for (i, row) in graph.edges.iter().enumerate() {
            assert!(
                row.contains(&(i as u32, FeedbackPattern::all_correct_code())),
                "word {} is missing its self edge",
                dict.words()[i]
            );
            assert!(row.len() <= 3, "row exceeds the edge bound");
        }
    }

    #[test]
    fn test_cached_and_fallback_agree_with_evaluator() {
        let dict = test_dict();
        // max_edges=3 on 8 words guarantees plenty of cold misses
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        for guess in dict.words() {
            for target in dict.words() {
                assert_eq!(
                    graph.get(&dict, *guess, *target),
                    FeedbackPattern::evaluate(*guess, *target),
                    "guess={} target={}",
                    guess,
                    target
                );
            }
        }
        let (hits, misses) = graph.counters();
        assert!(hits > 0, "self edges alone should produce hits");
        assert!(misses > 0, "the bound should force some misses");
    }

    #[test]
    fn test_same_seed_means_same_graph() {
        let dict = test_dict();
        let a = SparseFeedbackGraph::build(&dict, 4, 42);
        let b = SparseFeedbackGraph::build(&dict, 4, 42);
        assert_eq!(a.edges, b.edges);

        let c = SparseFeedbackGraph::build(&dict, 4, 43);
        assert_ne!(a.edges, c.edges, "a different seed should sample differently");
    }

    #[test]
    fn test_out_of_dictionary_words_fall_back() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        let outsider: Word = "quirk".parse().unwrap();
        let target: Word = "crane".parse().unwrap();
        assert_eq!(
            graph.get(&dict, outsider, target),
            FeedbackPattern::evaluate(outsider, target)
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let dict = test_dict();
        let path = temp_cache_path("round-trip");
        let graph = SparseFeedbackGraph::build(&dict, 4, 11);
        graph.save(&dict, &path).expect("save should succeed");

        let loaded = SparseFeedbackGraph::load(&path, &dict, 4, 11).expect("load should succeed");
        assert_eq!(graph.edges, loaded.edges);
        assert_eq!(loaded.counters(), (0, 0), "counters start fresh");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_stale_key_is_rejected() {
        let dict = test_dict();
        let path = temp_cache_path("stale-key");
        SparseFeedbackGraph::build(&dict, 4, 11)
            .save(&dict, &path)
            .expect("save should succeed");

        assert!(matches!(
            SparseFeedbackGraph::load(&path, &dict, 5, 11),
            Err(CacheErr::StaleKey { field: "max_edges", .. })
        ));
        assert!(matches!(
            SparseFeedbackGraph::load(&path, &dict, 4, 12),
            Err(CacheErr::StaleKey { field: "seed", .. })
        ));

        let other_dict = Dictionary::from_words(["crane", "trace"]).unwrap();
        assert!(matches!(
            SparseFeedbackGraph::load(&path, &other_dict, 4, 11),
            Err(CacheErr::StaleKey { field: "fingerprint", .. })
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_artifact_is_rejected_and_rebuilt() {
        let dict = test_dict();
        let path = temp_cache_path("corrupt");
        std::fs::write(&path, b"definitely not json{{{").expect("should write garbage");

        assert!(matches!(
            SparseFeedbackGraph::load(&path, &dict, 4, 11),
            Err(CacheErr::Malformed(_))
        ));

        // load_or_build replaces the corrupt artifact with a valid one
        let rebuilt = SparseFeedbackGraph::load_or_build(&path, &dict, 4, 11);
        let fresh = SparseFeedbackGraph::build(&dict, 4, 11);
        assert_eq!(rebuilt.edges, fresh.edges);

        let reloaded = SparseFeedbackGraph::load(&path, &dict, 4, 11)
            .expect("the republished artifact should now load");
        assert_eq!(reloaded.edges, fresh.edges);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_artifact_triggers_build() {
        let dict = test_dict();
        let path = temp_cache_path("missing");
        let _ = std::fs::remove_file(&path);

        let built = SparseFeedbackGraph::load_or_build(&path, &dict, 2, 99);
        assert_eq!(built.edges, SparseFeedbackGraph::build(&dict, 2, 99).edges);

        let _ = std::fs::remove_file(&path);
    }
}
