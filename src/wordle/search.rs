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

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

use super::{
    cache::SparseFeedbackGraph,
    data::{Dictionary, Word},
    feedback::FeedbackPattern,
    knowledge::Knowledge,
    prelude::*,
    score::{CostModel, HeuristicModel, PartitionStats, UnknownTag},
    state::CompactState,
};

///
/// The four search algorithms the engine can run. Each one is just a name for a frontier
/// discipline; the expansion loop itself is identical across all of them.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Level-order: pop the oldest node first
    Bfs,
    /// Depth-first: pop the newest node first
    Dfs,
    /// Cost-ordered: pop the cheapest accumulated g first
    Ucs,
    /// Heuristic-ordered: pop the lowest g + h first
    #[serde(rename = "astar")]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] =
        [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Ucs, Algorithm::AStar];

    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Ucs => "ucs",
            Algorithm::AStar => "astar",
        }
    }

    pub fn discipline(&self) -> Discipline {
        match self {
            Algorithm::Bfs => Discipline::Fifo,
            Algorithm::Dfs => Discipline::Lifo,
            Algorithm::Ucs => Discipline::ByCost,
            Algorithm::AStar => Discipline::ByCostPlusHeuristic,
        }
    }
}

impl FromStr for Algorithm {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.tag() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// How the frontier orders its nodes. This is the whole difference between the algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Fifo,
    Lifo,
    ByCost,
    ByCostPlusHeuristic,
}

fn default_algorithm() -> Algorithm {
    Algorithm::AStar
}

fn default_cost() -> CostModel {
    CostModel::Constant
}

fn default_heuristic() -> HeuristicModel {
    HeuristicModel::Log2
}

fn default_max_branching() -> usize {
    30
}

fn default_guess_budget() -> usize {
    NUM_TURNS
}

///
/// Everything that parameterizes one solve run. Deserializable so runs can be described by a
/// plain JSON file; every field falls back to a sensible default when omitted.
///
/// An empty `openers` list means "derive them": see [default_openers].
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default = "default_cost")]
    pub cost: CostModel,
    #[serde(default = "default_heuristic")]
    pub heuristic: HeuristicModel,
    #[serde(default = "default_max_branching")]
    pub max_branching: usize,
    #[serde(default = "default_guess_budget")]
    pub guess_budget: usize,
    #[serde(default)]
    pub openers: Vec<Word>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            cost: default_cost(),
            heuristic: default_heuristic(),
            max_branching: default_max_branching(),
            guess_budget: default_guess_budget(),
            openers: Vec::new(),
        }
    }
}

/// Counters maintained across a run; these are observability, not behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchMetrics {
    /// Nodes popped, deduplicated & actually examined
    pub nodes_expanded: u64,
    /// Children pushed onto the frontier
    pub nodes_generated: u64,
    /// The largest the frontier ever got
    pub max_frontier: usize,
    /// How many different words were tried as guesses anywhere in the search
    pub distinct_guesses: usize,
}

///
/// The result of one solve run. A search that exhausts its frontier or its guess budget is a
/// `success: false` outcome with an empty history, a perfectly normal value, so batch runs
/// over many targets keep going.
///
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub success: bool,
    pub history: Vec<(Word, FeedbackPattern)>,
    pub metrics: SearchMetrics,
}

impl SolveOutcome {
    /// Just the words of the winning path, in order
    pub fn guesses(&self) -> Vec<Word> {
        self.history.iter().map(|(guess, _)| *guess).collect()
    }

    /// Render the outcome as printable lines for reporting
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Solved: {}", if self.success { "yes" } else { "no" }),
            format!("Guesses: {}", self.history.len()),
            format!("Nodes expanded: {}", self.metrics.nodes_expanded),
            format!("Nodes generated: {}", self.metrics.nodes_generated),
            format!("Max frontier size: {}", self.metrics.max_frontier),
            format!("Distinct guesses tried: {}", self.metrics.distinct_guesses),
        ];
        for (guess, feedback) in &self.history {
            lines.push(format!("  {} -> {}", guess.to_string().to_uppercase(), feedback));
        }
        lines
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveErr {
    #[error("the target '{0}' is not in the dictionary")]
    UnknownTarget(Word),
    #[error("the opener '{0}' is not in the dictionary")]
    UnknownOpener(Word),
}

/// A frontier element: the immutable state plus the working data derived from its history
struct Node {
    state: CompactState,
    knowledge: Knowledge,
    candidates: Vec<Word>,
}

/// A heap element wrapping a node with its ordering key.
///
/// `BinaryHeap` is a max-heap, so we use `Reverse<(priority, sequence)>` to get min-heap
/// behavior: lowest priority first, insertion order breaking ties.
struct PriorityEntry {
    key: Reverse<(OrderedFloat<WordleFloat>, u64)>,
    node: Node,
}

impl PartialEq for PriorityEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PriorityEntry {}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

///
/// One closed set of frontier shapes instead of one solver subclass per algorithm: the
/// expansion loop stays singular, and the discipline decides only where a pushed node lands.
///
enum Frontier {
    Fifo(VecDeque<Node>),
    Lifo(Vec<Node>),
    Priority(BinaryHeap<PriorityEntry>),
}

impl Frontier {
    fn new(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Fifo => Self::Fifo(VecDeque::new()),
            Discipline::Lifo => Self::Lifo(Vec::new()),
            Discipline::ByCost | Discipline::ByCostPlusHeuristic => {
                Self::Priority(BinaryHeap::new())
            }
        }
    }

    fn push(&mut self, node: Node, priority: WordleFloat, sequence: u64) {
        match self {
            Self::Fifo(queue) => queue.push_back(node),
            Self::Lifo(stack) => stack.push(node),
            Self::Priority(heap) => heap.push(PriorityEntry {
                key: Reverse((OrderedFloat(priority), sequence)),
                node,
            }),
        }
    }

    fn pop(&mut self) -> Option<Node> {
        match self {
            Self::Fifo(queue) => queue.pop_front(),
            Self::Lifo(stack) => stack.pop(),
            Self::Priority(heap) => heap.pop().map(|entry| entry.node),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Fifo(queue) => queue.len(),
            Self::Lifo(stack) => stack.len(),
            Self::Priority(heap) => heap.len(),
        }
    }
}

///
/// Derives the default opening guesses: the N_OPENERS words using the most distinct letters,
/// ties resolved in canonical dictionary order. Deterministic, so two runs against the same
/// dictionary always open from the same set.
///
pub fn default_openers(dict: &Dictionary) -> Vec<Word> {
    let mut ranked: Vec<(usize, Word)> = dict
        .words()
        .iter()
        .map(|word| (word.distinct_letters(), *word))
        .collect();
    // stable sort: equal diversity keeps canonical order
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked
        .into_iter()
        .take(N_OPENERS)
        .map(|(_, word)| word)
        .collect()
}

/// Runs a search with no deadline. See [solve_until].
pub fn solve(
    dict: &Dictionary,
    graph: &SparseFeedbackGraph,
    config: &SearchConfig,
    target: Word,
) -> Result<SolveOutcome, SolveErr> {
    solve_until(dict, graph, config, target, None)
}

///
/// Runs the configured search against a hidden target.
///
/// The engine is a pure function of (dictionary, prebuilt graph, config, target): it owns no
/// state between calls and never mutates its collaborators. One loop serves all four
/// disciplines: pop, dedupe on the history signature, goal-test, expand within the branching
/// cap, score each child & push it where the discipline says.
///
/// `deadline` is an optional responsiveness valve for interactive callers: it's polled between
/// pops and ends the run as an ordinary failed outcome. Passing `None` changes nothing about
/// the search.
///
pub fn solve_until(
    dict: &Dictionary,
    graph: &SparseFeedbackGraph,
    config: &SearchConfig,
    target: Word,
    deadline: Option<Instant>,
) -> Result<SolveOutcome, SolveErr> {
    if !dict.contains(target) {
        return Err(SolveErr::UnknownTarget(target));
    }

    let openers = if config.openers.is_empty() {
        default_openers(dict)
    } else {
        for opener in &config.openers {
            if !dict.contains(*opener) {
                return Err(SolveErr::UnknownOpener(*opener));
            }
        }
        config.openers.clone()
    };

    let discipline = config.algorithm.discipline();
    let mut frontier = Frontier::new(discipline);
    let mut visited: HashSet<CompactState> = HashSet::new();
    let mut distinct_guesses: HashSet<Word> = HashSet::new();
    let mut metrics = SearchMetrics::default();
    let mut sequence: u64 = 0;

    frontier.push(
        Node {
            state: CompactState::root(dict.len()),
            knowledge: Knowledge::empty(),
            candidates: dict.words().to_vec(),
        },
        0.0,
        sequence,
    );
    sequence += 1;
    metrics.max_frontier = metrics.max_frontier.max(frontier.len());

    while let Some(node) = frontier.pop() {
        if deadline.map(|d| Instant::now() >= d).unwrap_or(false) {
            log::debug!(
                "search deadline reached after {} expansions",
                metrics.nodes_expanded
            );
            break;
        }

        // converging paths carry identical knowledge; only the first arrival expands
        if !visited.insert(node.state.clone()) {
            continue;
        }
        metrics.nodes_expanded += 1;

        if node.state.is_goal() {
            metrics.distinct_guesses = distinct_guesses.len();
            return Ok(SolveOutcome {
                success: true,
                history: node.state.history().to_vec(),
                metrics,
            });
        }

        if node.state.depth() >= config.guess_budget {
            continue;
        }

        // the opener set at the root; the leading candidates (canonical order) below it
        let selected: Vec<Word> = if node.state.depth() == 0 {
            openers.iter().copied().take(config.max_branching).collect()
        } else {
            node.candidates
                .iter()
                .copied()
                .take(config.max_branching)
                .collect()
        };

        for guess in selected {
            if node.state.already_guessed(guess) {
                continue;
            }
            distinct_guesses.insert(guess);

            let feedback = graph.get(dict, guess, target);
            let child_knowledge = node.knowledge.extend(guess, feedback);
            if child_knowledge.conflicted() {
                // unreachable with well-formed feedback; a dead branch, not a fault
                continue;
            }

            let child_candidates = child_knowledge.filter(&node.candidates);
            if child_candidates.is_empty() {
                continue;
            }

            // bucket the pre-guess pool by the pattern this guess induces against each word
            let mut buckets = [0usize; FeedbackPattern::NUM_STATES];
            for candidate in &node.candidates {
                buckets[graph.get(dict, guess, *candidate).to_code() as usize] += 1;
            }
            let stats = PartitionStats {
                before: node.candidates.len(),
                after: child_candidates.len(),
                parts: buckets.iter().copied().filter(|size| *size > 0).collect(),
            };

            let cost = node.state.cost() + config.cost.step_cost(&stats);
            let priority = match discipline {
                Discipline::Fifo | Discipline::Lifo => 0.0,
                Discipline::ByCost => cost,
                Discipline::ByCostPlusHeuristic => cost + config.heuristic.estimate(&stats),
            };

            frontier.push(
                Node {
                    state: node
                        .state
                        .child(guess, feedback, child_candidates.len(), cost),
                    knowledge: child_knowledge,
                    candidates: child_candidates,
                },
                priority,
                sequence,
            );
            sequence += 1;
            metrics.nodes_generated += 1;
            metrics.max_frontier = metrics.max_frontier.max(frontier.len());
        }
    }

    metrics.distinct_guesses = distinct_guesses.len();
    Ok(SolveOutcome {
        success: false,
        history: Vec::new(),
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        s.parse().expect("test word should parse")
    }

    fn test_dict() -> Dictionary {
        Dictionary::from_words(["crane", "trace", "slate", "stare", "share"]).unwrap()
    }

    fn config_for(algorithm: Algorithm) -> SearchConfig {
        SearchConfig {
            algorithm,
            max_branching: 5,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.algorithm, Algorithm::AStar);
        assert_eq!(config.cost, CostModel::Constant);
        assert_eq!(config.heuristic, HeuristicModel::Log2);
        assert_eq!(config.max_branching, 30);
        assert_eq!(config.guess_budget, NUM_TURNS);
        assert!(config.openers.is_empty());
    }

    #[test]
    fn test_algorithm_tags_parse() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.tag().parse::<Algorithm>(), Ok(algorithm));
        }
        let json: Algorithm = serde_json::from_str("\"astar\"").unwrap();
        assert_eq!(json, Algorithm::AStar);
        assert!("dijkstra".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_default_openers_are_deterministic_and_bounded() {
        let dict = test_dict();
        let a = default_openers(&dict);
        let b = default_openers(&dict);
        assert_eq!(a, b);
        assert!(a.len() <= N_OPENERS);
        assert!(!a.is_empty());
        // every word here has 5 distinct letters, so ties resolve to canonical order
        assert_eq!(a[0], w("crane"));
    }

    #[test]
    fn test_every_algorithm_finds_the_target() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        for algorithm in Algorithm::ALL {
            let outcome = solve(&dict, &graph, &config_for(algorithm), w("stare"))
                .expect("request should validate");
            assert!(outcome.success, "{} should solve", algorithm.tag());
            let guesses = outcome.guesses();
            assert_eq!(*guesses.last().unwrap(), w("stare"));
            assert!(guesses.len() <= NUM_TURNS);
            assert!(outcome.metrics.nodes_expanded > 0);
            assert!(outcome.metrics.nodes_generated > 0);
            assert!(outcome.metrics.max_frontier > 0);
            assert!(outcome.metrics.distinct_guesses > 0);
        }
    }

    #[test]
    fn test_first_guess_comes_from_the_opener_set() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        let config = SearchConfig {
            openers: vec![w("slate"), w("share")],
            ..config_for(Algorithm::Bfs)
        };
        let outcome = solve(&dict, &graph, &config, w("crane")).unwrap();
        assert!(outcome.success);
        assert!(config.openers.contains(&outcome.guesses()[0]));
    }

    #[test]
    fn test_unknown_target_and_opener_are_request_errors() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        assert_eq!(
            solve(&dict, &graph, &config_for(Algorithm::Bfs), w("quirk")).err(),
            Some(SolveErr::UnknownTarget(w("quirk")))
        );

        let config = SearchConfig {
            openers: vec![w("quirk")],
            ..config_for(Algorithm::Bfs)
        };
        assert_eq!(
            solve(&dict, &graph, &config, w("crane")).err(),
            Some(SolveErr::UnknownOpener(w("quirk")))
        );
    }

    #[test]
    fn test_budget_exhaustion_is_a_normal_failure() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        let config = SearchConfig {
            guess_budget: 1,
            openers: vec![w("slate")],
            ..config_for(Algorithm::Bfs)
        };
        // one guess, and it isn't the target: the search must end quietly
        let outcome = solve(&dict, &graph, &config, w("crane")).unwrap();
        assert!(!outcome.success);
        assert!(outcome.history.is_empty());
        assert!(outcome.metrics.nodes_expanded > 0);
    }

    #[test]
    fn test_expired_deadline_ends_the_run_quietly() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        let outcome = solve_until(
            &dict,
            &graph,
            &config_for(Algorithm::AStar),
            w("crane"),
            Some(Instant::now()),
        )
        .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.metrics.nodes_expanded, 0);
    }

    #[test]
    fn test_report_lines_shape() {
        let dict = test_dict();
        let graph = SparseFeedbackGraph::build(&dict, 3, 7);
        let outcome = solve(&dict, &graph, &config_for(Algorithm::AStar), w("crane")).unwrap();
        let lines = outcome.to_lines();
        assert_eq!(lines[0], "Solved: yes");
        assert!(lines.iter().any(|line| line.contains("CRANE")));
    }
}
