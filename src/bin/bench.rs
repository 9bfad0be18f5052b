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
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::time::Instant;
use wordle_search::wordle::*;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let samples: usize = args
        .next()
        .map(|v| v.parse().expect("samples must be a number"))
        .unwrap_or(3);
    let seed: u64 = args
        .next()
        .map(|v| v.parse().expect("seed must be a number"))
        .unwrap_or(7);

    let dict = &*DATA;
    std::fs::create_dir_all(DEFAULT_CACHE_DIRECTORY).expect("should create cache directory");
    let graph = SparseFeedbackGraph::load_or_build(
        Path::new(DEFAULT_CACHE_PATH),
        dict,
        DEFAULT_MAX_EDGES,
        DEFAULT_SEED,
    );

    // the same seed always picks the same targets, so runs stay comparable across machines
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let targets: Vec<Word> = (0..samples)
        .map(|_| dict.words()[rng.gen_range(0..dict.len())])
        .collect();
    println!(
        "benchmarking on {} random words: {}",
        samples,
        targets
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    println!();

    let configs = [
        (
            "bfs",
            SearchConfig {
                algorithm: Algorithm::Bfs,
                ..SearchConfig::default()
            },
        ),
        (
            "dfs",
            SearchConfig {
                algorithm: Algorithm::Dfs,
                ..SearchConfig::default()
            },
        ),
        (
            "ucs-constant",
            SearchConfig {
                algorithm: Algorithm::Ucs,
                cost: CostModel::Constant,
                ..SearchConfig::default()
            },
        ),
        (
            "astar-constant-log2",
            SearchConfig {
                algorithm: Algorithm::AStar,
                cost: CostModel::Constant,
                heuristic: HeuristicModel::Log2,
                ..SearchConfig::default()
            },
        ),
    ];

    println!(
        "{:<22} | {:>7} | {:>13} | {:>13} | {:>10} | {:>11}",
        "Solver", "Success", "Avg time (ms)", "Max time (ms)", "Avg nodes", "Avg guesses",
    );
    println!("{}", "-".repeat(94));

    for (name, config) in &configs {
        let mut elapsed_times: Vec<f64> = Vec::with_capacity(targets.len());
        let mut nodes_expanded: Vec<u64> = Vec::with_capacity(targets.len());
        let mut successes = 0usize;
        let mut total_guesses = 0usize;

        for target in &targets {
            let start = Instant::now();
            let outcome = solve(dict, &graph, config, *target)
                .expect("benchmark targets come from the dictionary");
            elapsed_times.push(start.elapsed().as_secs_f64() * 1000.0);
            nodes_expanded.push(outcome.metrics.nodes_expanded);
            if outcome.success {
                successes += 1;
                total_guesses += outcome.history.len();
            }
        }

        let runs = elapsed_times.len().max(1) as f64;
        let avg_time = elapsed_times.iter().sum::<f64>() / runs;
        let max_time = elapsed_times.iter().copied().fold(0.0, f64::max);
        let avg_nodes = nodes_expanded.iter().sum::<u64>() as f64 / runs;
        let avg_guesses = if successes > 0 {
            total_guesses as f64 / successes as f64
        } else {
            0.0
        };

        println!(
            "{:<22} | {:>6.0}% | {:>13.2} | {:>13.2} | {:>10.1} | {:>11.2}",
            name,
            successes as f64 / runs * 100.0,
            avg_time,
            max_time,
            avg_nodes,
            avg_guesses,
        );
    }
}
