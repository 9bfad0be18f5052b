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
use std::path::Path;
use std::time::Instant;
use wordle_search::wordle::*;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let target: Word = args
        .next()
        .expect("usage: solve <target> [config.json]")
        .parse()
        .expect("target must be a valid wordle word");

    // an optional JSON config; anything omitted falls back to the documented defaults
    let config: SearchConfig = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).expect("should read config file");
            serde_json::from_str(&raw).expect("config file should be valid JSON")
        }
        None => SearchConfig::default(),
    };

    let dict = &*DATA;
    std::fs::create_dir_all(DEFAULT_CACHE_DIRECTORY).expect("should create cache directory");
    let graph = SparseFeedbackGraph::load_or_build(
        Path::new(DEFAULT_CACHE_PATH),
        dict,
        DEFAULT_MAX_EDGES,
        DEFAULT_SEED,
    );

    let start_at = Instant::now();
    let outcome = solve(dict, &graph, &config, target).expect("solve request should validate");
    let dur = start_at.elapsed();

    for line in outcome.to_lines() {
        println!("{}", line);
    }

    let (hits, misses) = graph.counters();
    eprintln!(
        "done! searched with {} in {:.2}ms ({} cache hits, {} misses)",
        config.algorithm.tag(),
        dur.as_secs_f64() * 1000.0,
        hits,
        misses,
    );
}
