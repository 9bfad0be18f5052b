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

    let dict = &*DATA;
    println!("word list size: {} words", dict.len());
    println!("sparse graph: max {} connections per word", DEFAULT_MAX_EDGES);
    println!(
        "full table would be {} pairs; bounding to at most {}",
        dict.len() * dict.len(),
        dict.len() * DEFAULT_MAX_EDGES,
    );

    let start_at = Instant::now();
    let graph = SparseFeedbackGraph::build(dict, DEFAULT_MAX_EDGES, DEFAULT_SEED);
    std::fs::create_dir_all(DEFAULT_CACHE_DIRECTORY).expect("should create cache directory");
    graph
        .save(dict, Path::new(DEFAULT_CACHE_PATH))
        .expect("should publish the cache artifact");

    let dur = start_at.elapsed();
    eprintln!(
        "done! wrote {} edges to {} in {:.2}s",
        graph.edge_count(),
        DEFAULT_CACHE_PATH,
        dur.as_secs_f64(),
    );
}
