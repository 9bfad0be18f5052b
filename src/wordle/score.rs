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

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::prelude::WordleFloat;

/// Produced when a configuration tag doesn't name any known strategy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown strategy tag '{0}'")]
pub struct UnknownTag(pub String);

///
/// What one candidate guess does to the current candidate pool, summarized as numbers the
/// scoring strategies can consume without seeing the pool itself:
///
///   * before = pool size when the guess was considered
///   * after = pool size once the observed feedback is incorporated
///   * parts = sizes of every non-empty feedback bucket the guess splits the pool into
///
/// `after` is always the size of one of the buckets in `parts` (the one the hidden answer
/// landed in), and the bucket sizes sum to `before`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionStats {
    pub before: usize,
    pub after: usize,
    pub parts: Vec<usize>,
}

impl PartitionStats {
    /// The size of the biggest bucket: the worst case pool we could be left holding
    pub fn largest_part(&self) -> usize {
        self.parts.iter().copied().max().unwrap_or(0)
    }

    /// Shannon entropy (bits) of the bucket size distribution
    fn entropy_bits(&self) -> WordleFloat {
        let total: usize = self.parts.iter().sum();
        if total == 0 {
            return 0.0;
        }

        let total = total as WordleFloat;
        self.parts
            .iter()
            .filter(|part| **part > 0)
            .map(|part| {
                let p = *part as WordleFloat / total;
                p * -(p.log2())
            })
            .sum()
    }
}

///
/// The step cost g-increment strategies. Every strategy returns a strictly positive value;
/// the cost-ordered disciplines rely on path cost growing monotonically along every branch.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostModel {
    /// Every guess costs 1: cost order degenerates to depth order
    Constant,
    /// 1 + after/before: cheap when the guess shrank the pool a lot
    Reduction,
    /// 1 + max(parts)/before: expensive when the guess risks a large leftover bucket
    WorstPartition,
    /// 2 - H(parts)/log2(before): cheap when the guess splits the pool near-uniformly
    Entropy,
}

impl CostModel {
    pub const ALL: [CostModel; 4] = [
        CostModel::Constant,
        CostModel::Reduction,
        CostModel::WorstPartition,
        CostModel::Entropy,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            CostModel::Constant => "constant",
            CostModel::Reduction => "reduction",
            CostModel::WorstPartition => "worst-partition",
            CostModel::Entropy => "entropy",
        }
    }

    /// The cost of taking one guess, given what it did to the candidate pool
    pub fn step_cost(&self, stats: &PartitionStats) -> WordleFloat {
        match self {
            CostModel::Constant => 1.0,
            CostModel::Reduction => {
                if stats.before == 0 {
                    1.0
                } else {
                    1.0 + (stats.after as WordleFloat / stats.before as WordleFloat)
                }
            }
            CostModel::WorstPartition => {
                if stats.before == 0 {
                    1.0
                } else {
                    1.0 + (stats.largest_part() as WordleFloat / stats.before as WordleFloat)
                }
            }
            CostModel::Entropy => {
                // with 0 or 1 candidates there is nothing left to distinguish; the guess is
                // exactly one unit of work
                if stats.before <= 1 {
                    return 1.0;
                }
                let h_max = (stats.before as WordleFloat).log2();
                2.0 - (stats.entropy_bits() / h_max)
            }
        }
    }
}

impl FromStr for CostModel {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|model| model.tag() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

///
/// The h(n) estimators for the heuristic-ordered discipline. Both are nonnegative, and neither
/// exceeds ceil(log2(bucket)) for the bucket it summarizes (the information-theoretic floor on
/// the number of binary distinctions still needed), which is what keeps the
/// cost-plus-heuristic ordering honest.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicModel {
    /// log2 of the post-guess pool size
    Log2,
    /// log2 of the biggest bucket the guess could have left us in
    WorstPartitionLog2,
}

impl HeuristicModel {
    pub const ALL: [HeuristicModel; 2] =
        [HeuristicModel::Log2, HeuristicModel::WorstPartitionLog2];

    pub fn tag(&self) -> &'static str {
        match self {
            HeuristicModel::Log2 => "log2",
            HeuristicModel::WorstPartitionLog2 => "worst-partition-log2",
        }
    }

    /// The estimated remaining work from a node whose expansion produced these stats
    pub fn estimate(&self, stats: &PartitionStats) -> WordleFloat {
        match self {
            HeuristicModel::Log2 => (stats.after.max(1) as WordleFloat).log2(),
            HeuristicModel::WorstPartitionLog2 => {
                (stats.largest_part().max(1) as WordleFloat).log2()
            }
        }
    }
}

impl FromStr for HeuristicModel {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|model| model.tag() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}
