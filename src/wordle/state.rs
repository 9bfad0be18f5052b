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

use std::hash::{Hash, Hasher};

use super::{data::Word, feedback::FeedbackPattern, prelude::*};

///
/// An immutable search node: the ordered observation history plus two cached numbers derived
/// from it (how many candidates remain, and the accumulated path cost g).
///
/// Equality & hashing are deliberately defined over `history` alone. Two paths which somehow
/// arrive at the same observation sequence carry identical knowledge, so the visited set should
/// collapse them regardless of what their cost bookkeeping says.
///
/// Nothing outside the search engine constructs these; nodes are built by root()/child(),
/// popped, expanded once, and discarded.
///
#[derive(Clone, Debug)]
pub struct CompactState {
    history: Vec<(Word, FeedbackPattern)>,
    candidate_count: usize,
    cost: WordleFloat,
}

impl CompactState {
    /// The starting node: nothing observed, every word a candidate, zero cost
    pub(crate) fn root(candidate_count: usize) -> Self {
        Self {
            history: Vec::new(),
            candidate_count,
            cost: 0.0,
        }
    }

    /// Extends this node's history by one observation, with the child's cached numbers
    pub(crate) fn child(
        &self,
        guess: Word,
        feedback: FeedbackPattern,
        candidate_count: usize,
        cost: WordleFloat,
    ) -> Self {
        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.extend_from_slice(&self.history);
        history.push((guess, feedback));
        Self {
            history,
            candidate_count,
            cost,
        }
    }

    /// The ordered (guess, feedback) observations which define this node
    pub fn history(&self) -> &[(Word, FeedbackPattern)] {
        &self.history
    }

    /// The number of guesses made along this path
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Cached size of the candidate set implied by the history
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    /// Accumulated path cost g
    pub fn cost(&self) -> WordleFloat {
        self.cost
    }

    /// Whether this node's most recent feedback is the winning pattern
    pub fn is_goal(&self) -> bool {
        self.history
            .last()
            .map(|(_, feedback)| feedback.is_all_correct())
            .unwrap_or(false)
    }

    /// Whether this path already tried the given word
    pub fn already_guessed(&self, word: Word) -> bool {
        self.history.iter().any(|(guess, _)| *guess == word)
    }
}

impl PartialEq for CompactState {
    fn eq(&self, other: &Self) -> bool {
        self.history == other.history
    }
}

impl Eq for CompactState {}

impl Hash for CompactState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.history.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn w(s: &str) -> Word {
        s.parse().expect("test word should parse")
    }

    fn observation(guess: &str, secret: &str) -> (Word, FeedbackPattern) {
        (w(guess), FeedbackPattern::evaluate(w(guess), w(secret)))
    }

    #[test]
    fn test_root_is_not_a_goal() {
        let root = CompactState::root(100);
        assert!(!root.is_goal());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.cost(), 0.0);
    }

    #[test]
    fn test_child_extends_history_without_touching_parent() {
        let root = CompactState::root(3);
        let (guess, feedback) = observation("slate", "crane");
        let child = root.child(guess, feedback, 2, 1.0);

        assert_eq!(root.depth(), 0);
        assert_eq!(child.depth(), 1);
        assert_eq!(child.candidate_count(), 2);
        assert!(child.already_guessed(w("slate")));
        assert!(!child.already_guessed(w("crane")));
    }

    #[test]
    fn test_goal_detected_from_last_feedback() {
        let root = CompactState::root(2);
        let (guess, feedback) = observation("crane", "crane");
        let child = root.child(guess, feedback, 1, 1.0);
        assert!(child.is_goal());
    }

    #[test]
    fn test_identity_ignores_cost_bookkeeping() {
        let root = CompactState::root(5);
        let (guess, feedback) = observation("slate", "crane");
        let a = root.child(guess, feedback, 3, 1.0);
        let b = root.child(guess, feedback, 3, 2.5);

        assert_eq!(a, b, "same history must collapse regardless of cost");

        let mut visited = HashSet::new();
        assert!(visited.insert(a));
        assert!(!visited.insert(b), "visited set should treat them as one state");
    }
}
