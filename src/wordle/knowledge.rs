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

use super::{data::Word, feedback::*, prelude::*};

///
/// Everything the observation history has told us about the hidden answer.
///
/// Four coordinated views over the same history:
///   * known_positions = squares pinned by a Correct mark
///   * excluded_positions = per square, a bitmask of letters which cannot sit there
///     (bit i is the i-th letter of the alphabet)
///   * min_counts / max_counts = per letter, inclusive bounds on how many times it occurs
///
/// A letter with max_counts == 0 is fully excluded from the answer.
///
/// A Knowledge value is never mutated once it's owned by a search node. Branching clones it
/// through extend(), so sibling branches can't see each other's observations.
///
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Knowledge {
    known_positions: [Option<u8>; WORD_SIZE],
    excluded_positions: [u32; WORD_SIZE],
    min_counts: [u8; ALPHABET_SIZE],
    max_counts: [u8; ALPHABET_SIZE],
}

impl Default for Knowledge {
    fn default() -> Self {
        Self::empty()
    }
}

impl Knowledge {
    /// A completely unconstrained Knowledge: every word is possible
    pub fn empty() -> Self {
        Self {
            known_positions: [None; WORD_SIZE],
            excluded_positions: [0; WORD_SIZE],
            min_counts: [0; ALPHABET_SIZE],
            max_counts: [WORD_SIZE as u8; ALPHABET_SIZE],
        }
    }

    ///
    /// Produces a new Knowledge which also accounts for one more (guess, feedback) observation.
    ///
    /// Count bookkeeping is where repeated letters get interesting. Within one guess, every
    /// Correct/Present mark for a letter is a confirmed instance of it, so the letter's
    /// min_count rises to that tally. An Absent mark for the same letter means "and no more
    /// than that": the tally also becomes the letter's max_count. When a letter earns no
    /// positive mark at all, the tally is zero and the letter drops out of the answer entirely.
    ///
    /// An Absent mark with positive marks elsewhere does NOT exclude the letter, only caps it.
    ///
    pub fn extend(&self, guess: Word, feedback: FeedbackPattern) -> Self {
        let mut next = self.clone();
        next.incorporate(guess, feedback);
        next
    }

    fn incorporate(&mut self, guess: Word, feedback: FeedbackPattern) {
        // Correct/Present marks per letter within this guess, and which letters saw an Absent
        let mut positives = [0u8; ALPHABET_SIZE];
        let mut saw_absent = [false; ALPHABET_SIZE];

        for i in 0..WORD_SIZE {
            let letter = guess.letter(i);
            let li = letter_idx(letter);
            match feedback[i] {
                Mark::Correct => {
                    self.known_positions[i] = Some(letter);
                    // a pinned square is never an exclusion for its own letter
                    self.excluded_positions[i] &= !(1u32 << li);
                    positives[li] += 1;
                }
                Mark::Present => {
                    self.excluded_positions[i] |= 1u32 << li;
                    positives[li] += 1;
                }
                Mark::Absent => {
                    self.excluded_positions[i] |= 1u32 << li;
                    saw_absent[li] = true;
                }
            }
        }

        for li in 0..ALPHABET_SIZE {
            if positives[li] > self.min_counts[li] {
                self.min_counts[li] = positives[li];
            }
            if saw_absent[li] && positives[li] < self.max_counts[li] {
                self.max_counts[li] = positives[li];
            }
        }
    }

    ///
    /// Checks whether a word satisfies every constraint accumulated so far: it matches each
    /// pinned square, avoids each square's excluded letters, and keeps each letter's occurrence
    /// count inside [min_count, max_count].
    ///
    /// The exclusion mask is skipped for pinned squares; the pinned letter already decided them.
    ///
    pub fn permits(&self, word: Word) -> bool {
        for i in 0..WORD_SIZE {
            if let Some(letter) = self.known_positions[i] {
                if word.letter(i) != letter {
                    return false;
                }
            } else if self.excluded_positions[i] & (1u32 << letter_idx(word.letter(i))) != 0 {
                return false;
            }
        }

        let counts = count_letters_bytes(word.as_bytes());
        for li in 0..ALPHABET_SIZE {
            if counts[li] < self.min_counts[li] || counts[li] > self.max_counts[li] {
                return false;
            }
        }

        true
    }

    /// The subset of candidates consistent with this knowledge, in their original order.
    /// The order is load-bearing: the search's branching cap truncates this list.
    pub fn filter(&self, candidates: &[Word]) -> Vec<Word> {
        candidates
            .iter()
            .copied()
            .filter(|word| self.permits(*word))
            .collect()
    }

    /// Whether this letter can no longer appear anywhere in the answer
    pub fn is_letter_excluded(&self, letter: u8) -> bool {
        self.max_counts[letter_idx(letter)] == 0
    }

    ///
    /// True when the constraints can no longer be satisfied by any word at all. Well-formed
    /// feedback never produces this, but the search guards on it defensively & treats such a
    /// branch as dead rather than failing the run.
    ///
    pub fn conflicted(&self) -> bool {
        for li in 0..ALPHABET_SIZE {
            if self.min_counts[li] > self.max_counts[li] {
                return true;
            }
        }

        for i in 0..WORD_SIZE {
            if let Some(letter) = self.known_positions[i] {
                if self.max_counts[letter_idx(letter)] == 0 {
                    return true;
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        s.parse().expect("test word should parse")
    }

    fn observe(knowledge: &Knowledge, guess: &str, secret: &str) -> Knowledge {
        knowledge.extend(w(guess), FeedbackPattern::evaluate(w(guess), w(secret)))
    }

    #[test]
    fn test_empty_permits_everything() {
        let knowledge = Knowledge::empty();
        for word in ["crane", "loyal", "geese", "qqqqq"] {
            assert!(knowledge.permits(w(word)));
        }
        assert!(!knowledge.conflicted());
    }

    #[test]
    fn test_correct_marks_pin_positions() {
        // crane vs crate: c/r/a/e correct, n absent
        let knowledge = observe(&Knowledge::empty(), "crane", "crate");
        assert!(knowledge.permits(w("crate")));
        assert!(!knowledge.permits(w("slate")), "wrong pinned squares");
        assert!(!knowledge.permits(w("crane")), "contains the excluded 'n'");
        assert!(knowledge.is_letter_excluded(b'n'));
    }

    #[test]
    fn test_absent_with_positive_marks_caps_instead_of_excluding() {
        // geese vs eagle -> [Present, Present, Absent, Absent, Correct]
        // 'e' earns two positive marks and one absent: exactly two e's in the answer
        let knowledge = observe(&Knowledge::empty(), "geese", "eagle");
        assert!(!knowledge.is_letter_excluded(b'e'), "'e' is capped, not excluded");
        assert!(knowledge.permits(w("eagle")));
        assert!(!knowledge.permits(w("geese")), "three e's exceed the cap");
        assert!(knowledge.is_letter_excluded(b's'));
    }

    #[test]
    fn test_present_excludes_its_own_position() {
        // tares vs scare: every letter misplaced except 't'
        let knowledge = observe(&Knowledge::empty(), "tares", "scare");
        assert!(knowledge.permits(w("scare")));
        assert!(!knowledge.permits(w("races")), "'a' cannot stay in square 1");
    }

    #[test]
    fn test_extend_does_not_mutate_the_parent() {
        let root = Knowledge::empty();
        let child = observe(&root, "crane", "crate");
        assert_ne!(root, child);
        assert!(root.permits(w("slate")), "root branch must stay unconstrained");
    }

    #[test]
    fn test_filter_preserves_candidate_order() {
        let words: Vec<Word> = ["slate", "crate", "trace", "grate"]
            .iter()
            .map(|s| w(s))
            .collect();
        let knowledge = observe(&Knowledge::empty(), "crane", "crate");
        let filtered = knowledge.filter(&words);
        assert_eq!(filtered, vec![w("crate")]);
    }

    #[test]
    fn test_monotone_shrinkage_over_history() {
        let words: Vec<Word> = [
            "crane", "trace", "slate", "stare", "share", "grate", "crate", "blimp",
        ]
        .iter()
        .map(|s| w(s))
        .collect();

        let secret = "crate";
        let mut knowledge = Knowledge::empty();
        let mut previous = knowledge.filter(&words);
        for guess in ["slate", "grate", "crate"] {
            knowledge = observe(&knowledge, guess, secret);
            let current = knowledge.filter(&words);
            assert!(
                current.iter().all(|word| previous.contains(word)),
                "candidates after observing {} must be a subset of the prior pool",
                guess
            );
            assert!(current.contains(&w(secret)), "the answer itself always survives");
            previous = current;
        }
        assert_eq!(previous, vec![w(secret)]);
    }

    #[test]
    fn test_counts_stay_within_bounds() {
        let mut knowledge = Knowledge::empty();
        for guess in ["geese", "eagle", "lapel", "ledge"] {
            knowledge = observe(&knowledge, guess, "eagle");
            assert!(!knowledge.conflicted());
        }
        assert!(knowledge.permits(w("eagle")));
    }
}
