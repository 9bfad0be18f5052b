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

use std::fmt::{Debug, Display, Formatter};
#[cfg(test)]
use std::iter::FusedIterator;
use std::ops::{Index, IndexMut};
use self::Mark::*;
use super::data::Word;
use super::prelude::*;

///
/// Any feedback pattern can be converted to a "code" which uniquely identifies that specific
/// pattern. This type is the number we use to store that code (and we pick u8 because the range is
/// 0 -> 3^5=243 for 3 marks in a 5 letter puzzle).
///
pub type FeedbackCode = u8;

///
/// The three different marks that a wordle square can show...
///   * Absent = the letter is not in the answer (also indicates no further instances of a letter
///              when another square with the same letter is marked present/correct)
///   * Present = the letter is in the answer, but not in this position
///   * Correct = the letter is in the answer at this position
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Absent,
    Present,
    Correct,
}

impl Mark {
    /// All three marks (make sure this actually matches the definition above)
    pub const ALL: [Mark; 3] = [Absent, Present, Correct];
    /// The number of possible marks
    pub const NUM: usize = Self::ALL.len();

    /// Converts the mark to a number (0, 1, or 2)
    pub fn ordinal(&self) -> FeedbackCode {
        match self {
            Absent => 0,
            Present => 1,
            Correct => 2,
        }
    }

    /// Converts a number (usually from .ordinal()) back to a Mark
    pub fn from_ordinal(code: FeedbackCode) -> Option<Self> {
        Some(match code {
            0 => Absent,
            1 => Present,
            2 => Correct,
            _ => return None,
        })
    }

    /// Gives the best emoji to represent the mark (used for debug printing & reports)
    pub fn glyph(&self) -> &'static str {
        match self {
            Absent => "⬛",
            Present => "🟨",
            Correct => "🟩",
        }
    }
}

/// An array of Marks, one for each square in the puzzle.
pub type MarksArray = [Mark; WORD_SIZE];

/// The array of Marks, but in a struct, so that we can attach some useful functions to a
/// complete feedback pattern.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FeedbackPattern(pub MarksArray);

/// Automatic conversion of [Mark; WORD_SIZE] -> FeedbackPattern
impl From<MarksArray> for FeedbackPattern {
    fn from(arr: MarksArray) -> Self {
        Self(arr)
    }
}

/// Delegate indexing of the struct to it's inner value
impl Index<usize> for FeedbackPattern {
    type Output = Mark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Delegate mutable indexing of the struct to it's inner value
impl IndexMut<usize> for FeedbackPattern {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl FeedbackPattern {
    /// How many different possible patterns are there? In the case of a 5 letter puzzle with 3
    /// marks it's 3^5=243 possible patterns
    pub const NUM_STATES: usize = Mark::NUM.pow(WORD_SIZE as u32);

    ///
    /// Compute what marks would be shown given some guess & secret. For example if the guess was
    /// "tares" and the secret was "scare" we should compute [Absent, Present, Present, Present, Present]
    ///
    /// This is implemented by:
    /// * creating an empty [Mark; WORD_SIZE] where all marks are defaulted to Absent
    /// * computing a "budget" for each letter in the alphabet (based on their frequency in the secret)
    /// * performing a CORRECT pass which marks all correctly positioned letters (and updates the budget)
    /// * performing a PRESENT pass, in guess order, marking misplaced letters while budget remains
    ///
    /// The budget accounting is what makes repeated letters come out right: a letter only earns
    /// Present while the secret still has unconsumed instances of it, so evaluate(w, w) is always
    /// all-Correct and the function is not symmetric in general.
    ///
    pub fn evaluate(guess: Word, secret: Word) -> Self {
        let mut out = Self::default();
        let mut remaining = count_letters_bytes(secret.as_bytes());
        let guess_bytes = guess.as_bytes();
        let secret_bytes = secret.as_bytes();

        // CORRECT pass
        for i in 0..WORD_SIZE {
            let gc = guess_bytes[i];

            if gc == secret_bytes[i] {
                remaining[letter_idx(gc)] -= 1;
                out[i] = Correct;
            }
        }

        // PRESENT pass
        for i in 0..WORD_SIZE {
            if out[i] != Correct {
                let counter = &mut remaining[letter_idx(guess_bytes[i])];
                if *counter > 0 {
                    *counter -= 1;
                    out[i] = Present;
                }
            }
        }

        out
    }

    /// Whether or not this pattern indicates a winning guess (every square Correct)
    pub fn is_all_correct(&self) -> bool {
        self.0.iter().all(|m| m == &Correct)
    }

    ///
    /// Computes a code that uniquely identifies this particular pattern. These codes are numbers in
    /// [0, 243) (in the case of a 5 letter puzzle).
    ///
    /// We essentially treat the pattern as a 5 digit base-3 number. Each Mark has an ordinal()
    /// which ranges from [0, 3), and the left-most square is digit 0, next digit 1, etc.
    ///
    /// This is useful because the search wants one bucket for each possible pattern, and using
    /// this to_code() we can convert a pattern to an array index. The alternative (using a
    /// HashMap<FeedbackPattern, _>) requires calculating a Hash, allocating on the heap, etc.
    /// We avoid this and stay on the stack using static sized arrays indexed by to_code().
    ///
    pub fn to_code(&self) -> FeedbackCode {
        let mut out = 0;
        let mut multiplier = 1;
        for i in 0..WORD_SIZE {
            out += self[i].ordinal() * multiplier;
            multiplier *= Mark::NUM as u8;
        }
        out
    }

    ///
    /// Converts a FeedbackCode back to a pattern.
    ///
    /// This works by treating the code as a base-3 number, and the code is basically identical to
    /// any digit-by-digit processing you've written before.
    ///
    pub fn from_code(mut code: FeedbackCode) -> Option<Self> {
        let mut out = Self::default();
        for i in 0..WORD_SIZE {
            out[i] = Mark::from_ordinal(code % (Mark::NUM as u8))?;
            code /= Mark::NUM as u8;
        }

        Some(out)
    }

    /// The code of the winning (all-Correct) pattern.
    pub fn all_correct_code() -> FeedbackCode {
        Self([Correct; WORD_SIZE]).to_code()
    }

    #[cfg(test)]
    /// Iterates through all possible [Mark; 5] configurations
    pub(crate) fn iter_all_possible() -> IterAllPatterns {
        IterAllPatterns::default()
    }
}

impl Default for FeedbackPattern {
    fn default() -> Self {
        Self([Absent; WORD_SIZE])
    }
}

impl Display for FeedbackPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..WORD_SIZE {
            f.write_str(self[i].glyph())?;
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) struct IterAllPatterns {
    next: Option<FeedbackPattern>,
}

#[cfg(test)]
impl Default for IterAllPatterns {
    fn default() -> Self {
        Self { next: Some(FeedbackPattern::default()) }
    }
}

#[cfg(test)]
impl Iterator for IterAllPatterns {
    type Item = FeedbackPattern;

    fn next(&mut self) -> Option<Self::Item> {
        return if let Some(cur) = self.next {
            let mut next = cur;
            // basically... try to flip the right-most mark through these three values:
            //  absent -> present -> correct
            // but if the right-most mark is already "correct" then we reset it back to "absent"
            // and try to perform the same operation on the next mark (to the left).
            //
            // This results in a pattern like:
            // [Absent, Absent, Absent, Absent, Absent]
            // [Absent, Absent, Absent, Absent, Present]
            // [Absent, Absent, Absent, Absent, Correct]
            // [Absent, Absent, Absent, Present, Absent]
            // ...
            //
            // which will eventually exhaust all possible patterns
            for k in (0..WORD_SIZE).rev() {
                match next[k] {
                    Absent => {
                        next[k] = Present;
                        self.next = Some(next);
                        break;
                    }
                    Present => {
                        next[k] = Correct;
                        self.next = Some(next);
                        break;
                    }
                    Correct => {
                        if k == 0 {
                            self.next = None;
                            // implicitly this is break; because 0 is the end
                        } else {
                            next[k] = Present;
                        }
                    }
                }
            }

            Some(cur)
        } else {
            None
        };
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (FeedbackPattern::NUM_STATES, Some(FeedbackPattern::NUM_STATES))
    }
}

#[cfg(test)]
impl ExactSizeIterator for IterAllPatterns {}

#[cfg(test)]
impl FusedIterator for IterAllPatterns {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn w(s: &str) -> Word {
        s.parse().expect("test word should parse")
    }

    #[test]
    fn test_mark_ordinal_reversible() {
        for m in Mark::ALL {
            assert_eq!(Some(m), Mark::from_ordinal(m.ordinal()))
        }
    }

    #[test]
    fn test_patterns_fit_into_code_type() {
        let num_states = FeedbackPattern::NUM_STATES;
        let max_code_rep = FeedbackCode::MAX as usize;
        assert!(
            num_states < max_code_rep,
            "{} states need to be represented by {} ({}..{})",
            num_states,
            std::any::type_name::<FeedbackCode>(),
            FeedbackCode::MIN,
            max_code_rep,
        );
    }

    #[test]
    fn test_unique_coding_of_patterns() {
        let mut seen = [false; FeedbackCode::MAX as usize];
        for pattern in FeedbackPattern::iter_all_possible() {
            let code = pattern.to_code();
            assert!(!seen[code as usize], "expected no duplicate codes, got duplicate {}", code);
            seen[code as usize] = true;
        }
    }

    #[test]
    fn test_reversible_coding_of_patterns() {
        for pattern in FeedbackPattern::iter_all_possible() {
            let code = pattern.to_code();
            assert_eq!(
                Some(pattern),
                FeedbackPattern::from_code(code),
                "code {} produced from {:?} should reverse to same pattern",
                code,
                pattern,
            )
        }
    }

    #[test_case("zitis", "zizel", [Correct, Correct, Absent, Absent, Absent])]
    #[test_case("tares", "scare", [Absent, Present, Present, Present, Present])]
    #[test_case("spare", "scare", [Correct, Absent, Correct, Correct, Correct])]
    #[test_case("share", "scare", [Correct, Absent, Correct, Correct, Correct])]
    #[test_case("scare", "scare", [Correct, Correct, Correct, Correct, Correct])]
    #[test_case("tales", "apron", [Absent, Present, Absent, Absent, Absent])]
    #[test_case("drain", "apron", [Absent, Present, Present, Absent, Correct])]
    #[test_case("roman", "apron", [Present, Present, Absent, Present, Correct])]
    #[test_case("geese", "eagle", [Present, Present, Absent, Absent, Correct])]
    #[test_case("alloy", "loyal", [Present, Present, Present, Present, Present])]
    #[test_case("loyal", "alloy", [Present, Present, Present, Present, Present])]
    fn test_evaluate(guess: &str, secret: &str, expected_marks: MarksArray) {
        assert_eq!(
            FeedbackPattern::evaluate(w(guess), w(secret)),
            FeedbackPattern(expected_marks),
            "guess={}, secret={}",
            guess,
            secret
        );
    }

    #[test]
    fn test_evaluate_self_is_all_correct() {
        for word in ["crane", "loyal", "geese", "zitis", "abide"] {
            let pattern = FeedbackPattern::evaluate(w(word), w(word));
            assert!(pattern.is_all_correct(), "evaluate({0}, {0}) = {1}", word, pattern);
        }

        // and across the whole embedded word list, not just hand-picked samples
        for word in crate::wordle::data::DATA.words() {
            assert!(FeedbackPattern::evaluate(*word, *word).is_all_correct());
        }
    }

    #[test]
    fn test_evaluate_not_symmetric_with_duplicates() {
        // "speed" has a repeated 'e' and "abide" only one, so the two directions disagree
        let forward = FeedbackPattern::evaluate(w("speed"), w("abide"));
        let backward = FeedbackPattern::evaluate(w("abide"), w("speed"));
        assert_eq!(forward, FeedbackPattern([Absent, Absent, Present, Absent, Present]));
        assert_eq!(backward, FeedbackPattern([Absent, Absent, Absent, Present, Present]));
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_all_correct_code_round_trip() {
        let code = FeedbackPattern::all_correct_code();
        let pattern = FeedbackPattern::from_code(code).expect("winning code should decode");
        assert!(pattern.is_all_correct());
    }
}
