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

use crate::wordle::prelude::*;
use lazy_static::lazy_static;
use rust_embed::RustEmbed;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::{FromStr, Utf8Error};
use thiserror::Error;

// Stores "derived data" which is embedded into the binary at compile time
pub const EMBED_DATA_DIRECTORY: &str = "txt_data/";
pub const ALLOWED_WORDS_FILE_NAME: &str = "allowed_words.txt";

lazy_static! {
    pub static ref DATA: Dictionary =
        Dictionary::read().expect("should have no failures reading data...");
}

#[derive(RustEmbed)]
#[folder = "txt_data/"]
struct RawData;

///
/// A single puzzle word: exactly WORD_SIZE lowercase ascii letters, validated on construction.
///
/// Everything downstream of the ingestion boundary (knowledge, cache, search) can therefore
/// assume its bytes are well-formed and never re-validate.
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word([u8; WORD_SIZE]);

impl Word {
    /// The raw (lowercase ascii) bytes of this word
    pub fn as_bytes(&self) -> &[u8; WORD_SIZE] {
        &self.0
    }

    /// The letter at the given square, as a lowercase ascii byte
    pub fn letter(&self, idx: usize) -> u8 {
        self.0[idx]
    }

    /// How many distinct letters this word uses (a cheap "diversity" measure for opener ranking)
    pub fn distinct_letters(&self) -> usize {
        count_letters_bytes(&self.0).iter().filter(|c| **c > 0).count()
    }
}

/// The error produced when text fails validation at the ingestion boundary. Words which fail
/// this validation never reach the search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("the word '{0}' is not a valid wordle word")]
pub struct InvalidWord(pub String);

impl FromStr for Word {
    type Err = InvalidWord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_wordle_word(s);
        if !is_wordle_str(&normalized) {
            return Err(InvalidWord(normalized));
        }

        let mut out = [0u8; WORD_SIZE];
        out.copy_from_slice(normalized.as_bytes());
        Ok(Self(out))
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            fmt::Write::write_char(f, b as char)?;
        }

        Ok(())
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self)
    }
}

/// Words serialize as their plain 5 letter string, so cache artifacts & configs stay readable
impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WordVisitor;

        impl<'de> Visitor<'de> for WordVisitor {
            type Value = Word;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "a {} letter lowercase word", WORD_SIZE)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(|err: InvalidWord| E::custom(err))
            }
        }

        deserializer.deserialize_str(WordVisitor)
    }
}

#[derive(Error, Debug)]
pub enum LoadDataErr {
    #[error("missing allowed words file")]
    MissingWordsFile,
    #[error(transparent)]
    EncodingError(#[from] Utf8Error),
    #[error(transparent)]
    NonWordleWord(#[from] InvalidWord),
    #[error("the word list contains no words")]
    EmptyWordList,
}

///
/// The normalized, ordered word list the search runs against.
///
/// The order of `words` is the canonical order used everywhere: candidate filtering preserves
/// it, branching caps truncate it, and the sparse cache's persistence key fingerprints it.
/// Duplicate words keep their first occurrence.
///
#[derive(Clone, Debug)]
pub struct Dictionary {
    words: Vec<Word>,
    index: HashMap<Word, u32>,
}

impl Dictionary {
    /// Reads the embedded allowed words file. This is pretty simple: one allowed word per line.
    pub fn read() -> Result<Self, LoadDataErr> {
        let raw = retrieve_file_as_str(ALLOWED_WORDS_FILE_NAME)?
            .ok_or(LoadDataErr::MissingWordsFile)?;
        let out = Self::from_words(raw.lines())?;
        log::debug!("got {} allowed words from data file", out.len());
        Ok(out)
    }

    ///
    /// Builds a dictionary from any iterator of word-ish strings.
    ///
    /// Each entry is normalized and validated; anything that isn't a wordle word is an error
    /// rather than being skipped, because a caller-supplied list with a bad entry is almost
    /// certainly a caller bug (the embedded file is pre-filtered).
    ///
    pub fn from_words<I, S>(words: I) -> Result<Self, LoadDataErr>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self {
            words: Vec::new(),
            index: HashMap::new(),
        };

        for raw in words {
            let word: Word = raw.as_ref().parse()?;
            if !out.index.contains_key(&word) {
                out.index.insert(word, out.words.len() as u32);
                out.words.push(word);
            }
        }

        if out.words.is_empty() {
            return Err(LoadDataErr::EmptyWordList);
        }

        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words, in canonical order
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn contains(&self, word: Word) -> bool {
        self.index.contains_key(&word)
    }

    /// The canonical position of a word, if it's in the dictionary
    pub fn index_of(&self, word: Word) -> Option<u32> {
        self.index.get(&word).copied()
    }

    pub fn get(&self, idx: u32) -> Option<Word> {
        self.words.get(idx as usize).copied()
    }

    ///
    /// A hex digest identifying the exact content & order of this dictionary.
    ///
    /// Cache artifacts are keyed by this value, so a reordered or edited word list can never be
    /// served a stale precomputed graph.
    ///
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for word in &self.words {
            hasher.update(word.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

fn retrieve_file_as_str(name: &str) -> Result<Option<String>, LoadDataErr> {
    let f: rust_embed::EmbeddedFile = if let Some(data) = RawData::get(name) {
        data
    } else {
        if let Ok(mut f) = std::fs::File::open(format!("{}{}", EMBED_DATA_DIRECTORY, name)) {
            let mut out = String::default();
            if std::io::Read::read_to_string(&mut f, &mut out).is_ok() {
                return Ok(Some(out));
            }
        }

        return Ok(None);
    };

    Ok(Some(
        std::str::from_utf8(&f.data)
            .map_err(LoadDataErr::EncodingError)?
            .to_string(),
    ))
}
