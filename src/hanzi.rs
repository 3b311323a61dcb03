//! Ruby annotation of Han text.
//!
//! Words are segmented only to resolve context-dependent readings; output is
//! always one `char[syllable]` group per Han character. Readings come from a
//! TSV table validated at load time, with single-character entries doubling
//! as the per-character fallback for words the table does not know whole.

use std::collections::HashMap;

use crate::config::{HanConfig, Romanization};
use crate::parse;
use crate::ruby::RubyNotation;
use crate::segment::{MaxMatchSegmenter, WordSegmenter};
use crate::store::StoreError;

const PINYIN_TONED: &str = "āáǎàēéěèīíǐìōóǒòūúǔùǖǘǚǜüê";
const ZHUYIN_TONES: &[char] = &['\u{02C9}', '\u{02CA}', '\u{02C7}', '\u{02CB}', '\u{02D9}'];

fn is_valid_syllable(syllable: &str, romanization: Romanization) -> bool {
    if syllable.is_empty() {
        return false;
    }
    match romanization {
        Romanization::Pinyin => syllable
            .chars()
            .all(|c| c.is_ascii_alphabetic() || PINYIN_TONED.contains(c)),
        Romanization::Zhuyin => syllable.chars().all(|c| {
            matches!(c, '\u{3105}'..='\u{312F}' | '\u{31A0}'..='\u{31BF}')
                || ZHUYIN_TONES.contains(&c)
        }),
    }
}

/// Word-to-syllables table, one syllable per character.
#[derive(Debug, Clone, Default)]
pub struct ReadingTable {
    readings: HashMap<String, Vec<String>>,
}

impl ReadingTable {
    /// Loads a TSV source (`word<TAB>syllable syllable …`). Blank lines and
    /// `#` comments are skipped. A row whose syllable count disagrees with
    /// its word's character count, or whose syllables do not fit
    /// `romanization`, rejects the whole load.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSource`] on the first malformed row.
    pub fn load(data: &str, romanization: Romanization) -> Result<Self, StoreError> {
        let mut readings = HashMap::new();
        for (index, line) in data.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let invalid = || StoreError::InvalidSource {
                line: index + 1,
                text: line.to_string(),
            };
            let ("", row) = parse::reading_row(line).map_err(|_| invalid())? else {
                return Err(invalid());
            };
            if row.word.chars().count() != row.syllables.len()
                || row
                    .syllables
                    .iter()
                    .any(|s| !is_valid_syllable(s, romanization))
            {
                return Err(invalid());
            }
            readings.insert(
                row.word.to_string(),
                row.syllables.iter().map(ToString::to_string).collect(),
            );
        }
        Ok(Self { readings })
    }

    /// The per-character syllables of `word`, if the table knows it whole.
    #[must_use]
    pub fn syllables(&self, word: &str) -> Option<&[String]> {
        self.readings.get(word).map(Vec::as_slice)
    }

    /// Every word in the table, for building a segmenter vocabulary.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.readings.keys().map(String::as_str)
    }

    /// Number of words in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Annotates Han text with one bracketed reading per character.
pub struct HanziAnnotator<S = MaxMatchSegmenter> {
    table: ReadingTable,
    segmenter: S,
    config: HanConfig,
    notation: RubyNotation,
}

impl HanziAnnotator {
    /// Builds an annotator whose segmenter is a longest-match pass over the
    /// table's own vocabulary.
    #[must_use]
    pub fn new(table: ReadingTable, config: HanConfig) -> Self {
        let segmenter = MaxMatchSegmenter::new(table.words().map(ToString::to_string));
        Self::with_segmenter(table, segmenter, config)
    }
}

impl<S: WordSegmenter> HanziAnnotator<S> {
    /// Builds an annotator over a caller-supplied segmenter.
    #[must_use]
    pub fn with_segmenter(table: ReadingTable, segmenter: S, config: HanConfig) -> Self {
        let notation = RubyNotation::new(&config.han_ranges);
        Self {
            table,
            segmenter,
            config,
            notation,
        }
    }

    fn is_han(&self, c: char) -> bool {
        let code = c as u32;
        self.config
            .han_ranges
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&code))
    }

    /// Annotates every Han character with a known reading; everything else
    /// passes through verbatim.
    #[must_use]
    pub fn annotate(&self, text: &str) -> String {
        let mut out = String::new();
        for word in self.segmenter.segment(text) {
            self.annotate_word(&mut out, word);
        }
        out
    }

    fn annotate_word(&self, out: &mut String, word: &str) {
        if !word.chars().all(|c| self.is_han(c)) {
            out.push_str(word);
            return;
        }
        match self.table.syllables(word) {
            Some(syllables) if syllables.len() == word.chars().count() => {
                for (c, syllable) in word.chars().zip(syllables) {
                    push_group(out, c, syllable);
                }
            }
            Some(syllables) => {
                log::warn!(
                    "reading count mismatch for {word:?}: {} syllables",
                    syllables.len(),
                );
                out.push_str(word);
            }
            // No whole-word entry: fall back to per-character readings.
            None => {
                for c in word.chars() {
                    match self.table.syllables(c.encode_utf8(&mut [0; 4])) {
                        Some([syllable]) => push_group(out, c, syllable),
                        _ => out.push(c),
                    }
                }
            }
        }
    }

    /// Whether `text` already carries ruby notation.
    #[must_use]
    pub fn has_ruby_notation(&self, text: &str) -> bool {
        self.notation.has_notation(text)
    }

    /// Strips ruby notation from `text`.
    #[must_use]
    pub fn remove_ruby_notation(&self, text: &str) -> String {
        self.notation.remove_notation(text)
    }

    /// Removes notation when present, adds it otherwise.
    #[must_use]
    pub fn toggle(&self, text: &str) -> String {
        if self.has_ruby_notation(text) {
            self.remove_ruby_notation(text)
        } else {
            self.annotate(text)
        }
    }
}

fn push_group(out: &mut String, c: char, syllable: &str) {
    out.push(c);
    out.push('[');
    out.push_str(syllable);
    out.push(']');
}
