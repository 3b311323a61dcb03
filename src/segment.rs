//! Word segmentation for Han text.
//!
//! Segmentation exists only to pick context-correct readings (了解 reads 了
//! as liǎo, 完了 as le); it never changes output granularity, which stays one
//! ruby group per character. The built-in segmenter does greedy longest match
//! over a known vocabulary; a jieba-backed one is available behind the
//! `jieba` feature.

use std::collections::HashSet;

/// Splits text into words, covering the input exactly.
pub trait WordSegmenter {
    /// Segments `text` into consecutive words. Concatenating the returned
    /// slices must reproduce `text`.
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Greedy longest-match segmenter over a fixed vocabulary.
///
/// At each position the longest vocabulary word anchored there wins;
/// characters starting no word become single-character segments. Deterministic
/// and dependency-free, which makes it the default.
#[derive(Debug, Clone)]
pub struct MaxMatchSegmenter {
    vocabulary: HashSet<String>,
    max_word_chars: usize,
}

impl MaxMatchSegmenter {
    /// Builds a segmenter from a word list.
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        let vocabulary: HashSet<String> = words.into_iter().collect();
        let max_word_chars = vocabulary
            .iter()
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(1);
        Self {
            vocabulary,
            max_word_chars,
        }
    }

    /// Whether `word` is in the vocabulary.
    #[must_use]
    pub fn knows(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }
}

impl WordSegmenter for MaxMatchSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            // Candidate word ends, one per character, shortest first.
            let ends: Vec<usize> = rest
                .char_indices()
                .map(|(i, c)| i + c.len_utf8())
                .take(self.max_word_chars)
                .collect();
            let end = ends
                .iter()
                .rev()
                .find(|&&end| self.vocabulary.contains(&rest[..end]))
                .copied()
                .unwrap_or(ends[0]);
            out.push(&rest[..end]);
            rest = &rest[end..];
        }
        out
    }
}

#[cfg(feature = "jieba")]
pub use self::jieba::JiebaSegmenter;

#[cfg(feature = "jieba")]
mod jieba {
    use jieba_rs::Jieba;

    use super::WordSegmenter;

    /// Segmenter backed by the jieba dictionary and HMM.
    pub struct JiebaSegmenter {
        jieba: Jieba,
        hmm: bool,
    }

    impl JiebaSegmenter {
        /// Builds a segmenter over jieba's bundled dictionary.
        #[must_use]
        pub fn new(hmm: bool) -> Self {
            Self {
                jieba: Jieba::new(),
                hmm,
            }
        }
    }

    impl WordSegmenter for JiebaSegmenter {
        fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
            self.jieba.cut(text, self.hmm)
        }
    }
}
