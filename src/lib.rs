#![doc = include_str!("../README.md")]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]

pub mod attach;
pub mod cache;
pub mod config;
pub mod furigana;
pub mod hanzi;
pub mod kana;
pub mod lookup;
pub mod mingle;
pub mod morph;
mod parse;
pub mod pitch;
pub mod ruby;
pub mod segment;
pub mod store;
pub mod tokenize;

pub use config::{FuriganaConfig, HanConfig, LookupConfig, Romanization};
pub use furigana::{FuriganaGenerator, GenerateOptions};
pub use hanzi::{HanziAnnotator, ReadingTable};
pub use lookup::{AccentDict, AccentLookup, LookupArgs};
pub use morph::{AnalyzerError, MorphologicalAnalyzer, ParsedMorpheme};
pub use segment::{MaxMatchSegmenter, WordSegmenter};
pub use store::{AccentEntry, AccentStore, StoreError};

/// One configured annotation pipeline, selected once per request.
///
/// Pipeline differences ride on this enum; every operation dispatches by
/// `match`.
pub enum RubyProcessor<A, S = MaxMatchSegmenter> {
    /// Furigana and pitch accents over Japanese text.
    Japanese(FuriganaGenerator<A>),
    /// Per-character Pinyin or Zhuyin readings over Han text.
    Han(HanziAnnotator<S>),
}

impl<A: MorphologicalAnalyzer, S: WordSegmenter> RubyProcessor<A, S> {
    /// Annotates `text` with ruby notation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the Japanese pipeline's accent store is
    /// unreachable. The Han pipeline never errors.
    pub fn annotate(&self, text: &str) -> Result<String, StoreError> {
        match self {
            Self::Japanese(generator) => generator.generate(text),
            Self::Han(annotator) => Ok(annotator.annotate(text)),
        }
    }

    /// Strips ruby notation from `text`.
    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        match self {
            Self::Japanese(generator) => generator.remove_ruby_notation(text),
            Self::Han(annotator) => annotator.remove_ruby_notation(text),
        }
    }

    /// Whether `text` already carries ruby notation for this pipeline's
    /// script.
    #[must_use]
    pub fn has_notation(&self, text: &str) -> bool {
        match self {
            Self::Japanese(generator) => generator.has_ruby_notation(text),
            Self::Han(annotator) => annotator.has_ruby_notation(text),
        }
    }

    /// Strips notation when present, adds it otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the Japanese pipeline's accent store is
    /// unreachable.
    pub fn toggle(&self, text: &str) -> Result<String, StoreError> {
        match self {
            Self::Japanese(generator) => generator.toggle(text),
            Self::Han(annotator) => Ok(annotator.toggle(text)),
        }
    }
}
