//! Host-facing configuration.
//!
//! Plain serde structs with defaults on every field, so hosts can
//! deserialize a partial TOML/JSON blob and tweak only what they need.

use serde::{Deserialize, Serialize};

use crate::attach::AttachRules;
use crate::store::USER_SOURCE;

/// Unicode ranges treated as Han script by default: the unified ideographs
/// plus extensions A and B.
pub const DEFAULT_HAN_RANGES: &[(u32, u32)] = &[
    (0x4E00, 0x9FFF),
    (0x3400, 0x4DBF),
    (0x2_0000, 0x2_A6DF),
];

/// Phonetic systems for Han readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Romanization {
    /// Tone-marked Latin syllables (nǐ, hǎo).
    Pinyin,
    /// Bopomofo symbol clusters (ㄋㄧˇ, ㄏㄠˇ).
    Zhuyin,
}

/// Tunables for the Japanese furigana pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuriganaConfig {
    /// Joins alternative readings inside one bracket group.
    pub reading_separator: String,
    /// Most readings rendered per unit.
    pub maximum_results: usize,
    /// When readings collide by pronunciation, prefer the spelling that uses
    /// the prolonged sound mark.
    pub prefer_literal_pronunciation: bool,
    /// Words rendered without annotation.
    pub skip_words: Vec<String>,
    /// Words that skip the store and always go through the analyzer.
    pub analyzer_only: Vec<String>,
    /// Consult the accent store at all.
    pub database_lookups: bool,
    /// Attachment rule table.
    pub attach: AttachRules,
}

impl Default for FuriganaConfig {
    fn default() -> Self {
        Self {
            reading_separator: ", ".to_string(),
            maximum_results: 3,
            prefer_literal_pronunciation: false,
            skip_words: Vec::new(),
            analyzer_only: Vec::new(),
            database_lookups: true,
            attach: AttachRules::default(),
        }
    }
}

/// Tunables for accent lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Memoized results kept before least-recently-used eviction.
    pub cache_capacity: usize,
    /// Match store entries by kana reading, not just by headword.
    pub kana_lookups: bool,
    /// Expressions that always look up empty.
    pub blocklist: Vec<String>,
    /// Source tag whose entries win ties against all others.
    pub preferred_source: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1024,
            kana_lookups: true,
            blocklist: Vec::new(),
            preferred_source: USER_SOURCE.to_string(),
        }
    }
}

/// Tunables for the Han ruby pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HanConfig {
    /// Reading system the table and output use.
    pub romanization: Romanization,
    /// Codepoint ranges annotated as Han script.
    pub han_ranges: Vec<(u32, u32)>,
}

impl Default for HanConfig {
    fn default() -> Self {
        Self {
            romanization: Romanization::Pinyin,
            han_ranges: DEFAULT_HAN_RANGES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_are_usable_as_is() {
        let furigana = FuriganaConfig::default();
        assert_eq!(furigana.reading_separator, ", ");
        assert_eq!(furigana.maximum_results, 3);
        assert!(furigana.database_lookups);
        assert!(!furigana.attach.detach_words.is_empty());

        let lookup = LookupConfig::default();
        assert_eq!(lookup.cache_capacity, 1024);
        assert_eq!(lookup.preferred_source, "user");

        let han = HanConfig::default();
        assert_eq!(han.romanization, Romanization::Pinyin);
        assert!(han.han_ranges.contains(&(0x4E00, 0x9FFF)));
    }
}
