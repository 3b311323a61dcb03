//! The morphological-analyzer boundary.
//!
//! The pipeline never talks to a concrete tokenizer directly; it goes through
//! [`MorphologicalAnalyzer`], which yields ordered [`ParsedMorpheme`]s covering
//! the input. Any closure with the right signature implements the trait, which
//! keeps test doubles and host-provided analyzers cheap.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse part-of-speech categories, following the ipadic 品詞 vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    /// 名詞
    Noun,
    /// 動詞
    Verb,
    /// 形容詞
    IAdjective,
    /// 副詞
    Adverb,
    /// 助詞
    Particle,
    /// 助動詞
    BoundAuxiliary,
    /// 接続詞
    Conjunction,
    /// 感動詞
    Interjection,
    /// 接頭詞
    Prefix,
    /// 連体詞
    Adnominal,
    /// 記号
    Symbol,
    /// フィラー
    Filler,
    /// その他
    Other,
    /// Anything the analyzer could not classify.
    Unknown,
}

impl PartOfSpeech {
    /// Maps an analyzer label to a category, `Unknown` for unrecognized labels.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "名詞" => Self::Noun,
            "動詞" => Self::Verb,
            "形容詞" => Self::IAdjective,
            "副詞" => Self::Adverb,
            "助詞" => Self::Particle,
            "助動詞" => Self::BoundAuxiliary,
            "接続詞" => Self::Conjunction,
            "感動詞" => Self::Interjection,
            "接頭詞" => Self::Prefix,
            "連体詞" => Self::Adnominal,
            "記号" => Self::Symbol,
            "フィラー" => Self::Filler,
            "その他" => Self::Other,
            _ => Self::Unknown,
        }
    }
}

/// Conjugation forms, following the ipadic 活用形 vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inflection {
    /// 基本形
    DictionaryForm,
    /// 連用形
    Continuative,
    /// 連用タ接続
    ContinuativeTaAttachment,
    /// 連用テ接続
    ContinuativeTeAttachment,
    /// 連用デ接続
    ContinuativeDeAttachment,
    /// 連用ニ接続
    ContinuativeNiAttachment,
    /// 連用ゴザイ接続
    ContinuativeGozaiAttachment,
    /// 未然形
    Irrealis,
    /// 未然ウ接続
    IrrealisUAttachment,
    /// 未然ヌ接続
    IrrealisNuAttachment,
    /// 未然レル接続
    IrrealisReruAttachment,
    /// 未然特殊
    IrrealisSpecial,
    /// 仮定形
    Hypothetical,
    /// 仮定縮約１/仮定縮約２
    HypotheticalContraction,
    /// 命令ｅ/ｉ/ｒｏ/ｙｏ
    Imperative,
    /// 体言接続 and its 特殊 variants
    NounAttachment,
    /// ガル接続
    GaruAttachment,
    /// 音便基本形
    EuphonicBase,
    /// 文語基本形
    ClassicalBase,
    /// `*` or any unrecognized label.
    Unknown,
}

impl Inflection {
    /// Maps an analyzer label to a form, `Unknown` for `*` and stray labels.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "基本形" => Self::DictionaryForm,
            "連用形" => Self::Continuative,
            "連用タ接続" => Self::ContinuativeTaAttachment,
            "連用テ接続" => Self::ContinuativeTeAttachment,
            "連用デ接続" => Self::ContinuativeDeAttachment,
            "連用ニ接続" => Self::ContinuativeNiAttachment,
            "連用ゴザイ接続" => Self::ContinuativeGozaiAttachment,
            "未然形" => Self::Irrealis,
            "未然ウ接続" => Self::IrrealisUAttachment,
            "未然ヌ接続" => Self::IrrealisNuAttachment,
            "未然レル接続" => Self::IrrealisReruAttachment,
            "未然特殊" => Self::IrrealisSpecial,
            "仮定形" => Self::Hypothetical,
            "音便基本形" => Self::EuphonicBase,
            "文語基本形" => Self::ClassicalBase,
            _ if label.starts_with("仮定縮約") => Self::HypotheticalContraction,
            _ if label.starts_with("命令") => Self::Imperative,
            _ if label.starts_with("体言接続") => Self::NounAttachment,
            _ if label.starts_with("ガル接続") => Self::GaruAttachment,
            _ => Self::Unknown,
        }
    }

    /// The "any-attaching" wildcard family: every form whose ipadic label
    /// carries the 接続 marker.
    #[must_use]
    pub fn is_attachment_form(self) -> bool {
        matches!(
            self,
            Self::ContinuativeTaAttachment
                | Self::ContinuativeTeAttachment
                | Self::ContinuativeDeAttachment
                | Self::ContinuativeNiAttachment
                | Self::ContinuativeGozaiAttachment
                | Self::IrrealisUAttachment
                | Self::IrrealisNuAttachment
                | Self::IrrealisReruAttachment
                | Self::NounAttachment
                | Self::GaruAttachment
        )
    }
}

/// One analyzed morpheme, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMorpheme {
    /// The dictionary (base) form.
    pub headword: String,
    /// The surface form as written.
    pub word: String,
    /// The katakana reading, absent for out-of-vocabulary stretches.
    pub katakana_reading: Option<String>,
    /// Coarse part of speech.
    pub part_of_speech: PartOfSpeech,
    /// Conjugation form of the surface.
    pub inflection: Inflection,
}

/// Failure to run the analyzer over a stretch of text.
///
/// Callers treat this as "no morphemes found": it is logged and the affected
/// token passes through unannotated.
#[derive(Debug, Clone, Error)]
#[error("analyzer failed on {text:?}: {reason}")]
pub struct AnalyzerError {
    /// The text that was being analyzed.
    pub text: String,
    /// Backend-specific failure description.
    pub reason: String,
}

/// Produces ordered morphemes covering the input text.
pub trait MorphologicalAnalyzer {
    /// Analyzes `text` into ordered morphemes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError`] when the backing analyzer fails entirely;
    /// partial coverage is expressed with `katakana_reading: None` morphemes
    /// instead.
    fn analyze(&self, text: &str) -> Result<Vec<ParsedMorpheme>, AnalyzerError>;
}

impl<T> MorphologicalAnalyzer for T
where
    T: Fn(&str) -> Result<Vec<ParsedMorpheme>, AnalyzerError>,
{
    fn analyze(&self, text: &str) -> Result<Vec<ParsedMorpheme>, AnalyzerError> {
        self(text)
    }
}

#[cfg(feature = "lindera")]
pub use self::lindera::LinderaAnalyzer;

#[cfg(feature = "lindera")]
mod lindera {
    use lindera_core::mode::Mode;
    use lindera_dictionary::{load_dictionary_from_config, DictionaryConfig, DictionaryKind};
    use lindera_tokenizer::tokenizer::Tokenizer;

    use super::{
        AnalyzerError, Inflection, MorphologicalAnalyzer, ParsedMorpheme, PartOfSpeech,
    };

    /// Analyzer backed by lindera's bundled ipadic dictionary.
    pub struct LinderaAnalyzer {
        tokenizer: Tokenizer,
    }

    impl LinderaAnalyzer {
        /// Loads the ipadic dictionary and builds a tokenizer in normal mode.
        ///
        /// # Errors
        ///
        /// Returns [`AnalyzerError`] if the dictionary cannot be loaded.
        pub fn new() -> Result<Self, AnalyzerError> {
            let dictionary = load_dictionary_from_config(DictionaryConfig {
                kind: Some(DictionaryKind::IPADIC),
                path: None,
            })
            .map_err(|e| AnalyzerError {
                text: String::new(),
                reason: format!("ipadic dictionary load failed: {e}"),
            })?;
            Ok(Self {
                tokenizer: Tokenizer::new(dictionary, None, Mode::Normal),
            })
        }
    }

    impl MorphologicalAnalyzer for LinderaAnalyzer {
        fn analyze(&self, text: &str) -> Result<Vec<ParsedMorpheme>, AnalyzerError> {
            let mut tokens = self.tokenizer.tokenize(text).map_err(|e| AnalyzerError {
                text: text.to_string(),
                reason: e.to_string(),
            })?;
            let mut morphemes = Vec::with_capacity(tokens.len());
            for token in &mut tokens {
                let word = token.text.to_string();
                // ipadic detail rows: 品詞, 細分類×3, 活用型, 活用形, 原形,
                // 読み, 発音. Out-of-vocabulary tokens carry no details.
                let morpheme = match token.get_details().as_deref() {
                    Some([pos, _, _, _, _, form, base, reading, _pron]) => ParsedMorpheme {
                        headword: if *base == "*" {
                            word.clone()
                        } else {
                            (*base).to_string()
                        },
                        katakana_reading: (*reading != "*").then(|| (*reading).to_string()),
                        part_of_speech: PartOfSpeech::from_label(pos),
                        inflection: Inflection::from_label(form),
                        word,
                    },
                    _ => ParsedMorpheme {
                        headword: word.clone(),
                        katakana_reading: None,
                        part_of_speech: PartOfSpeech::Unknown,
                        inflection: Inflection::Unknown,
                        word,
                    },
                };
                morphemes.push(morpheme);
            }
            Ok(morphemes)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn part_of_speech_labels() {
        let tests = [
            ("名詞", PartOfSpeech::Noun),
            ("動詞", PartOfSpeech::Verb),
            ("助動詞", PartOfSpeech::BoundAuxiliary),
            ("フィラー", PartOfSpeech::Filler),
            ("*", PartOfSpeech::Unknown),
            ("", PartOfSpeech::Unknown),
        ];
        for (label, expected) in tests {
            assert_eq!(PartOfSpeech::from_label(label), expected);
        }
    }

    #[test]
    fn inflection_labels() {
        let tests = [
            ("基本形", Inflection::DictionaryForm),
            ("連用形", Inflection::Continuative),
            ("連用タ接続", Inflection::ContinuativeTaAttachment),
            ("未然ウ接続", Inflection::IrrealisUAttachment),
            ("仮定縮約１", Inflection::HypotheticalContraction),
            ("命令ｒｏ", Inflection::Imperative),
            ("体言接続特殊２", Inflection::NounAttachment),
            ("*", Inflection::Unknown),
        ];
        for (label, expected) in tests {
            assert_eq!(Inflection::from_label(label), expected);
        }
    }

    #[test]
    fn attachment_forms() {
        assert!(Inflection::ContinuativeTaAttachment.is_attachment_form());
        assert!(Inflection::GaruAttachment.is_attachment_form());
        assert!(!Inflection::Continuative.is_attachment_form());
        assert!(!Inflection::DictionaryForm.is_attachment_form());
        assert!(!Inflection::Unknown.is_attachment_form());
    }

    #[test]
    fn closures_are_analyzers() {
        let analyzer = |text: &str| {
            Ok(vec![ParsedMorpheme {
                headword: text.to_string(),
                word: text.to_string(),
                katakana_reading: None,
                part_of_speech: PartOfSpeech::Unknown,
                inflection: Inflection::Unknown,
            }])
        };
        let morphemes = analyzer.analyze("楽しい").unwrap();
        assert_eq!(morphemes.len(), 1);
        assert_eq!(morphemes[0].word, "楽しい");
    }
}
