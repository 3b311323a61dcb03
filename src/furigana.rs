//! Furigana and pitch-accent annotation of Japanese text.
//!
//! The generator drives the whole Japanese pipeline: tokenize, look up whole
//! tokens in the accent store, split the rest into morphemes, reattach
//! inflectional kana, and render `surface[reading]` groups. Opaque tokens and
//! everything that cannot be annotated pass through verbatim, so partial
//! output is always preserved.

use std::collections::HashSet;

use crate::attach::{AnnotatedToken, Unit, UnitList};
use crate::config::FuriganaConfig;
use crate::kana;
use crate::lookup::{AccentLookup, LookupArgs};
use crate::mingle;
use crate::morph::{Inflection, MorphologicalAnalyzer, ParsedMorpheme, PartOfSpeech};
use crate::pitch::PitchAccentEntry;
use crate::ruby::RubyNotation;
use crate::store::{AccentEntry, StoreError};
use crate::tokenize::{self, Token};

/// Output options for one generation request.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Split unknown tokens into morphemes before annotating.
    pub split_morphemes: bool,
    /// Emit readings in place of the surface instead of ruby brackets.
    pub full_kana: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            split_morphemes: true,
            full_kana: false,
        }
    }
}

/// Whole-token lookups never recurse or analyze; those steps belong to the
/// generator itself.
const PROBE: LookupArgs = LookupArgs {
    sanitize: false,
    recurse: false,
    use_analyzer: false,
    group_by_headword: false,
};

/// Generates furigana ruby notation for Japanese text.
pub struct FuriganaGenerator<A> {
    lookup: AccentLookup<A>,
    config: FuriganaConfig,
    notation: RubyNotation,
}

impl<A: MorphologicalAnalyzer> FuriganaGenerator<A> {
    /// Builds a generator over an accent lookup.
    #[must_use]
    pub fn new(lookup: AccentLookup<A>, config: FuriganaConfig) -> Self {
        Self {
            lookup,
            config,
            notation: RubyNotation::japanese(),
        }
    }

    /// The lookup driving this generator, for direct pitch summaries.
    pub fn lookup(&self) -> &AccentLookup<A> {
        &self.lookup
    }

    /// Annotates `text` with default [`GenerateOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the accent store is unreachable.
    pub fn generate(&self, text: &str) -> Result<String, StoreError> {
        self.generate_with(text, GenerateOptions::default())
    }

    /// Annotates `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the accent store is unreachable.
    pub fn generate_with(
        &self,
        text: &str,
        options: GenerateOptions,
    ) -> Result<String, StoreError> {
        let mut out = String::new();
        for token in tokenize::tokenize(text) {
            match token {
                Token::Opaque(span) => out.push_str(&span),
                Token::Parseable(span) => {
                    for unit in self.token_units(&span, options.split_morphemes)? {
                        self.render_unit(&mut out, &unit, options);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Whether `text` already carries furigana notation.
    #[must_use]
    pub fn has_ruby_notation(&self, text: &str) -> bool {
        self.notation.has_notation(text)
    }

    /// Strips furigana notation from `text`.
    #[must_use]
    pub fn remove_ruby_notation(&self, text: &str) -> String {
        self.notation.remove_notation(text)
    }

    /// Removes notation when present, generates it otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the accent store is unreachable.
    pub fn toggle(&self, text: &str) -> Result<String, StoreError> {
        if self.has_ruby_notation(text) {
            Ok(self.remove_ruby_notation(text))
        } else {
            self.generate(text)
        }
    }

    fn token_units(&self, text: &str, split_morphemes: bool) -> Result<Vec<Unit>, StoreError> {
        if self.config.skip_words.iter().any(|w| w == text) {
            return Ok(vec![Unit::Text(text.to_string())]);
        }

        let analyzer_only = self.config.analyzer_only.iter().any(|w| w == text);
        if self.config.database_lookups && !analyzer_only {
            let dict = self.lookup.pronunciations_with(text, PROBE)?;
            if !dict.is_empty() {
                let units = dict
                    .into_iter()
                    .map(|(expression, entries)| {
                        Unit::Annotated(AnnotatedToken {
                            headword: expression.clone(),
                            word: expression,
                            katakana_reading: None,
                            part_of_speech: PartOfSpeech::Unknown,
                            inflection: Inflection::Unknown,
                            headword_accents: unique_accents(&entries),
                            attached: Vec::new(),
                        })
                    })
                    .collect();
                return Ok(units);
            }
        }

        if split_morphemes {
            self.morpheme_units(text)
        } else {
            self.whole_token_unit(text)
        }
    }

    /// Analyzer path: one unit per morpheme, with inflectional kana attached
    /// back onto the unit it belongs to.
    fn morpheme_units(&self, text: &str) -> Result<Vec<Unit>, StoreError> {
        let Some(morphemes) = self.analyze(text) else {
            return Ok(vec![Unit::Text(text.to_string())]);
        };
        if morphemes.is_empty() {
            return Ok(vec![Unit::Text(text.to_string())]);
        }
        let mut units = UnitList::new(&self.config.attach);
        for morpheme in morphemes {
            if morpheme.word.is_empty() {
                continue;
            }
            let accents = self.headword_accents(&morpheme)?;
            units.push_annotated(AnnotatedToken::new(morpheme, accents));
        }
        Ok(units.into_units())
    }

    /// Unsplit path: annotate the token only if the analyzer sees it as a
    /// single morpheme.
    fn whole_token_unit(&self, text: &str) -> Result<Vec<Unit>, StoreError> {
        let Some(mut morphemes) = self.analyze(text) else {
            return Ok(vec![Unit::Text(text.to_string())]);
        };
        if morphemes.len() != 1 {
            return Ok(vec![Unit::Text(text.to_string())]);
        }
        match morphemes.pop() {
            Some(morpheme) => {
                let accents = self.headword_accents(&morpheme)?;
                Ok(vec![Unit::Annotated(AnnotatedToken::new(
                    morpheme, accents,
                ))])
            }
            None => Ok(vec![Unit::Text(text.to_string())]),
        }
    }

    fn analyze(&self, text: &str) -> Option<Vec<ParsedMorpheme>> {
        match self.lookup.analyzer().analyze(text) {
            Ok(morphemes) => Some(morphemes),
            Err(err) => {
                log::warn!("leaving {text:?} unannotated: {err}");
                None
            }
        }
    }

    /// Accent candidates for one morpheme: a headword lookup, then a reading
    /// lookup when the headword is unknown and kana lookups are enabled.
    fn headword_accents(
        &self,
        morpheme: &ParsedMorpheme,
    ) -> Result<Vec<PitchAccentEntry>, StoreError> {
        if !self.config.database_lookups {
            return Ok(Vec::new());
        }
        let dict = self.lookup.pronunciations_with(&morpheme.headword, PROBE)?;
        if let Some(entries) = dict.get(&morpheme.headword) {
            return Ok(unique_accents(entries));
        }
        if self.lookup.config().kana_lookups {
            if let Some(reading) = &morpheme.katakana_reading {
                if kana::to_katakana(reading) != kana::to_katakana(&morpheme.headword) {
                    let dict = self.lookup.pronunciations_with(reading, PROBE)?;
                    if let Some(entries) = dict.get(reading) {
                        return Ok(unique_accents(entries));
                    }
                }
            }
        }
        Ok(Vec::new())
    }

    fn render_unit(&self, out: &mut String, unit: &Unit, options: GenerateOptions) {
        match unit {
            Unit::Text(text) => out.push_str(text),
            Unit::Annotated(token) => {
                let surface = token.surface();
                let readings = self.unit_readings(token);
                if readings.is_empty() || kana::is_kana_str(&surface) {
                    out.push_str(&surface);
                } else if options.full_kana {
                    out.push_str(&readings[0]);
                    if readings.len() > 1 {
                        out.push('(');
                        out.push_str(&readings[1..].join(&self.config.reading_separator));
                        out.push(')');
                    }
                } else {
                    out.push_str(&surface);
                    out.push('[');
                    out.push_str(&readings.join(&self.config.reading_separator));
                    out.push(']');
                }
            }
        }
    }

    /// Distinct hiragana readings covering the unit's whole surface: the
    /// dictionary reading adjusted to the inflected form, with attached
    /// fragments appended.
    fn unit_readings(&self, token: &AnnotatedToken) -> Vec<String> {
        let attached = token.attached.concat();
        let mut candidates: Vec<String> = Vec::new();
        for accent in &token.headword_accents {
            let reading = kana::to_hiragana(&accent.katakana_reading);
            let reading = if kana::is_inflected(&token.word, &reading) {
                kana::adjust_to_inflection(&token.word, &token.headword, &reading)
            } else {
                reading
            };
            candidates.push(reading + &attached);
        }
        if candidates.is_empty() {
            if let Some(reading) = &token.katakana_reading {
                let reading = kana::to_hiragana(reading);
                if reading != token.word {
                    candidates.push(reading + &attached);
                }
            }
        }

        let mut readings = mingle::unique_readings(
            candidates.iter().map(String::as_str),
            self.config.prefer_literal_pronunciation,
        );
        readings.truncate(self.config.maximum_results);
        readings
    }
}

fn unique_accents(entries: &[AccentEntry]) -> Vec<PitchAccentEntry> {
    let mut seen = HashSet::new();
    let mut accents = Vec::new();
    for entry in entries {
        let key = (
            kana::literal_pronunciation(&entry.katakana_reading),
            entry.pitch_number.clone(),
        );
        if seen.insert(key) {
            accents.push(PitchAccentEntry::from(entry));
        }
    }
    accents
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::LookupConfig;
    use crate::morph::AnalyzerError;
    use crate::store::AccentStore;

    const ROWS: &str = "\
言葉\tコトバ\t3\t15000
聞く\tキク\t0\t9000
日本\tニホン\t2\t20000
日本\tニッポン\t3,0\t12000
足\tアシ\t2\t9000
もう言葉\tモウコトバ\t0\t10
";

    fn morpheme(
        headword: &str,
        word: &str,
        reading: Option<&str>,
        part_of_speech: PartOfSpeech,
        inflection: Inflection,
    ) -> ParsedMorpheme {
        ParsedMorpheme {
            headword: headword.to_string(),
            word: word.to_string(),
            katakana_reading: reading.map(str::to_string),
            part_of_speech,
            inflection,
        }
    }

    fn analyzer() -> impl MorphologicalAnalyzer {
        |text: &str| {
            let morphemes = match text {
                "聞かせて" => vec![
                    morpheme(
                        "聞く",
                        "聞か",
                        Some("キカ"),
                        PartOfSpeech::Verb,
                        Inflection::Irrealis,
                    ),
                    morpheme(
                        "せる",
                        "せ",
                        Some("セ"),
                        PartOfSpeech::BoundAuxiliary,
                        Inflection::Continuative,
                    ),
                    morpheme(
                        "て",
                        "て",
                        Some("テ"),
                        PartOfSpeech::Particle,
                        Inflection::Unknown,
                    ),
                ],
                "もう言葉" => vec![
                    morpheme(
                        "もう",
                        "もう",
                        Some("モウ"),
                        PartOfSpeech::Adverb,
                        Inflection::Unknown,
                    ),
                    morpheme(
                        "言葉",
                        "言葉",
                        Some("コトバ"),
                        PartOfSpeech::Noun,
                        Inflection::Unknown,
                    ),
                ],
                "言葉を" => vec![
                    morpheme(
                        "言葉",
                        "言葉",
                        Some("コトバ"),
                        PartOfSpeech::Noun,
                        Inflection::Unknown,
                    ),
                    morpheme(
                        "を",
                        "を",
                        Some("ヲ"),
                        PartOfSpeech::Particle,
                        Inflection::Unknown,
                    ),
                ],
                "言葉" => vec![morpheme(
                    "言葉",
                    "言葉",
                    Some("コトバ"),
                    PartOfSpeech::Noun,
                    Inflection::Unknown,
                )],
                _ => vec![morpheme(
                    text,
                    text,
                    None,
                    PartOfSpeech::Unknown,
                    Inflection::Unknown,
                )],
            };
            Ok(morphemes)
        }
    }

    fn generator_with(config: FuriganaConfig) -> FuriganaGenerator<impl MorphologicalAnalyzer> {
        let mut store = AccentStore::open_in_memory().unwrap();
        store.load_source("bundled", ROWS).unwrap();
        let lookup = AccentLookup::new(store, analyzer(), LookupConfig::default());
        FuriganaGenerator::new(lookup, config)
    }

    fn generator() -> FuriganaGenerator<impl MorphologicalAnalyzer> {
        generator_with(FuriganaConfig::default())
    }

    #[test]
    fn annotates_known_words_inline() {
        let generator = generator();
        assert_eq!(
            generator.generate("Hello 言葉!").unwrap(),
            "Hello 言葉[ことば]!",
        );
    }

    #[test]
    fn inflected_verbs_are_annotated_whole() {
        let generator = generator();
        assert_eq!(
            generator.generate("聞かせて、言葉。").unwrap(),
            "聞かせて[きかせて]、言葉[ことば]。",
        );
    }

    #[test]
    fn alternative_readings_share_one_bracket() {
        let generator = generator();
        assert_eq!(
            generator.generate("日本").unwrap(),
            "日本[にほん, にっぽん]",
        );

        let capped = generator_with(FuriganaConfig {
            maximum_results: 1,
            ..FuriganaConfig::default()
        });
        assert_eq!(capped.generate("日本").unwrap(), "日本[にほん]");
    }

    #[test]
    fn kana_only_units_stay_bare() {
        let generator = generator();
        assert_eq!(
            generator.generate("もう言葉").unwrap(),
            "もう言葉[もうことば]",
        );

        let analyzed = generator_with(FuriganaConfig {
            analyzer_only: vec!["もう言葉".to_string()],
            ..FuriganaConfig::default()
        });
        assert_eq!(analyzed.generate("もう言葉").unwrap(), "もう言葉[ことば]");
    }

    #[test]
    fn skip_words_render_verbatim() {
        let generator = generator_with(FuriganaConfig {
            skip_words: vec!["言葉".to_string()],
            ..FuriganaConfig::default()
        });
        assert_eq!(generator.generate("言葉").unwrap(), "言葉");
    }

    #[test]
    fn analyzer_failures_leave_tokens_untouched() {
        let failing = |text: &str| -> Result<Vec<ParsedMorpheme>, AnalyzerError> {
            Err(AnalyzerError {
                text: text.to_string(),
                reason: "engine unavailable".to_string(),
            })
        };
        let mut store = AccentStore::open_in_memory().unwrap();
        store.load_source("bundled", ROWS).unwrap();
        let lookup = AccentLookup::new(store, failing, LookupConfig::default());
        let generator = FuriganaGenerator::new(lookup, FuriganaConfig::default());

        assert_eq!(generator.generate("聞かせて").unwrap(), "聞かせて");
        // Store hits still work without the analyzer.
        assert_eq!(generator.generate("言葉").unwrap(), "言葉[ことば]");
    }

    #[test]
    fn full_kana_replaces_the_surface() {
        let generator = generator();
        let options = GenerateOptions {
            full_kana: true,
            ..GenerateOptions::default()
        };
        assert_eq!(
            generator.generate_with("言葉を", options).unwrap(),
            "ことばを",
        );
        assert_eq!(
            generator.generate_with("日本", options).unwrap(),
            "にほん(にっぽん)",
        );
    }

    #[test]
    fn unsplit_requests_annotate_single_morphemes_only() {
        let generator = generator_with(FuriganaConfig {
            analyzer_only: vec!["言葉".to_string(), "聞かせて".to_string()],
            ..FuriganaConfig::default()
        });
        let options = GenerateOptions {
            split_morphemes: false,
            ..GenerateOptions::default()
        };
        assert_eq!(
            generator.generate_with("言葉", options).unwrap(),
            "言葉[ことば]",
        );
        assert_eq!(
            generator.generate_with("聞かせて", options).unwrap(),
            "聞かせて",
        );
    }

    #[test]
    fn toggling_twice_is_identity() {
        let generator = generator();
        let plain = "言葉を";
        let annotated = generator.toggle(plain).unwrap();
        assert_eq!(annotated, "言葉[ことば]を");
        assert!(generator.has_ruby_notation(&annotated));
        assert_eq!(generator.toggle(&annotated).unwrap(), plain);
    }

    #[test]
    fn analyzer_readings_cover_words_missing_from_the_store() {
        let generator = generator_with(FuriganaConfig {
            database_lookups: false,
            ..FuriganaConfig::default()
        });
        assert_eq!(generator.generate("言葉").unwrap(), "言葉[ことば]");
        // No analyzer reading and no store means no annotation.
        assert_eq!(generator.generate("日本").unwrap(), "日本");
    }
}
