//! Reattachment of inflectional kana to the preceding word.
//!
//! Analyzers split inflected verbs and adjectives into a stem plus auxiliary
//! kana morphemes. Rendering those separately places furigana on the stem
//! alone (聞く[きく]かせて), so kana tokens are glued back onto the unit they
//! inflect. The decision is strictly single-lookback, driven by a rule table
//! of attaching inflection classes and detach exceptions.

use serde::{Deserialize, Serialize};

use crate::kana;
use crate::morph::{Inflection, ParsedMorpheme, PartOfSpeech};
use crate::pitch::PitchAccentEntry;

/// Rule table driving attachment decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachRules {
    /// Inflection classes a fragment may follow.
    pub attaching_inflections: Vec<Inflection>,
    /// Treat every explicit attachment form (the 接続 family) as attaching.
    pub attach_attachment_forms: bool,
    /// Parts of speech that never attach.
    pub detach_parts_of_speech: Vec<PartOfSpeech>,
    /// Surface words that never attach.
    pub detach_words: Vec<String>,
    /// Headwords that never attach.
    pub detach_headwords: Vec<String>,
    /// `(fragment suffix, word)` pairs that never combine.
    pub detach_pairs: Vec<(String, String)>,
    /// `(fragment, word)` pairs that combine despite the detach rules.
    pub tape_pairs: Vec<(String, String)>,
    /// Most fragments one unit will absorb.
    pub max_attached: usize,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
        .collect()
}

impl Default for AttachRules {
    fn default() -> Self {
        Self {
            attaching_inflections: vec![
                Inflection::Continuative,
                Inflection::Irrealis,
                Inflection::IrrealisSpecial,
                Inflection::Hypothetical,
            ],
            attach_attachment_forms: true,
            detach_parts_of_speech: vec![
                PartOfSpeech::Noun,
                PartOfSpeech::Adverb,
                PartOfSpeech::Interjection,
                PartOfSpeech::Conjunction,
                PartOfSpeech::Adnominal,
                PartOfSpeech::Prefix,
                PartOfSpeech::Filler,
                PartOfSpeech::Symbol,
                PartOfSpeech::Unknown,
            ],
            detach_words: words(&[
                "だけ", "とか", "けど", "が", "の", "な", "ぞ", "ね", "よ", "わ", "さ", "か",
                "みる",
            ]),
            detach_headwords: words(&["しまう", "おる", "くれる", "いい", "ほしい", "らしい"]),
            detach_pairs: pairs(&[("く", "ない"), ("く", "なかっ"), ("く", "なく"), ("て", "い")]),
            tape_pairs: pairs(&[("でしょ", "う"), ("ましょ", "う"), ("だろ", "う"), ("う", "し")]),
            max_attached: 10,
        }
    }
}

/// A display unit: one analyzed morpheme plus any kana fragments absorbed
/// from the tokens that followed it. `attached` is only ever appended to,
/// and only while the unit is the last one in its [`UnitList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    /// Dictionary form.
    pub headword: String,
    /// Surface form as written, without attached fragments.
    pub word: String,
    /// Katakana reading of `word`, when the analyzer knew one.
    pub katakana_reading: Option<String>,
    /// Part of speech.
    pub part_of_speech: PartOfSpeech,
    /// Conjugation form.
    pub inflection: Inflection,
    /// Accent candidates for the headword, in store order.
    pub headword_accents: Vec<PitchAccentEntry>,
    /// Kana fragments absorbed from following tokens.
    pub attached: Vec<String>,
}

impl AnnotatedToken {
    /// Wraps an analyzed morpheme with its accent candidates.
    #[must_use]
    pub fn new(morpheme: ParsedMorpheme, headword_accents: Vec<PitchAccentEntry>) -> Self {
        Self {
            headword: morpheme.headword,
            word: morpheme.word,
            katakana_reading: morpheme.katakana_reading,
            part_of_speech: morpheme.part_of_speech,
            inflection: morpheme.inflection,
            headword_accents,
            attached: Vec::new(),
        }
    }

    /// The full surface this unit covers: its word plus attached fragments.
    #[must_use]
    pub fn surface(&self) -> String {
        let mut surface = self.word.clone();
        for fragment in &self.attached {
            surface.push_str(fragment);
        }
        surface
    }

    /// The fragment the next token would follow: the last attached fragment,
    /// or the trailing kana of the word itself.
    fn last_fragment(&self) -> &str {
        self.attached
            .last()
            .map_or_else(|| kana::longest_kana_suffix(&self.word), String::as_str)
    }
}

/// One finalized output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// Verbatim text, never annotated.
    Text(String),
    /// An analyzed unit eligible for ruby markup.
    Annotated(AnnotatedToken),
}

impl Unit {
    /// The surface text this unit contributes to the output.
    #[must_use]
    pub fn surface(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Annotated(token) => token.surface(),
        }
    }
}

/// Output buffer that applies the attachment rules as units are pushed.
#[derive(Debug)]
pub struct UnitList<'a> {
    rules: &'a AttachRules,
    units: Vec<Unit>,
}

impl<'a> UnitList<'a> {
    /// An empty buffer using `rules` for attachment decisions.
    #[must_use]
    pub fn new(rules: &'a AttachRules) -> Self {
        Self {
            rules,
            units: Vec::new(),
        }
    }

    /// Appends verbatim text as its own unit. Nothing ever attaches to it.
    pub fn push_text(&mut self, text: &str) {
        self.units.push(Unit::Text(text.to_string()));
    }

    /// Appends an analyzed token, either merging it into the previous unit as
    /// an attached fragment or starting a new unit.
    pub fn push_annotated(&mut self, token: AnnotatedToken) {
        let attach = match self.units.last() {
            Some(Unit::Annotated(prev)) => should_attach(self.rules, prev, &token),
            _ => false,
        };
        if attach {
            if let Some(Unit::Annotated(prev)) = self.units.last_mut() {
                prev.attached.push(token.word);
            }
        } else {
            self.units.push(Unit::Annotated(token));
        }
    }

    /// Pushes each token in order.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = AnnotatedToken>) {
        for token in tokens {
            self.push_annotated(token);
        }
    }

    /// Finalizes the buffer.
    #[must_use]
    pub fn into_units(self) -> Vec<Unit> {
        self.units
    }
}

fn should_attach(rules: &AttachRules, prev: &AnnotatedToken, token: &AnnotatedToken) -> bool {
    if prev.attached.len() >= rules.max_attached {
        return false;
    }
    let attaching = rules.attaching_inflections.contains(&prev.inflection)
        || (rules.attach_attachment_forms && prev.inflection.is_attachment_form());
    if !attaching {
        return false;
    }
    if token.word.is_empty() || !kana::is_kana_str(&token.word) {
        return false;
    }

    let fragment = prev.last_fragment();
    if rules
        .tape_pairs
        .iter()
        .any(|(left, right)| left == fragment && *right == token.word)
    {
        return true;
    }
    // The pair's left side matches as a suffix, so ("く", "ない") splits
    // 嬉しく|ない without touching 死な+ない.
    if rules
        .detach_pairs
        .iter()
        .any(|(left, right)| fragment.ends_with(left.as_str()) && *right == token.word)
    {
        return false;
    }
    if rules.detach_parts_of_speech.contains(&token.part_of_speech) {
        return false;
    }
    if rules.detach_words.iter().any(|w| *w == token.word)
        || rules.detach_headwords.iter().any(|w| *w == token.headword)
    {
        return false;
    }
    true
}
