//! Mora splitting and pitch-accent notation.
//!
//! Accent data stores a reading and a pitch number; the HTML notation hosts
//! display is derived, not stored. The markup vocabulary is `<low_rise>`,
//! `<high>`, `<high_drop>` and `<low>`, one tag per pitch region, with empty
//! regions omitted.

/// A reading paired with one pitch accent, as carried on analyzed tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PitchAccentEntry {
    /// Katakana reading of the headword.
    pub katakana_reading: String,
    /// Pitch number as stored ("0", "1", …, or dash-joined for compounds).
    pub pitch_number: String,
}

const SMALL_KANA: &[char] = &[
    'ャ', 'ュ', 'ョ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ヮ', 'ゃ', 'ゅ', 'ょ', 'ぁ', 'ぃ', 'ぅ',
    'ぇ', 'ぉ', 'ゎ',
];

/// Splits a kana reading into morae. Small vowel kana merge with the
/// preceding character; ッ and ー count as morae of their own.
#[must_use]
pub fn morae(reading: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for c in reading.chars() {
        if SMALL_KANA.contains(&c) {
            if let Some(last) = out.last_mut() {
                last.push(c);
                continue;
            }
        }
        out.push(c.to_string());
    }
    out
}

fn tag(out: &mut String, name: &str, content: &str) {
    if !content.is_empty() {
        out.push_str(&format!("<{name}>{content}</{name}>"));
    }
}

/// Renders the HTML pitch notation for a reading and pitch number.
///
/// Returns `None` for readings without morae or numbers that do not denote a
/// single downstep position (dash-joined compound numbers); callers fall back
/// to the bare reading.
#[must_use]
pub fn html_notation(katakana_reading: &str, pitch_number: &str) -> Option<String> {
    let downstep: usize = pitch_number.parse().ok()?;
    let morae = morae(katakana_reading);
    let first = morae.first()?;

    let mut out = String::new();
    match downstep {
        0 => {
            tag(&mut out, "low_rise", first);
            tag(&mut out, "high", &morae[1..].concat());
        }
        1 => {
            tag(&mut out, "high_drop", first);
            tag(&mut out, "low", &morae[1..].concat());
        }
        n => {
            let top_end = n.min(morae.len());
            tag(&mut out, "low_rise", first);
            tag(&mut out, "high_drop", &morae[1..top_end].concat());
            tag(&mut out, "low", &morae[top_end..].concat());
        }
    }
    Some(out)
}
