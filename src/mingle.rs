//! Merging and decomposition of furigana notations.
//!
//! A notation like `有[あ]り 得[う]る` is decomposed into annotated and plain
//! segments; several notations over the same word structure can be mingled
//! back into one, packing alternative readings into a single bracket group.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::kana;

/// A furigana group with its leading spacing consumed, for whole-word
/// extraction.
static RE_WORD_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" *([^ \[\]]+)\[([^\[\]]+)\]").unwrap());

/// A furigana group with spacing left alone, for lossless segmentation.
static RE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^ \[\]]+)\[([^\[\]]+)\]").unwrap());

/// A bracket group carrying no kana at all (pitch digits, foreign text).
static RE_NON_JP_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]\u{3041}-\u{309F}\u{30A1}-\u{30FF}]*\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    text: &'a str,
    reading: Option<&'a str>,
}

fn segments(word: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in RE_SEGMENT.captures_iter(word) {
        let (Some(whole), Some(text), Some(reading)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment {
                text: &word[last..whole.start()],
                reading: None,
            });
        }
        out.push(Segment {
            text: text.as_str(),
            reading: Some(reading.as_str()),
        });
        last = whole.end();
    }
    if last < word.len() {
        out.push(Segment {
            text: &word[last..],
            reading: None,
        });
    }
    out
}

fn same_structure(a: &[Segment<'_>], b: &[Segment<'_>]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.text == y.text && x.reading.is_some() == y.reading.is_some())
}

/// Whether a reading already uses the prolonged-sound spelling of its own
/// pronunciation.
fn is_literal_spelling(reading: &str) -> bool {
    kana::unify_repr(reading) == reading
}

/// Deduplicates readings by pronunciation, keeping the first-seen spelling at
/// its first-seen position. With `prefer_literal`, a later prolonged-sound
/// spelling of the same pronunciation replaces the kept one in place.
#[must_use]
pub fn unique_readings<'a>(
    readings: impl IntoIterator<Item = &'a str>,
    prefer_literal: bool,
) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    let mut keys: Vec<String> = Vec::new();
    for reading in readings {
        if reading.is_empty() {
            continue;
        }
        let key = kana::literal_pronunciation(reading);
        if let Some(i) = keys.iter().position(|k| *k == key) {
            if prefer_literal && is_literal_spelling(reading) && !is_literal_spelling(&kept[i]) {
                kept[i] = reading.to_string();
            }
        } else {
            keys.push(key);
            kept.push(reading.to_string());
        }
    }
    kept
}

/// Packs several furigana notations over the same word into one, joining the
/// alternative readings of each bracket group with `separator`. Notations
/// whose word structure disagrees with the first one cannot be merged; the
/// first notation is returned unchanged.
#[must_use]
pub fn mingle_readings(words: &[String], separator: &str, prefer_literal: bool) -> String {
    let Some(first) = words.first() else {
        return String::new();
    };
    if words.len() == 1 {
        return first.clone();
    }

    let split: Vec<Vec<Segment<'_>>> = words.iter().map(|w| segments(w)).collect();
    if split[1..].iter().any(|s| !same_structure(&split[0], s)) {
        return first.clone();
    }

    let mut out = String::new();
    for (i, segment) in split[0].iter().enumerate() {
        out.push_str(segment.text);
        if segment.reading.is_some() {
            let readings = unique_readings(
                split.iter().filter_map(|s| s[i].reading),
                prefer_literal,
            );
            out.push('[');
            out.push_str(&readings.join(separator));
            out.push(']');
        }
    }
    out
}

/// Splits a notation into the bare word and its flattened reading. Text
/// outside bracket groups belongs to both; spacing before annotated parts is
/// dropped. A notation-free input has an empty reading.
#[must_use]
pub fn word_reading(text: &str) -> (String, String) {
    if !RE_WORD_GROUP.is_match(text) {
        return (text.to_string(), String::new());
    }
    let word = RE_WORD_GROUP.replace_all(text, "$1").into_owned();
    let reading = RE_WORD_GROUP.replace_all(text, "$2").into_owned();
    (word, reading)
}

/// Drops bracket groups that cannot be furigana because they carry no kana,
/// like the `[1]` in `テスト[1]` used to tell duplicate cards apart.
#[must_use]
pub fn strip_non_jp_furigana(expr: &str) -> String {
    RE_NON_JP_GROUP.replace_all(expr, "").into_owned()
}

/// Interprets an expression that may carry furigana, returning the bare word
/// and a trustworthy reading. Bracket groups without kana are dropped first;
/// of packed alternatives only the first is kept; a reading that still is not
/// pure kana is discarded.
#[must_use]
pub fn split_possible_furigana(expr: &str) -> (String, String) {
    let expr = strip_non_jp_furigana(expr);
    let (word, reading) = word_reading(&expr);
    let reading = reading
        .split(&[',', '、'][..])
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if kana::is_kana_str(&reading) {
        (word, reading)
    } else {
        (word, String::new())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn mingles_matching_structures() {
        struct Test {
            input: &'static [&'static str],
            expected: &'static str,
        }
        let tests = [
            Test {
                input: &["有[あ]り 得[う]る", "有[あ]り 得[え]る"],
                expected: "有[あ]り 得[う, え]る",
            },
            Test {
                input: &["有[あ]り 得[う]る", "有[あ]り 得[う]る"],
                expected: "有[あ]り 得[う]る",
            },
            Test {
                input: &["形[かたち]", "形[けい]", "形[ぎょう]"],
                expected: "形[かたち, けい, ぎょう]",
            },
            Test {
                input: &["一人[ひとり]"],
                expected: "一人[ひとり]",
            },
        ];
        for test in tests {
            assert_eq!(
                mingle_readings(&owned(test.input), ", ", false),
                test.expected,
            );
        }
    }

    #[test]
    fn mismatched_structures_keep_the_first_notation() {
        let words = owned(&["有[あ]り得る", "有り 得[え]る"]);
        assert_eq!(mingle_readings(&words, ", ", false), "有[あ]り得る");
        assert_eq!(mingle_readings(&[], ", ", false), "");
    }

    #[test]
    fn deduplicates_readings_by_pronunciation() {
        let readings = ["ジュウガツ", "ジューガツ"];
        assert_eq!(unique_readings(readings, false), vec!["ジュウガツ"]);
        assert_eq!(unique_readings(readings, true), vec!["ジューガツ"]);

        let distinct = ["リュウセンケイ", "リュウセンガタ"];
        assert_eq!(
            unique_readings(distinct, false),
            vec!["リュウセンケイ", "リュウセンガタ"],
        );

        assert_eq!(unique_readings(["とおい", ""], true), vec!["とおい"]);
    }

    #[test]
    fn extracts_word_and_reading() {
        struct Test {
            input: &'static str,
            expected: (&'static str, &'static str),
        }
        let tests = [
            Test {
                input: "有[あ]り 得[う]る",
                expected: ("有り得る", "ありうる"),
            },
            Test {
                input: "有る",
                expected: ("有る", ""),
            },
            Test {
                input: "お 金[かね]",
                expected: ("お金", "おかね"),
            },
        ];
        for test in tests {
            let (word, reading) = word_reading(test.input);
            assert_eq!((word.as_str(), reading.as_str()), test.expected);
        }
    }

    #[test]
    fn splits_only_trustworthy_furigana() {
        struct Test {
            input: &'static str,
            expected: (&'static str, &'static str),
        }
        let tests = [
            Test {
                input: "雨[あめ]",
                expected: ("雨", "あめ"),
            },
            Test {
                input: "お 前[まえ, めえ]",
                expected: ("お前", "おまえ"),
            },
            Test {
                input: "テスト[1]",
                expected: ("テスト", ""),
            },
            Test {
                input: "明後日[×あさって]",
                expected: ("明後日", ""),
            },
            Test {
                input: "言葉",
                expected: ("言葉", ""),
            },
        ];
        for test in tests {
            let (word, reading) = split_possible_furigana(test.input);
            assert_eq!((word.as_str(), reading.as_str()), test.expected);
        }
    }
}
