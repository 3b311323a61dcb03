//! Kana script predicates and reading normalization.

use wana_kana::ConvertJapanese;

/// The katakana-hiragana prolonged sound mark (ー).
pub const LONG_VOWEL_MARK: char = '\u{30FC}';

const COMBINING_HANDAKUTEN: char = '\u{309A}';

/// Returns `true` if the character is hiragana (the prolonged sound mark counts).
#[must_use]
pub fn is_hiragana_char(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}') || c == LONG_VOWEL_MARK
}

/// Returns `true` if the character is katakana, including halfwidth forms.
#[must_use]
pub fn is_katakana_char(c: char) -> bool {
    matches!(c, '\u{30A1}'..='\u{30FF}' | '\u{FF66}'..='\u{FF9F}')
}

/// Returns `true` if the character belongs to either kana script.
#[must_use]
pub fn is_kana_char(c: char) -> bool {
    is_hiragana_char(c) || is_katakana_char(c)
}

/// Returns `true` if every character is hiragana. Vacuously true for "".
#[must_use]
pub fn is_hiragana_str(text: &str) -> bool {
    text.chars().all(is_hiragana_char)
}

/// Returns `true` if every character is katakana. Vacuously true for "".
#[must_use]
pub fn is_katakana_str(text: &str) -> bool {
    text.chars().all(is_katakana_char)
}

/// Returns `true` if every character is kana. Vacuously true for "".
#[must_use]
pub fn is_kana_str(text: &str) -> bool {
    text.chars().all(is_kana_char)
}

/// Converts kana to katakana, leaving other characters untouched.
#[must_use]
pub fn to_katakana(text: &str) -> String {
    ConvertJapanese::to_katakana(text)
}

/// Converts kana to hiragana, leaving other characters untouched.
#[must_use]
pub fn to_hiragana(text: &str) -> String {
    ConvertJapanese::to_hiragana(text)
}

/// The longest run of kana at the end of a word: 思い切る → る, しまった → しまった.
#[must_use]
pub fn longest_kana_suffix(word: &str) -> &str {
    let start = word
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_kana_char(c))
        .last()
        .map_or(word.len(), |(i, _)| i);
    &word[start..]
}

fn vowel_of(c: char) -> Option<char> {
    Some(match c {
        'ア' | 'カ' | 'ガ' | 'サ' | 'ザ' | 'タ' | 'ダ' | 'ナ' | 'ハ' | 'バ' | 'パ' | 'マ'
        | 'ヤ' | 'ラ' | 'ワ' | 'ャ' | 'ァ' => 'a',
        'イ' | 'キ' | 'ギ' | 'シ' | 'ジ' | 'チ' | 'ヂ' | 'ニ' | 'ヒ' | 'ビ' | 'ピ' | 'ミ'
        | 'リ' | 'ィ' => 'i',
        'ウ' | 'ク' | 'グ' | 'ス' | 'ズ' | 'ツ' | 'ヅ' | 'ヌ' | 'フ' | 'ブ' | 'プ' | 'ム'
        | 'ユ' | 'ル' | 'ヴ' | 'ュ' | 'ゥ' => 'u',
        'エ' | 'ケ' | 'ゲ' | 'セ' | 'ゼ' | 'テ' | 'デ' | 'ネ' | 'ヘ' | 'ベ' | 'ペ' | 'メ'
        | 'レ' | 'ェ' => 'e',
        'オ' | 'コ' | 'ゴ' | 'ソ' | 'ゾ' | 'ト' | 'ド' | 'ノ' | 'ホ' | 'ボ' | 'ポ' | 'モ'
        | 'ヨ' | 'ロ' | 'ヲ' | 'ョ' | 'ォ' => 'o',
        _ => return None,
    })
}

fn fold_nga(c: char) -> char {
    match c {
        'カ' => 'ガ',
        'キ' => 'ギ',
        'ク' => 'グ',
        'ケ' => 'ゲ',
        'コ' => 'ゴ',
        other => other,
    }
}

/// Katakana-folds a reading and unifies the spelling variants that do not
/// touch vowel length: the nasal handakuten series (カ゚) becomes the voiced
/// series, ヂ/ヅ become ジ/ズ.
fn fold_variants(reading: &str) -> String {
    let katakana = to_katakana(reading);
    let mut out = String::with_capacity(katakana.len());
    let mut chars = katakana.chars().peekable();

    while let Some(c) = chars.next() {
        let mut c = match c {
            'ヂ' => 'ジ',
            'ヅ' => 'ズ',
            other => other,
        };
        if chars.peek() == Some(&COMBINING_HANDAKUTEN) {
            let folded = fold_nga(c);
            if folded != c {
                chars.next();
                c = folded;
            }
        }
        out.push(c);
    }
    out
}

/// Collapses a reading to its literal pronunciation, suitable as a comparison key.
///
/// The result is katakana with traditional spelling variants unified (nasal
/// handakuten, ヂ/ヅ) and long vowels written as a repeated vowel kana, or as
/// ウ after an o-row mora, turned into the prolonged sound mark, so that
/// ジュウガツ and ジューガツ compare equal. Only the bare vowel kana extend a
/// mora; consonant morae never fold, so サンケヅク stays サンケズク.
#[must_use]
pub fn literal_pronunciation(reading: &str) -> String {
    let folded = fold_variants(reading);
    let mut out = String::with_capacity(folded.len());
    let mut prev_vowel: Option<char> = None;

    for c in folded.chars() {
        let extends = matches!(
            (prev_vowel, c),
            (Some('a'), 'ア')
                | (Some('i'), 'イ')
                | (Some('u' | 'o'), 'ウ')
                | (Some('e'), 'エ')
                | (Some('o'), 'オ')
        );
        if extends {
            out.push(LONG_VOWEL_MARK);
        } else {
            out.push(c);
            match vowel_of(c) {
                Some(vowel) => prev_vowel = Some(vowel),
                None if c != LONG_VOWEL_MARK => prev_vowel = None,
                None => {}
            }
        }
    }
    out
}

/// Rewrites a reading into the unified long-vowel spelling, preserving its script.
///
/// じゅう → じゅー, ジュウガツ → ジューガツ. Used when the literal-pronunciation
/// spelling is configured as the preferred display form. The hiragana
/// conversion is a plain block shift so the prolonged sound mark survives.
#[must_use]
pub fn unify_repr(reading: &str) -> String {
    let folded = literal_pronunciation(reading);
    if is_hiragana_str(reading) {
        folded
            .chars()
            .map(|c| match c {
                'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
                other => other,
            })
            .collect()
    } else {
        folded
    }
}

/// Whether a reading no longer ends like the headword does, i.e. is inflected.
///
/// 分かる/わかった → true, 分かる/わかる → false. Words without a kana suffix
/// (綺麗) are never considered inflected. The comparison skips long-vowel
/// folding: the suffix boundary can split a long vowel (雇う read やとう).
#[must_use]
pub fn is_inflected(headword: &str, reading: &str) -> bool {
    let suffix = longest_kana_suffix(headword);
    !suffix.is_empty() && !fold_variants(reading).ends_with(&fold_variants(suffix))
}

/// Derives the reading of an inflected surface form from its dictionary reading.
///
/// 聞か (from 聞く/きく) → きか. Falls back to the dictionary reading when the
/// two cannot be aligned on the headword's kana suffix.
#[must_use]
pub fn adjust_to_inflection(inflected: &str, headword: &str, reading: &str) -> String {
    let reading = to_hiragana(reading);
    if inflected == headword {
        return reading;
    }

    let raw_suffix = longest_kana_suffix(headword);
    let stem = &headword[..headword.len() - raw_suffix.len()];
    let suffix = to_hiragana(raw_suffix);
    match (reading.strip_suffix(&suffix), inflected.strip_prefix(stem)) {
        (Some(reading_stem), Some(inflected_suffix)) if !stem.is_empty() || !suffix.is_empty() => {
            format!("{reading_stem}{inflected_suffix}")
        }
        _ => reading,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn kana_suffixes() {
        let tests = [
            ("分かる", "かる"),
            ("弄ばれてしまった", "ばれてしまった"),
            ("綺麗", ""),
            ("しまった", "しまった"),
            ("", ""),
        ];
        for (word, expected) in tests {
            assert_eq!(longest_kana_suffix(word), expected);
        }
    }

    #[test]
    fn script_predicates() {
        assert!(is_hiragana_str("して"));
        assert!(is_hiragana_str("ばれちゃったー"));
        assert!(!is_hiragana_str("科学"));
        assert!(is_katakana_str("テスト"));
        assert!(is_kana_str("テストだ"));
        assert!(!is_kana_str("お金"));
        assert!(is_kana_str(""));
    }

    #[test]
    fn literal_pronunciation_unifies_spellings() {
        let tests = [
            ("ジュウガツ", "ジューガツ"),
            ("ジューガツ", "ジューガツ"),
            ("とうきょう", "トーキョー"),
            ("ヤトウ", "ヤトー"),
            ("ケイイ", "ケイー"),
            ("ヒラカ\u{309A}ナ", "ヒラガナ"),
        ];
        for (reading, expected) in tests {
            assert_eq!(literal_pronunciation(reading), expected);
        }
    }

    #[test]
    fn consonant_morae_never_fold() {
        // Shared vowels across consonant morae are not long vowels.
        let tests = [
            ("サンケヅク", "サンケズク"),
            ("リュウセンガタ", "リューセンガタ"),
            ("ケイコ", "ケイコ"),
            ("ワカッタ", "ワカッタ"),
        ];
        for (reading, expected) in tests {
            assert_eq!(literal_pronunciation(reading), expected);
        }
    }

    #[test]
    fn unify_preserves_script() {
        assert_eq!(unify_repr("じゅうがつ"), "じゅーがつ");
        assert_eq!(unify_repr("とうきょう"), "とーきょー");
        assert_eq!(unify_repr("リュウセンガタ"), "リューセンガタ");
    }

    #[test]
    fn inflection_detection() {
        let tests = [
            ("分かる", "わかる", false),
            ("分かる", "わかった", true),
            ("綺麗", "きれい", false),
            ("ひらがな", "ヒラカ\u{309A}ナ", false),
            ("ひらがな", "ヒラカ\u{309A}ナオ", true),
            ("産気づく", "さんけずく", false),
            ("雇う", "やとう", false),
        ];
        for (headword, reading, expected) in tests {
            assert_eq!(is_inflected(headword, reading), expected, "{headword}/{reading}");
        }
    }

    #[test]
    fn inflection_adjustment() {
        let tests = [
            ("聞か", "聞く", "きく", "きか"),
            ("思い切っ", "思い切る", "おもいきる", "おもいきっ"),
            ("嬉しく", "嬉しい", "うれしい", "うれしく"),
            ("して", "する", "する", "して"),
            ("一人暮らし", "一人暮らし", "ひとりぐらし", "ひとりぐらし"),
            ("読ま", "読む", "ヨム", "よま"),
        ];
        for (inflected, headword, reading, expected) in tests {
            assert_eq!(adjust_to_inflection(inflected, headword, reading), expected);
        }
    }
}
