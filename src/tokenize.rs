//! Splits source text into opaque and parseable spans.
//!
//! Classification runs as a cascade: pre-existing furigana is excised first,
//! then leftover HTML-like tags and inline media directives, then runs of
//! non-Japanese characters, then separator runs. Whatever survives is
//! parseable, with numeral+counter sequences pre-split so the analyzer sees
//! them whole. Concatenating the token surfaces always reproduces the cleaned
//! input.

use once_cell::sync::Lazy;
use regex::Regex;

/// A classified span of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Passes through the pipeline untouched.
    Opaque(String),
    /// Eligible for lookup and morphological analysis.
    Parseable(String),
}

impl Token {
    /// The surface text of the span, regardless of classification.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Token::Opaque(text) | Token::Parseable(text) => text,
        }
    }
}

// A reading never contains a colon, which keeps [sound:…] directives out of
// the cleanup and available to the media pass.
static RE_FURIGANA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" *([^ \[\]]+)\[[^\[\]:]+\]").unwrap());

static RE_HTML_AND_MEDIA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<[^<>]+>|\[sound:[^\[\]]+\]").unwrap());

// Hiragana, katakana (full and halfwidth), unified ideographs with extension A,
// the CJK punctuation block, and both digit forms. Punctuation is kept here so
// the separator pass can classify it on its own.
static RE_NON_JAPANESE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[^\u{3000}-\u{303F}\u{3040}-\u{309F}\u{30A0}-\u{30FF}",
        r"\u{FF66}-\u{FF9F}\u{4E00}-\u{9FFF}\u{3400}-\u{4DBF}\u{FF10}-\u{FF19}0-9]+",
    ))
    .unwrap()
});

// Typographic symbols that delimit words. 々, 〆, 〇 and ー are word
// characters and must stay out of this class.
static RE_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "[\r\n\t \u{3000}\u{30FB}、。〃〄〈〉《》「」『』【】〒〓〔〕〖〗〘〙〚〛",
        "〜〝〞〟〠〰〱〲〳〴〵〶〷〸〹〺〼〽]+",
    ))
    .unwrap()
});

static RE_COUNTERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[0-9\u{FF10}-\u{FF19}]+",
        "(?:万人|ヶ月|[つ月日人年円時分秒回個歳台番枚本匹冊階限品等丁])",
    ))
    .unwrap()
});

static RE_BOUNDARIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "{}|{}",
        RE_NON_JAPANESE.as_str(),
        RE_SEPARATORS.as_str()
    ))
    .unwrap()
});

/// Removes bracketed furigana annotations, keeping the annotated word.
///
/// Accepts the spaced variant as well: `お 金[かね]` → `お金`. Media
/// directives like `[sound:clip.mp3]` are not furigana and survive.
#[must_use]
pub fn clean_furigana(text: &str) -> String {
    RE_FURIGANA.replace_all(text, "$1").into_owned()
}

/// Strips HTML-like tags, media directives and non-breaking spaces, and trims.
#[must_use]
pub fn sanitize_expr(expr: &str) -> String {
    RE_HTML_AND_MEDIA
        .replace_all(expr, "")
        .replace('\u{A0}', " ")
        .trim()
        .to_string()
}

/// Splits an expression into lookup-worthy parts at separators and
/// non-Japanese runs, dropping the boundaries themselves.
#[must_use]
pub fn split_separators(expr: &str) -> Vec<&str> {
    RE_BOUNDARIES
        .split(expr)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Classifies text into an ordered, lossless sequence of tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let cleaned = clean_furigana(text);
    let mut tokens = Vec::new();
    let passes: [&Regex; 3] = [&RE_HTML_AND_MEDIA, &RE_NON_JAPANESE, &RE_SEPARATORS];
    apply_passes(&cleaned, &passes, &mut tokens);
    tokens
}

fn apply_passes(text: &str, passes: &[&Regex], out: &mut Vec<Token>) {
    if text.is_empty() {
        return;
    }
    let Some((pass, rest)) = passes.split_first() else {
        split_counters(text, out);
        return;
    };

    let mut last = 0;
    for m in pass.find_iter(text) {
        apply_passes(&text[last..m.start()], rest, out);
        out.push(Token::Opaque(m.as_str().to_string()));
        last = m.end();
    }
    apply_passes(&text[last..], rest, out);
}

// Numbers followed by a counter word form a single parseable token, so the
// analyzer is not left to guess the boundary.
fn split_counters(text: &str, out: &mut Vec<Token>) {
    let mut last = 0;
    for m in RE_COUNTERS.find_iter(text) {
        if m.start() > last {
            out.push(Token::Parseable(text[last..m.start()].to_string()));
        }
        out.push(Token::Parseable(m.as_str().to_string()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Token::Parseable(text[last..].to_string()));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn opaque(text: &str) -> Token {
        Token::Opaque(text.to_string())
    }

    fn parseable(text: &str) -> Token {
        Token::Parseable(text.to_string())
    }

    #[test]
    fn classifies_mixed_text() {
        struct Test<'a> {
            input: &'a str,
            expected: Vec<Token>,
        }

        let tests = [
            Test {
                input: "",
                expected: vec![],
            },
            Test {
                input: "何か",
                expected: vec![parseable("何か")],
            },
            Test {
                input: "Hello 日本",
                expected: vec![opaque("Hello "), parseable("日本")],
            },
            Test {
                input: "今、行く。",
                expected: vec![
                    parseable("今"),
                    opaque("、"),
                    parseable("行く"),
                    opaque("。"),
                ],
            },
            Test {
                input: "<b>何か</b>見ぬふり[sound:video.mp4]",
                expected: vec![
                    opaque("<b>"),
                    parseable("何か"),
                    opaque("</b>"),
                    parseable("見ぬふり"),
                    opaque("[sound:video.mp4]"),
                ],
            },
            Test {
                input: "５人で７月に行く",
                expected: vec![
                    parseable("５人"),
                    parseable("で"),
                    parseable("７月"),
                    parseable("に行く"),
                ],
            },
            Test {
                input: " 大丈夫[だいじょうぶ]です",
                expected: vec![parseable("大丈夫です")],
            },
            Test {
                input: "人々の〇は出来ん",
                expected: vec![parseable("人々の〇は出来ん")],
            },
        ];

        for test in tests {
            assert_eq!(tokenize(test.input), test.expected, "{}", test.input);
        }
    }

    #[test]
    fn concatenation_is_lossless() {
        let inputs = [
            "<div>つまらない話<br></div>だった。",
            "１０月のある日、Tom と「喫茶店」へ…",
            "ボーイフレンドを見つけたらしい。[sound:clip.mp3]",
            "\tAB　CD\n",
        ];
        for input in inputs {
            let reassembled: String = tokenize(input)
                .iter()
                .map(Token::text)
                .collect();
            assert_eq!(reassembled, clean_furigana(input), "{input}");
        }
    }

    #[test]
    fn sound_directives_survive_cleanup() {
        assert_eq!(
            clean_furigana("見ぬふり[sound:video.mp4]"),
            "見ぬふり[sound:video.mp4]",
        );
        assert_eq!(
            clean_furigana(" 大丈夫[だいじょうぶ]です[sound:レコード.mp3]"),
            "大丈夫です[sound:レコード.mp3]",
        );
        assert_eq!(
            tokenize("ふり[sound:video.mp4]"),
            vec![parseable("ふり"), opaque("[sound:video.mp4]")],
        );
    }

    #[test]
    fn sanitizes_expressions() {
        assert_eq!(sanitize_expr("<b>大人</b>しい\u{A0}"), "大人しい");
        assert_eq!(sanitize_expr("[sound:a.mp3] 泳ぐ "), "泳ぐ");
        assert_eq!(sanitize_expr("何か"), "何か");
    }

    #[test]
    fn splits_on_separators() {
        assert_eq!(split_separators("随分・思い切った"), vec!["随分", "思い切った"]);
        assert_eq!(split_separators("お金がない。"), vec!["お金がない"]);
        assert_eq!(split_separators("A気持ちB"), vec!["気持ち"]);
        assert_eq!(split_separators(""), Vec::<&str>::new());
    }
}
