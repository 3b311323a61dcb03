//! Ruby-notation detection and removal.
//!
//! A bracket group counts as ruby only when it immediately follows a script
//! character, so `テスト[1]` and stray `[notes]` are not notation. Removal
//! strips the groups behind script characters first, then any orphan groups
//! left over, which makes it the exact left inverse of annotation for
//! bracket-free input.

use regex::Regex;

/// Script ranges treated as annotatable Japanese text: kana, halfwidth
/// katakana, iteration marks and the ideograph blocks.
pub const JAPANESE_RANGES: &[(u32, u32)] = &[
    (0x3005, 0x3007),
    (0x3041, 0x309F),
    (0x30A1, 0x30FF),
    (0xFF66, 0xFF9F),
    (0x4E00, 0x9FFF),
    (0x3400, 0x4DBF),
];

/// Detects and removes `char[reading]` notation for one script class.
#[derive(Debug)]
pub struct RubyNotation {
    detect: Regex,
    strip: Regex,
    orphan: Regex,
}

fn char_class(ranges: &[(u32, u32)]) -> String {
    let mut class = String::new();
    for &(lo, hi) in ranges {
        let (Some(lo), Some(hi)) = (char::from_u32(lo), char::from_u32(hi)) else {
            continue;
        };
        if lo > hi {
            continue;
        }
        class.push_str(&format!("\\u{{{:04X}}}-\\u{{{:04X}}}", lo as u32, hi as u32));
    }
    class
}

impl RubyNotation {
    /// Builds the notation patterns for the script characters in `ranges`.
    /// Invalid or empty ranges are ignored; with no usable range at all,
    /// nothing counts as notation.
    #[must_use]
    pub fn new(ranges: &[(u32, u32)]) -> Self {
        let class = char_class(ranges);
        let class = if class.is_empty() {
            // A class that cannot match any scalar value.
            "^\\u{0}-\\u{10FFFF}".to_string()
        } else {
            class
        };
        // The assembled patterns are valid by construction: the class is a
        // sequence of escaped codepoint ranges.
        let detect = Regex::new(&format!(r"[{class}]\[[^\[\]]+\]")).unwrap();
        let strip = Regex::new(&format!(r"([{class}])\[[^\[\]]+\]")).unwrap();
        let orphan = Regex::new(r"\[[^\[\]]*\]").unwrap();
        Self {
            detect,
            strip,
            orphan,
        }
    }

    /// Ruby notation over the Japanese script class.
    #[must_use]
    pub fn japanese() -> Self {
        Self::new(JAPANESE_RANGES)
    }

    /// Whether `text` contains at least one ruby group.
    #[must_use]
    pub fn has_notation(&self, text: &str) -> bool {
        self.detect.is_match(text)
    }

    /// Strips every ruby group, then every orphan bracket group.
    #[must_use]
    pub fn remove_notation(&self, text: &str) -> String {
        let stripped = self.strip.replace_all(text, "$1");
        self.orphan.replace_all(&stripped, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn detects_notation_after_script_characters() {
        let ruby = RubyNotation::japanese();
        assert!(ruby.has_notation("言葉[ことば]を"));
        assert!(ruby.has_notation("聞かせて[きかせて]"));
        assert!(ruby.has_notation("人々[ひとびと]"));
        assert!(!ruby.has_notation("言葉を"));
        assert!(!ruby.has_notation("[ことば]"));
        assert!(!ruby.has_notation("言葉[]"));

        let han = RubyNotation::new(&[(0x4E00, 0x9FFF), (0x2_0000, 0x2_A6DF)]);
        assert!(han.has_notation("你[nǐ]好[hǎo]"));
        assert!(han.has_notation("𠀀[he]"));
        assert!(!han.has_notation("Hello [world]"));
    }

    #[test]
    fn removal_inverts_annotation() {
        let ruby = RubyNotation::japanese();
        struct Test {
            input: &'static str,
            expected: &'static str,
        }
        let tests = [
            Test {
                input: "言葉[ことば]を 聞かせて[きかせて]。",
                expected: "言葉を 聞かせて。",
            },
            Test {
                input: "お [まえ]",
                expected: "お ",
            },
            Test {
                input: "無印",
                expected: "無印",
            },
        ];
        for test in tests {
            let removed = ruby.remove_notation(test.input);
            assert_eq!(removed, test.expected);
            assert!(!ruby.has_notation(&removed));
        }
    }

    #[test]
    fn empty_classes_match_nothing() {
        let ruby = RubyNotation::new(&[]);
        assert!(!ruby.has_notation("言葉[ことば]"));
        // Orphan cleanup still applies on removal.
        assert_eq!(ruby.remove_notation("言葉[ことば]"), "言葉");
    }
}
