//! Deterministic cleaning rules applied to every document before modeling.

use std::sync::LazyLock;

use regex::Regex;
use tracing::instrument;
use unicode_normalization::UnicodeNormalization;

/// Links starting with `http` (covers `https`), up to the next whitespace.
#[allow(clippy::expect_used)]
static HTTP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)http\S+").expect("http regex is valid"));

/// Bare `www.` links, up to the next whitespace.
#[allow(clippy::expect_used)]
static WWW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)www\.\S+").expect("www regex is valid"));

/// HTML-escaped ampersand left behind by the Reddit API.
#[allow(clippy::expect_used)]
static AMP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&amp").expect("&amp regex is valid"));

/// Punctuation replaced by a space. Question and exclamation marks are kept.
#[allow(clippy::expect_used)]
static PUNCTUATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[|.:;@$%_\[\]()+*#"/]"#).expect("punctuation regex is valid")
});

#[allow(clippy::expect_used)]
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Cleans free text into the form used for embeddings and n-grams.
///
/// The rules run in a fixed order:
/// 1. Transliterate to ASCII (see [`decode_ascii`])
/// 2. Strip `http...` / `www....` links and `&amp` markers
/// 3. Replace `| . : ; @ $ % _ [ ] ( ) + * # " /` with spaces
/// 4. Join contractions (`don't` becomes `dont`)
/// 5. Collapse whitespace runs into a single space
/// 6. Trim
/// 7. Lowercase
///
/// Steps 2 to 4 repeat until the text stops changing, so a link or `&amp`
/// pieced together by a removal (`ht&amptp`, `htt'p`) is removed too.
///
/// # Example
///
/// ```
/// use topic_modeler_core::text::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// assert_eq!(
///     normalizer.clean("Don't   miss https://example.com (really)!"),
///     "dont miss really !"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Creates a normalizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Applies the full cleaning pipeline to `text`.
    ///
    /// Empty or whitespace-only input yields an empty string.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let mut current = decode_ascii(text);
        loop {
            let unlinked = strip_links(&current);
            let unpunctuated = PUNCTUATION_PATTERN.replace_all(&unlinked, " ");
            let joined = join_contractions(&unpunctuated);
            if joined == current {
                break;
            }
            current = joined;
        }
        let collapsed = WHITESPACE_PATTERN.replace_all(&current, " ");
        collapsed.trim().to_lowercase()
    }
}

/// Cleans `text` with a default [`TextNormalizer`].
#[must_use]
#[instrument(level = "trace", skip(text), fields(text_len = text.len()))]
pub fn clean_text(text: &str) -> String {
    TextNormalizer::new().clean(text)
}

/// Reduces `text` to ASCII.
///
/// Characters are decomposed (NFKD) so accented letters keep their base
/// letter; whatever is still outside ASCII afterwards is dropped.
#[must_use]
pub fn decode_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Removes `&amp` until none is left, then `http` and `www.` links.
fn strip_links(text: &str) -> String {
    let mut unescaped = text.to_string();
    while AMP_PATTERN.is_match(&unescaped) {
        unescaped = AMP_PATTERN.replace_all(&unescaped, "").into_owned();
    }
    let without_http = HTTP_PATTERN.replace_all(&unescaped, "");
    WWW_PATTERN.replace_all(&without_http, "").into_owned()
}

/// Drops apostrophes sitting between two letters.
///
/// Neighbors are read from the input, so in `a''b` neither quote is removed.
fn join_contractions(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut joined = String::with_capacity(text.len());

    for (index, &ch) in chars.iter().enumerate() {
        if is_apostrophe(ch) && index > 0 {
            let before = chars[index - 1];
            let after = chars.get(index + 1).copied();
            if before.is_ascii_alphabetic() && after.is_some_and(|c| c.is_ascii_alphabetic()) {
                continue;
            }
        }
        joined.push(ch);
    }

    joined
}

fn is_apostrophe(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_empty_and_whitespace_yield_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
        assert_eq!(clean_text("\n\t  \r\n"), "");
    }

    #[test]
    fn test_decode_ascii_transliterates_accents() {
        assert_eq!(decode_ascii("café crème"), "cafe creme");
        assert_eq!(decode_ascii("Ångström"), "Angstrom");
    }

    #[test]
    fn test_decode_ascii_drops_unconvertible_characters() {
        assert_eq!(decode_ascii("smile 😀 now"), "smile  now");
        assert_eq!(decode_ascii("日本 text"), " text");
    }

    #[test]
    fn test_clean_removes_http_and_www_links() {
        assert_eq!(
            clean_text("see https://example.com/a?b=c and WWW.Example.org/page too"),
            "see and too"
        );
        assert_eq!(clean_text("HTTP://LOUD.example now"), "now");
    }

    #[test]
    fn test_clean_keeps_words_containing_www_without_dot() {
        assert_eq!(clean_text("awwwards are fun"), "awwwards are fun");
    }

    #[test]
    fn test_clean_removes_amp_markers_case_insensitively() {
        assert_eq!(clean_text("salt &amp pepper &AMP; oil"), "salt pepper oil");
    }

    #[test]
    fn test_clean_removes_markers_joined_by_a_removal() {
        assert_eq!(clean_text("ht&amptpx rest"), "rest");
        assert_eq!(clean_text("&a&ampmp rest"), "rest");
        assert_eq!(clean_text("htt'ps rest"), "rest");
        assert_eq!(clean_text("&am'p; salt"), "salt");
    }

    #[test]
    fn test_clean_replaces_punctuation_with_spaces() {
        assert_eq!(
            clean_text("a|b.c:d;e@f$g%h_i[j]k(l)m+n*o#p\"q/r"),
            "a b c d e f g h i j k l m n o p q r"
        );
    }

    #[test]
    fn test_clean_keeps_question_and_exclamation_marks() {
        assert_eq!(clean_text("Really?! Yes!"), "really?! yes!");
    }

    #[test]
    fn test_clean_joins_contractions() {
        assert_eq!(clean_text("I don't know"), "i dont know");
        assert_eq!(clean_text("It\u{2019}s fine"), "its fine");
        assert_eq!(clean_text("DON'T SHOUT"), "dont shout");
    }

    #[test]
    fn test_clean_keeps_apostrophes_outside_words() {
        assert_eq!(clean_text("the users' posts"), "the users' posts");
        assert_eq!(clean_text("'quoted'"), "'quoted'");
    }

    #[test]
    fn test_join_contractions_reads_original_neighbors() {
        assert_eq!(join_contractions("a''b"), "a''b");
        assert_eq!(join_contractions("o'clock"), "oclock");
    }

    #[test]
    fn test_clean_collapses_line_breaks_and_tabs() {
        assert_eq!(
            clean_text("  first line\n\nsecond\tline  "),
            "first line second line"
        );
    }

    #[test]
    fn test_clean_punctuation_only_becomes_empty() {
        assert_eq!(clean_text("..."), "");
        assert_eq!(clean_text("(#) / [*]"), "");
    }

    #[test]
    fn test_clean_is_idempotent_on_samples() {
        let samples = [
            "I set a wellness goal. It was hard.",
            "Check https://reddit.com/r/fitness &amp www.example.com/x NOW!!",
            "Ça va? Don't worry :) #blessed",
            "  multiple\n\nlines\tand   spaces  ",
            "emoji 🎉 party (with) [brackets] and \"quotes\"",
            "users' posts and o'clock",
            "ht&amptpx rest",
            "&a&ampmp rest",
            "htt'ps://x.io rest",
            "",
        ];
        for sample in samples {
            let once = clean_text(sample);
            let twice = clean_text(&once);
            assert_eq!(once, twice, "clean must be idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_normalizer_matches_convenience_function() {
        let text = "My Journey.I set a wellness goal";
        assert_eq!(TextNormalizer::new().clean(text), clean_text(text));
        assert_eq!(clean_text(text), "my journey i set a wellness goal");
    }
}
