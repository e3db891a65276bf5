//! Text cleanup and tokenization.
//!
//! Raw strings go through, in order:
//! 1. `<img ...>` markup becomes the placeholder `image_token`
//! 2. any other tag-like markup is removed
//! 3. `[img_assist ...]` directives are removed
//! 4. URLs become the placeholder `url_token`
//! 5. lowercase, then split into runs of letters
//! 6. stopwords are dropped

pub mod stopwords;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

pub use stopwords::{english_stopwords, ENGLISH_STOPWORDS};

pub const IMAGE_TOKEN: &str = "image_token";
pub const URL_TOKEN: &str = "url_token";

static IMG_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<img[^<>]+(>|$)").expect("Failed to compile image tag regex")
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^<>]+(>|$)").expect("Failed to compile tag regex")
});

static IMG_ASSIST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[img_assist[^\]]*?\]").expect("Failed to compile img_assist regex")
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+",
    )
    .expect("Failed to compile URL regex")
});

/// word characters without digits, so `image_token` stays one token
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w&&\D]+").expect("Failed to compile word regex")
});

/// Normalizes raw text into token sequences.
/// Owns its stopword set, which is fixed for the normalizer's lifetime.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(english_stopwords())
    }
}

impl Normalizer {
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self { stopwords }
    }

    /// Build from any list of stopwords
    pub fn with_stopwords<T>(stopwords: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Self::new(stopwords.iter().map(|w| w.as_ref().to_string()).collect())
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Clean `text` and split it into tokens.
    /// Empty or whitespace-only input gives an empty sequence.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let text = IMG_TAG_REGEX.replace_all(text, " image_token ");
        let text = TAG_REGEX.replace_all(&text, " ");
        let text = IMG_ASSIST_REGEX.replace_all(&text, " ");
        let text = URL_REGEX.replace_all(&text, " url_token ");
        let text = text.to_lowercase();

        WORD_REGEX
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| !token.starts_with('_'))
            .filter(|token| !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }

    pub fn normalize_all<T>(&self, texts: &[T]) -> Vec<Vec<String>>
    where
        T: AsRef<str>,
    {
        texts.iter().map(|t| self.normalize(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> Normalizer {
        Normalizer::new(HashSet::new())
    }

    #[test]
    fn markup_and_url_become_placeholders() {
        let tokens = bare().normalize("<img src=x> visit http://example.com now");
        assert_eq!(tokens, vec!["image_token", "visit", "url_token", "now"]);
    }

    #[test]
    fn default_stopwords_drop_now() {
        let tokens = Normalizer::default().normalize("<img src=x> visit http://example.com now");
        assert_eq!(tokens, vec!["image_token", "visit", "url_token"]);
    }

    #[test]
    fn tags_are_removed_entirely() {
        let tokens = bare().normalize("<p class=\"intro\">Hello <b>World</b></p>");
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn unterminated_tag_runs_to_end() {
        let tokens = bare().normalize("kept <span never closed");
        assert_eq!(tokens, vec!["kept"]);
        let tokens = bare().normalize("kept <img src=broken");
        assert_eq!(tokens, vec!["kept", "image_token"]);
    }

    #[test]
    fn img_assist_directive_is_removed() {
        let tokens = bare().normalize("before [img_assist|nid=12|title=cat] after");
        assert_eq!(tokens, vec!["before", "after"]);
    }

    #[test]
    fn https_urls_with_query_strings() {
        let tokens = bare().normalize("see https://example.com/a?b=c&d=%20e, thanks");
        assert_eq!(tokens, vec!["see", "url_token", "thanks"]);
    }

    #[test]
    fn single_characters_survive_without_stopwords() {
        let tokens = bare().normalize("x y z");
        assert_eq!(tokens, vec!["x", "y", "z"]);
    }

    #[test]
    fn digits_split_tokens() {
        let tokens = bare().normalize("abc123def 42");
        assert_eq!(tokens, vec!["abc", "def"]);
    }

    #[test]
    fn leading_underscore_tokens_are_dropped() {
        let tokens = bare().normalize("_private public");
        assert_eq!(tokens, vec!["public"]);
    }

    #[test]
    fn lowercases_unicode() {
        let tokens = bare().normalize("Ünïcode CAFÉ");
        assert_eq!(tokens, vec!["ünïcode", "café"]);
    }

    #[test]
    fn empty_and_whitespace_inputs() {
        assert!(bare().normalize("").is_empty());
        assert!(bare().normalize("   \n\t ").is_empty());
    }

    #[test]
    fn all_stopwords_normalize_to_nothing() {
        assert!(Normalizer::default().normalize("the and of a it").is_empty());
    }

    #[test]
    fn custom_stopwords_replace_defaults() {
        let normalizer = Normalizer::with_stopwords(&["red"]);
        assert_eq!(normalizer.normalize("the red car"), vec!["the", "car"]);
    }

    #[test]
    fn order_is_preserved() {
        let tokens = bare().normalize("c b a c");
        assert_eq!(tokens, vec!["c", "b", "a", "c"]);
    }
}
