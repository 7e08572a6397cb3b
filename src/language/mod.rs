pub mod core;
pub mod quotes;
pub mod snippets;

pub use self::core::Language;
pub use quotes::{daily_quote, Quote};
pub use snippets::{random_snippet, Snippet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::typing_policy::SpacePolicy;

/// Where the practice text comes from
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Mode {
    /// random common words against a countdown
    #[default]
    Words,
    /// the quote of the day, the same for everyone
    Daily,
    /// a code snippet typed line by line
    Code,
    /// text supplied with --prompt
    Custom,
}

impl Mode {
    /// Next mode in the results-screen rotation; custom text is never cycled into
    pub fn next(self) -> Self {
        match self {
            Mode::Words => Mode::Daily,
            Mode::Daily => Mode::Code,
            Mode::Code | Mode::Custom => Mode::Words,
        }
    }
}

/// Target text for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub words: Vec<String>,
    pub author: Option<String>,
    pub space_policy: SpacePolicy,
}

impl Prompt {
    /// Split free text on whitespace
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
            author: None,
            space_policy: SpacePolicy::WordSeparated,
        }
    }

    pub fn from_quote(quote: Quote) -> Self {
        Self {
            author: Some(quote.author),
            ..Self::from_text(&quote.text)
        }
    }

    pub fn from_snippet(snippet: &Snippet) -> Self {
        Self {
            words: snippet.lines(),
            author: Some(snippet.language.clone()),
            space_policy: SpacePolicy::LineOriented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_rotation_skips_custom() {
        assert_eq!(Mode::Words.next(), Mode::Daily);
        assert_eq!(Mode::Daily.next(), Mode::Code);
        assert_eq!(Mode::Code.next(), Mode::Words);
        assert_eq!(Mode::Custom.next(), Mode::Words);
    }

    #[test]
    fn test_prompt_from_text_splits_whitespace() {
        let prompt = Prompt::from_text("  the  quick\nbrown\tfox ");

        assert_eq!(prompt.words, vec!["the", "quick", "brown", "fox"]);
        assert_eq!(prompt.space_policy, SpacePolicy::WordSeparated);
    }

    #[test]
    fn test_prompt_from_snippet_is_line_oriented() {
        let snippet = Snippet {
            language: "css".to_string(),
            code: "a {\n  color: red;\n}".to_string(),
        };

        let prompt = Prompt::from_snippet(&snippet);

        assert_eq!(prompt.words, vec!["a {", "color: red;", "}"]);
        assert_eq!(prompt.space_policy, SpacePolicy::LineOriented);
        assert_eq!(prompt.author.as_deref(), Some("css"));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Words.to_string(), "Words");
        assert_eq!(Mode::Code.to_string(), "Code");
    }
}
