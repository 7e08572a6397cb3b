use rand::seq::SliceRandom;
use serde::Deserialize;

use super::core::read_asset;
use crate::error::{KeycoachError, Result};

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Snippet {
    pub language: String,
    pub code: String,
}

impl Snippet {
    /// One entry per non-blank line, indentation stripped
    pub fn lines(&self) -> Vec<String> {
        self.code
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

pub fn load_snippets() -> Result<Vec<Snippet>> {
    read_asset("snippets.json")
}

pub fn random_snippet() -> Result<Snippet> {
    load_snippets()?
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| KeycoachError::MissingAsset("snippets.json is empty".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_strip_indentation_and_blanks() {
        let snippet = Snippet {
            language: "rust".to_string(),
            code: "fn main() {\n\n    println!(\"hi\");\n}\n".to_string(),
        };

        assert_eq!(snippet.lines(), vec!["fn main() {", "println!(\"hi\");", "}"]);
    }

    #[test]
    fn test_bundled_snippets_have_lines() {
        let snippets = load_snippets().unwrap();

        assert!(!snippets.is_empty());
        assert!(snippets.iter().all(|s| !s.lines().is_empty()));
    }
}
