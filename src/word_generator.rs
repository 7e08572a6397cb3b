use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::{
    error::{KeycoachError, Result},
    language::{daily_quote, random_snippet, Language, Mode, Prompt},
};

/// Configuration for prompt generation
#[derive(Debug, Clone)]
pub struct WordGenConfig {
    pub mode: Mode,
    pub number_of_words: usize,
    pub custom_prompt: Option<String>,
    pub language: String,
}

/// Handles all prompt generation logic
pub struct WordGenerator {
    config: WordGenConfig,
}

impl WordGenerator {
    pub fn new(config: WordGenConfig) -> Self {
        Self { config }
    }

    /// Generate a prompt for today
    pub fn generate_prompt(&self) -> Result<Prompt> {
        self.generate_prompt_for(Local::now().date_naive())
    }

    /// Generate a prompt; `today` seeds the daily quote
    pub fn generate_prompt_for(&self, today: NaiveDate) -> Result<Prompt> {
        let prompt = match self.config.mode {
            Mode::Custom => {
                let text = self.config.custom_prompt.as_deref().unwrap_or_default();
                Prompt::from_text(text)
            }
            Mode::Daily => Prompt::from_quote(daily_quote(today)?),
            Mode::Code => Prompt::from_snippet(&random_snippet()?),
            Mode::Words => {
                let language = Language::load(&self.config.language)?;
                Prompt::from_text(&language.get_random(self.config.number_of_words).join(" "))
            }
        };

        if prompt.words.is_empty() {
            return Err(KeycoachError::EmptyPrompt);
        }

        debug!(
            mode = %self.config.mode,
            words = prompt.words.len(),
            "generated prompt"
        );
        Ok(prompt)
    }
}
