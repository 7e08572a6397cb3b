//! Cursor and correctness transitions shared by live typing and replay.
//!
//! Both [`crate::thok::Thok`] and [`crate::replay::ReplayEngine`] feed keys
//! through [`TypedState::apply`], so a recorded log replays to the exact same
//! cursor and history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyInput;

/// How Space and Enter behave for a given prompt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacePolicy {
    /// Words are separated by spaces; Space moves to the next word
    #[default]
    WordSeparated,
    /// One word per line; Space is literal content and Enter moves on
    LineOriented,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub word_index: usize,
    pub char_index: usize,
}

/// word index -> char index -> outcome; a missing entry means "not typed"
pub type CorrectnessHistory = BTreeMap<usize, BTreeMap<usize, Outcome>>;

/// What a key did to the typed state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed
    Ignored,
    /// Backspace moved the cursor back (and possibly erased an entry)
    Erased,
    /// A character was compared against the target
    Scored {
        expected: char,
        outcome: Outcome,
        /// Correct final character of the final word
        completes_text: bool,
    },
    /// Cursor moved to the start of the next word
    NextWord,
    /// Advance requested while on the last word
    EndOfText,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypedState {
    pub cursor: Cursor,
    pub history: CorrectnessHistory,
}

pub fn word_len(words: &[String], idx: usize) -> usize {
    words.get(idx).map_or(0, |w| w.chars().count())
}

impl TypedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_char(&self, words: &[String]) -> Option<char> {
        words
            .get(self.cursor.word_index)
            .and_then(|w| w.chars().nth(self.cursor.char_index))
    }

    pub fn outcome_at(&self, word_index: usize, char_index: usize) -> Option<Outcome> {
        self.history
            .get(&word_index)
            .and_then(|w| w.get(&char_index))
            .copied()
    }

    /// (correct, total) over the characters currently in the history
    pub fn tally(&self) -> (usize, usize) {
        self.history
            .values()
            .flat_map(|w| w.values())
            .fold((0, 0), |(correct, total), outcome| match outcome {
                Outcome::Correct => (correct + 1, total + 1),
                Outcome::Incorrect => (correct, total + 1),
            })
    }

    pub fn apply(&mut self, words: &[String], policy: SpacePolicy, key: KeyInput) -> Transition {
        match (key, policy) {
            (KeyInput::Backspace, _) => self.backspace(words),
            (KeyInput::Space, SpacePolicy::WordSeparated)
            | (KeyInput::Enter, SpacePolicy::LineOriented) => self.advance_word(words),
            (KeyInput::Space, SpacePolicy::LineOriented) => self.score(words, ' '),
            (KeyInput::Char(c), _) => self.score(words, c),
            (KeyInput::Enter, SpacePolicy::WordSeparated) | (KeyInput::Tab, _) => {
                Transition::Ignored
            }
        }
    }

    fn backspace(&mut self, words: &[String]) -> Transition {
        let Cursor {
            word_index,
            char_index,
        } = self.cursor;

        if char_index > 0 {
            self.cursor.char_index -= 1;
            if let Some(word) = self.history.get_mut(&word_index) {
                word.remove(&self.cursor.char_index);
                if word.is_empty() {
                    self.history.remove(&word_index);
                }
            }
            Transition::Erased
        } else if word_index > 0 {
            self.cursor.word_index -= 1;
            self.cursor.char_index = word_len(words, self.cursor.word_index);
            Transition::Erased
        } else {
            Transition::Ignored
        }
    }

    fn advance_word(&mut self, words: &[String]) -> Transition {
        if words.is_empty() {
            return Transition::Ignored;
        }
        if self.cursor.word_index + 1 >= words.len() {
            return Transition::EndOfText;
        }
        self.cursor.word_index += 1;
        self.cursor.char_index = 0;
        Transition::NextWord
    }

    fn score(&mut self, words: &[String], typed: char) -> Transition {
        let Some(expected) = self.expected_char(words) else {
            return Transition::Ignored;
        };

        let outcome = if typed == expected {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };

        self.history
            .entry(self.cursor.word_index)
            .or_default()
            .insert(self.cursor.char_index, outcome);
        self.cursor.char_index += 1;

        let completes_text = outcome == Outcome::Correct
            && self.cursor.word_index + 1 == words.len()
            && self.cursor.char_index == word_len(words, self.cursor.word_index);

        Transition::Scored {
            expected,
            outcome,
            completes_text,
        }
    }
}
