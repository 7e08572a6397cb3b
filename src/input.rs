use serde::{Deserialize, Serialize};

/// A single key as seen by the typing core, after the terminal layer has
/// filtered out modifier combinations and function keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyInput {
    Char(char),
    Space,
    Backspace,
    Enter,
    Tab,
}

impl KeyInput {
    /// Parse a raw key name such as `"a"`, `" "`, `"Backspace"` or `"Enter"`.
    ///
    /// Empty names, multi-character names that are not one of the known
    /// tokens (`"Shift"`, `"F5"`, ...) and control characters yield `None`.
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key {
            "" => None,
            " " | "Space" => Some(KeyInput::Space),
            "Backspace" => Some(KeyInput::Backspace),
            "Enter" => Some(KeyInput::Enter),
            "Tab" => Some(KeyInput::Tab),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_char(c),
                    _ => None,
                }
            }
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(KeyInput::Space),
            '\t' => Some(KeyInput::Tab),
            '\n' | '\r' => Some(KeyInput::Enter),
            c if c.is_control() => None,
            c => Some(KeyInput::Char(c)),
        }
    }

    /// The character this key types when scored as content
    pub fn as_char(&self) -> Option<char> {
        match self {
            KeyInput::Char(c) => Some(*c),
            KeyInput::Space => Some(' '),
            _ => None,
        }
    }
}
