use serde::{Deserialize, Serialize};

use crate::input::KeyInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystroke {
    pub key: KeyInput,
    /// `None` for navigational keys (Backspace, word-advancing Space/Enter)
    pub expected: Option<char>,
    pub timestamp_ms: u64,
    /// Time since the previous keystroke of the session, 0 for the first
    pub latency_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub expected: char,
    pub actual: char,
    pub timestamp_ms: u64,
}

/// Append-only capture of one live session's keystrokes and mistakes
#[derive(Debug, Default)]
pub struct KeystrokeRecorder {
    keystrokes: Vec<Keystroke>,
    mistakes: Vec<Mistake>,
    last_timestamp_ms: Option<u64>,
}

impl KeystrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keystroke and return its latency
    pub fn record_keystroke(&mut self, key: KeyInput, expected: Option<char>, now_ms: u64) -> u64 {
        let latency_ms = self
            .last_timestamp_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_timestamp_ms = Some(now_ms);

        self.keystrokes.push(Keystroke {
            key,
            expected,
            timestamp_ms: now_ms,
            latency_ms,
        });
        latency_ms
    }

    pub fn record_mistake(&mut self, expected: char, actual: char, now_ms: u64) {
        self.mistakes.push(Mistake {
            expected,
            actual,
            timestamp_ms: now_ms,
        });
    }

    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.keystrokes
    }

    pub fn mistakes(&self) -> &[Mistake] {
        &self.mistakes
    }

    pub fn into_logs(self) -> (Vec<Keystroke>, Vec<Mistake>) {
        (self.keystrokes, self.mistakes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_keystroke_has_zero_latency() {
        let mut recorder = KeystrokeRecorder::new();

        let latency = recorder.record_keystroke(KeyInput::Char('a'), Some('a'), 1_000);

        assert_eq!(latency, 0);
        assert_eq!(recorder.keystrokes()[0].timestamp_ms, 1_000);
    }

    #[test]
    fn test_latency_is_gap_to_previous() {
        let mut recorder = KeystrokeRecorder::new();

        recorder.record_keystroke(KeyInput::Char('a'), Some('a'), 1_000);
        recorder.record_keystroke(KeyInput::Backspace, None, 1_120);
        recorder.record_keystroke(KeyInput::Char('b'), Some('a'), 1_300);

        let latencies: Vec<u64> = recorder.keystrokes().iter().map(|k| k.latency_ms).collect();
        assert_eq!(latencies, vec![0, 120, 180]);
        assert_eq!(recorder.keystrokes()[1].expected, None);
    }

    #[test]
    fn test_mistakes_kept_in_order() {
        let mut recorder = KeystrokeRecorder::new();

        recorder.record_mistake('a', 'x', 5);
        recorder.record_mistake('t', 'r', 9);

        let (keystrokes, mistakes) = recorder.into_logs();
        assert!(keystrokes.is_empty());
        assert_eq!(
            mistakes,
            vec![
                Mistake {
                    expected: 'a',
                    actual: 'x',
                    timestamp_ms: 5
                },
                Mistake {
                    expected: 't',
                    actual: 'r',
                    timestamp_ms: 9
                },
            ]
        );
    }
}
