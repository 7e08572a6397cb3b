//! End-of-session statistics derived from a recorded keystroke log.

use serde::{Deserialize, Serialize};

use crate::coach::{coach_messages, CoachSignals};
use crate::recorder::{Keystroke, KeystrokeRecorder, Mistake};
use crate::util::{mean, std_dev};

const TOP_N: usize = 3;
const SLOW_KEY_MIN_MS: u64 = 50;
const RHYTHM_MIN_MS: u64 = 20;
const LATENCY_MAX_MS: u64 = 2000;
const SLOW_KEY_MIN_SAMPLES: usize = 3;
const RHYTHM_MIN_SAMPLES: usize = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionPattern {
    pub actual: char,
    pub expected: char,
    pub count: usize,
}

impl ConfusionPattern {
    pub fn message(&self) -> String {
        format!("Confused '{}' for '{}'.", self.actual, self.expected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowKey {
    pub key: char,
    pub avg_latency_ms: f64,
    pub samples: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Rhythm {
    #[strum(to_string = "Metronome (Steady)")]
    Metronome,
    #[strum(to_string = "Variable Flow")]
    VariableFlow,
    #[strum(to_string = "Burst (Stop & Go)")]
    Burst,
    #[strum(to_string = "Unknown")]
    Unknown,
}

impl Rhythm {
    pub fn from_cv(cv: f64) -> Self {
        if cv < 0.2 {
            Rhythm::Metronome
        } else if cv < 0.4 {
            Rhythm::VariableFlow
        } else {
            Rhythm::Burst
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub score: u32,
    pub mistakes_count: usize,
    /// Share of keystrokes that were not mistakes, 0-100
    pub accuracy_rate: f64,
    pub summary: String,
    pub coach_messages: Vec<String>,
    pub patterns: Vec<ConfusionPattern>,
    pub slow_keys: Vec<SlowKey>,
    pub consistency: u32,
    pub rhythm: Rhythm,
    /// The full log, kept for replay
    pub keystrokes: Vec<Keystroke>,
}

/// Consumes one session's recorder; build a new one per session
#[derive(Debug)]
pub struct SessionAnalyzer {
    keystrokes: Vec<Keystroke>,
    mistakes: Vec<Mistake>,
}

impl From<KeystrokeRecorder> for SessionAnalyzer {
    fn from(recorder: KeystrokeRecorder) -> Self {
        let (keystrokes, mistakes) = recorder.into_logs();
        Self::new(keystrokes, mistakes)
    }
}

impl SessionAnalyzer {
    pub fn new(keystrokes: Vec<Keystroke>, mistakes: Vec<Mistake>) -> Self {
        Self {
            keystrokes,
            mistakes,
        }
    }

    pub fn analyze(self) -> AnalysisReport {
        let patterns = confusion_patterns(&self.mistakes);
        let slow_keys = slow_keys(&self.keystrokes);
        let (rhythm, consistency) = rhythm_and_consistency(&self.keystrokes);

        let accuracy_rate = if self.keystrokes.is_empty() {
            100.0
        } else {
            let typed = self.keystrokes.len() as f64;
            (typed - self.mistakes.len() as f64) / typed * 100.0
        };

        let coach_messages = coach_messages(&CoachSignals {
            rhythm,
            accuracy_rate,
            slow_keys: &slow_keys,
            patterns: &patterns,
            consistency,
        });
        let summary = coach_messages.first().cloned().unwrap_or_default();

        let mistakes_count = self.mistakes.len();
        let score = 100u32.saturating_sub((mistakes_count as u32).saturating_mul(2));

        AnalysisReport {
            score,
            mistakes_count,
            accuracy_rate,
            summary,
            coach_messages,
            patterns,
            slow_keys,
            consistency,
            rhythm,
            keystrokes: self.keystrokes,
        }
    }
}

/// Most frequent (actual, expected) pairs; ties keep first-occurrence order
pub fn confusion_patterns(mistakes: &[Mistake]) -> Vec<ConfusionPattern> {
    let mut patterns: Vec<ConfusionPattern> = Vec::new();
    for m in mistakes {
        match patterns
            .iter_mut()
            .find(|p| p.actual == m.actual && p.expected == m.expected)
        {
            Some(p) => p.count += 1,
            None => patterns.push(ConfusionPattern {
                actual: m.actual,
                expected: m.expected,
                count: 1,
            }),
        }
    }

    patterns.sort_by(|a, b| b.count.cmp(&a.count));
    patterns.truncate(TOP_N);
    patterns
}

/// Expected characters with the highest mean latency
pub fn slow_keys(keystrokes: &[Keystroke]) -> Vec<SlowKey> {
    let mut groups: Vec<(char, Vec<f64>)> = Vec::new();
    for k in keystrokes {
        let Some(expected) = k.expected else {
            continue;
        };
        if k.latency_ms <= SLOW_KEY_MIN_MS || k.latency_ms >= LATENCY_MAX_MS {
            continue;
        }
        match groups.iter_mut().find(|(c, _)| *c == expected) {
            Some((_, times)) => times.push(k.latency_ms as f64),
            None => groups.push((expected, vec![k.latency_ms as f64])),
        }
    }

    let mut keys: Vec<SlowKey> = groups
        .into_iter()
        .filter(|(_, times)| times.len() >= SLOW_KEY_MIN_SAMPLES)
        .filter_map(|(key, times)| {
            mean(&times).map(|avg| SlowKey {
                key,
                avg_latency_ms: avg,
                samples: times.len(),
            })
        })
        .collect();

    keys.sort_by(|a, b| {
        b.avg_latency_ms
            .partial_cmp(&a.avg_latency_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    keys.truncate(TOP_N);
    keys
}

/// Latencies that count towards rhythm, in recording order
pub fn rhythm_latencies(keystrokes: &[Keystroke]) -> Vec<f64> {
    keystrokes
        .iter()
        .map(|k| k.latency_ms)
        .filter(|l| *l > RHYTHM_MIN_MS && *l < LATENCY_MAX_MS)
        .map(|l| l as f64)
        .collect()
}

pub fn rhythm_and_consistency(keystrokes: &[Keystroke]) -> (Rhythm, u32) {
    let latencies = rhythm_latencies(keystrokes);
    if latencies.len() < RHYTHM_MIN_SAMPLES {
        return (Rhythm::Unknown, 100);
    }

    match (mean(&latencies), std_dev(&latencies)) {
        (Some(avg), Some(sd)) if avg > 0.0 => {
            let consistency = (100.0 - sd / 1.5).round().max(0.0) as u32;
            (Rhythm::from_cv(sd / avg), consistency)
        }
        _ => (Rhythm::Unknown, 100),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyInput;

    fn keystroke(expected: char, latency_ms: u64) -> Keystroke {
        Keystroke {
            key: KeyInput::Char(expected),
            expected: Some(expected),
            timestamp_ms: 0,
            latency_ms,
        }
    }

    fn mistake(expected: char, actual: char) -> Mistake {
        Mistake {
            expected,
            actual,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_empty_log_defaults() {
        let report = SessionAnalyzer::new(vec![], vec![]).analyze();

        assert_eq!(report.accuracy_rate, 100.0);
        assert_eq!(report.consistency, 100);
        assert_eq!(report.rhythm, Rhythm::Unknown);
        assert_eq!(report.score, 100);
        assert!(report.patterns.is_empty());
        assert!(report.slow_keys.is_empty());
        assert!(!report.summary.is_empty());
    }

    #[test]
    fn test_confusion_patterns_top_three_sorted() {
        let mistakes = vec![
            mistake('a', 's'),
            mistake('e', 'r'),
            mistake('e', 'r'),
            mistake('o', 'p'),
            mistake('i', 'u'),
            mistake('i', 'u'),
            mistake('i', 'u'),
        ];

        let patterns = confusion_patterns(&mistakes);

        assert_eq!(patterns.len(), 3);
        assert_eq!((patterns[0].actual, patterns[0].expected, patterns[0].count), ('u', 'i', 3));
        assert_eq!((patterns[1].actual, patterns[1].count), ('r', 2));
        // 's'->'a' and 'p'->'o' tie at 1; the first seen wins
        assert_eq!((patterns[2].actual, patterns[2].expected), ('s', 'a'));
        assert!(patterns.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_confusion_pattern_message() {
        let p = ConfusionPattern {
            actual: 'x',
            expected: 'a',
            count: 1,
        };
        assert_eq!(p.message(), "Confused 'x' for 'a'.");
    }

    #[test]
    fn test_slow_keys_require_three_samples() {
        let keystrokes = vec![
            keystroke('q', 900),
            keystroke('q', 900),
            keystroke('e', 200),
            keystroke('e', 300),
            keystroke('e', 400),
        ];

        let keys = slow_keys(&keystrokes);

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, 'e');
        assert_eq!(keys[0].avg_latency_ms, 300.0);
        assert_eq!(keys[0].samples, 3);
    }

    #[test]
    fn test_slow_keys_filter_outliers_and_navigation() {
        let mut keystrokes = vec![
            keystroke('a', 50),
            keystroke('a', 2000),
            keystroke('a', 10),
            keystroke('a', 120),
        ];
        keystrokes.push(Keystroke {
            key: KeyInput::Backspace,
            expected: None,
            timestamp_ms: 0,
            latency_ms: 500,
        });

        assert!(slow_keys(&keystrokes).is_empty());
    }

    #[test]
    fn test_slow_keys_sorted_descending_top_three() {
        let mut keystrokes = vec![];
        for (c, l) in [('a', 100), ('b', 400), ('c', 300), ('d', 200)] {
            for _ in 0..3 {
                keystrokes.push(keystroke(c, l));
            }
        }

        let keys: Vec<char> = slow_keys(&keystrokes).iter().map(|k| k.key).collect();
        assert_eq!(keys, vec!['b', 'c', 'd']);
    }

    #[test]
    fn test_rhythm_unknown_below_eleven_samples() {
        let keystrokes: Vec<Keystroke> = (0..10).map(|_| keystroke('a', 150)).collect();
        assert_eq!(rhythm_and_consistency(&keystrokes), (Rhythm::Unknown, 100));

        // samples outside (20, 2000) don't count
        let mut keystrokes = keystrokes;
        keystrokes.push(keystroke('a', 20));
        keystrokes.push(keystroke('a', 2000));
        assert_eq!(rhythm_and_consistency(&keystrokes).0, Rhythm::Unknown);
    }

    #[test]
    fn test_rhythm_metronome_for_steady_typing() {
        let keystrokes: Vec<Keystroke> = (0..12).map(|_| keystroke('a', 150)).collect();
        assert_eq!(rhythm_and_consistency(&keystrokes), (Rhythm::Metronome, 100));
    }

    #[test]
    fn test_rhythm_burst_and_consistency_floor() {
        let keystrokes: Vec<Keystroke> = (0..12)
            .map(|i| keystroke('a', if i % 2 == 0 { 30 } else { 1900 }))
            .collect();

        let (rhythm, consistency) = rhythm_and_consistency(&keystrokes);

        assert_eq!(rhythm, Rhythm::Burst);
        // sd = 935, 100 - 935 / 1.5 < 0
        assert_eq!(consistency, 0);
    }

    #[test]
    fn test_rhythm_variable_flow() {
        // mean 200, population sd 60 -> cv 0.3
        let keystrokes: Vec<Keystroke> = (0..12)
            .map(|i| keystroke('a', if i % 2 == 0 { 140 } else { 260 }))
            .collect();

        let (rhythm, consistency) = rhythm_and_consistency(&keystrokes);

        assert_eq!(rhythm, Rhythm::VariableFlow);
        assert_eq!(consistency, 60);
    }

    #[test]
    fn test_rhythm_display_labels() {
        assert_eq!(Rhythm::Metronome.to_string(), "Metronome (Steady)");
        assert_eq!(Rhythm::VariableFlow.to_string(), "Variable Flow");
        assert_eq!(Rhythm::Burst.to_string(), "Burst (Stop & Go)");
        assert_eq!(Rhythm::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_score_and_accuracy_rate() {
        let keystrokes: Vec<Keystroke> = (0..10).map(|_| keystroke('a', 100)).collect();
        let mistakes = vec![mistake('a', 's'), mistake('a', 's')];

        let report = SessionAnalyzer::new(keystrokes.clone(), mistakes).analyze();

        assert_eq!(report.score, 96);
        assert_eq!(report.mistakes_count, 2);
        assert_eq!(report.accuracy_rate, 80.0);
        assert_eq!(report.keystrokes, keystrokes);
        assert_eq!(report.summary, report.coach_messages[0]);
    }

    #[test]
    fn test_score_never_negative() {
        let mistakes: Vec<Mistake> = (0..80).map(|_| mistake('a', 's')).collect();
        let report = SessionAnalyzer::new(vec![], mistakes).analyze();
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_analyzer_from_recorder() {
        let mut recorder = KeystrokeRecorder::new();
        recorder.record_mistake('a', 'x', 10);
        recorder.record_keystroke(KeyInput::Char('x'), Some('a'), 10);

        let report = SessionAnalyzer::from(recorder).analyze();

        assert_eq!(report.mistakes_count, 1);
        assert_eq!(report.patterns[0].count, 1);
        assert_eq!(report.keystrokes.len(), 1);
    }
}
