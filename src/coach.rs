use itertools::Itertools;

use crate::analyzer::{ConfusionPattern, Rhythm, SlowKey};

/// The signals coaching text is keyed on
#[derive(Clone, Copy, Debug)]
pub struct CoachSignals<'a> {
    pub rhythm: Rhythm,
    pub accuracy_rate: f64,
    pub slow_keys: &'a [SlowKey],
    pub patterns: &'a [ConfusionPattern],
    pub consistency: u32,
}

/// Ordered coaching messages; the first one is the headline summary.
/// Always returns at least one message.
pub fn coach_messages(signals: &CoachSignals) -> Vec<String> {
    let mut messages = vec![rhythm_message(signals.rhythm, signals.accuracy_rate)];

    if signals.accuracy_rate < 90.0 {
        messages.push(
            "Slow down and prioritize accuracy. Speed follows once muscle memory is solid."
                .to_string(),
        );
    } else if signals.accuracy_rate >= 98.0 {
        messages.push("Outstanding accuracy, you're building excellent muscle memory.".to_string());
    }

    if let Some(slowest) = signals.slow_keys.first() {
        let keys = signals
            .slow_keys
            .iter()
            .map(|k| format!("'{}'", k.key))
            .join(", ");
        messages.push(format!(
            "Your slowest keys are {keys}. Practice them inside common words (current avg: {}ms).",
            slowest.avg_latency_ms.round()
        ));
    }

    if let Some(top) = signals.patterns.first() {
        messages.push(format!(
            "You often type '{}' when '{}' is expected. Drill those two keys.",
            top.actual, top.expected
        ));
    }

    if signals.rhythm != Rhythm::Unknown {
        if signals.consistency < 70 {
            messages.push(
                "Your timing fluctuates a lot. Aim for an even pace through the whole test."
                    .to_string(),
            );
        } else if signals.consistency >= 90 {
            messages.push("Exceptional consistency, your timing is remarkably stable.".to_string());
        }
    }

    messages
}

fn rhythm_message(rhythm: Rhythm, accuracy_rate: f64) -> String {
    match rhythm {
        Rhythm::Burst => "You type in bursts: fast on familiar keys, then pauses before harder \
                          ones. Keep a steady pace instead of rushing."
            .to_string(),
        Rhythm::Metronome if accuracy_rate > 95.0 => {
            "Your rhythm is steady like a metronome. That is the hallmark of expert typing."
                .to_string()
        }
        Rhythm::Metronome => "Great steady rhythm. Focus on accuracy next to reach expert level."
            .to_string(),
        Rhythm::VariableFlow => "Your rhythm varies: some keys flow, others cause hesitation. \
                                 Practice the awkward combinations to smooth it out."
            .to_string(),
        Rhythm::Unknown => {
            "Not enough keystrokes to read your rhythm yet. Type a longer session for a full \
             breakdown."
                .to_string()
        }
    }
}
