use proptest::prelude::*;

use keycoach::clock::ManualClock;
use keycoach::input::KeyInput;
use keycoach::language::{Mode, Prompt};
use keycoach::session::{SessionConfig, TimerMode};
use keycoach::thok::Thok;
use keycoach::typing_policy::{word_len, SpacePolicy};

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        6 => prop::sample::select(vec!['a', 'b', 'c', ' ']).prop_map(KeyInput::Char),
        2 => Just(KeyInput::Space),
        2 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Enter),
        1 => Just(KeyInput::Tab),
    ]
}

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]{1,5}", 1..5)
}

fn policy_strategy() -> impl Strategy<Value = SpacePolicy> {
    prop_oneof![Just(SpacePolicy::WordSeparated), Just(SpacePolicy::LineOriented)]
}

fn thok(words: Vec<String>, policy: SpacePolicy, clock: ManualClock) -> Thok<ManualClock> {
    let prompt = Prompt {
        words,
        author: None,
        space_policy: policy,
    };
    let config = SessionConfig {
        timer: TimerMode::Stopwatch,
        space_policy: policy,
    };
    Thok::new(prompt, Mode::Custom, config, clock)
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(
        words in words_strategy(),
        policy in policy_strategy(),
        keys in prop::collection::vec(key_strategy(), 0..60),
    ) {
        let mut thok = thok(words.clone(), policy, ManualClock::new(0));

        for key in keys {
            thok.handle_key(key);
            let cursor = thok.cursor();
            prop_assert!(cursor.word_index < words.len());
            prop_assert!(cursor.char_index <= word_len(&words, cursor.word_index));
        }
    }

    #[test]
    fn replay_reproduces_live_session(
        words in words_strategy(),
        policy in policy_strategy(),
        keys in prop::collection::vec((key_strategy(), 0u64..400), 0..60),
    ) {
        let clock = ManualClock::new(1_000);
        let mut thok = thok(words, policy, clock.clone());

        for (key, gap) in keys {
            clock.advance(gap);
            thok.handle_key(key);
        }
        let live = thok.typed_state().clone();

        let mut replay = thok.end_session().replay();
        replay.run_to_end();

        prop_assert_eq!(replay.typed_state(), &live);
    }

    #[test]
    fn accuracy_is_a_percentage(
        words in words_strategy(),
        keys in prop::collection::vec(key_strategy(), 0..60),
    ) {
        let mut thok = thok(words, SpacePolicy::WordSeparated, ManualClock::new(0));
        for key in keys {
            thok.handle_key(key);
        }

        let result = thok.end_session();
        prop_assert!((0.0..=100.0).contains(&result.accuracy));
        prop_assert!(result.analysis.patterns.len() <= 3);
    }
}

#[test]
fn backspace_at_origin_is_a_noop() {
    let words = vec!["abc".to_string()];
    let mut thok = thok(words, SpacePolicy::WordSeparated, ManualClock::new(0));

    thok.handle_key(KeyInput::Backspace);

    assert_eq!(thok.cursor().char_index, 0);
    assert!(thok.recorder().keystrokes().is_empty());
    assert!(!thok.has_started());
}
