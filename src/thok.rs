use tracing::{debug, info};

use crate::analyzer::SessionAnalyzer;
use crate::clock::{Clock, SystemClock};
use crate::feedback::{FeedbackHooks, Silent};
use crate::input::KeyInput;
use crate::language::{Mode, Prompt};
use crate::recorder::KeystrokeRecorder;
use crate::session::{SessionConfig, SessionResult, SessionStatus, SessionTimer};
use crate::typing_policy::{Cursor, Outcome, SpacePolicy, Transition, TypedState};

/// Sessions shorter than this are timed as if they took this long
pub const MIN_ELAPSED_MS: u64 = 1000;

/// A live typing test: one prompt, one cursor, one recorder.
///
/// Build a new `Thok` for every session; nothing carries over.
pub struct Thok<C: Clock = SystemClock> {
    words: Vec<String>,
    author: Option<String>,
    mode: Mode,
    config: SessionConfig,
    state: TypedState,
    status: SessionStatus,
    recorder: KeystrokeRecorder,
    timer: SessionTimer,
    started_at_ms: Option<u64>,
    clock: C,
    feedback: Box<dyn FeedbackHooks>,
    result: Option<SessionResult>,
}

impl<C: Clock> Thok<C> {
    pub fn new(prompt: Prompt, mode: Mode, config: SessionConfig, clock: C) -> Self {
        Self {
            words: prompt.words,
            author: prompt.author,
            mode,
            config,
            state: TypedState::new(),
            status: SessionStatus::Idle,
            recorder: KeystrokeRecorder::new(),
            timer: SessionTimer::new(config.timer),
            started_at_ms: None,
            clock,
            feedback: Box::new(Silent),
            result: None,
        }
    }

    pub fn with_feedback(mut self, feedback: Box<dyn FeedbackHooks>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn handle_key(&mut self, key: KeyInput) -> Transition {
        if self.status == SessionStatus::Ended {
            return Transition::Ignored;
        }

        let now = self.clock.now_ms();
        if self.status == SessionStatus::Idle && self.is_printable(key) {
            self.start(now);
        }

        let transition = self.state.apply(&self.words, self.config.space_policy, key);

        match transition {
            Transition::Ignored => {}
            Transition::Erased | Transition::NextWord => {
                self.recorder.record_keystroke(key, None, now);
            }
            Transition::EndOfText => {
                self.recorder.record_keystroke(key, None, now);
                self.end_session();
            }
            Transition::Scored {
                expected,
                outcome,
                completes_text,
            } => {
                let actual = key.as_char().unwrap_or(expected);
                match outcome {
                    Outcome::Correct => self.feedback.on_correct(expected),
                    Outcome::Incorrect => {
                        self.recorder.record_mistake(expected, actual, now);
                        self.feedback.on_incorrect(expected, actual);
                    }
                }
                self.recorder.record_keystroke(key, Some(expected), now);

                if completes_text {
                    self.end_session();
                }
            }
        }

        transition
    }

    /// Keys that type content; these start an idle session even when not scored
    fn is_printable(&self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(_) => true,
            KeyInput::Space => self.config.space_policy == SpacePolicy::LineOriented,
            KeyInput::Backspace | KeyInput::Enter | KeyInput::Tab => false,
        }
    }

    fn start(&mut self, now: u64) {
        self.status = SessionStatus::Active;
        self.started_at_ms = Some(now);
        self.timer.start(now);
        info!(mode = %self.mode, words = self.words.len(), "session started");
    }

    /// Periodic tick; a no-op unless the session is running
    pub fn on_tick(&mut self) {
        if self.status != SessionStatus::Active {
            return;
        }
        if self.timer.on_tick(self.clock.now_ms()) {
            debug!("countdown expired");
            self.end_session();
        }
    }

    /// Finish the session and produce its result. Calling again returns the
    /// same result.
    pub fn end_session(&mut self) -> &SessionResult {
        let result = match self.result.take() {
            Some(result) => result,
            None => self.compute_result(),
        };
        self.status = SessionStatus::Ended;
        self.result.insert(result)
    }

    fn compute_result(&mut self) -> SessionResult {
        self.timer.cancel();
        let now = self.clock.now_ms();

        let (correct, total) = self.state.tally();
        let accuracy = if total == 0 {
            100.0
        } else {
            (correct as f64 / total as f64 * 100.0).round()
        };

        let elapsed_ms = self
            .started_at_ms
            .map_or(0, |start| now.saturating_sub(start))
            .max(MIN_ELAPSED_MS);
        let elapsed_minutes = elapsed_ms as f64 / 60_000.0;
        let wpm = ((correct as f64 / 5.0) / elapsed_minutes).round();

        let recorder = std::mem::take(&mut self.recorder);
        let analysis = SessionAnalyzer::from(recorder).analyze();

        info!(
            wpm,
            accuracy,
            elapsed_ms,
            mistakes = analysis.mistakes_count,
            rhythm = %analysis.rhythm,
            "session ended"
        );

        SessionResult {
            wpm,
            accuracy,
            elapsed_ms,
            analysis,
            words: self.words.clone(),
            author: self.author.clone(),
            space_policy: self.config.space_policy,
            mode: self.mode,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn has_started(&self) -> bool {
        self.status != SessionStatus::Idle
    }

    pub fn has_finished(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn typed_state(&self) -> &TypedState {
        &self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn recorder(&self) -> &KeystrokeRecorder {
        &self.recorder
    }

    pub fn seconds_remaining(&self) -> Option<u64> {
        self.timer.seconds_remaining()
    }

    pub fn seconds_elapsed(&self) -> u64 {
        self.timer.seconds_elapsed()
    }
}
