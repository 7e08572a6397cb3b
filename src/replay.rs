//! Stroke-by-stroke playback of a finished session.
//!
//! Playback is cooperative: the engine keeps at most one [`PendingAdvance`]
//! and the caller polls it with the current time. Pausing or resetting drops
//! the pending advance before touching state, and a stale handle passed to
//! [`ReplayEngine::fire`] is ignored.

use tracing::debug;

use crate::recorder::Keystroke;
use crate::typing_policy::{SpacePolicy, TypedState};
use crate::util::clamp_gap_ms;

pub const MIN_STEP_DELAY_MS: u64 = 10;
pub const MAX_STEP_DELAY_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Playing,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingAdvance {
    pub handle: u64,
    pub due_ms: u64,
    pub delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ReplayEngine {
    words: Vec<String>,
    author: Option<String>,
    space_policy: SpacePolicy,
    keystrokes: Vec<Keystroke>,
    index: usize,
    state: TypedState,
    playback: Playback,
    pending: Option<PendingAdvance>,
    next_handle: u64,
}

impl ReplayEngine {
    pub fn new(
        words: Vec<String>,
        mut keystrokes: Vec<Keystroke>,
        space_policy: SpacePolicy,
        author: Option<String>,
    ) -> Self {
        // stable, so equal timestamps keep recording order
        keystrokes.sort_by_key(|k| k.timestamp_ms);

        Self {
            words,
            author,
            space_policy,
            keystrokes,
            index: 0,
            state: TypedState::new(),
            playback: Playback::Stopped,
            pending: None,
            next_handle: 0,
        }
    }

    pub fn play(&mut self, now_ms: u64) {
        match self.playback {
            Playback::Playing => {}
            _ if self.is_finished() => {}
            Playback::Stopped => {
                debug!(keystrokes = self.keystrokes.len(), "replay started");
                self.playback = Playback::Playing;
                self.advance(now_ms);
            }
            Playback::Paused => {
                debug!(index = self.index, "replay resumed");
                self.playback = Playback::Playing;
                self.schedule(now_ms);
            }
        }
    }

    pub fn pause(&mut self) {
        if self.playback == Playback::Playing {
            self.pending = None;
            self.playback = Playback::Paused;
            debug!(index = self.index, "replay paused");
        }
    }

    pub fn toggle(&mut self, now_ms: u64) {
        if self.playback == Playback::Playing {
            self.pause();
        } else {
            self.play(now_ms);
        }
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.index = 0;
        self.state = TypedState::new();
        self.playback = Playback::Stopped;
        debug!("replay reset");
    }

    /// Fire the pending advance if it is due. Returns true if state changed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.pending {
            Some(p) if now_ms >= p.due_ms => self.fire(p.handle),
            _ => false,
        }
    }

    /// Run the advance scheduled under `handle`; stale handles are no-ops.
    /// The next advance is due relative to this one's due time, not the poll time.
    pub fn fire(&mut self, handle: u64) -> bool {
        match self.pending {
            Some(p) if p.handle == handle && self.playback == Playback::Playing => {
                self.pending = None;
                self.advance(p.due_ms);
                true
            }
            _ => false,
        }
    }

    /// Apply every remaining keystroke immediately
    pub fn run_to_end(&mut self) {
        self.pending = None;
        while self.index < self.keystrokes.len() {
            self.apply_next();
        }
        self.playback = Playback::Stopped;
    }

    fn advance(&mut self, now_ms: u64) {
        self.apply_next();
        if self.is_finished() {
            self.playback = Playback::Stopped;
            debug!("replay finished");
        } else {
            self.schedule(now_ms);
        }
    }

    fn apply_next(&mut self) {
        if let Some(k) = self.keystrokes.get(self.index) {
            self.state.apply(&self.words, self.space_policy, k.key);
            self.index += 1;
        }
    }

    fn schedule(&mut self, now_ms: u64) {
        let delay_ms = self.delay_before(self.index);
        self.next_handle += 1;
        self.pending = Some(PendingAdvance {
            handle: self.next_handle,
            due_ms: now_ms + delay_ms,
            delay_ms,
        });
    }

    /// Delay before the keystroke at `index` is applied
    pub fn delay_before(&self, index: usize) -> u64 {
        let prev = index.checked_sub(1).and_then(|i| self.keystrokes.get(i));
        match (prev, self.keystrokes.get(index)) {
            (Some(prev), Some(next)) => clamp_gap_ms(
                prev.timestamp_ms,
                next.timestamp_ms,
                MIN_STEP_DELAY_MS,
                MAX_STEP_DELAY_MS,
            ),
            _ => MIN_STEP_DELAY_MS,
        }
    }

    /// Terminal once every keystroke has been applied (immediately for an empty log)
    pub fn is_finished(&self) -> bool {
        self.index >= self.keystrokes.len()
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn pending(&self) -> Option<PendingAdvance> {
        self.pending
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.keystrokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keystrokes.is_empty()
    }

    pub fn typed_state(&self) -> &TypedState {
        &self.state
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn space_policy(&self) -> SpacePolicy {
        self.space_policy
    }

    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.keystrokes
    }
}
