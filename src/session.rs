use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analyzer::AnalysisReport;
use crate::language::{quotes::daily_challenge_number, Mode};
use crate::replay::ReplayEngine;
use crate::typing_policy::SpacePolicy;

const TIMER_PERIOD_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerMode {
    /// Fixed duration; reaching zero ends the session
    Countdown { secs: u64 },
    /// Counts up until the text is finished or the session is stopped
    Stopwatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub timer: TimerMode,
    pub space_policy: SpacePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timer: TimerMode::Stopwatch,
            space_policy: SpacePolicy::WordSeparated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Active,
    Ended,
}

/// The session's one-second repeating timer. Disarmed timers ignore ticks.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    mode: TimerMode,
    next_fire_ms: Option<u64>,
    seconds_elapsed: u64,
}

impl SessionTimer {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            next_fire_ms: None,
            seconds_elapsed: 0,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        self.seconds_elapsed = 0;
        self.next_fire_ms = Some(now_ms + TIMER_PERIOD_MS);
    }

    pub fn cancel(&mut self) {
        self.next_fire_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_fire_ms.is_some()
    }

    /// Fire every period that is due by `now_ms`. Returns true once a
    /// countdown has run out.
    pub fn on_tick(&mut self, now_ms: u64) -> bool {
        let Some(mut next) = self.next_fire_ms else {
            return false;
        };
        while now_ms >= next {
            self.seconds_elapsed += 1;
            next += TIMER_PERIOD_MS;
        }
        self.next_fire_ms = Some(next);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        match self.mode {
            TimerMode::Countdown { secs } => self.seconds_elapsed >= secs,
            TimerMode::Stopwatch => false,
        }
    }

    pub fn seconds_elapsed(&self) -> u64 {
        self.seconds_elapsed
    }

    pub fn seconds_remaining(&self) -> Option<u64> {
        match self.mode {
            TimerMode::Countdown { secs } => Some(secs.saturating_sub(self.seconds_elapsed)),
            TimerMode::Stopwatch => None,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub wpm: f64,
    pub accuracy: f64,
    pub elapsed_ms: u64,
    pub analysis: AnalysisReport,
    pub words: Vec<String>,
    pub author: Option<String>,
    pub space_policy: SpacePolicy,
    pub mode: Mode,
}

impl SessionResult {
    /// A fresh replay of this session; the result itself is never touched
    pub fn replay(&self) -> ReplayEngine {
        ReplayEngine::new(
            self.words.clone(),
            self.analysis.keystrokes.clone(),
            self.space_policy,
            self.author.clone(),
        )
    }

    pub fn share_text(&self, date: NaiveDate) -> String {
        let label = match self.mode {
            Mode::Daily => format!("daily #{}", daily_challenge_number(date)),
            mode => mode.to_string().to_lowercase(),
        };
        format!(
            "keycoach {} {}: {} wpm | {}% acc | {}% consistency",
            label,
            date.format("%Y-%m-%d"),
            self.wpm,
            self.accuracy,
            self.analysis.consistency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SessionAnalyzer;

    #[test]
    fn test_disarmed_timer_ignores_ticks() {
        let mut timer = SessionTimer::new(TimerMode::Countdown { secs: 1 });

        assert!(!timer.on_tick(10_000));
        assert_eq!(timer.seconds_elapsed(), 0);

        timer.start(0);
        timer.cancel();
        assert!(!timer.on_tick(10_000));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_countdown_expires_at_one_second_granularity() {
        let mut timer = SessionTimer::new(TimerMode::Countdown { secs: 3 });
        timer.start(500);

        assert!(!timer.on_tick(1_400));
        assert_eq!(timer.seconds_remaining(), Some(3));
        assert!(!timer.on_tick(1_500));
        assert_eq!(timer.seconds_remaining(), Some(2));
        assert!(timer.on_tick(3_600));
        assert_eq!(timer.seconds_remaining(), Some(0));
    }

    #[test]
    fn test_stopwatch_never_expires() {
        let mut timer = SessionTimer::new(TimerMode::Stopwatch);
        timer.start(0);

        assert!(!timer.on_tick(120_000));
        assert_eq!(timer.seconds_elapsed(), 120);
        assert_eq!(timer.seconds_remaining(), None);
    }

    #[test]
    fn test_share_text_daily_includes_challenge_number() {
        let result = SessionResult {
            wpm: 64.0,
            accuracy: 97.0,
            elapsed_ms: 30_000,
            analysis: SessionAnalyzer::new(vec![], vec![]).analyze(),
            words: vec!["hi".to_string()],
            author: Some("Someone".to_string()),
            space_policy: SpacePolicy::WordSeparated,
            mode: Mode::Daily,
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        assert_eq!(
            result.share_text(date),
            "keycoach daily #3 2024-01-03: 64 wpm | 97% acc | 100% consistency"
        );
    }
}
