use ratatui::Frame;
use webbrowser::Browser;

use crate::app::{App, AppState};
use crate::clock::Clock;
use crate::session::TimerMode;
use crate::ui::{replay_view, ResultsView, TextView};

/// A UI screen boundary, one per `AppState`
pub trait Screen<C: Clock + Clone> {
    fn render(&self, app: &App<C>, f: &mut Frame);
}

pub struct TypingScreen;

impl<C: Clock + Clone> Screen<C> for TypingScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        let thok = &app.thok;
        let timer = match thok.config().timer {
            TimerMode::Countdown { .. } => thok.seconds_remaining().map(|s| s.to_string()),
            TimerMode::Stopwatch if thok.has_started() => {
                Some(format!("{}s", thok.seconds_elapsed()))
            }
            TimerMode::Stopwatch => None,
        };

        f.render_widget(
            TextView {
                words: thok.words(),
                state: thok.typed_state(),
                policy: thok.config().space_policy,
                header: timer,
                footer: thok.author().map(str::to_string),
                legend: "(tab) new / (←) restart / (esc)ape",
            },
            f.area(),
        );
    }
}

pub struct ResultsScreen;

impl<C: Clock + Clone> Screen<C> for ResultsScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        if let Some(result) = app.thok.result() {
            f.render_widget(
                ResultsView {
                    result,
                    can_share: Browser::is_available(),
                },
                f.area(),
            );
        }
    }
}

pub struct ReplayScreen;

impl<C: Clock + Clone> Screen<C> for ReplayScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        if let Some(replay) = app.replay.as_ref() {
            f.render_widget(replay_view(replay), f.area());
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<C: Clock + Clone + 'static>(state: AppState) -> Box<dyn Screen<C>> {
    match state {
        AppState::Typing => Box::new(TypingScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::Replay => Box::new(ReplayScreen),
    }
}

/// Draw whichever screen matches the app's state
pub fn draw<C: Clock + Clone + 'static>(app: &App<C>, f: &mut Frame) {
    current_screen::<C>(app.state).render(app, f);
}
