use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};
use webbrowser::Browser;

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ConfigStore};
use crate::error::Result;
use crate::feedback::{FeedbackHooks, Silent, TerminalBell};
use crate::language::{Mode, Prompt};
use crate::replay::ReplayEngine;
use crate::runtime::{key_input, AppEvent};
use crate::session::SessionConfig;
use crate::thok::Thok;
use crate::util::encode_query;
use crate::word_generator::{WordGenConfig, WordGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
    Replay,
}

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App<C: Clock + Clone = SystemClock> {
    pub config: Config,
    pub thok: Thok<C>,
    pub state: AppState,
    pub replay: Option<ReplayEngine>,
    custom_prompt: Option<String>,
    clock: C,
    store: Box<dyn ConfigStore>,
}

impl<C: Clock + Clone> App<C> {
    /// `config` already carries CLI overrides; `store` only sees mode changes
    pub fn new(
        config: Config,
        custom_prompt: Option<String>,
        store: Box<dyn ConfigStore>,
        clock: C,
    ) -> Result<Self> {
        let prompt = WordGenerator::new(word_gen_config(&config, &custom_prompt)).generate_prompt()?;
        let thok = build_thok(&config, prompt, clock.clone());

        Ok(Self {
            config,
            thok,
            state: AppState::Typing,
            replay: None,
            custom_prompt,
            clock,
            store,
        })
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<Control> {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Tick => {
                self.on_tick();
                Ok(Control::Continue)
            }
            AppEvent::Resize => Ok(Control::Continue),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Result<Control> {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if key.code == KeyCode::Esc || ctrl_c {
            return Ok(Control::Quit);
        }

        match key.code {
            KeyCode::Tab => return self.restart_new().map(|_| Control::Continue),
            KeyCode::Left => {
                self.restart_same();
                return Ok(Control::Continue);
            }
            _ => {}
        }

        match self.state {
            AppState::Typing => {
                if let Some(input) = key_input(&key) {
                    self.thok.handle_key(input);
                }
            }
            AppState::Results => match key.code {
                KeyCode::Char('p') => self.open_replay(),
                KeyCode::Char('n') => self.restart_new()?,
                KeyCode::Char('r') => self.restart_same(),
                KeyCode::Char('m') => self.cycle_mode()?,
                KeyCode::Char('t') => self.share()?,
                _ => {}
            },
            AppState::Replay => {
                let now = self.clock.now_ms();
                match key.code {
                    KeyCode::Char(' ') => {
                        if let Some(replay) = self.replay.as_mut() {
                            replay.toggle(now);
                        }
                    }
                    KeyCode::Char('x') => {
                        if let Some(replay) = self.replay.as_mut() {
                            replay.reset();
                        }
                    }
                    KeyCode::Char('e') => {
                        if let Some(replay) = self.replay.as_mut() {
                            replay.run_to_end();
                        }
                    }
                    KeyCode::Char('b') | KeyCode::Backspace => {
                        self.replay = None;
                        self.state = AppState::Results;
                    }
                    _ => {}
                }
            }
        }

        Ok(Control::Continue)
    }

    /// A finished session stays on the typing screen for one tick so the
    /// final keystroke is drawn before results replace it.
    pub fn on_tick(&mut self) {
        match self.state {
            AppState::Typing => {
                if self.thok.has_finished() {
                    self.state = AppState::Results;
                } else {
                    self.thok.on_tick();
                }
            }
            AppState::Replay => {
                let now = self.clock.now_ms();
                if let Some(replay) = self.replay.as_mut() {
                    while replay.poll(now) {}
                }
            }
            AppState::Results => {}
        }
    }

    pub fn restart_new(&mut self) -> Result<()> {
        let prompt =
            WordGenerator::new(word_gen_config(&self.config, &self.custom_prompt)).generate_prompt()?;
        self.start(prompt);
        Ok(())
    }

    pub fn restart_same(&mut self) {
        let prompt = Prompt {
            words: self.thok.words().to_vec(),
            author: self.thok.author().map(str::to_string),
            space_policy: self.thok.config().space_policy,
        };
        self.start(prompt);
    }

    fn start(&mut self, prompt: Prompt) {
        self.thok = build_thok(&self.config, prompt, self.clock.clone());
        self.replay = None;
        self.state = AppState::Typing;
    }

    fn open_replay(&mut self) {
        if let Some(result) = self.thok.result() {
            let mut replay = result.replay();
            replay.play(self.clock.now_ms());
            self.replay = Some(replay);
            self.state = AppState::Replay;
        }
    }

    /// Move to the next mode, remember it, and start a session in it
    pub fn cycle_mode(&mut self) -> Result<()> {
        self.config.mode = self.config.mode.next();
        info!(mode = %self.config.mode, "mode changed");

        let mut stored = self.store.load();
        stored.mode = self.config.mode;
        self.store.save(&stored)?;

        self.restart_new()
    }

    pub fn share_text(&self) -> Option<String> {
        self.thok
            .result()
            .map(|r| r.share_text(Local::now().date_naive()))
    }

    fn share(&self) -> Result<()> {
        if let Some(text) = self.share_text() {
            if Browser::is_available() {
                debug!(%text, "sharing result");
                webbrowser::open(&format!(
                    "https://twitter.com/intent/tweet?text={}",
                    encode_query(&text)
                ))?;
            }
        }
        Ok(())
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn word_gen_config(config: &Config, custom_prompt: &Option<String>) -> WordGenConfig {
    WordGenConfig {
        mode: config.mode,
        number_of_words: config.number_of_words,
        custom_prompt: custom_prompt.clone(),
        language: config.language.clone(),
    }
}

fn build_thok<C: Clock>(config: &Config, prompt: Prompt, clock: C) -> Thok<C> {
    let session = SessionConfig {
        timer: config.timer_mode(),
        space_policy: prompt.space_policy,
    };
    let feedback: Box<dyn FeedbackHooks> = if config.bell {
        Box::new(TerminalBell::new(std::io::stdout()))
    } else {
        Box::new(Silent)
    };

    Thok::new(prompt, config.mode, session, clock).with_feedback(feedback)
}
