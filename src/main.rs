use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use keycoach::{
    app::{App, Control},
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    language::Mode,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    ui::screen::draw,
};

const TICK_RATE_MS: u64 = 100;

/// typing practice with keystroke analysis, coaching and replay
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// number of words to use in word mode
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// number of seconds to run test
    #[clap(short = 's', long)]
    number_of_secs: Option<u64>,

    /// custom prompt to use
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// where the practice text comes from
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// word list to pull random words from
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// ring the terminal bell on mistakes
    #[clap(long)]
    bell: bool,

    /// write debug logs to this file
    #[clap(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

impl Cli {
    /// Layer command line flags over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(n) = self.number_of_words {
            config.number_of_words = n;
        }
        if self.number_of_secs.is_some() {
            config.number_of_secs = self.number_of_secs;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if self.prompt.is_some() {
            config.mode = Mode::Custom;
        }
        config.bell |= self.bell;
        config
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    let mut app = App::new(config, cli.prompt.clone(), Box::new(store), SystemClock::new())?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<SystemClock>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| draw(app, f))?;

        if app.handle_event(runner.step())? == Control::Quit {
            break;
        }
    }

    Ok(())
}
