use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use endgame::{
    app::{App, Control},
    config::{Config, ConfigStore, FileConfigStore},
    game::GameState,
    logging,
    runtime::{spawn_terminal_reader, EventQueue, FixedTicker, Runner, ThreadScheduler},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const FRAME_RATE_MS: u64 = 100;

/// guess the word before the clock runs out or Assembly takes over
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess the hidden word one letter at a time. Every wrong guess costs a programming language; lose them all, or run out of time, and Assembly wins."
)]
pub struct Cli {
    /// seconds on the countdown clock
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// wrong guesses allowed before the game is lost (default: one less than the number of languages)
    #[clap(short = 'g', long)]
    max_wrong_guesses: Option<usize>,

    /// newline-delimited word list to use instead of the built-in one
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// seed for word selection, for reproducible games
    #[clap(long)]
    seed: Option<u64>,

    /// config file to read (and write with --save)
    #[clap(long)]
    config: Option<PathBuf>,

    /// persist the effective settings to the config file
    #[clap(long)]
    save: bool,
}

impl Cli {
    /// Apply command line overrides on top of the stored config
    fn merge_into(&self, mut cfg: Config) -> Config {
        if let Some(secs) = self.seconds {
            cfg.initial_seconds = secs;
        }
        if self.max_wrong_guesses.is_some() {
            cfg.max_wrong_guesses = self.max_wrong_guesses;
        }
        if self.words.is_some() {
            cfg.word_list.clone_from(&self.words);
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        cfg
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = logging::init() {
        log::info!("logging to {}", path.display());
    }

    let store = cli.config_store();
    let cfg = cli.merge_into(store.load());
    if cli.save {
        store.save(&cfg)?;
        log::info!("saved settings to {}", store.path().display());
    }

    // fail fast on a bad word list or budget, before touching the terminal
    let queue = EventQueue::new();
    let scheduler = ThreadScheduler::new(queue.sender());
    let game = GameState::with_scheduler(cfg.to_game_config()?, Box::new(scheduler))?;
    let mut app = App::new(game);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_terminal_reader(queue.sender());
    let runner = Runner::new(queue, FixedTicker::new(Duration::from_millis(FRAME_RATE_MS)));
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<EventQueue, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match app.handle_event(runner.step()) {
            Control::Quit => break,
            Control::Redraw => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            Control::Continue => {}
        }
    }

    log::info!(
        "quit during session {} ({})",
        app.game.session_id(),
        app.game.session_status()
    );
    Ok(())
}
