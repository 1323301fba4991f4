pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::{mpsc::Sender, Arc},
    time::Instant,
};
use tracing::{info, warn};

use hexle::{
    app_dirs::AppDirs,
    cache::{CacheStore, FileCacheStore, ResultCache},
    config::{Config, ConfigStore, FileConfigStore},
    dictionary::{Dictionary, HttpDictionary, LookupResponse, OfflineDictionary, Validator},
    game::{Game, Key, Resolution},
    logging::init_tracing,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    words::WordBank,
};

use crate::ui::screen::current_screen;

/// spooky multi-round word guessing in the terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Guess a 5, 7 and 9 letter word against the clock. Guesses are checked against an online dictionary, with the built-in answer list as an offline fallback."
)]
pub struct Cli {
    /// skip the online dictionary, only listed answers are accepted
    #[clap(long)]
    offline: bool,

    /// base url of the dictionary service
    #[clap(long)]
    dictionary_url: Option<String>,

    /// path to a config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// max number of dictionary answers remembered between runs
    #[clap(long)]
    cache_capacity: Option<usize>,

    /// write the effective config to the config path and exit
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line values win over the config file
    fn apply(&self, mut config: Config) -> Config {
        if self.offline {
            config.offline = true;
        }
        if let Some(url) = &self.dictionary_url {
            config.dictionary_url = url.clone();
        }
        if let Some(capacity) = self.cache_capacity {
            config.cache_capacity = capacity;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

pub struct App {
    pub game: Game,
    pub validator: Validator,
}

impl App {
    pub fn new(config: &Config, cache_store: Box<dyn CacheStore>) -> Result<Self, Box<dyn Error>> {
        let mut words = WordBank::embedded(&config.word_list)?;
        for (length, extra) in &config.extra_words {
            if let Err(e) = words.add_words(*length, extra) {
                warn!(error = %e, "ignoring extra words");
            }
        }

        let dictionary: Arc<dyn Dictionary> = if config.offline {
            info!("offline, only listed answers are accepted");
            Arc::new(OfflineDictionary)
        } else {
            Arc::new(HttpDictionary::new(config.dictionary_url.as_str())?)
        };
        let cache = ResultCache::load(config.cache_capacity, cache_store);

        Ok(Self {
            game: Game::new(config.rounds.clone(), Box::new(words), Instant::now())?,
            validator: Validator::new(dictionary, cache),
        })
    }

    /// Feed a key to the game. A guess that needs checking is answered from
    /// the cache right away, otherwise the lookup result arrives on `tx`.
    pub fn press(&mut self, key: Key, now: Instant, tx: &Sender<GameEvent>) {
        let Some(request) = self.game.handle_key(key, now) else {
            return;
        };

        let tx = tx.clone();
        let cached = self.validator.dispatch(request, move |response| {
            let _ = tx.send(GameEvent::Lookup(response));
        });
        if let Some(response) = cached {
            self.game.resolve_lookup(&response, now);
        }
    }

    pub fn on_lookup(&mut self, response: &LookupResponse, now: Instant) -> Resolution {
        self.validator.record(&response.word, response.validation);
        self.game.resolve_lookup(response, now)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&AppDirs::log_path()) {
        eprintln!("logging disabled: {e}");
    }

    let store = cli.config_store();
    let config = cli.apply(store.load());

    if cli.save_config {
        store.save(&config)?;
        println!("{}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(&config, Box::new(FileCacheStore::new()))?;
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_interval()),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug, PartialEq)]
enum ExitType {
    Continue,
    Quit,
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let tx = runner.sender();

    loop {
        terminal.draw(|f| ui(app, f))?;

        let event = runner.step();
        if handle_event(app, event, Instant::now(), &tx) == ExitType::Quit {
            break;
        }
    }

    info!("quit");
    Ok(())
}

fn handle_event(
    app: &mut App,
    event: GameEvent,
    now: Instant,
    tx: &Sender<GameEvent>,
) -> ExitType {
    // timers first, then the event itself
    app.game.on_tick(now);

    match event {
        GameEvent::Tick | GameEvent::Resize => {}
        GameEvent::Lookup(response) => {
            app.on_lookup(&response, now);
        }
        GameEvent::Key(key) => return handle_key_event(app, key, now, tx),
    }
    ExitType::Continue
}

fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    now: Instant,
    tx: &Sender<GameEvent>,
) -> ExitType {
    if key.kind != KeyEventKind::Press {
        return ExitType::Continue;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return ExitType::Quit,
        // ctrl+c to quit
        KeyCode::Char('c') if ctrl => return ExitType::Quit,
        KeyCode::Char('r') if ctrl => app.game.restart(now),
        _ if ctrl => {}
        code => {
            if let Some(key) = to_game_key(code) {
                app.press(key, now, tx);
            }
        }
    }
    ExitType::Continue
}

fn to_game_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() => Some(Key::Letter(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(&app.game).render(app, f);
}
