mod ui;

use std::error::Error;
use std::io::{self, stdin};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

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

use polytype::{
    config::{Config, ConfigStore, FileConfigStore},
    generator::{BuiltinGenerator, Difficulty, Language, TextGenerator},
    keyboard::{self, KeyPressSet},
    runtime::{spawn_input_pump, AppEvent, EventBus, Ticker},
    session::{Event, Phase, Session},
    sound::{CueKind, Silent, SoundCue, TerminalBell},
};

/// multilingual typing practice with strict no-correction mode
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Typing practice against generated passages in seven languages. Corrections are disabled: accepted input only ever grows, and the on-screen keyboard hints the next expected key."
)]
pub struct Cli {
    /// language to practice in (defaults to the saved preference)
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// passage difficulty (defaults to the saved preference)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// disable audible feedback
    #[clap(long)]
    no_sound: bool,

    /// custom passage to type instead of a generated one
    #[clap(short = 'p', long)]
    text: Option<String>,
}

pub struct App {
    pub session: Session,
    pub language: Language,
    pub difficulty: Difficulty,
    pub pressed: KeyPressSet,
    pub should_quit: bool,
    custom_text: Option<String>,
    generator: Arc<dyn TextGenerator + Send + Sync>,
    sound: Box<dyn SoundCue>,
    ticker: Ticker,
    tx: Sender<AppEvent>,
}

impl App {
    pub fn new(cli: &Cli, config: &Config, tx: Sender<AppEvent>) -> Self {
        let sound: Box<dyn SoundCue> = if config.sound {
            Box::new(TerminalBell)
        } else {
            Box::new(Silent)
        };

        Self {
            session: Session::default(),
            language: config.language,
            difficulty: config.difficulty,
            pressed: KeyPressSet::new(),
            should_quit: false,
            custom_text: cli.text.clone(),
            generator: Arc::new(BuiltinGenerator),
            sound,
            ticker: Ticker::new(tx.clone()),
            tx,
        }
    }

    /// Run one event through the reducer, play its cues, and keep the
    /// tick armed exactly while the session is playing.
    pub fn dispatch(&mut self, event: Event) {
        let was = self.session.phase;
        let transition = self.session.apply(event);
        self.session = transition.session;
        for cue in transition.cues {
            self.sound.play(cue);
        }

        let now = self.session.phase;
        if now == Phase::Playing && was != Phase::Playing {
            self.ticker.start();
        }
        if now != Phase::Playing && was == Phase::Playing {
            self.ticker.stop();
        }
    }

    /// Enter Loading and hand generation to a worker thread. The UI
    /// ignores the triggering bindings while Loading, so at most one
    /// load is in flight.
    pub fn request_new_text(&mut self) {
        if self.session.phase == Phase::Loading {
            return;
        }
        self.dispatch(Event::RequestText);
        if self.session.phase != Phase::Loading {
            return;
        }

        if let Some(text) = self.custom_text.clone() {
            let _ = self.tx.send(AppEvent::TextReady(text));
            return;
        }

        let tx = self.tx.clone();
        let generator = Arc::clone(&self.generator);
        let (language, difficulty) = (self.language, self.difficulty);
        thread::spawn(move || {
            let text = generator.generate(language, difficulty);
            let _ = tx.send(AppEvent::TextReady(text));
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            if let Some(code) = keyboard::physical_code(key.code) {
                self.pressed.release(code);
            }
            return;
        }
        // Most terminals never report key releases, so the held-key
        // display keeps only the newest press.
        self.pressed.clear();
        if let Some(code) = keyboard::physical_code(key.code) {
            self.pressed.press(code);
        }

        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        // Deletion and navigation keys never become candidates; the
        // attempt itself is the event.
        if keyboard::is_blocked(key.code) {
            if matches!(self.session.phase, Phase::Idle | Phase::Playing) {
                self.sound.play(CueKind::Delete);
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.request_new_text(),
            KeyCode::Enter => match self.session.phase {
                Phase::Playing => self.dispatch(Event::Finish),
                Phase::Finished => self.dispatch(Event::Restart),
                _ => {}
            },
            KeyCode::Char(c) => match self.session.phase {
                Phase::Idle | Phase::Playing => {
                    let mut candidate = self.session.accepted_input.clone();
                    candidate.push(c);
                    self.dispatch(Event::Input(candidate));
                }
                Phase::Finished => match c {
                    'r' => self.dispatch(Event::Restart),
                    'n' => self.request_new_text(),
                    _ => {}
                },
                Phase::Loading => {}
            },
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if cli.no_sound {
        config.sound = false;
    }
    let save_result = store.save(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let bus = EventBus::new();
    spawn_input_pump(bus.sender());

    let mut app = App::new(&cli, &config, bus.sender());
    app.request_new_text();

    let res = run(&mut terminal, &mut app, &bus);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = save_result {
        eprintln!("warning: could not save preferences: {err}");
    }

    res
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    bus: &EventBus,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| draw(app, f))?;

        match bus.recv()? {
            AppEvent::Tick => app.dispatch(Event::Tick),
            AppEvent::Resize => {}
            AppEvent::TextReady(text) => app.dispatch(Event::TextResolved(text)),
            AppEvent::Key(key) => app.handle_key(key),
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
