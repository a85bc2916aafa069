pub mod config;
pub mod metrics;
pub mod reconcile;
pub mod runtime;
pub mod session;
pub mod snippet;
pub mod ui;
pub mod viewport;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{AppEvent, CrosstermEventSource, Runner},
    session::Session,
    snippet::{Snippet, SnippetLibrary, SupportedLanguage},
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// practice typing real code snippets in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing-practice TUI for code: pick a built-in snippet or bring your own file, type it back with per-character feedback, and watch your live WPM. The clock auto-pauses when you stop typing."
)]
pub struct Cli {
    /// language to pull built-in snippets from
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// id of the snippet to practice (see --list)
    #[clap(short = 's', long)]
    snippet: Option<String>,

    /// practice the contents of a text file instead of a built-in snippet
    #[clap(short = 'f', long)]
    file: Option<std::path::PathBuf>,

    /// number of snippet lines visible at once
    #[clap(long)]
    visible_lines: Option<usize>,

    /// list available snippets for the chosen language and exit
    #[clap(long)]
    list: bool,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub library: SnippetLibrary,
}

impl App {
    pub fn new(cli: &Cli, config: &Config) -> Result<Self, Box<dyn Error>> {
        let language = resolve_language(cli, config);
        let visible_lines = cli.visible_lines.unwrap_or(config.visible_lines).max(1);

        let mut library = SnippetLibrary::new(language);

        let snippet = if let Some(path) = &cli.file {
            let uploaded = Snippet::from_file(path)?;
            library.add_uploaded(uploaded.clone());
            uploaded
        } else if let Some(id) = &cli.snippet {
            library
                .find(id)
                .ok_or_else(|| format!("no snippet with id '{id}' for {language}"))?
        } else {
            library
                .default_snippet()
                .ok_or_else(|| format!("no built-in snippets for {language}"))?
        };

        Ok(Self {
            session: Session::new(snippet, visible_lines),
            library,
        })
    }

    /// Start the current snippet over.
    pub fn restart(&mut self) {
        self.session.reset();
    }

    /// Move to the next snippet in the library, wrapping at the end.
    pub fn next_snippet(&mut self) {
        if let Some(next) = self.library.next_after(&self.session.snippet.id) {
            self.session.replace_snippet(next);
        }
    }
}

fn resolve_language(cli: &Cli, config: &Config) -> SupportedLanguage {
    cli.language.unwrap_or_else(|| {
        SupportedLanguage::from_str(&config.language, true).unwrap_or(SupportedLanguage::Python)
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = store.load();

    if cli.list {
        let language = resolve_language(&cli, &config);
        println!("{language} snippets:");
        for snippet in SnippetLibrary::new(language).available() {
            println!("  {:<6} {}", snippet.id, snippet.name);
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(&cli, &config)?;

    // remember the effective choices for the next run
    let _ = store.save(&Config {
        language: app.library.language().to_string().to_lowercase(),
        visible_lines: cli.visible_lines.unwrap_or(config.visible_lines).max(1),
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_tui<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick => {
                app.session.on_tick();
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Backspace => app.session.backspace(),
                KeyCode::Enter => app.session.enter(),
                KeyCode::Tab => app.session.tab(),
                KeyCode::Left => app.restart(),
                KeyCode::Right => app.next_snippet(),
                KeyCode::Char(c) => app.session.type_char(c),
                _ => {}
            },
        }
    }

    Ok(())
}
