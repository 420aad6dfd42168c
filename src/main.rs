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
    io::{self, stdin},
    path::PathBuf,
};
use tracing::info;
use typing_jail::{
    config::{FileGoalStore, GoalStore},
    logging,
    runtime::{CrosstermEventSource, SystemClock},
    session::{Session, SessionEnd},
    source::{FileSource, TextSource, WikipediaSource},
};

/// type until you reach your wpm goal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing drill that keeps presenting fresh text until you type it at or above your WPM goal with at least 95% accuracy. Esc quits at any time."
)]
pub struct Cli {
    /// save a new wpm goal and exit
    #[clap(long = "set-wpm", value_name = "WPM")]
    set_wpm: Option<u32>,

    /// path to a text, pdf or epub file to practice with instead of random wikipedia text
    #[clap(long = "import-text", value_name = "PATH")]
    import_text: Option<PathBuf>,
}

impl Cli {
    fn text_source(&self) -> Box<dyn TextSource> {
        match &self.import_text {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(WikipediaSource::new()),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init();

    let store = FileGoalStore::new();
    if let Some(goal) = cli.set_wpm {
        store.save_goal(goal)?;
        println!("WPM goal set to {goal}");
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let goal = store.load_goal();
    info!(goal, "starting session");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let mut session = Session::new(
        terminal,
        CrosstermEventSource::new(),
        SystemClock,
        cli.text_source(),
        goal,
    );
    let outcome = session.run();

    let mut terminal = session.into_terminal();
    restore_terminal(&mut terminal)?;

    match outcome? {
        SessionEnd::GoalMet => info!("goal met, exiting"),
        SessionEnd::Cancelled => info!("cancelled, exiting"),
    }

    Ok(())
}

fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
