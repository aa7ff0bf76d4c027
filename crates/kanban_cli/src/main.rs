//! Command-line host for the board engine.
//!
//! # Responsibility
//! - Drive `kanban_core` against a SQLite file without a graphical UI.
//! - Treat each invocation as one turn: load, handle gestures, end the turn,
//!   print the resulting snapshot.

use clap::{Parser, Subcommand};
use kanban_core::db::{open_db, DbError};
use kanban_core::{
    default_log_level, init_logging, Board, BoardError, BoardEvent, CardKey, DescriptionDialog,
    DialogSave, ListKey, LoggingError, PersistenceStore, RepoError, SqliteStateRepository,
    StateRepository, STATE_KEY,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "kanban.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "kanban", version, about = "Persisted kanban board")]
struct Cli {
    /// SQLite file holding the board state.
    #[arg(long, default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the board snapshot.
    Show,
    /// Print version and storage details.
    Info,
    AddList {
        title: Option<String>,
    },
    AddCard {
        list_id: String,
        title: Option<String>,
    },
    RenameList {
        list_id: String,
        title: String,
    },
    RenameCard {
        card_id: String,
        title: String,
    },
    /// Replace a card's description.
    Describe {
        card_id: String,
        text: String,
    },
    /// Drag a card onto the tail of another list.
    Move {
        card_id: String,
        list_id: String,
    },
    RemoveList {
        list_id: String,
    },
    RemoveCard {
        card_id: String,
    },
    /// Replace the board with a snapshot JSON file.
    Import {
        path: PathBuf,
    },
    /// Remove all lists and cards.
    Clear,
}

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
    Board(BoardError),
    Io(std::io::Error),
    UnknownList(String),
    UnknownCard(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Board(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::UnknownList(id) => write!(f, "no list with id `{id}`"),
            Self::UnknownCard(id) => write!(f, "no card with id `{id}`"),
        }
    }
}

impl Error for CliError {}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<BoardError> for CliError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Dialog stand-in: the description arrives on the command line.
#[derive(Debug, Default)]
struct HeadlessDialog {
    open: bool,
}

impl DescriptionDialog for HeadlessDialog {
    fn open(&mut self, _current: Option<&str>) {
        self.open = true;
    }

    fn close(&mut self) {
        self.open = false;
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = open_db(&cli.db)?;
    let repo = SqliteStateRepository::try_new(&conn)?;
    let mut board = Board::new(PersistenceStore::new(repo));
    board.load_state();

    if let Command::Info = cli.command {
        println!("kanban_core version={}", kanban_core::core_version());
        println!("db={} key={STATE_KEY}", cli.db.display());
        println!(
            "lists={} cards={}",
            board.state().lists.len(),
            board.state().card_count()
        );
        return Ok(());
    }

    apply_command(&mut board, cli.command)?;
    if board.end_turn() {
        info!("event=cli_turn module=cli status=saved");
    }
    print_snapshot(&mut board);
    Ok(())
}

fn apply_command<R: StateRepository>(
    board: &mut Board<R>,
    command: Command,
) -> Result<(), CliError> {
    match command {
        Command::Show | Command::Info => {}
        Command::AddList { title } => {
            board.add_list(title.as_deref());
        }
        Command::AddCard { list_id, title } => {
            let list = resolve_list(board, &list_id)?;
            board.add_card(list, title.as_deref())?;
        }
        Command::RenameList { list_id, title } => {
            let list = resolve_list(board, &list_id)?;
            board.dispatch(BoardEvent::ListTitleFocused { list })?;
            board.dispatch(BoardEvent::ListTitleInput { list, text: title })?;
            board.dispatch(BoardEvent::ListTitleBlurred { list })?;
        }
        Command::RenameCard { card_id, title } => {
            let card = resolve_card(board, &card_id)?;
            board.dispatch(BoardEvent::CardTitleFocused { card })?;
            board.dispatch(BoardEvent::CardTitleInput { card, text: title })?;
            board.dispatch(BoardEvent::CardTitleBlurred { card })?;
        }
        Command::Describe { card_id, text } => {
            let card = resolve_card(board, &card_id)?;
            let mut dialog = HeadlessDialog::default();
            board.open_card_details(card, &mut dialog)?;
            board.apply_dialog_save(card, DialogSave::new(text, true), &mut dialog)?;
        }
        Command::Move { card_id, list_id } => {
            let card = resolve_card(board, &card_id)?;
            let list = resolve_list(board, &list_id)?;
            board.dispatch(BoardEvent::DragStarted { card })?;
            board.dispatch(BoardEvent::DragEntered { list })?;
            board.dispatch(BoardEvent::Dropped { list })?;
            board.dispatch(BoardEvent::DragEnded { card })?;
        }
        Command::RemoveList { list_id } => {
            let list = resolve_list(board, &list_id)?;
            board.dispatch(BoardEvent::RemoveListClicked { list })?;
        }
        Command::RemoveCard { card_id } => {
            let card = resolve_card(board, &card_id)?;
            board.dispatch(BoardEvent::CardRemoveClicked { card })?;
        }
        Command::Import { path } => {
            let payload = std::fs::read_to_string(path)?;
            if !board.restore_from_json(&payload) {
                eprintln!("warning: snapshot could not be decoded; board is now empty");
            }
            board.request_recapture();
        }
        Command::Clear => board.dispatch(BoardEvent::ClearConfirmed)?,
    }
    Ok(())
}

fn resolve_list<R: StateRepository>(board: &Board<R>, id: &str) -> Result<ListKey, CliError> {
    board
        .find_list_by_id(id)
        .ok_or_else(|| CliError::UnknownList(id.to_string()))
}

fn resolve_card<R: StateRepository>(board: &Board<R>, id: &str) -> Result<CardKey, CliError> {
    board
        .find_card_by_id(id)
        .ok_or_else(|| CliError::UnknownCard(id.to_string()))
}

fn print_snapshot<R: StateRepository>(board: &mut Board<R>) {
    let snapshot = board.capture_state();
    match serde_json::to_string_pretty(snapshot) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("error: failed to render snapshot: {err}"),
    }
}
