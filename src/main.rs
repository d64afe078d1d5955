use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tasklist::config::{Backend, Config};
use tasklist::terminal::TerminalPresenter;
use tasklist::{
    EditOutcome, FileStorage, Filter, MemoryStorage, Selector, Session, SlotStorage, SqliteStorage, TaskError,
    TaskId, TaskStore, Theme, shell,
};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "tasklist - a persistent to-do list for the terminal")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory holding the task data (default: from config, else the platform data dir)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Storage backend (default: from config, else file)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Path to the config file (default: <config dir>/tasklist/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep tasks in memory only; nothing is saved
    #[arg(long)]
    ephemeral: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show tasks
    List {
        #[arg(short, long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },

    /// Toggle a task between active and completed
    Toggle(Target),

    /// Replace a task's text (blank text deletes the task)
    Edit {
        #[command(flatten)]
        target: Target,

        text: Vec<String>,
    },

    /// Delete a task
    Delete(Target),

    /// Remove all completed tasks
    ClearCompleted,

    /// Add sample tasks
    Sample,

    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },

    /// Interactive shell
    Shell,
}

#[derive(Args)]
struct Target {
    /// Task number as shown by `list`, or a task id with --id
    task: String,

    /// Treat TASK as a task id
    #[arg(long)]
    id: bool,

    /// View the task number refers to
    #[arg(short, long, value_enum, default_value_t = Filter::All)]
    filter: Filter,
}

impl Target {
    fn selector(&self) -> Result<Selector> {
        if self.id {
            let Ok(id) = self.task.parse::<TaskId>();
            return Ok(Selector::Id(id));
        }
        let position = self.task.parse::<usize>().map_err(|_| {
            eyre!(
                "Invalid task number: {} (use --id to address a task by id)",
                self.task
            )
        })?;
        Ok(Selector::Position(position))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    On,
    Off,
    Toggle,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing
    let level = match cli.verbose {
        0 => config
            .log_level
            .parse::<LevelFilter>()
            .map_err(|e| eyre!("Invalid log_level {:?} in config: {}", config.log_level, e))?,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }

    let storage = open_storage(&cli, &config)?;
    let store = TaskStore::open(storage).context("Failed to load tasks")?;

    let presenter = match cli.command {
        Commands::Shell => TerminalPresenter::stdout().with_sample_hint("Type `sample` to add sample tasks."),
        _ => TerminalPresenter::stdout(),
    };
    let mut session = Session::new(store, presenter);

    let outcome = match cli.command {
        Commands::Add { text } => session.add(&text.join(" ")).map(|_| ()),
        Commands::List { filter } => {
            session.set_filter(filter);
            Ok(())
        }
        Commands::Toggle(target) => {
            let mut session = session.with_filter(target.filter);
            let result = session.toggle(&target.selector()?);
            if let Ok(None) = result {
                not_found(&target);
            }
            result.map(|_| ())
        }
        Commands::Edit { target, text } => {
            let mut session = session.with_filter(target.filter);
            let result = session.edit(&target.selector()?, &text.join(" "));
            if let Ok(EditOutcome::NotFound) = result {
                not_found(&target);
            }
            result.map(|_| ())
        }
        Commands::Delete(target) => {
            let mut session = session.with_filter(target.filter);
            let result = session.delete(&target.selector()?);
            if let Ok(false) = result {
                not_found(&target);
            }
            result.map(|_| ())
        }
        Commands::ClearCompleted => session.clear_completed().map(|_| ()),
        Commands::Sample => session.add_samples().map(|_| ()),
        Commands::Theme { mode } => {
            match mode {
                Some(ThemeMode::On) => session.set_theme(Theme::Dark),
                Some(ThemeMode::Off) => session.set_theme(Theme::Light),
                Some(ThemeMode::Toggle) => session.toggle_theme(),
                None => println!("{}", if session.theme().is_dark() { "dark" } else { "light" }),
            }
            Ok(())
        }
        Commands::Shell => {
            let stdin = io::stdin();
            shell::run(&mut session, stdin.lock(), io::stdout())?;
            Ok(())
        }
    };

    // The presenter has already shown the message
    Ok(ExitCode::from(exit_status(&outcome)))
}

/// Rejected input and failed saves both exit non-zero so scripts can tell
fn exit_status(outcome: &Result<(), TaskError>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(TaskError::EmptyInput | TaskError::NothingToClear | TaskError::PersistenceFailure { .. }) => 1,
    }
}

fn open_storage(cli: &Cli, config: &Config) -> Result<Box<dyn SlotStorage>> {
    if cli.ephemeral {
        return Ok(Box::new(MemoryStorage::new()));
    }

    let dir = cli
        .store_path
        .clone()
        .unwrap_or_else(|| config.resolved_data_dir());

    let storage: Box<dyn SlotStorage> = match cli.backend.unwrap_or(config.backend) {
        Backend::File => Box::new(FileStorage::open(&dir)?),
        Backend::Sqlite => Box::new(SqliteStorage::open(&dir)?),
    };
    Ok(storage)
}

fn not_found(target: &Target) {
    let what = if target.id {
        format!("No task with id {}", target.task)
    } else {
        format!("No task number {} in the {} view", target.task, target.filter)
    };
    eprintln!("{}", what.yellow());
}
