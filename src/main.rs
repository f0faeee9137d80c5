use clap::{ArgAction, Parser, Subcommand};
use eyre::Result;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use todostore::cli::{TaskCommand, execute};
use todostore::{Config, Session, Store, shell};
use tracing::debug;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "todostore - Local to-do list with priorities, due dates and smart sorting")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the SQLite database (default: from config, then the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Task(TaskCommand),

    /// Interactive shell with undo for deletes
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.resolve_log_level(cli.verbose))
        .init();

    colored::control::set_override(config.resolve_color(cli.no_color));

    let db_path = config.resolve_db_path(cli.db)?;
    debug!(db = ?db_path, "Opening store");
    let mut session = Session::new(Store::open(&db_path)?);

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Task(command) => execute(&mut session, command, &mut stdout)?,
        Commands::Shell => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            shell::run(&mut session, stdin.lock(), &mut stdout, interactive)?;
        }
    }

    Ok(())
}
