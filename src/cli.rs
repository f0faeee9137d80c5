// Task commands shared by the one-shot CLI and the interactive shell

use crate::filter::ListFilter;
use crate::render;
use crate::session::{Session, Summary};
use crate::task::{DATE_FORMAT, TaskFields};
use clap::{Args, Subcommand};
use eyre::Result;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a new task
    Add(AddArgs),

    /// Change fields of an existing task
    Edit(EditArgs),

    /// Flip a task between pending and done
    Toggle { id: i64 },

    /// Delete a task
    #[command(alias = "delete")]
    Rm { id: i64 },

    /// Show every field of a task
    Show { id: i64 },

    /// List tasks, most urgent first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Write all tasks to a JSON file
    Export { path: PathBuf },

    /// Add every task from a JSON file as a new task
    Import { path: PathBuf },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,

    #[arg(short, long, default_value = "")]
    pub notes: String,

    /// High, Medium or Low
    #[arg(short, long, default_value = "Medium")]
    pub priority: String,

    /// Due date (YYYY-MM-DD)
    #[arg(short, long, default_value = "")]
    pub due: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: i64,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub notes: Option<String>,

    /// High, Medium or Low
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(short, long, conflicts_with = "clear_due")]
    pub due: Option<String>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text to find in title or notes
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// All, High, Medium or Low
    #[arg(short, long, default_value = "All")]
    pub priority: String,

    /// All, Pending or Done
    #[arg(long, default_value = "All")]
    pub status: String,
}

impl ListArgs {
    pub fn to_filter(&self) -> Result<ListFilter> {
        Ok(ListFilter::default()
            .search(self.search.clone())
            .priority(self.priority.parse()?)
            .status(self.status.parse()?))
    }
}

/// Run one command against the session, writing user-facing messages to `out`
pub fn execute(session: &mut Session, command: TaskCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        TaskCommand::Add(args) => {
            let fields = TaskFields::parse(&args.title.join(" "), &args.notes, &args.priority, &args.due)?;
            let id = session.store_mut().create(&fields)?;
            writeln!(out, "Created task #{}.", id)?;
        }
        TaskCommand::Edit(args) => {
            let Some(current) = session.store().get(args.id)? else {
                writeln!(out, "Task #{} not found.", args.id)?;
                return Ok(());
            };

            let due = if args.clear_due {
                String::new()
            } else {
                args.due.unwrap_or_else(|| {
                    current
                        .due_date
                        .map(|d| d.format(DATE_FORMAT).to_string())
                        .unwrap_or_default()
                })
            };
            let fields = TaskFields::parse(
                args.title.as_deref().unwrap_or(&current.title),
                args.notes.as_deref().unwrap_or(&current.notes),
                args.priority.as_deref().unwrap_or(current.priority.as_str()),
                &due,
            )?;

            if session.store_mut().update(args.id, &fields)? {
                writeln!(out, "Updated task #{}.", args.id)?;
            } else {
                writeln!(out, "Task #{} not found.", args.id)?;
            }
        }
        TaskCommand::Toggle { id } => {
            if !session.store_mut().toggle_done(id)? {
                writeln!(out, "Task #{} not found.", id)?;
                return Ok(());
            }
            let state = match session.store().get(id)? {
                Some(task) if task.done => "Done",
                _ => "Pending",
            };
            writeln!(out, "Toggled task #{} -> {}.", id, state)?;
        }
        TaskCommand::Rm { id } => match session.delete(id)? {
            Some(_) => writeln!(out, "Deleted task #{}.", id)?,
            None => writeln!(out, "Task #{} not found.", id)?,
        },
        TaskCommand::Show { id } => match session.store().get(id)? {
            Some(task) => write!(out, "{}", render::task_detail(&task))?,
            None => writeln!(out, "Task #{} not found.", id)?,
        },
        TaskCommand::List(args) => {
            let filter = args.to_filter()?;
            let tasks = session.store().list(&filter)?;
            write!(out, "{}", render::task_table(&tasks, &Summary::new(&tasks, &filter)))?;
        }
        TaskCommand::Export { path } => {
            let count = session.store().export(&path)?;
            writeln!(out, "Exported {} tasks to {}.", count, path.display())?;
        }
        TaskCommand::Import { path } => {
            let count = session.store_mut().import(&path)?;
            writeln!(out, "Imported {} tasks from {}.", count, path.display())?;
        }
    }
    Ok(())
}
