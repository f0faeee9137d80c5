// Interactive shell: task commands plus undo, one line at a time

use crate::cli::{self, TaskCommand};
use crate::error::ValidationError;
use crate::session::Session;
use clap::{Parser, Subcommand};
use eyre::{Result, eyre};
use std::io::{BufRead, Write};
use tracing::debug;

const PROMPT: &str = "todo> ";

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Task(TaskCommand),

    /// Restore the most recently deleted task (under a new id)
    Undo,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Read commands from `input` until EOF or `quit`.
///
/// Errors from a single command are reported to `out` and the loop carries on;
/// only failures writing to `out` or reading `input` end the shell.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W, interactive: bool) -> Result<()> {
    let mut lines = input.lines();

    loop {
        if interactive {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let tokens = match split_line(&line) {
            Ok(tokens) if tokens.is_empty() => continue,
            Ok(tokens) => tokens,
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                continue;
            }
        };
        debug!(?tokens, "shell command");

        let command = match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{}", e)?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Undo => match session.undo() {
                Ok(Some((_, new_id))) => writeln!(out, "Restored task as #{}.", new_id)?,
                Ok(None) => writeln!(out, "Nothing to undo.")?,
                Err(e) => report(out, &e)?,
            },
            ShellCommand::Task(task_command) => {
                let is_delete = matches!(task_command, TaskCommand::Rm { .. });
                let depth = session.undo_depth();
                if let Err(e) = cli::execute(session, task_command, out) {
                    report(out, &e)?;
                } else if is_delete && session.undo_depth() > depth {
                    writeln!(out, "Type `undo` to restore it.")?;
                }
            }
        }
    }

    Ok(())
}

fn report<W: Write>(out: &mut W, e: &eyre::Report) -> Result<()> {
    if ValidationError::is_validation(e) {
        writeln!(out, "Validation: {}", e)?;
    } else {
        writeln!(out, "Error: {:#}", e)?;
    }
    Ok(())
}

/// Split a command line into words.
///
/// Whitespace separates words; single or double quotes group them and a
/// backslash escapes the next character (outside single quotes).
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('\''), _) => current.push(c),
            (Some('"'), '"') => quote = None,
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err(eyre!("Trailing backslash")),
            },
            (Some(_), _) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(eyre!("Unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ListFilter;
    use crate::store::Store;

    fn run_script(session: &mut Session, script: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        run(session, script.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("add Buy milk").unwrap(), vec!["add", "Buy", "milk"]);
        assert_eq!(
            split_line(r#"add "Buy milk" -n 'it''s fine' "#).unwrap(),
            vec!["add", "Buy milk", "-n", "its fine"]
        );
        assert_eq!(split_line(r#"add a\ b \"q\""#).unwrap(), vec!["add", "a b", "\"q\""]);
        assert_eq!(split_line(r#"edit 1 --notes """#).unwrap(), vec!["edit", "1", "--notes", ""]);
        assert!(split_line("   ").unwrap().is_empty());
    }

    #[test]
    fn test_split_line_errors() {
        assert!(split_line(r#"add "open"#).is_err());
        assert!(split_line(r"add trailing\").is_err());
    }

    #[test]
    fn test_delete_then_undo() {
        let mut session = Session::new(Store::open_in_memory().unwrap());
        let out = run_script(
            &mut session,
            "add \"Call mum\" -p High\nrm 1\nundo\nundo\n",
        );

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Created task #1.",
                "Deleted task #1.",
                "Type `undo` to restore it.",
                "Restored task as #2.",
                "Nothing to undo.",
            ]
        );
        let tasks = session.store().list(&ListFilter::default()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Call mum");
    }

    #[test]
    fn test_errors_do_not_end_the_shell() {
        let mut session = Session::new(Store::open_in_memory().unwrap());
        let out = run_script(
            &mut session,
            "add Taxes --due 2024-13-40\nbogus\nadd \"unterminated\nadd Taxes --due 2024-04-15\n",
        );

        assert!(out.contains("Validation: Date must be in YYYY-MM-DD format"));
        assert!(out.contains("Error: Unterminated \" quote"));
        assert!(out.contains("Created task #1."));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut session = Session::new(Store::open_in_memory().unwrap());
        run_script(&mut session, "add first\nquit\nadd second\n");
        assert_eq!(session.store().list(&ListFilter::default()).unwrap().len(), 1);

        run_script(&mut session, "exit\nadd third\n");
        assert_eq!(session.store().list(&ListFilter::default()).unwrap().len(), 1);
    }
}
