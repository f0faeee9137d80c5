// JSON export/import file operations

use crate::task::{Priority, Task, TaskFields, parse_due_date};
use eyre::{Context, Result, eyre};
use fs2::FileExt;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Title given to imported entries that lack one
pub const UNTITLED: &str = "(untitled)";

/// One task read from an import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub fields: TaskFields,
    pub done: bool,
}

/// Write tasks as a pretty-printed JSON array
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open export file {:?}", path))?;

    // Lock before truncating so a concurrent reader never sees a half-written file
    file.lock_exclusive().context("Failed to acquire file lock")?;
    file.set_len(0)?;

    let mut writer = BufWriter::new(&file);
    serde_json::to_writer_pretty(&mut writer, tasks).context("Failed to serialize tasks")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    file.sync_all()?;
    Ok(())
}

/// Read an export file, defaulting whatever is missing or invalid in each entry
pub fn read_entries(path: &Path) -> Result<Vec<ImportEntry>> {
    let file = File::open(path).with_context(|| format!("Failed to open import file {:?}", path))?;
    file.lock_shared().context("Failed to acquire file lock")?;

    let value: Value = serde_json::from_reader(BufReader::new(&file))
        .with_context(|| format!("Failed to parse JSON from {:?}", path))?;

    let items = match value {
        Value::Array(items) => items,
        other => return Err(eyre!("Expected a JSON array of tasks, found {}", kind(&other))),
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(object) => entries.push(entry_from_object(&object)),
            other => warn!(file = ?path, index, kind = kind(&other), "Skipping non-object entry"),
        }
    }

    debug!(file = ?path, count = entries.len(), "Read import entries");
    Ok(entries)
}

fn entry_from_object(object: &Map<String, Value>) -> ImportEntry {
    let title = object
        .get("title")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let notes = object.get("notes").and_then(Value::as_str).unwrap_or_default().to_string();

    let priority = object
        .get("priority")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Priority>().ok())
        .unwrap_or_default();

    let due_date = object
        .get("due_date")
        .and_then(Value::as_str)
        .and_then(|s| parse_due_date(s).ok().flatten());

    let done = match object.get("done") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    };

    ImportEntry {
        fields: TaskFields {
            title,
            notes,
            priority,
            due_date,
        },
        done,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
