// SQLite-backed task store with additive migration and smart-sorted listing

use crate::filter::ListFilter;
use crate::task::{DATE_FORMAT, Priority, Task, TaskFields, format_timestamp, now_timestamp, parse_timestamp};
use crate::transfer;
use chrono::{NaiveDate, NaiveDateTime};
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CREATE_TASKS: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        priority TEXT NOT NULL CHECK (priority IN ('High','Medium','Low')) DEFAULT 'Medium',
        due_date TEXT,
        done INTEGER NOT NULL DEFAULT 0 CHECK (done IN (0,1)),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

/// Columns added after the first schema, with the declaration used when an
/// older table lacks them. `id` and `title` have always existed.
const ADDITIVE_COLUMNS: &[(&str, &str)] = &[
    ("notes", "TEXT NOT NULL DEFAULT ''"),
    ("priority", "TEXT NOT NULL DEFAULT 'Medium'"),
    ("due_date", "TEXT"),
    ("done", "INTEGER NOT NULL DEFAULT 0"),
    ("created_at", "TEXT NOT NULL DEFAULT ''"),
    ("updated_at", "TEXT NOT NULL DEFAULT ''"),
];

const SELECT_TASK: &str = "SELECT id, title, notes, priority, due_date, done, created_at, updated_at FROM tasks";

/// Persistent task store over a single SQLite connection
pub struct Store {
    path: Option<PathBuf>,
    db: Connection,
}

impl Store {
    /// Open or create a store at the given database file, migrating its schema
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let db = Connection::open(path).with_context(|| format!("Failed to open SQLite database {:?}", path))?;

        let mut store = Self {
            path: Some(path.to_path_buf()),
            db,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open a throwaway store that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let mut store = Self { path: None, db };
        store.migrate()?;
        Ok(store)
    }

    /// Database file backing this store (`None` when in memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bring the `tasks` table up to the current column set.
    ///
    /// Only adds columns; existing ones are never dropped. Out-of-range
    /// priority and done values are rewritten to what they read as.
    /// Returns the names of the columns that were added.
    fn migrate(&mut self) -> Result<Vec<&'static str>> {
        let tx = self.db.transaction()?;
        tx.execute_batch(CREATE_TASKS).context("Failed to create tasks table")?;

        let existing = Self::column_names(&tx)?;
        let mut added = Vec::new();

        for (name, declaration) in ADDITIVE_COLUMNS {
            if existing.contains(*name) {
                continue;
            }
            info!(column = name, "Adding missing column to tasks table");
            tx.execute_batch(&format!("ALTER TABLE tasks ADD COLUMN {} {};", name, declaration))
                .with_context(|| format!("Failed to add column {}", name))?;
            added.push(*name);
        }

        // Freshly added timestamp columns hold '' for old rows
        let now = format_timestamp(&now_timestamp());
        for column in added.iter().filter(|c| matches!(**c, "created_at" | "updated_at")) {
            let filled = tx.execute(
                &format!("UPDATE tasks SET {} = ?1 WHERE {} = ''", column, column),
                [&now],
            )?;
            debug!(column, filled, "Backfilled timestamp column");
        }

        // Migrated columns carry no CHECK, so older rows may hold values the
        // SQL filters would not match; store them the way they decode
        let priorities = tx.execute(
            "UPDATE tasks
             SET priority = CASE lower(trim(priority)) WHEN 'high' THEN 'High' WHEN 'low' THEN 'Low' ELSE 'Medium' END
             WHERE priority IS NULL OR priority NOT IN ('High', 'Medium', 'Low')",
            [],
        )?;
        let flags = tx.execute(
            "UPDATE tasks
             SET done = CASE WHEN done IS NULL OR done = 0 THEN 0 ELSE 1 END
             WHERE done IS NULL OR done NOT IN (0, 1)",
            [],
        )?;
        if priorities + flags > 0 {
            info!(priorities, flags, "Normalized legacy task values");
        }

        tx.commit()?;
        Ok(added)
    }

    fn column_names(conn: &Connection) -> Result<HashSet<String>> {
        let mut stmt = conn.prepare("PRAGMA table_info(tasks)")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>("name"))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(names)
    }

    // ========================================================================
    // CRUD API
    // ========================================================================

    /// Create a new pending task and return its id
    pub fn create(&mut self, fields: &TaskFields) -> Result<i64> {
        fields.validate()?;
        let id = Self::insert(&self.db, fields, false)?;
        debug!(id, title = %fields.title, "Created task");
        Ok(id)
    }

    /// Get a task by id
    pub fn get(&self, id: i64) -> Result<Option<Task>> {
        Self::fetch(&self.db, id)
    }

    /// Rewrite the mutable fields of a task.
    ///
    /// Returns `false` without touching storage when the id does not exist.
    pub fn update(&mut self, id: i64, fields: &TaskFields) -> Result<bool> {
        fields.validate()?;

        let changed = self.db.execute(
            "UPDATE tasks
             SET title = ?1, notes = ?2, priority = ?3, due_date = ?4, updated_at = MAX(?5, created_at)
             WHERE id = ?6",
            params![
                fields.title,
                fields.notes,
                fields.priority.as_str(),
                due_date_to_sql(fields.due_date),
                format_timestamp(&now_timestamp()),
                id
            ],
        )?;

        debug!(id, changed, "update");
        Ok(changed > 0)
    }

    /// Flip the done flag. Returns `false` when the id does not exist.
    pub fn toggle_done(&mut self, id: i64) -> Result<bool> {
        let changed = self.db.execute(
            "UPDATE tasks
             SET done = CASE done WHEN 1 THEN 0 ELSE 1 END, updated_at = MAX(?1, created_at)
             WHERE id = ?2",
            params![format_timestamp(&now_timestamp()), id],
        )?;

        debug!(id, changed, "toggle_done");
        Ok(changed > 0)
    }

    /// Delete a task, returning the record as it was just before removal
    pub fn delete(&mut self, id: i64) -> Result<Option<Task>> {
        let tx = self.db.transaction()?;

        let task = Self::fetch(&tx, id)?;
        if task.is_some() {
            tx.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        }

        tx.commit()?;
        debug!(id, found = task.is_some(), "delete");
        Ok(task)
    }

    /// List tasks matching the filter in smart-sort order
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Task>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(priority) = filter.priority.value() {
            clauses.push("priority = ?");
            params.push(Box::new(priority.as_str()));
        }
        if let Some(clause) = filter.status.to_sql() {
            clauses.push(clause);
        }

        let mut query = String::from(SELECT_TASK);
        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }

        let mut stmt = self.db.prepare(&query)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(params_refs.as_slice(), task_from_row)?;

        let matcher = filter.matcher();
        let mut tasks = Vec::new();
        for row in rows {
            let task = row?;
            if matcher.matches(&task) {
                tasks.push(task);
            }
        }

        tasks.sort_by(Task::smart_cmp);
        Ok(tasks)
    }

    // ========================================================================
    // Export / import
    // ========================================================================

    /// Write every task, in smart-sort order, to a JSON file
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let tasks = self.list(&ListFilter::default())?;
        transfer::write_tasks(path.as_ref(), &tasks)?;
        info!(path = ?path.as_ref(), count = tasks.len(), "Exported tasks");
        Ok(tasks.len())
    }

    /// Create a new task for every entry of a JSON export.
    ///
    /// Ids and timestamps in the file are ignored. Returns the number of tasks created.
    pub fn import<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let entries = transfer::read_entries(path.as_ref())?;

        let tx = self.db.transaction()?;
        for entry in &entries {
            Self::insert(&tx, &entry.fields, entry.done)?;
        }
        tx.commit()?;

        info!(path = ?path.as_ref(), count = entries.len(), "Imported tasks");
        Ok(entries.len())
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn insert(conn: &Connection, fields: &TaskFields, done: bool) -> Result<i64> {
        let now = format_timestamp(&now_timestamp());
        conn.execute(
            "INSERT INTO tasks (title, notes, priority, due_date, done, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                fields.title,
                fields.notes,
                fields.priority.as_str(),
                due_date_to_sql(fields.due_date),
                done,
                now
            ],
        )
        .context("Failed to insert task")?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch(conn: &Connection, id: i64) -> Result<Option<Task>> {
        let task = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_TASK), [id], task_from_row)
            .optional()?;
        Ok(task)
    }
}

fn due_date_to_sql(due_date: Option<NaiveDate>) -> Option<String> {
    due_date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Decode a row, coercing values older databases may hold.
///
/// Unknown priorities read as Medium, blank or malformed due dates as none,
/// and malformed timestamps as the epoch (updated_at never precedes created_at).
fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let priority_raw: String = row.get(3)?;
    let due_raw: Option<String> = row.get(4)?;
    let done: i64 = row.get(5)?;
    let created_raw: String = row.get(6)?;
    let updated_raw: String = row.get(7)?;

    let priority = priority_raw.parse::<Priority>().unwrap_or_else(|_| {
        warn!(id, priority = %priority_raw, "Unknown stored priority, reading as Medium");
        Priority::Medium
    });

    let due_date = due_raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| match NaiveDate::parse_from_str(s, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                warn!(id, due_date = %s, "Malformed stored due date, ignoring");
                None
            }
        });

    let created_at = parse_timestamp(&created_raw).unwrap_or_else(|| {
        warn!(id, created_at = %created_raw, "Malformed created_at");
        NaiveDateTime::default()
    });
    let updated_at = parse_timestamp(&updated_raw).unwrap_or(created_at).max(created_at);

    Ok(Task {
        id,
        title: row.get(1)?,
        notes: row.get(2)?,
        priority,
        due_date,
        done: done != 0,
        created_at,
        updated_at,
    })
}
