// Presentation-side session: wraps the store and keeps the undo stack

use crate::filter::ListFilter;
use crate::store::Store;
use crate::task::Task;
use eyre::Result;
use std::fmt;
use tracing::debug;

/// One interactive session over a store.
///
/// Deleted tasks are kept in memory so they can be restored; the stack is
/// dropped with the session and the store knows nothing about it.
pub struct Session {
    store: Store,
    deleted: Vec<Task>,
}

impl Session {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            deleted: Vec::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Delete a task and stage it for undo
    pub fn delete(&mut self, id: i64) -> Result<Option<Task>> {
        let deleted = self.store.delete(id)?;
        if let Some(task) = &deleted {
            self.deleted.push(task.clone());
        }
        Ok(deleted)
    }

    /// Re-create the most recently deleted task under a new id.
    ///
    /// Returns the deleted snapshot and the new id, or `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<(Task, i64)>> {
        let Some(task) = self.deleted.pop() else {
            return Ok(None);
        };

        match self.store.create(&task.fields()) {
            Ok(new_id) => {
                debug!(old_id = task.id, new_id, "Restored deleted task");
                Ok(Some((task, new_id)))
            }
            Err(e) => {
                // Keep it staged so the user can retry
                self.deleted.push(task);
                Err(e)
            }
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.deleted.len()
    }
}

/// Status line for a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub shown: usize,
    pub pending: usize,
    pub filter: ListFilter,
}

impl Summary {
    pub fn new(tasks: &[Task], filter: &ListFilter) -> Self {
        Self {
            shown: tasks.len(),
            pending: tasks.iter().filter(|t| !t.done).count(),
            filter: filter.clone(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} shown | {} pending | Filters: Priority={}, Status={}",
            self.shown, self.pending, self.filter.priority, self.filter.status
        )
    }
}
