//! Example 01: Basic CRUD Operations
//!
//! This example demonstrates create, read, update, toggle and delete with
//! todostore, plus restoring a deleted task through a session's undo stack.
//!
//! Run with: cargo run --example 01_basic_crud

use eyre::Result;
use todostore::{Priority, Session, Store, TaskFields, parse_due_date};

fn main() -> Result<()> {
    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("todo.sqlite3");

    println!("todostore Basic CRUD Example");
    println!("============================\n");
    println!("Database: {}\n", db_path.display());

    let mut session = Session::new(Store::open(&db_path)?);
    println!("Store opened successfully.\n");

    // CREATE
    println!("1. CREATE - Adding a task...");
    let fields = TaskFields::new("Renew passport")
        .notes("Photos are in the desk drawer")
        .priority(Priority::High)
        .due(parse_due_date("2024-03-01")?);
    let id = session.store_mut().create(&fields)?;
    println!("   Created task #{}\n", id);

    // READ
    println!("2. READ - Retrieving the task...");
    if let Some(task) = session.store().get(id)? {
        println!("   - Title:    {}", task.title);
        println!("   - Priority: {}", task.priority);
        println!("   - Due:      {:?}", task.due_date);
        println!("   - Created:  {}", task.created_at);
    }
    println!();

    // UPDATE
    println!("3. UPDATE - Lowering the priority...");
    let updated = fields.clone().priority(Priority::Medium);
    session.store_mut().update(id, &updated)?;
    println!("   Priority now: {:?}\n", session.store().get(id)?.map(|t| t.priority));

    // TOGGLE
    println!("4. TOGGLE - Marking it done...");
    session.store_mut().toggle_done(id)?;
    println!("   Done: {:?}\n", session.store().get(id)?.map(|t| t.done));

    // DELETE + UNDO
    println!("5. DELETE - Removing the task...");
    let deleted = session.delete(id)?;
    println!("   Deleted: {:?}", deleted.map(|t| t.title));
    println!("   Still there? {}\n", session.store().get(id)?.is_some());

    println!("6. UNDO - Restoring it...");
    if let Some((task, new_id)) = session.undo()? {
        println!("   Restored '{}' as #{} (was #{})\n", task.title, new_id, task.id);
    }

    println!("Example complete!");
    Ok(())
}
