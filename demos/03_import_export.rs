//! Example 03: Export and Import
//!
//! This example exports a store to JSON and imports it into a fresh store.
//! Imported tasks get new ids and timestamps; bad due dates are dropped.
//!
//! Run with: cargo run --example 03_import_export

use eyre::Result;
use std::fs;
use todostore::{ListFilter, Priority, Store, TaskFields, parse_due_date};

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let export_path = temp_dir.path().join("tasks_export.json");

    println!("todostore Import/Export Example");
    println!("===============================\n");

    let mut source = Store::open(temp_dir.path().join("source.sqlite3"))?;
    source.create(&TaskFields::new("Plan trip").priority(Priority::High).due(parse_due_date("2024-06-01")?))?;
    source.create(&TaskFields::new("Pack bags").notes("sunscreen"))?;

    let count = source.export(&export_path)?;
    println!("1. Exported {} tasks:\n{}", count, fs::read_to_string(&export_path)?);

    // A hand-written file with missing and invalid fields
    let handmade = temp_dir.path().join("handmade.json");
    fs::write(
        &handmade,
        r#"[{"title": "Call the bank", "due_date": "2024-13-40"}, {"priority": "Someday"}]"#,
    )?;

    let mut target = Store::open(temp_dir.path().join("target.sqlite3"))?;
    let imported = target.import(&export_path)? + target.import(&handmade)?;
    println!("2. Imported {} tasks into a fresh store:", imported);
    for task in target.list(&ListFilter::default())? {
        println!(
            "   #{} {} [{}] due={:?} notes={:?}",
            task.id, task.title, task.priority, task.due_date, task.notes
        );
    }
    println!();

    println!("Example complete!");
    Ok(())
}
