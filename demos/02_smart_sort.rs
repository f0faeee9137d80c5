//! Example 02: Filtering and Smart Sort
//!
//! This example shows the listing order (priority, then dated before undated,
//! then due date, then creation time) and the search/priority/status filters.
//!
//! Run with: cargo run --example 02_smart_sort

use eyre::Result;
use todostore::{ListFilter, Priority, PriorityFilter, StatusFilter, Store, Summary, TaskFields, parse_due_date};

fn print_list(store: &Store, label: &str, filter: &ListFilter) -> Result<()> {
    let tasks = store.list(filter)?;
    println!("{}:", label);
    for task in &tasks {
        println!(
            "   #{:<3} {:<6} {:<10} {}{}",
            task.id,
            task.priority,
            task.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            task.title,
            if task.done { " (done)" } else { "" }
        );
    }
    println!("   {}\n", Summary::new(&tasks, filter));
    Ok(())
}

fn main() -> Result<()> {
    println!("todostore Smart Sort Example");
    println!("============================\n");

    let mut store = Store::open_in_memory()?;

    let samples = [
        ("Buy milk", "semi-skimmed", Priority::Medium, "2024-01-10"),
        ("File taxes", "", Priority::High, "2024-01-05"),
        ("Read book", "", Priority::Low, ""),
        ("Book dentist", "", Priority::High, ""),
        ("Water plants", "milk for the ferns?", Priority::Medium, "2024-01-07"),
    ];
    for (title, notes, priority, due) in samples {
        let fields = TaskFields::new(title)
            .notes(notes)
            .priority(priority)
            .due(parse_due_date(due)?);
        store.create(&fields)?;
    }

    // Mark "Water plants" done
    store.toggle_done(5)?;

    print_list(&store, "All tasks (smart sort)", &ListFilter::default())?;
    print_list(&store, "Search 'MILK'", &ListFilter::default().search("MILK"))?;
    print_list(
        &store,
        "High priority only",
        &ListFilter::default().priority(PriorityFilter::Only(Priority::High)),
    )?;
    print_list(&store, "Pending only", &ListFilter::default().status(StatusFilter::Pending))?;

    println!("Example complete!");
    Ok(())
}
