// Terminal rendering of tasks

use crate::session::Summary;
use crate::task::{DATE_FORMAT, Priority, Task, format_timestamp};
use colored::{ColoredString, Colorize};

fn paint(task: &Task, text: String) -> ColoredString {
    let colored = match task.priority {
        Priority::High => text.red(),
        Priority::Medium => text.magenta(),
        Priority::Low => text.green(),
    };
    if task.done { colored.dimmed() } else { colored }
}

fn due_label(task: &Task) -> String {
    task.due_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One table row: id, status, priority, due, title, last update
pub fn task_row(task: &Task) -> String {
    let status = if task.done { "[x]" } else { "[ ]" };
    let line = format!(
        "{:>4}  {}  {:<6}  {:<10}  {}  ({})",
        task.id,
        status,
        task.priority,
        due_label(task),
        task.title,
        format_timestamp(&task.updated_at)
    );
    paint(task, line).to_string()
}

/// Rows followed by the status line
pub fn task_table(tasks: &[Task], summary: &Summary) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&task_row(task));
        out.push('\n');
    }
    out.push_str(&summary.to_string().bold().to_string());
    out.push('\n');
    out
}

/// Every field of a single task
pub fn task_detail(task: &Task) -> String {
    let mut out = format!("{}\n", paint(task, format!("#{} {}", task.id, task.title)).bold());
    out.push_str(&format!("  Priority: {}\n", task.priority));
    out.push_str(&format!("  Due:      {}\n", due_label(task)));
    out.push_str(&format!("  Status:   {}\n", if task.done { "Done" } else { "Pending" }));
    out.push_str(&format!("  Created:  {}\n", format_timestamp(&task.created_at)));
    out.push_str(&format!("  Updated:  {}\n", format_timestamp(&task.updated_at)));
    if !task.notes.is_empty() {
        out.push_str("  Notes:\n");
        for line in task.notes.lines() {
            out.push_str(&format!("    {}\n", line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ListFilter;
    use crate::task::parse_timestamp;
    use chrono::NaiveDate;

    fn task(done: bool, due: Option<&str>) -> Task {
        let ts = parse_timestamp("2024-01-01 12:00:00").unwrap();
        Task {
            id: 12,
            title: "Water plants".to_string(),
            notes: "ferns\ncacti".to_string(),
            priority: Priority::Low,
            due_date: due.map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).unwrap()),
            done,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_task_row_plain() {
        colored::control::set_override(false);

        assert_eq!(
            task_row(&task(false, Some("2024-02-01"))),
            "  12  [ ]  Low     2024-02-01  Water plants  (2024-01-01 12:00:00)"
        );
        assert!(task_row(&task(true, None)).contains("[x]  Low     -           Water plants"));
    }

    #[test]
    fn test_task_table_ends_with_summary() {
        colored::control::set_override(false);

        let tasks = vec![task(false, None), task(true, None)];
        let filter = ListFilter::default();
        let table = task_table(&tasks, &Summary::new(&tasks, &filter));

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "2 shown | 1 pending | Filters: Priority=All, Status=All");
    }

    #[test]
    fn test_task_detail_lists_notes() {
        colored::control::set_override(false);

        let detail = task_detail(&task(true, None));
        assert!(detail.starts_with("#12 Water plants\n"));
        assert!(detail.contains("  Status:   Done\n"));
        assert!(detail.contains("    ferns\n    cacti\n"));
    }
}
