//! Rendering for task data: aligned tables for humans, JSON for scripts.

use serde_json::json;

use deck_core::entities::{Task, User};
use deck_core::envelope::Pagination;
use deck_core::enums::TaskStatus;

use crate::cli::OutputFormat;

fn short_id(task: &Task) -> String {
    task.id.simple().to_string()[..8].to_string()
}

fn table_row(task: &Task) -> String {
    let due = task
        .due_date
        .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string());
    format!(
        "{:<8}  {:<12}  P{}  E{}  {:<10}  {}",
        short_id(task),
        task.status,
        task.priority,
        task.effort,
        due,
        task.name
    )
}

/// One status column: header, rows, total line.
pub fn task_list(status: TaskStatus, tasks: &[Task], pagination: Pagination, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "status": status,
                "tasks": tasks,
                "pagination": pagination,
            });
            print_json(&value);
        }
        OutputFormat::Table => {
            println!(
                "{status} ({count} of {total})",
                count = tasks.len(),
                total = pagination.total_count
            );
            for task in tasks {
                println!("  {}", table_row(task));
            }
            if pagination.has_next {
                println!(
                    "  … page {page} of {pages}",
                    page = pagination.page,
                    pages = pagination.total_pages
                );
            }
        }
    }
}

/// Full detail of one task.
pub fn task_detail(task: &Task, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(task),
        OutputFormat::Table => {
            println!("{}  {}", task.id, task.name);
            println!("  status:     {}", task.status);
            println!("  priority:   {}  effort: {}", task.priority, task.effort);
            if let Some(due) = task.due_date {
                println!("  due:        {}", due.format("%Y-%m-%d"));
            }
            if let Some(start_by) = task.start_by {
                println!("  start by:   {}", start_by.format("%Y-%m-%d"));
            }
            if !task.description.is_empty() {
                println!("  about:      {}", task.description);
            }
            if !task.blocked_reason.is_empty() {
                println!("  blocked:    {}", task.blocked_reason);
            }
            if let Some(started) = task.started_at {
                println!("  started:    {}", started.to_rfc3339());
            }
            if let Some(completed) = task.completed_at {
                println!("  completed:  {}", completed.to_rfc3339());
            }
            if !task.notes.is_empty() {
                println!("  notes:\n{}", indent(&task.notes));
            }
        }
    }
}

pub fn user(user: &User, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(user),
        OutputFormat::Table => println!("{} <{}>", user.name, user.email),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("tdk error: failed to render json: {err}"),
    }
}
