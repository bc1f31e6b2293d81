//! Plain-text drawing of the view models

use std::fmt::Write;

use scheda_core::status::BadgeTone;
use scheda_core::view::{
    ChecklistView, DashboardView, ProjectPageView, SelectorView, TaskRowView,
};

fn tone_marker(tone: BadgeTone) -> &'static str {
    match tone {
        BadgeTone::Completed => "+",
        BadgeTone::InProgress => "~",
        BadgeTone::ToDo => "o",
        BadgeTone::Neutral => "-",
    }
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    if let Some(count) = view.active_count {
        let _ = writeln!(out, "Projects: {}", count);
    }
    if let Some(message) = view.message {
        let _ = writeln!(out, "{}", message);
    }
    for card in &view.cards {
        let _ = writeln!(
            out,
            "#{:<4} {:<30} {:<12} client {:<6} team {:<6} due {}",
            card.id, card.name, card.status, card.client, card.team, card.deadline
        );
    }
    out
}

fn selector(label: &str, view: &SelectorView) -> String {
    let value = view.selected_label().unwrap_or(view.placeholder);
    format!("{:<12} {}", label, value)
}

pub fn task_row(row: &TaskRowView) -> String {
    let mut line = format!(
        "[{}] #{:<4} {} ({} {})",
        if row.checked { "x" } else { " " },
        row.id,
        row.name,
        tone_marker(row.badge.tone),
        row.badge.label
    );
    if let Some(assignee) = &row.assignee {
        let _ = write!(line, " @{}", assignee);
    }
    if let Some(due) = &row.due_date {
        let _ = write!(line, " due {}", due);
    }
    if row.disabled {
        line.push_str(" …");
    }
    if let Some(description) = &row.description {
        let _ = write!(line, "\n         {}", description);
    }
    line
}

pub fn project_page(view: &ProjectPageView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {}", error);
        return out;
    }

    let form = &view.form;
    let _ = writeln!(out, "{:<12} {}", "Status", form.status);
    let _ = writeln!(out, "{}", selector("Client", &view.clients));
    let _ = writeln!(out, "{}", selector("Team", &view.teams));
    if !form.deadline.is_empty() {
        let _ = writeln!(out, "{:<12} {}", "Deadline", form.deadline);
    }
    if !form.description.is_empty() {
        let _ = writeln!(out, "{:<12} {}", "Description", form.description);
    }

    let _ = writeln!(out, "\nTasks");
    match &view.checklist {
        ChecklistView::Rows(rows) => {
            for row in rows {
                let _ = writeln!(out, "{}", task_row(row));
            }
        }
        other => {
            if let Some(message) = other.message() {
                let _ = writeln!(out, "{}", message);
            }
        }
    }
    out
}
