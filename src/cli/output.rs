// Output formatting utilities

use crate::models::{LeadStatus, Session, Stage, StageAnnotation, StatusUpdate, TimelineView};
use crate::pipeline::canonical_index;
use crate::utils::format_timestamp;
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

// ANSI foreground colors (standard 16-color palette)
const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_BLUE: &str = "\x1b[34m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

/// Map a color name string to its ANSI foreground constant
fn color_name_to_fg(name: &str) -> Option<&'static str> {
    match name {
        "red" => Some(ANSI_FG_RED),
        "green" => Some(ANSI_FG_GREEN),
        "yellow" => Some(ANSI_FG_YELLOW),
        "blue" => Some(ANSI_FG_BLUE),
        "cyan" => Some(ANSI_FG_CYAN),
        "bright_black" => Some(ANSI_FG_BRIGHT_BLACK),
        _ => None,
    }
}

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Colorize already-padded text if in TTY mode
fn color_if_tty(text: &str, color: Option<&str>, is_tty: bool) -> String {
    match color.and_then(color_name_to_fg) {
        Some(fg) if is_tty => format!("{}{}{}", fg, text, ANSI_RESET),
        _ => text.to_string(),
    }
}

/// Truncate to `max` characters, marking the cut with ".."
fn truncate(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    if max <= 2 {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - 2).collect();
    cut.push_str("..");
    cut
}

fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

fn join_statuses(statuses: &[LeadStatus]) -> String {
    if statuses.is_empty() {
        return "(none)".to_string();
    }
    statuses.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}

struct TimelineRow {
    cells: [String; 6],
    color: Option<&'static str>,
}

fn timeline_row(position: usize, annotation: &StageAnnotation) -> TimelineRow {
    let (updated, remark) = match &annotation.history {
        Some(entry) => {
            let remark = match &entry.updated_by {
                Some(by) if !by.is_empty() => format!("{} ({})", entry.remark, by),
                _ => entry.remark.clone(),
            };
            (format_timestamp(&entry.updated_at), remark)
        }
        None => (String::new(), String::new()),
    };

    TimelineRow {
        cells: [
            (position + 1).to_string(),
            annotation.display_label.clone(),
            annotation.state.as_str().to_string(),
            annotation.estimated_duration.clone(),
            updated,
            remark,
        ],
        color: annotation.state.color(),
    }
}

/// Format a resolved timeline as a table
pub fn format_timeline(
    view: &TimelineView,
    lead_label: Option<&str>,
    raw_status: &str,
    is_tty: bool,
    terminal_width: usize,
) -> String {
    let mut output = String::new();

    if let Some(label) = lead_label {
        output.push_str(&bold_if_tty(label, is_tty));
        output.push('\n');
    }
    let current = match view.current_status {
        Some(status) => status.label().to_string(),
        None if raw_status.trim().is_empty() => "(none)".to_string(),
        None => format!("{} (unrecognized)", raw_status.trim()),
    };
    output.push_str(&format!("Current status: {}\n", current));

    if view.exception {
        let note = match view.current_status {
            Some(LeadStatus::Lost) => "Lead is lost; pipeline progress is not shown.",
            _ => "Status is off the main pipeline; pipeline progress is not shown.",
        };
        output.push_str(&color_if_tty(note, Some("red"), is_tty));
        output.push('\n');
    }
    output.push('\n');

    if view.stages.is_empty() {
        output.push_str("No stages.\n");
    } else {
        let headers = ["#", "Stage", "State", "Est.", "Updated", "Remark"];
        let rows: Vec<TimelineRow> = view.stages.iter().enumerate()
            .map(|(i, a)| timeline_row(i, a))
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        // Remark takes whatever width is left on the line
        let fixed: usize = widths[..5].iter().sum::<usize>() + 5 * 2;
        let remark_budget = terminal_width.saturating_sub(fixed).max(10);
        widths[5] = widths[5].min(remark_budget);

        let header_line = headers.iter().enumerate()
            .map(|(i, h)| pad(h, widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        output.push_str(&bold_if_tty(header_line.trim_end(), is_tty));
        output.push('\n');

        for row in &rows {
            let mut cells = Vec::with_capacity(6);
            for (i, cell) in row.cells.iter().enumerate() {
                let text = pad(&truncate(cell, widths[i]), widths[i]);
                // Only the state column is coloured
                if i == 2 {
                    cells.push(color_if_tty(&text, row.color, is_tty));
                } else {
                    cells.push(text);
                }
            }
            output.push_str(cells.join("  ").trim_end());
            output.push('\n');
        }
    }

    output.push('\n');
    output.push_str(&format!("Next: {}\n", join_statuses(&view.next_status_options)));
    output
}

/// Format the stage catalogue with main-line positions
pub fn format_stage_catalogue(stages: &[Stage]) -> String {
    let mut output = String::new();
    let name_width = stages.iter().map(|s| s.name.chars().count()).max().unwrap_or(0).max(5);
    let duration_width = stages.iter().map(|s| s.estimated_duration.chars().count()).max().unwrap_or(0).max(4);

    output.push_str(&format!(
        "{}  {}  {}  {}\n",
        pad("Pos", 4), pad("Stage", name_width), pad("Est.", duration_width), "Description"
    ));
    for stage in stages {
        let position = LeadStatus::parse(&stage.name)
            .and_then(canonical_index)
            .map(|i| (i + 1).to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{}  {}  {}  {}\n",
            pad(&position, 4),
            pad(&stage.name, name_width),
            pad(&stage.estimated_duration, duration_width),
            stage.description
        ).trim_end());
        output.push('\n');
    }
    output
}

/// Format the transition options for a status
pub fn format_next_options(current: LeadStatus, options: &[LeadStatus]) -> String {
    if options.is_empty() {
        return format!("{} is terminal; no further status changes.\n", current.as_str());
    }
    let mut output = format!("From {}:\n", current.as_str());
    for option in options {
        output.push_str(&format!("  {:<12} {}\n", option.as_str(), option.label()));
    }
    output
}

/// Format the current session
pub fn format_session(session: &Session) -> String {
    let mut output = String::new();
    output.push_str(&format!("User: {}", session.user.name));
    if let Some(ref email) = session.user.email {
        output.push_str(&format!(" <{}>", email));
    }
    output.push('\n');
    if let Some(ref id) = session.user.id {
        output.push_str(&format!("User ID: {}\n", id));
    }
    output.push_str(&format!("Role: {}\n", session.role));
    output.push_str(&format!("Session: {}\n", session.id));
    output.push_str(&format!("Started: {}\n", format_timestamp(&session.started_at.to_rfc3339())));
    match session.expires_at {
        Some(expires_at) => output.push_str(&format!("Expires: {}\n", format_timestamp(&expires_at.to_rfc3339()))),
        None => output.push_str("Expires: never\n"),
    }
    output
}

/// Format a status update request as it would be submitted
pub fn format_status_update_request(url: &str, authorization: &str, update: &StatusUpdate) -> anyhow::Result<String> {
    let body = serde_json::to_string_pretty(update)?;
    Ok(format!(
        "PUT {}\nAuthorization: {}\nContent-Type: application/json\n\n{}\n",
        url, authorization, body
    ))
}
