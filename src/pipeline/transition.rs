// Status update validation
//
// Checks a requested status change against the transition table before a
// request body is built. The timeline document itself is never modified.

use thiserror::Error;
use crate::models::{LeadStatus, LeadTimeline, StatusUpdate};
use crate::pipeline::resolver::next_status_options;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Lead has no id; cannot build a status update")]
    MissingLeadId,
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
    #[error("Cannot move lead from '{from}' to '{to}'. Allowed: {allowed}")]
    NotAllowed {
        from: String,
        to: LeadStatus,
        allowed: String,
    },
}

/// Validate a status change against the transition table and build the request body
pub fn build_status_update(
    timeline: &LeadTimeline,
    target: &str,
    remark: &str,
) -> Result<StatusUpdate, TransitionError> {
    let lead_id = timeline
        .lead_id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or(TransitionError::MissingLeadId)?;

    let to = LeadStatus::parse(target)
        .ok_or_else(|| TransitionError::UnknownStatus(target.to_string()))?;

    let options = next_status_options(&timeline.current_status);
    if !options.contains(&to) {
        let allowed = if options.is_empty() {
            "none".to_string()
        } else {
            options.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        };
        return Err(TransitionError::NotAllowed {
            from: display_status(&timeline.current_status),
            to,
            allowed,
        });
    }

    Ok(StatusUpdate {
        lead_id,
        status: to,
        remark: remark.trim().to_string(),
    })
}

/// Canonical name of a raw status for messages; unknown values are shown trimmed
fn display_status(raw: &str) -> String {
    match LeadStatus::parse(raw) {
        Some(status) => status.as_str().to_string(),
        None if raw.trim().is_empty() => "(none)".to_string(),
        None => raw.trim().to_string(),
    }
}
