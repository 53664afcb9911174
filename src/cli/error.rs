// Error handling utilities for consistent error messages and exit codes

use std::process;
use crate::models::LeadStatus;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing files, rejected transitions, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a status argument given on the command line
pub fn validate_status(value: &str) -> Result<LeadStatus, String> {
    LeadStatus::parse(value).ok_or_else(|| {
        let known = LeadStatus::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ");
        format!("Invalid status: '{}'. Known statuses: {}.", value, known)
    })
}
