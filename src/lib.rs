//! Leadline - lead pipeline timeline resolver
//!
//! This library provides:
//! - Lead, stage, status history and session models
//! - The pipeline progress resolver: completed, active, skipped and pending
//!   stages derived from a lead's current status
//! - The status transition table and status-update request validation
//! - A file-backed session context (bearer token, user, role)
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```
//! use leadline::pipeline::{default_stages, resolve_timeline};
//! use leadline::models::{LeadStatus, StageState};
//!
//! let view = resolve_timeline(&default_stages(), "interested", &[]);
//! let active: Vec<_> = view.stages.iter()
//!     .filter(|s| s.state == StageState::Active)
//!     .map(|s| s.name.as_str())
//!     .collect();
//! assert_eq!(active, vec!["qualified"]);
//! assert_eq!(view.next_status_options[0], LeadStatus::Qualified);
//! ```

pub mod models;
pub mod pipeline;
pub mod session;
pub mod cli;
pub mod utils;
