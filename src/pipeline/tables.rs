// Pipeline status tables
//
// Two independent tables drive the timeline:
// - CANONICAL_ORDER: the linear main line used to derive stage progress
// - TRANSITIONS: the manual transitions offered in the status-update form
// They do not agree with each other (e.g. qualified -> negotiation skips
// proposal on the main line) and must not be derived from one another.

use crate::models::{LeadStatus, Stage};

/// Main pipeline line, in order. Side-statuses (follow_up, lost) are not on it.
pub const CANONICAL_ORDER: [LeadStatus; 7] = [
    LeadStatus::New,
    LeadStatus::Contacted,
    LeadStatus::Interested,
    LeadStatus::Qualified,
    LeadStatus::Proposal,
    LeadStatus::Negotiation,
    LeadStatus::Closed,
];

/// Allowed manual transitions per status. Terminal statuses have none.
pub const TRANSITIONS: &[(LeadStatus, &[LeadStatus])] = &[
    (LeadStatus::New, &[LeadStatus::Contacted, LeadStatus::Lost]),
    (LeadStatus::Contacted, &[LeadStatus::Interested, LeadStatus::Lost, LeadStatus::FollowUp]),
    (LeadStatus::FollowUp, &[LeadStatus::Contacted, LeadStatus::Interested, LeadStatus::Lost]),
    (LeadStatus::Interested, &[LeadStatus::Qualified, LeadStatus::FollowUp, LeadStatus::Lost]),
    (LeadStatus::Qualified, &[LeadStatus::Proposal, LeadStatus::Negotiation, LeadStatus::Lost]),
    (LeadStatus::Proposal, &[LeadStatus::Negotiation, LeadStatus::Closed, LeadStatus::Lost]),
    (LeadStatus::Negotiation, &[LeadStatus::Closed, LeadStatus::Lost]),
    (LeadStatus::Closed, &[]),
    (LeadStatus::Lost, &[]),
];

/// Default stage catalogue: (status, description, estimated duration)
pub const DEFAULT_STAGES: &[(LeadStatus, &str, &str)] = &[
    (LeadStatus::New, "Lead captured and assigned to an agent", "Same day"),
    (LeadStatus::Contacted, "First call or message made to the lead", "1-2 days"),
    (LeadStatus::FollowUp, "Lead asked to be contacted again later", "2-5 days"),
    (LeadStatus::Interested, "Lead expressed interest in a product", "2-3 days"),
    (LeadStatus::Qualified, "Eligibility and documents verified", "3-5 days"),
    (LeadStatus::Proposal, "Product proposal or quote shared", "2-4 days"),
    (LeadStatus::Negotiation, "Terms, premium or rate under discussion", "3-7 days"),
    (LeadStatus::Closed, "Deal won and product issued", "1 day"),
];

/// Position of a status on the main line
pub fn canonical_index(status: LeadStatus) -> Option<usize> {
    CANONICAL_ORDER.iter().position(|s| *s == status)
}

/// Transition options for a status (empty for terminal statuses)
pub fn transitions_from(status: LeadStatus) -> &'static [LeadStatus] {
    TRANSITIONS
        .iter()
        .find(|(from, _)| *from == status)
        .map(|(_, to)| *to)
        .unwrap_or(&[])
}

/// Default stage list as owned `Stage` records
pub fn default_stages() -> Vec<Stage> {
    DEFAULT_STAGES
        .iter()
        .map(|(status, description, duration)| Stage::new(status.as_str(), description, duration))
        .collect()
}
