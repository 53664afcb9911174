use serde::{Deserialize, Serialize};
use crate::pipeline::normalize::canonicalize;

/// Lead status (pipeline position)
///
/// Seven statuses form the main line; `FollowUp` and `Lost` are side-statuses:
/// - FollowUp: parked for another contact attempt, bypassed once contact is made
/// - Lost: lead abandoned (terminal)
/// - Closed: deal won (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    FollowUp,
    Interested,
    Qualified,
    Proposal,
    Negotiation,
    Closed,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 9] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::FollowUp,
        LeadStatus::Interested,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::Closed,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::FollowUp => "follow_up",
            LeadStatus::Interested => "interested",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Closed => "closed",
            LeadStatus::Lost => "lost",
        }
    }

    /// Parse a raw status string in any of the spellings the backend emits
    /// (`followUp`, `follow_up`, `Follow-Up`, ` NEW `).
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = canonicalize(raw);
        Self::ALL.iter().copied().find(|s| s.as_str() == canonical)
    }

    /// Human-readable label for stage cards and select controls
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::FollowUp => "Follow Up",
            LeadStatus::Interested => "Interested",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Proposal => "Proposal",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::Closed => "Closed",
            LeadStatus::Lost => "Lost",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Lost)
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
