use serde::{Deserialize, Serialize};
use crate::models::StatusHistoryEntry;
use crate::models::lead::null_as_default;

/// One step of the lead pipeline as supplied by the timeline provider.
/// `name` is kept as the raw string; it is canonicalized at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimated_duration: String,
}

impl Stage {
    pub fn new(name: &str, description: &str, estimated_duration: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            estimated_duration: estimated_duration.to_string(),
        }
    }
}

/// Rendering state of a stage card.
/// Exactly one applies per stage; precedence is the declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Completed,
    Active,
    Skipped,
    Pending,
}

impl StageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageState::Completed => "completed",
            StageState::Active => "active",
            StageState::Skipped => "skipped",
            StageState::Pending => "pending",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StageState::Completed => "check-circle",
            StageState::Active => "play-circle",
            StageState::Skipped => "skip-forward",
            StageState::Pending => "circle",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            StageState::Completed => "badge-success",
            StageState::Active => "badge-primary",
            StageState::Skipped => "badge-warning",
            StageState::Pending => "badge-secondary",
        }
    }

    /// Terminal colour name used by the text renderer (`None` = default colour)
    pub fn color(&self) -> Option<&'static str> {
        match self {
            StageState::Completed => Some("green"),
            StageState::Active => Some("cyan"),
            StageState::Skipped => Some("yellow"),
            StageState::Pending => None,
        }
    }
}

/// Per-stage output record consumed by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageAnnotation {
    pub name: String,
    pub display_label: String,
    pub description: String,
    pub estimated_duration: String,
    pub state: StageState,
    pub icon: String,
    pub badge_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<StatusHistoryEntry>,
}
