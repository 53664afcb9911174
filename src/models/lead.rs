use serde::{Deserialize, Deserializer, Serialize};
use crate::models::{LeadStatus, Stage, StageAnnotation};
use crate::pipeline::tables::default_stages;

/// Treat an explicit JSON `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_stages<'de, D>(deserializer: D) -> Result<Vec<Stage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Stage>>::deserialize(deserializer)?.unwrap_or_else(default_stages))
}

/// Lead identifier as the backend sends it (numeric or opaque string)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for LeadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadId::Number(n) => write!(f, "{}", n),
            LeadId::Text(s) => f.write_str(s),
        }
    }
}

/// Status history entry (append-only, owned by the backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remark: String,
    /// ISO-8601 timestamp, kept verbatim; parsed only for display
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Lead timeline document as delivered by the timeline provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadTimeline {
    #[serde(default)]
    pub lead_id: Option<LeadId>,
    #[serde(default)]
    pub lead_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_status: String,
    #[serde(default = "default_stages", deserialize_with = "null_as_default_stages")]
    pub stages: Vec<Stage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_history: Vec<StatusHistoryEntry>,
}

impl LeadTimeline {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Resolved timeline, ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    /// Canonical form of the current status, if it is a known status
    pub current_status: Option<LeadStatus>,
    /// Current status is not on the main pipeline line (lost, follow_up, unknown)
    pub exception: bool,
    pub stages: Vec<StageAnnotation>,
    pub next_status_options: Vec<LeadStatus>,
}

/// Status change request body submitted to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(skip)]
    pub lead_id: String,
    pub status: LeadStatus,
    pub remark: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_defaults_when_fields_missing() {
        let timeline = LeadTimeline::from_json(r#"{"currentStatus": "new"}"#).unwrap();
        assert_eq!(timeline.current_status, "new");
        assert_eq!(timeline.stages, default_stages());
        assert!(timeline.status_history.is_empty());
        assert!(timeline.lead_id.is_none());
    }

    #[test]
    fn test_timeline_camel_case_fields() {
        let json = r#"{
            "leadId": 42,
            "leadName": "Acme Insurance",
            "currentStatus": "followUp",
            "stages": [{"name": "new", "description": "Fresh lead", "estimatedDuration": "1 day"}],
            "statusHistory": [
                {"status": "new", "remark": "Imported", "updatedAt": "2024-03-01T10:00:00Z", "updatedBy": "agent7"}
            ]
        }"#;
        let timeline = LeadTimeline::from_json(json).unwrap();
        assert_eq!(timeline.lead_id, Some(LeadId::Number(42)));
        assert_eq!(timeline.lead_name.as_deref(), Some("Acme Insurance"));
        assert_eq!(timeline.stages.len(), 1);
        assert_eq!(timeline.stages[0].estimated_duration, "1 day");
        assert_eq!(timeline.status_history[0].updated_by.as_deref(), Some("agent7"));
    }

    #[test]
    fn test_timeline_null_fields_load_as_missing() {
        let json = r#"{
            "leadId": 5,
            "currentStatus": null,
            "stages": null,
            "statusHistory": [
                {"status": "new", "remark": null, "updatedAt": null, "updatedBy": null}
            ]
        }"#;
        let timeline = LeadTimeline::from_json(json).unwrap();
        assert_eq!(timeline.current_status, "");
        assert_eq!(timeline.stages, default_stages());
        let entry = &timeline.status_history[0];
        assert_eq!(entry.remark, "");
        assert_eq!(entry.updated_at, "");
        assert!(entry.updated_by.is_none());

        let view = crate::pipeline::resolve_timeline(&timeline.stages, &timeline.current_status, &timeline.status_history);
        assert!(view.exception);
        assert!(view.stages.iter().all(|a| a.state == crate::models::StageState::Pending));
    }

    #[test]
    fn test_null_history_loads_empty() {
        let timeline = LeadTimeline::from_json(r#"{"currentStatus": "new", "statusHistory": null}"#).unwrap();
        assert!(timeline.status_history.is_empty());
    }

    #[test]
    fn test_lead_id_string_form() {
        let timeline = LeadTimeline::from_json(r#"{"leadId": "L-0099", "currentStatus": "new"}"#).unwrap();
        assert_eq!(timeline.lead_id.unwrap().to_string(), "L-0099");
    }

    #[test]
    fn test_status_update_body_omits_lead_id() {
        let update = StatusUpdate {
            lead_id: "7".to_string(),
            status: LeadStatus::Interested,
            remark: "Asked for a quote".to_string(),
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"status": "interested", "remark": "Asked for a quote"}));
    }
}
