// Pipeline progress resolver
//
// Pure functions deriving stage progress from a lead's current status.
// Nothing here fails: unknown or garbled statuses resolve to "nothing
// completed, no active stage, nothing skipped, no next options".

use log::debug;
use crate::models::{LeadStatus, Stage, StageAnnotation, StageState, StatusHistoryEntry, TimelineView};
use crate::pipeline::normalize::{canonicalize, same_status};
use crate::pipeline::tables::{canonical_index, transitions_from, CANONICAL_ORDER};

/// Position of a raw status string on the main line
fn canonical_position(current: &str) -> Option<usize> {
    let position = LeadStatus::parse(current).and_then(canonical_index);
    if position.is_none() {
        debug!("status '{}' is not on the main pipeline line", current);
    }
    position
}

/// Main-line stages at or before the current status, in order
pub fn resolve_completed_stages(current: &str) -> Vec<LeadStatus> {
    match canonical_position(current) {
        Some(idx) => CANONICAL_ORDER[..=idx].to_vec(),
        None => Vec::new(),
    }
}

/// The main-line stage right after the current status
pub fn resolve_active_stage(current: &str) -> Option<LeadStatus> {
    let idx = canonical_position(current)?;
    CANONICAL_ORDER.get(idx + 1).copied()
}

/// Side-stages bypassed by the main line: follow_up once contact has been made
pub fn resolve_skipped_stages(current: &str) -> Vec<LeadStatus> {
    match (canonical_position(current), canonical_index(LeadStatus::Contacted)) {
        (Some(idx), Some(contacted)) if idx >= contacted => vec![LeadStatus::FollowUp],
        _ => Vec::new(),
    }
}

/// Statuses a user may pick next in the status-update form
pub fn next_status_options(current: &str) -> Vec<LeadStatus> {
    LeadStatus::parse(current)
        .map(|status| transitions_from(status).to_vec())
        .unwrap_or_default()
}

/// Whether `to` is offered as a manual transition from `from`
pub fn can_transition(from: LeadStatus, to: LeadStatus) -> bool {
    transitions_from(from).contains(&to)
}

/// Display label for a stage name that is not a known status
fn humanize(name: &str) -> String {
    canonicalize(name)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Annotate a single stage card.
///
/// Precedence: completed, then active, then skipped, otherwise pending.
pub fn annotate_stage(
    stage: &Stage,
    completed: &[LeadStatus],
    active: Option<LeadStatus>,
    skipped: &[LeadStatus],
) -> StageAnnotation {
    let status = LeadStatus::parse(&stage.name);
    let state = match status {
        Some(s) if completed.contains(&s) => StageState::Completed,
        Some(s) if active == Some(s) => StageState::Active,
        Some(s) if skipped.contains(&s) => StageState::Skipped,
        _ => StageState::Pending,
    };

    StageAnnotation {
        name: status.map(|s| s.as_str().to_string()).unwrap_or_else(|| stage.name.clone()),
        display_label: status.map(|s| s.label().to_string()).unwrap_or_else(|| humanize(&stage.name)),
        description: stage.description.clone(),
        estimated_duration: stage.estimated_duration.clone(),
        state,
        icon: state.icon().to_string(),
        badge_class: state.badge_class().to_string(),
        history: None,
    }
}

/// Completed/active/skipped sets for one current status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineProgress {
    pub completed: Vec<LeadStatus>,
    pub active: Option<LeadStatus>,
    pub skipped: Vec<LeadStatus>,
}

impl PipelineProgress {
    pub fn resolve(current: &str) -> Self {
        Self {
            completed: resolve_completed_stages(current),
            active: resolve_active_stage(current),
            skipped: resolve_skipped_stages(current),
        }
    }

    pub fn annotate(&self, stage: &Stage) -> StageAnnotation {
        annotate_stage(stage, &self.completed, self.active, &self.skipped)
    }
}

/// Most recent history entry recorded for a stage
fn latest_history_for<'a>(stage: &Stage, history: &'a [StatusHistoryEntry]) -> Option<&'a StatusHistoryEntry> {
    if canonicalize(&stage.name).is_empty() {
        return None;
    }
    history.iter().rev().find(|entry| same_status(&entry.status, &stage.name))
}

/// Resolve a whole timeline: one annotation per input stage, in input order
pub fn resolve_timeline(stages: &[Stage], current: &str, history: &[StatusHistoryEntry]) -> TimelineView {
    let progress = PipelineProgress::resolve(current);

    let annotated = stages
        .iter()
        .map(|stage| {
            let mut annotation = progress.annotate(stage);
            annotation.history = latest_history_for(stage, history).cloned();
            annotation
        })
        .collect();

    TimelineView {
        current_status: LeadStatus::parse(current),
        exception: canonical_position(current).is_none(),
        stages: annotated,
        next_status_options: next_status_options(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tables::default_stages;
    use LeadStatus::*;

    fn states_of(view: &TimelineView, state: StageState) -> Vec<String> {
        view.stages
            .iter()
            .filter(|a| a.state == state)
            .map(|a| a.name.clone())
            .collect()
    }

    #[test]
    fn test_completed_is_canonical_prefix() {
        for (i, status) in CANONICAL_ORDER.iter().enumerate() {
            let completed = resolve_completed_stages(status.as_str());
            assert_eq!(completed, CANONICAL_ORDER[..=i].to_vec(), "status {}", status);
        }
    }

    #[test]
    fn test_active_is_next_on_main_line() {
        assert_eq!(resolve_active_stage("new"), Some(Contacted));
        assert_eq!(resolve_active_stage("proposal"), Some(Negotiation));
        assert_eq!(resolve_active_stage("negotiation"), Some(Closed));
        assert_eq!(resolve_active_stage("closed"), None);
    }

    #[test]
    fn test_lost_resolves_to_nothing() {
        assert!(resolve_completed_stages("lost").is_empty());
        assert_eq!(resolve_active_stage("lost"), None);
        assert!(resolve_skipped_stages("lost").is_empty());
    }

    #[test]
    fn test_follow_up_status_is_off_the_main_line() {
        assert!(resolve_completed_stages("followUp").is_empty());
        assert_eq!(resolve_active_stage("follow_up"), None);
        assert!(resolve_skipped_stages("follow_up").is_empty());
    }

    #[test]
    fn test_skipped_from_contacted_onwards() {
        assert!(resolve_skipped_stages("new").is_empty());
        for status in &CANONICAL_ORDER[1..] {
            assert_eq!(resolve_skipped_stages(status.as_str()), vec![FollowUp], "status {}", status);
        }
    }

    #[test]
    fn test_unknown_and_empty_status() {
        for raw in ["", "   ", "archived", "n3w"] {
            assert!(resolve_completed_stages(raw).is_empty());
            assert_eq!(resolve_active_stage(raw), None);
            assert!(resolve_skipped_stages(raw).is_empty());
            assert!(next_status_options(raw).is_empty());
        }
    }

    #[test]
    fn test_status_is_case_insensitive() {
        assert_eq!(resolve_completed_stages("INTERESTED"), vec![New, Contacted, Interested]);
        assert_eq!(resolve_active_stage(" Qualified "), Some(Proposal));
        assert_eq!(resolve_completed_stages("conTacted"), vec![New, Contacted]);
        assert_eq!(resolve_completed_stages("NeW"), vec![New]);
        assert_eq!(resolve_active_stage("NeW"), Some(Contacted));
        assert_eq!(next_status_options("conTacted"), vec![Interested, Lost, FollowUp]);
    }

    #[test]
    fn test_annotate_stage_precedence() {
        // A stage present in every set is still only completed
        let stage = Stage::new("contacted", "", "");
        let annotation = annotate_stage(&stage, &[Contacted], Some(Contacted), &[Contacted]);
        assert_eq!(annotation.state, StageState::Completed);

        let annotation = annotate_stage(&stage, &[], Some(Contacted), &[Contacted]);
        assert_eq!(annotation.state, StageState::Active);

        let annotation = annotate_stage(&stage, &[], None, &[Contacted]);
        assert_eq!(annotation.state, StageState::Skipped);

        let annotation = annotate_stage(&stage, &[], None, &[]);
        assert_eq!(annotation.state, StageState::Pending);
        assert_eq!(annotation.icon, "circle");
        assert_eq!(annotation.badge_class, "badge-secondary");
    }

    #[test]
    fn test_every_stage_gets_exactly_one_state() {
        let stages = default_stages();
        for status in LeadStatus::ALL {
            let view = resolve_timeline(&stages, status.as_str(), &[]);
            assert_eq!(view.stages.len(), stages.len());
            let total = [StageState::Completed, StageState::Active, StageState::Skipped, StageState::Pending]
                .iter()
                .map(|state| states_of(&view, *state).len())
                .sum::<usize>();
            assert_eq!(total, stages.len());
        }
    }

    #[test]
    fn test_annotate_unknown_stage_name() {
        let stage = Stage::new("documentCheck", "KYC", "1 day");
        let progress = PipelineProgress::resolve("closed");
        let annotation = progress.annotate(&stage);
        assert_eq!(annotation.state, StageState::Pending);
        assert_eq!(annotation.name, "documentCheck");
        assert_eq!(annotation.display_label, "Document Check");
    }

    #[test]
    fn test_annotate_aliased_stage_name() {
        let stage = Stage::new("followUp", "", "");
        let annotation = PipelineProgress::resolve("qualified").annotate(&stage);
        assert_eq!(annotation.state, StageState::Skipped);
        assert_eq!(annotation.name, "follow_up");
        assert_eq!(annotation.display_label, "Follow Up");
    }

    #[test]
    fn test_scenario_interested() {
        let view = resolve_timeline(&default_stages(), "interested", &[]);
        assert_eq!(states_of(&view, StageState::Completed), vec!["new", "contacted", "interested"]);
        assert_eq!(states_of(&view, StageState::Active), vec!["qualified"]);
        assert_eq!(states_of(&view, StageState::Skipped), vec!["follow_up"]);
        assert_eq!(states_of(&view, StageState::Pending), vec!["proposal", "negotiation", "closed"]);
        assert_eq!(view.current_status, Some(Interested));
        assert!(!view.exception);
    }

    #[test]
    fn test_scenario_new() {
        let view = resolve_timeline(&default_stages(), "new", &[]);
        assert_eq!(states_of(&view, StageState::Completed), vec!["new"]);
        assert_eq!(states_of(&view, StageState::Active), vec!["contacted"]);
        assert!(states_of(&view, StageState::Skipped).is_empty());
        assert_eq!(view.next_status_options, vec![Contacted, Lost]);
    }

    #[test]
    fn test_scenario_lost_is_exception() {
        let view = resolve_timeline(&default_stages(), "lost", &[]);
        assert!(view.exception);
        assert_eq!(view.current_status, Some(Lost));
        assert!(view.stages.iter().all(|a| a.state == StageState::Pending));
        assert!(view.next_status_options.is_empty());
    }

    #[test]
    fn test_empty_stage_list() {
        for status in ["new", "lost", "", "garbage"] {
            let view = resolve_timeline(&[], status, &[]);
            assert!(view.stages.is_empty());
        }
    }

    #[test]
    fn test_terminal_statuses_have_no_next_options() {
        assert!(next_status_options("closed").is_empty());
        assert!(next_status_options("lost").is_empty());
    }

    #[test]
    fn test_next_status_options_table() {
        assert_eq!(next_status_options("new"), vec![Contacted, Lost]);
        assert_eq!(next_status_options("contacted"), vec![Interested, Lost, FollowUp]);
        assert_eq!(next_status_options("followUp"), vec![Contacted, Interested, Lost]);
        assert_eq!(next_status_options("qualified"), vec![Proposal, Negotiation, Lost]);
        assert_eq!(next_status_options("negotiation"), vec![Closed, Lost]);
    }

    #[test]
    fn test_transition_graph_diverges_from_main_line() {
        // Allowed by the form, yet it skips proposal on the linear timeline
        assert!(can_transition(Qualified, Negotiation));
        assert_ne!(resolve_active_stage("qualified"), Some(Negotiation));

        // Going back from follow_up to contacted is allowed
        assert!(can_transition(FollowUp, Contacted));
        assert!(!can_transition(Closed, Lost));
    }

    #[test]
    fn test_history_attached_by_normalized_status() {
        let history = vec![
            StatusHistoryEntry {
                status: "New".to_string(),
                remark: "Imported from campaign".to_string(),
                updated_at: "2024-03-01T09:00:00Z".to_string(),
                updated_by: None,
            },
            StatusHistoryEntry {
                status: "followUp".to_string(),
                remark: "Call back next week".to_string(),
                updated_at: "2024-03-02T09:00:00Z".to_string(),
                updated_by: Some("agent7".to_string()),
            },
            StatusHistoryEntry {
                status: "new".to_string(),
                remark: "Reassigned".to_string(),
                updated_at: "2024-03-03T09:00:00Z".to_string(),
                updated_by: None,
            },
        ];
        let view = resolve_timeline(&default_stages(), "contacted", &history);

        let new_stage = view.stages.iter().find(|a| a.name == "new").unwrap();
        assert_eq!(new_stage.history.as_ref().unwrap().remark, "Reassigned");

        let follow_up = view.stages.iter().find(|a| a.name == "follow_up").unwrap();
        assert_eq!(follow_up.history.as_ref().unwrap().remark, "Call back next week");

        let contacted = view.stages.iter().find(|a| a.name == "contacted").unwrap();
        assert!(contacted.history.is_none());
    }

    #[test]
    fn test_blank_stage_name_never_matches_history() {
        let history = vec![StatusHistoryEntry {
            status: "".to_string(),
            remark: "blank".to_string(),
            updated_at: String::new(),
            updated_by: None,
        }];
        let view = resolve_timeline(&[Stage::new("", "", "")], "new", &history);
        assert!(view.stages[0].history.is_none());
        assert_eq!(view.stages[0].state, StageState::Pending);
    }
}
