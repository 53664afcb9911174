// Status name canonicalization
//
// Every status lookup (current status, stage names, history entries) goes
// through `canonicalize` so that `followUp`, `follow_up`, `Follow-Up` and
// `followup` all name the same status.

use crate::models::LeadStatus;

/// Canonicalize a raw status name to its snake_case form.
///
/// The fully lower-cased form wins when it names a known status, so
/// `NeW` and `conTacted` resolve; camelCase splitting is only the fallback
/// for names that are not statuses (e.g. custom stage names).
pub fn canonicalize(raw: &str) -> String {
    let plain = separate(raw, false);
    if plain == "followup" {
        return "follow_up".to_string();
    }
    if is_known_status(&plain) {
        return plain;
    }

    let split = separate(raw, true);
    match split.as_str() {
        "followup" => "follow_up".to_string(),
        _ => split,
    }
}

fn is_known_status(name: &str) -> bool {
    LeadStatus::ALL.iter().any(|s| s.as_str() == name)
}

/// Lower-case and join words with `_`, optionally splitting camelCase boundaries
fn separate(raw: &str, split_camel: bool) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    let mut prev_lower = false;

    for c in raw.trim().chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
            continue;
        }
        if split_camel && c.is_uppercase() && prev_lower {
            out.push('_');
        }
        out.extend(c.to_lowercase());
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Compare two raw status names after canonicalization
pub fn same_status(a: &str, b: &str) -> bool {
    canonicalize(a) == canonicalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_plain() {
        assert_eq!(canonicalize("new"), "new");
        assert_eq!(canonicalize("  Qualified "), "qualified");
        assert_eq!(canonicalize("CLOSED"), "closed");
    }

    #[test]
    fn test_canonicalize_mixed_case_statuses() {
        assert_eq!(canonicalize("NeW"), "new");
        assert_eq!(canonicalize("conTacted"), "contacted");
        assert_eq!(canonicalize("InTerested"), "interested");
        assert_eq!(canonicalize("NEGOtiation"), "negotiation");
    }

    #[test]
    fn test_canonicalize_splits_camel_case_custom_names() {
        assert_eq!(canonicalize("documentCheck"), "document_check");
        assert_eq!(canonicalize("siteVisit"), "site_visit");
    }

    #[test]
    fn test_canonicalize_follow_up_aliases() {
        assert_eq!(canonicalize("followUp"), "follow_up");
        assert_eq!(canonicalize("follow_up"), "follow_up");
        assert_eq!(canonicalize("FOLLOW_UP"), "follow_up");
        assert_eq!(canonicalize("Follow-Up"), "follow_up");
        assert_eq!(canonicalize("follow up"), "follow_up");
        assert_eq!(canonicalize("followup"), "follow_up");
        assert_eq!(canonicalize("FollowUp"), "follow_up");
    }

    #[test]
    fn test_canonicalize_collapses_separators() {
        assert_eq!(canonicalize("follow__up"), "follow_up");
        assert_eq!(canonicalize("follow - up"), "follow_up");
        assert_eq!(canonicalize("new-"), "new");
    }

    #[test]
    fn test_canonicalize_empty_and_garbage() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("   "), "");
        assert_eq!(canonicalize("???"), "???");
    }

    #[test]
    fn test_same_status() {
        assert!(same_status("followUp", "follow_up"));
        assert!(same_status("New", "new"));
        assert!(!same_status("new", "contacted"));
    }
}
