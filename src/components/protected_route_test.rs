use super::*;
use crate::net::types::Role;

#[test]
fn attempted_path_joins_search() {
    assert_eq!(attempted_path("/company", ""), "/company");
    assert_eq!(attempted_path("/company", "?tab=jobs"), "/company?tab=jobs");
    assert_eq!(attempted_path("/company", "tab=jobs"), "/company?tab=jobs");
}

#[test]
fn placeholder_text_tracks_decision() {
    assert_eq!(placeholder_text(&GuardDecision::Pending), "Loading...");
    assert_eq!(
        placeholder_text(&GuardDecision::RedirectToLogin { to: "/login".to_owned() }),
        "Redirecting to login..."
    );
    let denied = GuardDecision::Denied { required: Role::Company, redirect: "/candidate".to_owned() };
    assert!(placeholder_text(&denied).starts_with("Access denied"));
    assert!(placeholder_text(&GuardDecision::Render).is_empty());
}
