use super::*;
use crate::auth::test_support::{candidate, company};

fn authenticated_as(user: crate::net::types::User) -> Session {
    let mut session = Session::anonymous();
    session.begin_resolving().unwrap();
    session.authenticate("AT".to_owned(), Some("RT".to_owned()), user).unwrap();
    session
}

fn resolving() -> Session {
    let mut session = Session::new();
    session.begin_resolving().unwrap();
    session
}

// =============================================================
// decide
// =============================================================

#[test]
fn pending_statuses_never_render_or_redirect() {
    for session in [Session::new(), resolving()] {
        assert_eq!(
            decide(&session, RouteAccess::Authenticated, Some("/candidate")),
            GuardDecision::Pending
        );
        assert_eq!(
            decide(&session, RouteAccess::Role(Role::Company), None),
            GuardDecision::Pending
        );
    }
}

#[test]
fn renders_only_once_status_settles() {
    let sequence = [Session::new(), resolving(), authenticated_as(candidate("a@x.com"))];
    let rendered: Vec<bool> = sequence
        .iter()
        .map(|s| decide(s, RouteAccess::Authenticated, None) == GuardDecision::Render)
        .collect();
    assert_eq!(rendered, [false, false, true]);
}

#[test]
fn anonymous_redirects_to_login_with_return_path() {
    let decision = decide(&Session::anonymous(), RouteAccess::Authenticated, Some("/candidate"));
    assert_eq!(
        decision,
        GuardDecision::RedirectToLogin { to: "/login?next=%2Fcandidate".to_owned() }
    );
    assert_eq!(decision.redirect_target(), Some("/login?next=%2Fcandidate"));
}

#[test]
fn anonymous_without_attempted_path_goes_to_plain_login() {
    assert_eq!(
        decide(&Session::anonymous(), RouteAccess::Authenticated, None),
        GuardDecision::RedirectToLogin { to: "/login".to_owned() }
    );
}

#[test]
fn candidate_is_admitted_to_candidate_dashboard() {
    let session = authenticated_as(candidate("a@x.com"));
    assert_eq!(
        decide(&session, RouteAccess::Role(Role::Candidate), Some("/candidate")),
        GuardDecision::Render
    );
    assert_eq!(decide(&session, RouteAccess::Authenticated, None), GuardDecision::Render);
}

#[test]
fn candidate_is_denied_company_view() {
    let session = authenticated_as(candidate("a@x.com"));
    let decision = decide(&session, RouteAccess::Role(Role::Company), Some("/company"));
    assert_eq!(
        decision,
        GuardDecision::Denied { required: Role::Company, redirect: "/candidate".to_owned() }
    );
    assert_eq!(decision.denial(), Some(AuthError::Permission { required: Role::Company }));
}

#[test]
fn company_is_denied_candidate_view() {
    let session = authenticated_as(company("hr@acme.io"));
    assert_eq!(
        decide(&session, RouteAccess::Role(Role::Candidate), None).redirect_target(),
        Some("/company")
    );
}

// =============================================================
// return paths
// =============================================================

#[test]
fn unsafe_return_paths_are_dropped() {
    for path in ["https://evil.test", "//evil.test", "/\\evil.test", "candidate", "/login", "/register?x=1"] {
        assert!(!is_safe_return_path(path), "{path} should be rejected");
        assert_eq!(login_route(Some(path)), "/login");
    }
}

#[test]
fn safe_return_paths_keep_query() {
    assert!(is_safe_return_path("/jobs?q=rust&page=2"));
    assert_eq!(login_route(Some("/jobs?q=rust")), "/login?next=%2Fjobs%3Fq%3Drust");
}

#[test]
fn post_login_destination_prefers_next_then_home() {
    assert_eq!(post_login_destination(Some("/jobs/7"), Role::Candidate), "/jobs/7");
    assert_eq!(post_login_destination(Some("//evil.test"), Role::Candidate), "/candidate");
    assert_eq!(post_login_destination(None, Role::Company), "/company");
}

#[test]
fn control_characters_in_return_path_are_rejected() {
    for path in ["/\t/evil.test", "/\n/evil.test", "/\r/evil.test", "/ /evil.test", "/jobs\u{0}"] {
        assert!(!is_safe_return_path(path), "{path:?} should be rejected");
        assert_eq!(login_route(Some(path)), "/login");
        assert_eq!(post_login_destination(Some(path), Role::Candidate), "/candidate");
    }
}

#[test]
fn next_for_other_role_falls_back_to_own_home() {
    assert_eq!(post_login_destination(Some("/candidate"), Role::Company), "/company");
    assert_eq!(post_login_destination(Some("/candidate/matches?page=2"), Role::Company), "/company");
    assert_eq!(post_login_destination(Some("/company"), Role::Candidate), "/candidate");
    assert_eq!(post_login_destination(Some("/candidate?tab=cv"), Role::Candidate), "/candidate?tab=cv");
    assert_eq!(post_login_destination(Some("/companyish"), Role::Candidate), "/companyish");
}
