use super::*;
use crate::net::types::{Role, UserId};

fn user() -> User {
    User {
        id: UserId("1".to_owned()),
        email: "a@x.com".to_owned(),
        role: Role::Candidate,
        first_name: None,
        last_name: None,
        company_name: None,
    }
}

fn authenticated() -> Session {
    let mut session = Session::anonymous();
    session.begin_resolving().unwrap();
    session.authenticate("AT".to_owned(), Some("RT".to_owned()), user()).unwrap();
    session
}

/// `Authenticated` iff a user and an access token are both present.
fn assert_invariant(session: &Session) {
    assert_eq!(
        session.is_authenticated(),
        session.user().is_some() && session.access_token().is_some(),
        "invariant broken for {session:?}"
    );
}

// =============================================================
// Status edges
// =============================================================

#[test]
fn new_session_is_unresolved_and_empty() {
    let session = Session::new();
    assert_eq!(session.status(), SessionStatus::Unresolved);
    assert!(session.is_pending());
    assert!(session.user().is_none());
    assert_invariant(&session);
}

#[test]
fn allowed_edges() {
    use SessionStatus::*;
    assert!(Unresolved.can_transition_to(Resolving));
    assert!(Unresolved.can_transition_to(Anonymous));
    assert!(Resolving.can_transition_to(Authenticated));
    assert!(Resolving.can_transition_to(Anonymous));
    assert!(Anonymous.can_transition_to(Resolving));
    assert!(Authenticated.can_transition_to(Anonymous));
    assert!(Anonymous.can_transition_to(Anonymous));
}

#[test]
fn rejected_edges() {
    use SessionStatus::*;
    assert!(!Unresolved.can_transition_to(Authenticated));
    assert!(!Anonymous.can_transition_to(Authenticated));
    assert!(!Authenticated.can_transition_to(Resolving));
    assert!(!Resolving.can_transition_to(Resolving));
    assert!(!Authenticated.can_transition_to(Unresolved));
    assert!(!Anonymous.can_transition_to(Unresolved));
}

#[test]
fn authenticate_requires_resolving() {
    let mut session = Session::anonymous();
    let err = session.authenticate("AT".to_owned(), None, user()).unwrap_err();
    assert_eq!(
        err,
        TransitionError { from: SessionStatus::Anonymous, to: SessionStatus::Authenticated }
    );
    assert_eq!(session, Session::anonymous());
}

#[test]
fn authenticate_sets_tokens_and_user() {
    let session = authenticated();
    assert_eq!(session.status(), SessionStatus::Authenticated);
    assert_eq!(session.access_token(), Some("AT"));
    assert_eq!(session.refresh_token(), Some("RT"));
    assert_eq!(session.user().map(|u| u.email.as_str()), Some("a@x.com"));
    assert_invariant(&session);
}

#[test]
fn begin_resolving_rejected_when_authenticated() {
    let mut session = authenticated();
    assert!(session.begin_resolving().is_err());
    assert!(session.is_authenticated());
}

#[test]
fn reset_anonymous_clears_everything() {
    let mut session = authenticated();
    session.reset_anonymous();
    assert_eq!(session, Session::anonymous());
    assert!(session.access_token().is_none());
    assert!(session.refresh_token().is_none());
    assert_invariant(&session);
    session.reset_anonymous();
    assert_eq!(session, Session::anonymous());
}

// =============================================================
// In-place updates
// =============================================================

#[test]
fn replace_tokens_keeps_refresh_when_not_rotated() {
    let mut session = authenticated();
    session.replace_tokens("AT2".to_owned(), None).unwrap();
    assert_eq!(session.access_token(), Some("AT2"));
    assert_eq!(session.refresh_token(), Some("RT"));
    session.replace_tokens("AT3".to_owned(), Some("RT3".to_owned())).unwrap();
    assert_eq!(session.refresh_token(), Some("RT3"));
}

#[test]
fn replace_tokens_and_user_require_authenticated() {
    let mut session = Session::anonymous();
    assert!(session.replace_tokens("AT".to_owned(), None).is_err());
    assert!(session.replace_user(user()).is_err());
    assert_invariant(&session);
}

#[test]
fn replace_user_swaps_profile() {
    let mut session = authenticated();
    let updated = User { first_name: Some("Ada".to_owned()), ..user() };
    session.replace_user(updated.clone()).unwrap();
    assert_eq!(session.user(), Some(&updated));
}

#[test]
fn debug_output_redacts_tokens() {
    let rendered = format!("{:?}", authenticated());
    assert!(!rendered.contains("\"AT\""));
    assert!(!rendered.contains("\"RT\""));
    assert!(rendered.contains("redacted"));
}
