use super::*;

fn candidate_form() -> RegistrationForm {
    RegistrationForm {
        role: Role::Candidate,
        email: " ada@example.com ".to_owned(),
        password: "correct-horse".to_owned(),
        confirm_password: "correct-horse".to_owned(),
        first_name: " Ada ".to_owned(),
        last_name: "Lovelace".to_owned(),
        company_name: "ignored".to_owned(),
    }
}

#[test]
fn candidate_form_builds_candidate_profile() {
    let profile = validate_registration(&candidate_form()).expect("valid form");
    assert_eq!(
        profile,
        RegistrationProfile::Candidate(CandidateProfile {
            email: "ada@example.com".to_owned(),
            password: "correct-horse".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
        })
    );
}

#[test]
fn company_form_needs_only_company_name() {
    let form = RegistrationForm {
        role: Role::Company,
        first_name: String::new(),
        last_name: String::new(),
        company_name: "Acme".to_owned(),
        ..candidate_form()
    };
    let profile = validate_registration(&form).expect("valid form");
    assert_eq!(profile.role(), Role::Company);
    assert_eq!(profile.email(), "ada@example.com");
    assert_eq!(profile.payload()["company_name"], "Acme");
}

#[test]
fn short_password_and_mismatch_are_reported() {
    let form = RegistrationForm {
        password: "short".to_owned(),
        confirm_password: "shorter".to_owned(),
        ..candidate_form()
    };
    let errors = validate_registration(&form).expect_err("invalid form");
    assert_eq!(errors.messages_for("password"), ["Use at least 8 characters."]);
    assert_eq!(errors.messages_for("confirm_password"), ["Passwords do not match."]);
    assert!(errors.messages_for("email").is_empty());
}

#[test]
fn missing_role_fields_are_reported_per_role() {
    let candidate = RegistrationForm { first_name: "  ".to_owned(), last_name: String::new(), ..candidate_form() };
    let errors = validate_registration(&candidate).expect_err("names missing");
    assert_eq!(errors.messages_for("first_name"), ["Enter your first name."]);
    assert_eq!(errors.messages_for("last_name"), ["Enter your last name."]);

    let company = RegistrationForm { role: Role::Company, company_name: String::new(), ..candidate_form() };
    let errors = validate_registration(&company).expect_err("company name missing");
    assert_eq!(errors.messages_for("company_name"), ["Enter the company name."]);
    assert!(errors.messages_for("first_name").is_empty());
}

#[test]
fn form_fields_round_trip_through_accessors() {
    let mut form = RegistrationForm::default();
    form.set_value("company_name", "Acme".to_owned());
    form.set_value("unknown", "x".to_owned());
    assert_eq!(form.value("company_name"), "Acme");
    assert_eq!(form.value("unknown"), "");
    assert_eq!(form.role, Role::Candidate);
}
