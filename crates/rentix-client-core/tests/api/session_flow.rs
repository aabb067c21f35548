use futures::StreamExt as _;
use rentix_client_core::{
    evaluate, no_cb, GuardDecision, Route, SessionOutcome, SessionPhase, SessionSnapshot,
};
use rentix_shared::{
    errors::ApiError,
    resources::Property,
    storage::StoreKey,
    uac::{CompanyRole, CurrentRole},
};

use crate::helpers::{context_token, spawn_app, LOGIN_TOKEN, REFRESH_TOKEN};

#[tokio::test]
async fn login_with_one_company_ends_with_context() {
    // Arrange
    let app = spawn_app().await;
    app.mock.set_memberships(&[("company-a", "OWNER")]);
    let session = app.session();

    // Act
    let outcome = session.login(app.login_args()).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SessionOutcome::Ready(SessionPhase::AuthenticatedWithContext)
    );
    let snapshot = session.snapshot();
    assert_eq!(
        snapshot.current_role(),
        CurrentRole::Company(CompanyRole::Owner)
    );
    assert_eq!(
        app.store.get(StoreKey::AccessToken),
        Some(context_token("company-a"))
    );
    assert_eq!(
        app.store.get(StoreKey::RefreshToken).as_deref(),
        Some(REFRESH_TOKEN)
    );
    assert_eq!(evaluate(&snapshot, Route::Properties), GuardDecision::Allow);
    let requests = app.mock.requests();
    assert_eq!(
        requests.last().map(String::as_str),
        Some("GET /companies/my-companies ctx-company-a")
    );
}

#[tokio::test]
async fn login_with_two_companies_waits_for_a_choice() {
    // Arrange
    let app = spawn_app().await;
    app.mock
        .set_memberships(&[("company-a", "OWNER"), ("company-b", "TENANT")]);
    let session = app.session();

    // Act
    let outcome = session.login(app.login_args()).await.unwrap();
    let guard_before = evaluate(&session.snapshot(), Route::Dashboard);
    let switched = session
        .select_company("company-b".try_into().unwrap())
        .await
        .unwrap();

    // Assert
    assert_eq!(
        outcome,
        SessionOutcome::Ready(SessionPhase::AuthenticatedNoContext)
    );
    assert_eq!(guard_before, GuardDecision::Redirect(Route::SelectCompany));
    assert_eq!(
        switched,
        SessionOutcome::Ready(SessionPhase::AuthenticatedWithContext)
    );
    assert_eq!(
        session.current_role(),
        CurrentRole::Company(CompanyRole::Tenant)
    );
    let routes: Vec<Route> = session.menu().into_iter().map(|entry| entry.route).collect();
    assert!(routes.contains(&Route::MyInvoices));
    assert!(!routes.contains(&Route::Team));
    assert_eq!(
        app.store.get(StoreKey::SelectedCompanyId).as_deref(),
        Some("company-b")
    );
}

#[tokio::test]
async fn revoked_token_forces_logout_through_the_session() {
    // Arrange
    let app = spawn_app().await;
    app.mock.set_memberships(&[("company-a", "OWNER")]);
    let session = app.session();
    session.login(app.login_args()).await.unwrap();
    let mut outcomes = session.subscribe();
    app.mock.revoke_all_tokens();

    // Act
    let actual = app
        .core_client
        .find_all::<Property, _>(no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(actual.unwrap_err(), ApiError::SessionExpired);
    assert_eq!(session.snapshot(), SessionSnapshot::default());
    assert_eq!(
        outcomes.next().await,
        Some(SessionOutcome::LoggedOut {
            reason: Some(ApiError::SessionExpired.to_string())
        })
    );
    assert_eq!(
        evaluate(&session.snapshot(), Route::Properties),
        GuardDecision::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn stored_session_is_restored_on_start() {
    // Arrange
    let app = spawn_app().await;
    app.mock
        .set_memberships(&[("company-a", "OWNER"), ("company-b", "TENANT")]);
    app.mock
        .valid_tokens
        .lock()
        .unwrap()
        .insert(LOGIN_TOKEN.to_string());
    app.store.set(StoreKey::AccessToken, LOGIN_TOKEN);
    app.store.set(StoreKey::SelectedCompanyId, "company-b");
    let session = app.session();
    assert_eq!(
        evaluate(&session.snapshot(), Route::Dashboard),
        GuardDecision::Defer
    );

    // Act
    let outcome = session.restore().await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SessionOutcome::Ready(SessionPhase::AuthenticatedWithContext)
    );
    assert_eq!(
        evaluate(&session.snapshot(), Route::Dashboard),
        GuardDecision::Allow
    );
}

#[tokio::test]
async fn restoring_an_expired_session_logs_out() {
    // Arrange
    let app = spawn_app().await;
    app.store.set(StoreKey::AccessToken, "expired-token");
    app.store.set(StoreKey::SelectedCompanyId, "company-a");
    let session = app.session();

    // Act
    let outcome = session.restore().await.unwrap();

    // Assert
    assert!(
        matches!(outcome, SessionOutcome::LoggedOut { reason: Some(_) }),
        "{outcome:?}"
    );
    assert_eq!(session.snapshot(), SessionSnapshot::default());
    assert_eq!(app.store.get(StoreKey::AccessToken), None);
    assert_eq!(app.store.get(StoreKey::SelectedCompanyId), None);
}
