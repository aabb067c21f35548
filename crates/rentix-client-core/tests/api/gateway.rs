use rentix_client_core::{no_cb, Client, MemoryTokenStore};
use rentix_shared::{
    errors::ApiError,
    req_args::{NewUserReqArgs, UserSearchReqArgs},
    resources::{AddressDraft, AddressType, Property, PropertyDraft},
    storage::StoreKey,
};

use crate::helpers::{context_token, spawn_app, LOGIN_TOKEN};

fn draft(name: &str, address: &str) -> PropertyDraft {
    PropertyDraft {
        name: name.to_string(),
        address: address.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn login_is_sent_without_bearer_and_others_with() {
    // Arrange
    let app = spawn_app().await;
    app.store.set(StoreKey::AccessToken, "stale-token");

    // Act
    let tokens = app
        .core_client
        .login(&app.login_args(), no_cb)
        .await
        .unwrap()
        .unwrap();
    app.store
        .set(StoreKey::AccessToken, tokens.access_token.expose());
    app.core_client.current_user(no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(
        app.mock.requests(),
        vec![
            "POST /auth/login -".to_string(),
            format!("GET /users/me {LOGIN_TOKEN}"),
        ]
    );
}

#[tokio::test]
async fn bad_credentials_do_not_end_the_session() {
    // Arrange
    let app = spawn_app().await;
    app.store.set(StoreKey::AccessToken, "existing-token");
    let args = app.login_args().password("wrong".to_string().into());

    // Act
    let actual = app.core_client.login(&args, no_cb).await.unwrap();

    // Assert
    let err = actual.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)), "{err:?}");
    assert_eq!(err.user_message(), "Invalid credentials");
    assert_eq!(
        app.store.get(StoreKey::AccessToken).as_deref(),
        Some("existing-token")
    );
}

#[tokio::test]
async fn unauthorized_crud_request_clears_the_store() {
    // Arrange
    let app = spawn_app().await;
    app.store.set(StoreKey::AccessToken, "revoked-token");
    app.store.set(StoreKey::RefreshToken, "refresh");
    app.store.set(StoreKey::SelectedCompanyId, "company-a");

    // Act
    let actual = app
        .core_client
        .find_all::<Property, _>(no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(actual.unwrap_err(), ApiError::SessionExpired);
    assert_eq!(app.store.get(StoreKey::AccessToken), None);
    assert_eq!(app.store.get(StoreKey::RefreshToken), None);
    assert_eq!(app.store.get(StoreKey::SelectedCompanyId), None);
}

#[tokio::test]
async fn unauthorized_handshake_request_keeps_the_store() {
    // Arrange
    let app = spawn_app().await;
    app.store.set(StoreKey::AccessToken, "revoked-token");

    // Act
    let actual = app.core_client.current_user(no_cb).await.unwrap();

    // Assert
    assert!(matches!(actual, Err(ApiError::Unauthorized(_))));
    assert_eq!(
        app.store.get(StoreKey::AccessToken).as_deref(),
        Some("revoked-token")
    );
}

#[tokio::test]
async fn validation_messages_are_joined() {
    // Arrange
    let app = spawn_app().await;
    app.mock.valid_tokens.lock().unwrap().insert(LOGIN_TOKEN.to_string());
    app.store.set(StoreKey::AccessToken, LOGIN_TOKEN);

    // Act
    let actual = app
        .core_client
        .create::<Property, _>(&draft(" ", ""), no_cb)
        .await
        .unwrap();

    // Assert
    match actual.unwrap_err() {
        ApiError::Rejected { status, payload } => {
            assert_eq!(status, 400);
            assert_eq!(
                payload.message,
                "name should not be empty; address should not be empty"
            );
            assert_eq!(payload.error.as_deref(), Some("Bad Request"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(app.core_client.has_access_token());
}

#[tokio::test]
async fn soft_delete_then_restore() {
    // Arrange
    let app = spawn_app().await;
    app.mock.valid_tokens.lock().unwrap().insert(LOGIN_TOKEN.to_string());
    app.store.set(StoreKey::AccessToken, LOGIN_TOKEN);
    let created: Property = app
        .core_client
        .create::<Property, _>(&draft("Ático Centro", "Calle Mayor 1"), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Act
    app.core_client
        .remove::<Property, _>(&created.id, no_cb)
        .await
        .unwrap()
        .unwrap();
    let active = app
        .core_client
        .find_all::<Property, _>(no_cb)
        .await
        .unwrap()
        .unwrap();
    let trash = app
        .core_client
        .find_trash::<Property, _>(no_cb)
        .await
        .unwrap()
        .unwrap();
    let restored: Property = app
        .core_client
        .restore::<Property, _>(&created.id, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(active.is_empty());
    assert_eq!(trash.len(), 1);
    assert!(!trash[0].is_active);
    assert!(trash[0].deleted_at.is_some());
    assert!(restored.is_active);
    assert_eq!(restored.id, created.id);
}

#[tokio::test]
async fn forbidden_company_switch_is_rejected() {
    // Arrange
    let app = spawn_app().await;
    app.mock.valid_tokens.lock().unwrap().insert(LOGIN_TOKEN.to_string());
    app.store.set(StoreKey::AccessToken, LOGIN_TOKEN);
    app.mock.set_memberships(&[("company-a", "OWNER")]);
    let company = "company-z".try_into().unwrap();

    // Act
    let actual = app
        .core_client
        .select_company(&company, no_cb)
        .await
        .unwrap();

    // Assert
    match actual.unwrap_err() {
        ApiError::Rejected { status, payload } => {
            assert_eq!(status, 403);
            assert_eq!(payload.message, "You do not belong to this company");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_ne!(
        app.store.get(StoreKey::AccessToken),
        Some(context_token("company-z"))
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Arrange
    // Nothing listens on the discard port during tests
    let client = Client::new("http://127.0.0.1:9".to_string(), MemoryTokenStore::shared());

    // Act
    let actual = client.current_user(no_cb).await.unwrap();

    // Assert
    let err = actual.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    assert_eq!(
        err.user_message(),
        "Unable to reach the server. Please try again"
    );
}

#[tokio::test]
async fn user_search_reads_paged_listing() {
    // Arrange
    let app = spawn_app().await;
    app.mock.valid_tokens.lock().unwrap().insert(LOGIN_TOKEN.to_string());
    app.store.set(StoreKey::AccessToken, LOGIN_TOKEN);
    let args = UserSearchReqArgs::search("luis");

    // Act
    let actual = app.core_client.search_users(&args, no_cb).await.unwrap();

    // Assert
    let users = actual.unwrap().into_users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id.as_ref(), "u-2");
    assert_eq!(
        app.mock.requests(),
        vec![format!("GET /users {LOGIN_TOKEN}")]
    );
}

#[tokio::test]
async fn address_draft_comes_back_with_an_id() {
    // Arrange
    let app = spawn_app().await;
    app.mock.valid_tokens.lock().unwrap().insert(LOGIN_TOKEN.to_string());
    app.store.set(StoreKey::AccessToken, LOGIN_TOKEN);
    let draft = AddressDraft {
        address_line1: "Calle Mayor 1".to_string(),
        city: "Madrid".to_string(),
        postal_code: "28013".to_string(),
        ..Default::default()
    };

    // Act
    let actual = app
        .core_client
        .create_address_draft(&draft, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(actual.id.as_ref(), "a-1");
    assert_eq!(actual.address_type, AddressType::Fiscal);
    assert_eq!(actual.country_code, "ES");
    assert!(actual.is_default);
}

#[tokio::test]
async fn duplicate_user_is_reported() {
    // Arrange
    let app = spawn_app().await;
    app.mock.valid_tokens.lock().unwrap().insert(LOGIN_TOKEN.to_string());
    app.store.set(StoreKey::AccessToken, LOGIN_TOKEN);
    let args = NewUserReqArgs::new(
        "luis@rentix.es".try_into().unwrap(),
        "Temp1234!".to_string().into(),
    );

    // Act
    let actual = app.core_client.new_user(&args, no_cb).await.unwrap();

    // Assert
    assert_eq!(actual.unwrap_err().user_message(), "Email already registered");
    assert_eq!(
        app.store.get(StoreKey::AccessToken).as_deref(),
        Some(LOGIN_TOKEN)
    );
}
