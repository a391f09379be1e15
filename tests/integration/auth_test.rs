//! Account and session integration tests.

mod helpers;

use avenue_core::error::ErrorKind;
use avenue_service::{RegisterRequest, RequestContext};

use helpers::TestApp;

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::memory();
    let token = app.register_and_login("admin@example.com", "password").await;
    assert!(!token.is_empty());

    let ctx = RequestContext::authenticate(&app.auth, &token)
        .await
        .expect("Authenticate failed");
    let profile = app.users.get_profile(&ctx).await.expect("Profile failed");
    assert_eq!(profile.email, "admin@example.com");
    assert_eq!(profile.username, "admin@example.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::memory();
    app.register_and_login("user@example.com", "password").await;

    let err = app.auth.login("user@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::memory();
    app.register_and_login("dup@example.com", "password").await;

    let err = app
        .users
        .register(RegisterRequest {
            email: "DUP@example.com".to_string(),
            username: Some("someone-else".to_string()),
            password: "password".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = TestApp::memory();
    let err = RequestContext::authenticate(&app.auth, "not-a-session")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = TestApp::memory();
    let token = app.register_and_login("out@example.com", "password").await;

    app.auth.logout(&token).expect("Logout failed");

    let err = RequestContext::authenticate(&app.auth, &token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_disabled_user_loses_access() {
    let app = TestApp::memory();
    let token = app.register_and_login("gone@example.com", "password").await;
    let ctx = RequestContext::authenticate(&app.auth, &token)
        .await
        .expect("Authenticate failed");

    app.users.disable(ctx.user_id).await.expect("Disable failed");

    let err = RequestContext::authenticate(&app.auth, &token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert!(app.auth.login("gone@example.com", "password").await.is_err());
}

#[tokio::test]
async fn test_password_change_round_trip() {
    let app = TestApp::memory();
    let ctx = app.user("pw@example.com").await;

    let err = app
        .users
        .update_password(&ctx, "password", "short")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    app.users
        .update_password(&ctx, "password", "correct horse battery")
        .await
        .expect("Password change failed");

    assert!(app.auth.login("pw@example.com", "password").await.is_err());
    assert!(
        app.auth
            .login("pw@example.com", "correct horse battery")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_root_bootstrap_is_idempotent() {
    let app = TestApp::memory();
    let first = app.users.ensure_root_user("rootpass").await.expect("Bootstrap failed");
    let second = app.users.ensure_root_user("newroot1").await.expect("Reset failed");
    assert_eq!(first.id, second.id);

    assert!(app.auth.login(&second.email, "newroot1").await.is_ok());
}
