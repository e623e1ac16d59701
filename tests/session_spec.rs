//! Session validation and login against the fake API.

mod common;

use campus_console::session::KeyValueStorage;
use campus_console::{AuthFailure, SyncError};
use common::*;

mod validate {
    use super::*;

    #[tokio::test]
    async fn returns_the_token_when_the_server_accepts_it() {
        let api = spawn_api().await;
        let (console, _storage) = signed_in_console(&api);

        let token = console.client().validator().validate().await;

        assert_eq!(token.as_deref(), Some(TOKEN));
        assert_eq!(api.with(|s| s.probe_calls), 1);
    }

    #[tokio::test]
    async fn returns_the_unquoted_token_when_stored_quoted() {
        let api = spawn_api().await;
        let (console, storage) = console_at(&api.url);
        storage.set("token", "\"abc123\"").unwrap();

        let token = console.client().validator().validate().await;

        assert_eq!(token.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn is_idempotent_without_revocation() {
        let api = spawn_api().await;
        let (console, _storage) = signed_in_console(&api);
        let validator = console.client().validator();

        let first = validator.validate().await;
        let second = validator.validate().await;

        assert_eq!(first, second);
        assert_eq!(api.with(|s| s.probe_calls), 2);
    }

    #[tokio::test]
    async fn rejected_token_clears_token_and_user() {
        let api = FakeApi::spawn(FakeState::with_token("someone-else")).await;
        let (console, storage) = signed_in_console(&api);

        let token = console.client().validator().validate().await;

        assert!(token.is_none());
        assert!(storage.get("token").is_none());
        assert!(storage.get("user").is_none());
    }

    #[tokio::test]
    async fn rejection_is_stable_across_calls() {
        let api = FakeApi::spawn(FakeState::with_token("someone-else")).await;
        let (console, _storage) = signed_in_console(&api);
        let validator = console.client().validator();

        assert!(validator.validate().await.is_none());
        assert!(validator.validate().await.is_none());
    }

    #[tokio::test]
    async fn skips_the_probe_without_a_token() {
        let api = spawn_api().await;
        let (console, _storage) = console_at(&api.url);

        assert!(console.client().validator().validate().await.is_none());
        assert_eq!(api.with(|s| s.probe_calls), 0);
    }

    #[tokio::test]
    async fn network_failure_fails_closed() {
        let url = dead_url().await;
        let (console, storage) = console_at(&url);
        storage.set("token", TOKEN).unwrap();
        storage.set("user", r#"{"id": 1, "name": "Rosa", "role": "admin"}"#).unwrap();

        assert!(console.client().validator().validate().await.is_none());
        assert!(storage.get("token").is_none());
        assert!(storage.get("user").is_none());
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn stores_token_and_principal_after_server_confirms() {
        let api = spawn_api().await;
        let (console, storage) = console_at(&api.url);

        let principal = console
            .login_with_token("\"abc123\"")
            .await
            .expect("Login failed");

        assert_eq!(principal.display_name, "Rosa Admin");
        assert!(principal.has_role("reviewer"));
        assert_eq!(storage.get("token").as_deref(), Some("abc123"));
        assert_eq!(console.credentials().get_principal(), Some(principal));
    }

    #[tokio::test]
    async fn rejected_token_is_not_stored() {
        let api = spawn_api().await;
        let (console, storage) = console_at(&api.url);

        let result = console.login_with_token("forged").await;

        assert!(matches!(
            result,
            Err(SyncError::Authentication(AuthFailure::NoSession))
        ));
        assert!(storage.get("token").is_none());
        assert_eq!(console.notifier().active_notifications().len(), 1);
    }

    #[tokio::test]
    async fn blank_token_is_refused_without_a_request() {
        let api = spawn_api().await;
        let (console, _storage) = console_at(&api.url);

        let result = console.login_with_token("   ").await;

        assert!(result.is_err());
        assert_eq!(api.with(|s| s.probe_calls), 0);
    }
}

mod current_principal {
    use super::*;

    #[tokio::test]
    async fn returns_cached_principal_for_valid_session() {
        let api = spawn_api().await;
        let (console, _storage) = signed_in_console(&api);

        let principal = console.current_principal().await.unwrap();

        assert_eq!(principal.map(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn refetches_a_corrupt_profile() {
        let api = spawn_api().await;
        let (console, storage) = signed_in_console(&api);
        storage.set("user", "{{{").unwrap();

        let principal = console.current_principal().await.unwrap().unwrap();

        assert_eq!(principal.display_name, "Rosa Admin");
        assert!(storage.get("user").unwrap().contains("Rosa Admin"));
    }

    #[tokio::test]
    async fn returns_none_without_session() {
        let api = spawn_api().await;
        let (console, _storage) = console_at(&api.url);

        assert!(console.current_principal().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let api = spawn_api().await;
        let (console, storage) = signed_in_console(&api);

        console.logout();

        assert!(storage.get("token").is_none());
        assert!(storage.get("user").is_none());
        assert!(console.current_principal().await.unwrap().is_none());
    }
}
