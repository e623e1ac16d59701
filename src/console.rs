//! The console facade: one session, many screens.

use std::sync::Arc;

use campus_core::models::{Admin, PendingCourse, Principal, Resource, Student, Teacher};
use reqwest::Client;

use crate::config::ConsoleConfig;
use crate::error::{AuthFailure, Result, SyncError};
use crate::http::AuthenticatedClient;
use crate::notify::Notifier;
use crate::service::EntityService;
use crate::session::{
    normalize_token, CredentialStore, FileStorage, KeyValueStorage, SessionValidator,
};

/// Wires storage, session handling, the HTTP client and notifications
/// together, and hands out one [`EntityService`] per screen.
///
/// All services created from the same console share its credential store, so
/// a session cleared by any of them is cleared for all.
#[derive(Debug, Clone)]
pub struct Console {
    config: ConsoleConfig,
    credentials: CredentialStore,
    client: AuthenticatedClient,
    notifier: Notifier,
}

impl Console {
    /// Build a console backed by file storage, at the configured path or in
    /// the platform data directory.
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let storage = match &config.storage_path {
            Some(path) => FileStorage::open(path)?,
            None => FileStorage::open_default()?,
        };
        tracing::debug!("Session storage at {}", storage.path().display());
        Self::with_storage(config, Arc::new(storage))
    }

    pub fn with_storage(config: ConsoleConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let credentials = CredentialStore::new(storage);
        let validator =
            SessionValidator::new(http.clone(), config.base_url.clone(), credentials.clone());
        let client = AuthenticatedClient::new(
            http,
            config.base_url.clone(),
            validator,
            credentials.clone(),
        );
        let notifier = Notifier::new(config.notification_ttl());

        Ok(Self {
            config,
            credentials,
            client,
            notifier,
        })
    }

    /// Replace the notifier, e.g. to render through a host-specific sink.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn service<E: Resource>(&self) -> EntityService<E> {
        EntityService::new(self.client.clone(), self.notifier.clone())
    }

    pub fn students(&self) -> EntityService<Student> {
        self.service()
    }

    pub fn teachers(&self) -> EntityService<Teacher> {
        self.service()
    }

    pub fn admins(&self) -> EntityService<Admin> {
        self.service()
    }

    pub fn pending_courses(&self) -> EntityService<PendingCourse> {
        self.service()
    }

    /// Start a session from a token issued elsewhere.
    ///
    /// The token is only stored once the server has confirmed it by returning
    /// the owning principal, which is cached alongside.
    pub async fn login_with_token(&self, token: &str) -> Result<Principal> {
        let token = normalize_token(token)
            .ok_or(SyncError::Authentication(AuthFailure::NoSession))?;

        let principal = match self.client.validator().fetch_principal(&token).await {
            Ok(principal) => principal,
            Err(e) => {
                self.notifier.error(e.user_message());
                return Err(e);
            }
        };

        self.credentials.set_token(&token)?;
        self.credentials.set_principal(&principal)?;
        tracing::info!("Signed in as {} ({})", principal.display_name, principal.role);
        self.notifier
            .success(format!("Signed in as {}", principal.display_name));
        Ok(principal)
    }

    /// The signed-in principal, or `None` when there is no valid session.
    ///
    /// Validates the session first. A missing or corrupt cached profile is
    /// fetched again from the server.
    pub async fn current_principal(&self) -> Result<Option<Principal>> {
        let Some(token) = self.client.validator().validate().await else {
            return Ok(None);
        };

        if let Some(principal) = self.credentials.get_principal() {
            return Ok(Some(principal));
        }

        let principal = self.client.validator().fetch_principal(&token).await?;
        self.credentials.set_principal(&principal)?;
        Ok(Some(principal))
    }

    pub fn logout(&self) {
        self.credentials.clear();
        self.notifier.info("Signed out");
    }
}
