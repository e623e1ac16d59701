//! Per-screen entity service.
//!
//! One [`EntityService`] backs one management screen. It owns the screen's
//! [`EntityCollection`], loads it through the authenticated client, and runs
//! mutations with the reload discipline: after the server accepts a change
//! the whole list is fetched again, so the screen shows exactly what the
//! server persisted.
//!
//! Mutations take `&mut self`. A second mutation on the same service cannot
//! start until the first one has settled.

use campus_core::models::{
    course_approve_path, course_reject_path, ApiPayload, Editable, PendingCourse, Resource,
    COURSE_BULK_APPROVE_PATH,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::collection::EntityCollection;
use crate::error::{Result, SyncError};
use crate::http::{ApiRequest, AuthenticatedClient};
use crate::mutation::{submit, ConfirmAction, MutationState};
use crate::notify::Notifier;

#[derive(Debug)]
pub struct EntityService<E: Resource> {
    client: AuthenticatedClient,
    notifier: Notifier,
    collection: EntityCollection<E>,
    mutation_state: MutationState,
}

impl<E: Resource> EntityService<E> {
    pub fn new(client: AuthenticatedClient, notifier: Notifier) -> Self {
        Self {
            client,
            notifier,
            collection: EntityCollection::new(),
            mutation_state: MutationState::Idle,
        }
    }

    pub fn collection(&self) -> &EntityCollection<E> {
        &self.collection
    }

    /// Mutable access for changing filter criteria.
    pub fn collection_mut(&mut self) -> &mut EntityCollection<E> {
        &mut self.collection
    }

    pub fn mutation_state(&self) -> &MutationState {
        &self.mutation_state
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Replace the canonical list with the server's current one.
    ///
    /// On failure the previous list stays in place and the collection's load
    /// state records the error. Returns the number of entities loaded.
    pub async fn reload(&mut self) -> Result<usize> {
        self.collection.begin_loading();
        match self.fetch_list().await {
            Ok(payload) => {
                let loaded = self.collection.load(payload);
                tracing::debug!("Loaded {} {} records", loaded, E::LABEL);
                Ok(loaded)
            }
            Err(e) => {
                tracing::error!("Failed to load {} list: {}", E::LABEL, e);
                self.collection.fail_loading(e.user_message(), e.requires_login());
                self.notifier.error(e.user_message());
                Err(e)
            }
        }
    }

    async fn fetch_list(&self) -> Result<Value> {
        let response = self.client.execute(ApiRequest::get(E::COLLECTION_PATH)).await?;
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|e| {
            tracing::warn!("List response from {} is not JSON: {}", E::COLLECTION_PATH, e);
            Value::Null
        });

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Could not load {} list ({})", E::LABEL, status));
            return Err(SyncError::application(Some(status.as_u16()), message));
        }

        Ok(body)
    }

    /// Submit `request`, notify, and reload on success.
    async fn run_mutation(&mut self, request: ApiRequest, success_message: String) -> Result<()> {
        self.mutation_state = MutationState::Submitting;

        let reply = match submit(&self.client, request).await {
            Ok(reply) => reply,
            Err(e) => {
                self.notifier.error(e.user_message());
                self.mutation_state = MutationState::Failed(e.user_message());
                return Err(e);
            }
        };

        self.notifier.success(reply.message.unwrap_or(success_message));

        match self.reload().await {
            Ok(_) => {
                self.mutation_state = MutationState::Reconciled;
                Ok(())
            }
            Err(e) => {
                self.mutation_state = MutationState::Failed(e.user_message());
                Err(e)
            }
        }
    }
}

impl<E: Editable> EntityService<E> {
    pub async fn create(&mut self, form: &E::Form) -> Result<()> {
        let body = form.to_api_body(Utc::now());
        let request = ApiRequest::post(E::COLLECTION_PATH).json(body);
        self.run_mutation(request, format!("{} created", E::LABEL)).await
    }

    pub async fn update(&mut self, id: i64, form: &E::Form) -> Result<()> {
        let body = form.to_api_body(Utc::now());
        let request = ApiRequest::put(E::member_path(id)).json(body);
        self.run_mutation(request, format!("{} updated", E::LABEL)).await
    }

    /// Delete `id` after `confirm` agrees. Returns `false`, without touching
    /// the server, when the confirmation is declined.
    pub async fn remove(&mut self, id: i64, confirm: &impl ConfirmAction) -> Result<bool> {
        let prompt = format!(
            "Delete {} #{}? This cannot be undone.",
            E::LABEL.to_lowercase(),
            id
        );
        if !confirm.confirm(&prompt) {
            tracing::info!("Deletion of {} #{} cancelled", E::LABEL, id);
            return Ok(false);
        }

        let request = ApiRequest::delete(E::member_path(id));
        self.run_mutation(request, format!("{} deleted", E::LABEL)).await?;
        Ok(true)
    }
}

impl EntityService<PendingCourse> {
    pub async fn approve(&mut self, id: i64) -> Result<()> {
        let request = ApiRequest::post(course_approve_path(id));
        self.run_mutation(request, "Course approved".to_string()).await
    }

    pub async fn reject(&mut self, id: i64, reason: Option<&str>) -> Result<()> {
        let mut request = ApiRequest::post(course_reject_path(id));
        if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
            request = request.json(json!({ "reason": reason }));
        }
        self.run_mutation(request, "Course rejected".to_string()).await
    }

    /// Approve several courses in one request. An empty list does nothing.
    pub async fn bulk_approve(&mut self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let request =
            ApiRequest::post(COURSE_BULK_APPROVE_PATH).json(json!({ "course_ids": ids }));
        self.run_mutation(request, format!("{} courses approved", ids.len())).await
    }
}
