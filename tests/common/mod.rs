//! Shared test utilities.

#![allow(dead_code, unused_imports)]

pub mod fake_api;

use std::sync::Arc;

use campus_console::session::{KeyValueStorage, MemoryStorage};
use campus_console::{Console, ConsoleConfig};
use serde_json::{json, Value};

pub use fake_api::{FakeApi, FakeState, ListShape};

/// Token the fake API accepts by default.
pub const TOKEN: &str = "abc123";

/// Console against `url` with empty in-memory storage.
pub fn console_at(url: &str) -> (Console, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let console = Console::with_storage(ConsoleConfig::new(url), storage.clone())
        .expect("Failed to build console");
    (console, storage)
}

/// Console with [`TOKEN`] already stored, as a previous login would leave it.
pub fn signed_in_console(api: &FakeApi) -> (Console, Arc<MemoryStorage>) {
    let (console, storage) = console_at(&api.url);
    storage.set("token", TOKEN).expect("Failed to store token");
    storage
        .set(
            "user",
            r#"{"id": 1, "name": "Rosa Admin", "role": "admin", "roles": ["admin"]}"#,
        )
        .expect("Failed to store user");
    (console, storage)
}

/// Fake API that accepts [`TOKEN`].
pub async fn spawn_api() -> FakeApi {
    FakeApi::spawn(FakeState::with_token(TOKEN)).await
}

/// A URL where nothing is listening.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn student_json(id: i64, first_name: &str, email: &str, status: &str) -> Value {
    json!({
        "id": id,
        "first_name": first_name,
        "last_name": "Test",
        "email": email,
        "dni": format!("{:08}", id),
        "status": status,
    })
}
