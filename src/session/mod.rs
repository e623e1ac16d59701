//! Session state: storage, credentials and validation.

mod credentials;
mod storage;
mod validator;

pub use credentials::{normalize_token, CredentialStore, TOKEN_KEY, USER_KEY};
pub use storage::{default_storage_path, FileStorage, KeyValueStorage, MemoryStorage};
pub use validator::{SessionValidator, PROBE_PATH};
