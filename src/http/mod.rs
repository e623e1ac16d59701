//! HTTP plumbing shared by the validator and the executor.

mod executor;

pub use executor::{merge_headers, ApiRequest, AuthenticatedClient};

/// Join the configured base URL with an absolute API path.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
