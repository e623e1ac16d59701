use serde::{Deserialize, Serialize};

/// The authenticated operator, as cached in the `user` storage key.
///
/// A principal is either fully formed or absent: any stored profile missing
/// `id`, `role` or a display name fails to deserialize and is discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    #[serde(rename = "displayName", alias = "display_name", alias = "name")]
    pub display_name: String,
    /// Primary role, e.g. `admin`.
    pub role: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role || self.roles.iter().any(|r| r == role)
    }
}
