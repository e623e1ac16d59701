use serde::{Deserialize, Deserializer, Serialize};

/// Account status shared by students, teachers and admins.
///
/// - `Active`: Can sign in and use the platform
/// - `Inactive`: Temporarily disabled
/// - `Banned`: Blocked by an administrator
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
    Banned,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }
}

/// Reads an account status field without failing the record.
///
/// A missing, `null`, non-string or unknown value becomes `None`, so a record
/// the API tags with a status this console doesn't know still loads.
pub fn lenient_account_status<'de, D>(deserializer: D) -> Result<Option<AccountStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(AccountStatus::from_str))
}

/// Publication state of a course, derived from its `is_published` flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Publication {
    Published,
    Unpublished,
}

impl Publication {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Unpublished => "unpublished",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "published" => Some(Self::Published),
            "unpublished" => Some(Self::Unpublished),
            _ => None,
        }
    }

    pub fn from_flag(is_published: bool) -> Self {
        if is_published {
            Self::Published
        } else {
            Self::Unpublished
        }
    }
}
