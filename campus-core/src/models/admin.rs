use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{ApiPayload, Editable, Entity, Resource};
use super::status::{lenient_account_status, AccountStatus};

/// A console operator account as returned by `/api/admins`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Admin {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// `None` when the API omits the status or sends one outside
    /// [`AccountStatus`].
    #[serde(default, deserialize_with = "lenient_account_status")]
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminField {
    #[default]
    Name,
    Email,
    PhoneNumber,
}

impl AdminField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone_number" | "phone" => Some(Self::PhoneNumber),
            _ => None,
        }
    }
}

impl Entity for Admin {
    type Status = AccountStatus;
    type Field = AdminField;

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> Option<AccountStatus> {
        self.status
    }

    fn field_text(&self, field: AdminField) -> Option<String> {
        match field {
            AdminField::Name => self.name.clone(),
            AdminField::Email => self.email.clone(),
            AdminField::PhoneNumber => self.phone_number.clone(),
        }
    }
}

impl Resource for Admin {
    const COLLECTION_PATH: &'static str = "/api/admins";
    const LABEL: &'static str = "Admin";
}

impl Editable for Admin {
    type Form = AdminForm;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub status: AccountStatus,
}

impl ApiPayload for AdminForm {
    fn to_api_body(&self, _now: DateTime<Utc>) -> serde_json::Value {
        let mut body = serde_json::json!({
            "name": self.name,
            "email": self.email,
            "phone_number": self.phone.clone().unwrap_or_default(),
            "status": self.status.as_str(),
        });
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            body["password"] = serde_json::Value::String(password.to_string());
        }
        body
    }
}
