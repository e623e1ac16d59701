use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{identifier_or_placeholder, ApiPayload, Editable, Entity, Resource};
use super::status::{lenient_account_status, AccountStatus};

/// A student record as returned by `/api/students`.
///
/// Every descriptive field is optional: list payloads are sometimes trimmed
/// down to `id` and `status`, and such records are still valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// National identity document number.
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// `None` when the API omits the status or sends one outside
    /// [`AccountStatus`].
    #[serde(default, deserialize_with = "lenient_account_status")]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fields a student search term can be matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentField {
    #[default]
    FirstName,
    LastName,
    Email,
    Dni,
    PhoneNumber,
}

impl StudentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Dni => "dni",
            Self::PhoneNumber => "phone_number",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            "dni" => Some(Self::Dni),
            "phone_number" | "phone" => Some(Self::PhoneNumber),
            _ => None,
        }
    }
}

impl Entity for Student {
    type Status = AccountStatus;
    type Field = StudentField;

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> Option<AccountStatus> {
        self.status
    }

    fn field_text(&self, field: StudentField) -> Option<String> {
        match field {
            StudentField::FirstName => self.first_name.clone(),
            StudentField::LastName => self.last_name.clone(),
            StudentField::Email => self.email.clone(),
            StudentField::Dni => self.dni.clone(),
            StudentField::PhoneNumber => self.phone_number.clone(),
        }
    }
}

impl Resource for Student {
    const COLLECTION_PATH: &'static str = "/api/students";
    const LABEL: &'static str = "Student";
}

impl Editable for Student {
    type Form = StudentForm;
}

/// Console form for creating or editing a student.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Sent to the API as `phone_number`.
    pub phone: Option<String>,
    /// Synthesized from a timestamp when left empty.
    pub dni: Option<String>,
    /// Only sent when set, so updates keep the current password.
    pub password: Option<String>,
    pub status: AccountStatus,
}

impl ApiPayload for StudentForm {
    fn to_api_body(&self, now: DateTime<Utc>) -> serde_json::Value {
        let mut body = serde_json::json!({
            "first_name": self.first_name,
            "last_name": self.last_name,
            "email": self.email,
            "phone_number": self.phone.clone().unwrap_or_default(),
            "dni": identifier_or_placeholder(self.dni.as_deref(), now),
            "status": self.status.as_str(),
        });
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            body["password"] = serde_json::Value::String(password.to_string());
        }
        body
    }
}
