use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{identifier_or_placeholder, ApiPayload, Editable, Entity, Resource};
use super::status::{lenient_account_status, AccountStatus};

/// A teacher record as returned by `/api/teachers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Teacher {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Subject area the teacher is registered for.
    #[serde(default)]
    pub specialty: Option<String>,
    /// `None` when the API omits the status or sends one outside
    /// [`AccountStatus`].
    #[serde(default, deserialize_with = "lenient_account_status")]
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeacherField {
    #[default]
    FirstName,
    LastName,
    Email,
    Dni,
    Specialty,
}

impl TeacherField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Dni => "dni",
            Self::Specialty => "specialty",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            "dni" => Some(Self::Dni),
            "specialty" => Some(Self::Specialty),
            _ => None,
        }
    }
}

impl Entity for Teacher {
    type Status = AccountStatus;
    type Field = TeacherField;

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> Option<AccountStatus> {
        self.status
    }

    fn field_text(&self, field: TeacherField) -> Option<String> {
        match field {
            TeacherField::FirstName => self.first_name.clone(),
            TeacherField::LastName => self.last_name.clone(),
            TeacherField::Email => self.email.clone(),
            TeacherField::Dni => self.dni.clone(),
            TeacherField::Specialty => self.specialty.clone(),
        }
    }
}

impl Resource for Teacher {
    const COLLECTION_PATH: &'static str = "/api/teachers";
    const LABEL: &'static str = "Teacher";
}

impl Editable for Teacher {
    type Form = TeacherForm;
}

/// Console form for creating or editing a teacher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dni: Option<String>,
    pub specialty: Option<String>,
    pub password: Option<String>,
    pub status: AccountStatus,
}

impl ApiPayload for TeacherForm {
    fn to_api_body(&self, now: DateTime<Utc>) -> serde_json::Value {
        let mut body = serde_json::json!({
            "first_name": self.first_name,
            "last_name": self.last_name,
            "email": self.email,
            "phone_number": self.phone.clone().unwrap_or_default(),
            "dni": identifier_or_placeholder(self.dni.as_deref(), now),
            "specialty": self.specialty.clone().unwrap_or_default(),
            "status": self.status.as_str(),
        });
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            body["password"] = serde_json::Value::String(password.to_string());
        }
        body
    }
}
