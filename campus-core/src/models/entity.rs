use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// A record managed by one of the console screens.
///
/// Entities are deserialized straight from the API. The sync layer never looks
/// at concrete fields; it only needs the id, the status, and a way to read a
/// searchable field as text.
pub trait Entity: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Closed set of statuses this entity can be in.
    type Status: Copy + Eq + Debug + Send + Sync;
    /// Closed set of fields a search term can be matched against.
    type Field: Copy + Eq + Debug + Default + Send + Sync;

    fn id(&self) -> i64;

    /// Current status, or `None` when the record carries no status this
    /// console recognizes.
    fn status(&self) -> Option<Self::Status>;

    /// Text value of `field`, or `None` when the record doesn't carry it.
    fn field_text(&self, field: Self::Field) -> Option<String>;
}

/// An entity exposed as a REST collection.
pub trait Resource: Entity {
    /// Collection path, e.g. `/api/students`.
    const COLLECTION_PATH: &'static str;
    /// Human label used in notifications, e.g. `Student`.
    const LABEL: &'static str;

    fn member_path(id: i64) -> String {
        format!("{}/{}", Self::COLLECTION_PATH, id)
    }
}

/// A resource that supports create, update and delete.
pub trait Editable: Resource {
    type Form: ApiPayload + Send + Sync;
}

/// A form that knows how to render itself in the API's vocabulary.
///
/// Form field names follow the console; the API uses different names for some
/// of them (`phone` is `phone_number` on the wire). `now` is used to synthesize
/// placeholder identifiers the server requires to be unique.
pub trait ApiPayload {
    fn to_api_body(&self, now: DateTime<Utc>) -> serde_json::Value;
}

/// Placeholder for an optional identifier the API requires to be unique.
pub fn placeholder_identifier(now: DateTime<Utc>) -> String {
    format!("TMP-{}", now.timestamp_millis())
}

/// Returns `value` unless it's missing or blank, in which case a timestamp
/// placeholder is used.
pub fn identifier_or_placeholder(value: Option<&str>, now: DateTime<Utc>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder_identifier(now),
    }
}
