use serde::{Deserialize, Serialize};

use super::entity::{Entity, Resource};
use super::status::Publication;

/// A course submitted by a teacher and waiting for an admin decision.
///
/// Pending courses are reviewed rather than edited: the console can approve,
/// reject or bulk-approve them, but never creates or modifies one directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingCourse {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CourseField {
    #[default]
    Title,
    Category,
    TeacherName,
}

impl CourseField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Category => "category",
            Self::TeacherName => "teacher_name",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "category" => Some(Self::Category),
            "teacher_name" | "teacher" => Some(Self::TeacherName),
            _ => None,
        }
    }
}

impl Entity for PendingCourse {
    type Status = Publication;
    type Field = CourseField;

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> Option<Publication> {
        Some(Publication::from_flag(self.is_published))
    }

    fn field_text(&self, field: CourseField) -> Option<String> {
        match field {
            CourseField::Title => self.title.clone(),
            CourseField::Category => self.category.clone(),
            CourseField::TeacherName => self.teacher_name.clone(),
        }
    }
}

impl Resource for PendingCourse {
    const COLLECTION_PATH: &'static str = "/api/pending-courses";
    const LABEL: &'static str = "Course";
}

/// Path for approving a single course.
pub fn course_approve_path(id: i64) -> String {
    format!("/api/courses/{}/approve", id)
}

/// Path for rejecting a single course.
pub fn course_reject_path(id: i64) -> String {
    format!("/api/courses/{}/reject", id)
}

pub const COURSE_BULK_APPROVE_PATH: &str = "/api/courses/bulk-approve";
