//! Course documents
//!
//! A catalog entry with its ordered lesson descriptors embedded by value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ModelResult, ValidationError};
use super::fields::{one_of, optional_trimmed, path, required};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    const ALLOWED: [&'static str; 3] = ["beginner", "intermediate", "advanced"];

    fn parse(value: Option<String>) -> ModelResult<Self> {
        Ok(match one_of("level", value, &Self::ALLOWED, "beginner")? {
            "intermediate" => CourseLevel::Intermediate,
            "advanced" => CourseLevel::Advanced,
            _ => CourseLevel::Beginner,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Request body for a new lesson descriptor
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub id: Option<String>,
    pub title: Option<String>,
    pub order: Option<i64>,
    pub content_id: Option<String>,
    pub duration: Option<u32>,
}

impl NewLesson {
    fn validate(self, index: usize) -> ModelResult<Lesson> {
        Ok(Lesson {
            id: required(&path("lessons", index, "id"), self.id, false)?,
            title: required(&path("lessons", index, "title"), self.title, false)?,
            order: self
                .order
                .ok_or_else(|| ValidationError::missing_field(path("lessons", index, "order")))?,
            content_id: self.content_id,
            duration: self.duration,
        })
    }
}

/// A validated, normalized course ready for insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub level: CourseLevel,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub total_students: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub is_published: bool,
}

impl Course {
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Reads the course fields back out of a stored document.
    pub fn from_document(document: &Value) -> serde_json::Result<Self> {
        Course::deserialize(document)
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }
}

/// Request body for `POST /api/courses`
///
/// Fields outside the course schema are dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Option<Vec<String>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub lessons: Option<Vec<NewLesson>>,
    pub total_students: Option<u64>,
    pub average_rating: Option<f64>,
    pub is_published: Option<bool>,
}

impl NewCourse {
    pub fn validate(self) -> ModelResult<Course> {
        let average_rating = match self.average_rating {
            Some(r) if !(0.0..=5.0).contains(&r) => {
                return Err(ValidationError::out_of_range("averageRating", 0.0, 5.0, r));
            }
            other => other,
        };

        let mut lessons = self
            .lessons
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, lesson)| lesson.validate(i))
            .collect::<ModelResult<Vec<_>>>()?;
        lessons.sort_by_key(|l| l.order);

        Ok(Course {
            title: required("title", self.title, true)?,
            slug: required("slug", self.slug, true)?.to_lowercase(),
            description: required("description", self.description, false)?,
            category: required("category", self.category, true)?,
            level: CourseLevel::parse(self.level)?,
            author: required("author", self.author, true)?,
            thumbnail: optional_trimmed(self.thumbnail),
            tags: self.tags.unwrap_or_default(),
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            lessons,
            total_students: self.total_students.unwrap_or(0),
            average_rating,
            is_published: self.is_published.unwrap_or(false),
        })
    }
}
