//! Lesson content documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ModelResult;
use super::fields::required;

/// Body of one lesson. `markdownContent` is the source of truth,
/// `htmlContent` its pre-rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub course_id: String,
    pub lesson_id: String,
    pub markdown_content: String,
    pub html_content: String,
}

impl Content {
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Request body for `POST /api/contents`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    pub course_id: Option<String>,
    pub lesson_id: Option<String>,
    pub markdown_content: Option<String>,
    pub html_content: Option<String>,
}

impl NewContent {
    pub fn validate(self) -> ModelResult<Content> {
        Ok(Content {
            course_id: required("courseId", self.course_id, true)?,
            lesson_id: required("lessonId", self.lesson_id, true)?,
            markdown_content: required("markdownContent", self.markdown_content, false)?,
            html_content: required("htmlContent", self.html_content, false)?,
        })
    }
}
