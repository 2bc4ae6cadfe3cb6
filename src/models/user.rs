//! User documents
//!
//! Enrollments and certificates are embedded by value.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{hash_password, AuthResult};

use super::errors::{ModelResult, ValidationError};
use super::fields::{normalize_timestamp, one_of, optional_trimmed, path, required, timestamp_or};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    const ALLOWED: [&'static str; 2] = ["admin", "user"];

    fn parse(value: Option<String>) -> ModelResult<Self> {
        Ok(match one_of("role", value, &Self::ALLOWED, "user")? {
            "admin" => Role::Admin,
            _ => Role::User,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub progress: u8,
    #[serde(default)]
    pub completed_lessons: BTreeSet<String>,
    pub last_accessed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Enrollment {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnrollment {
    pub course_id: Option<String>,
    pub progress: Option<f64>,
    pub completed_lessons: Option<Vec<String>>,
    pub last_accessed_at: Option<String>,
    pub completed_at: Option<String>,
}

impl NewEnrollment {
    fn validate(self, index: usize, now: &str) -> ModelResult<Enrollment> {
        let progress = self.progress.unwrap_or(0.0);
        if !(0.0..=100.0).contains(&progress) {
            return Err(ValidationError::out_of_range(
                path("enrolledCourses", index, "progress"),
                0.0,
                100.0,
                progress,
            ));
        }

        let completed_at = self
            .completed_at
            .map(|v| normalize_timestamp(&path("enrolledCourses", index, "completedAt"), &v))
            .transpose()?;

        Ok(Enrollment {
            course_id: self.course_id,
            progress: progress.round() as u8,
            completed_lessons: self.completed_lessons.unwrap_or_default().into_iter().collect(),
            last_accessed_at: timestamp_or(
                &path("enrolledCourses", index, "lastAccessedAt"),
                self.last_accessed_at,
                now,
            )?,
            completed_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub issued_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificate {
    pub course_id: Option<String>,
    pub issued_at: Option<String>,
    pub certificate_url: Option<String>,
}

impl NewCertificate {
    fn validate(self, index: usize, now: &str) -> ModelResult<Certificate> {
        Ok(Certificate {
            course_id: self.course_id,
            issued_at: timestamp_or(&path("certificates", index, "issuedAt"), self.issued_at, now)?,
            certificate_url: self.certificate_url,
        })
    }
}

/// A validated, normalized user ready for insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    /// Argon2id PHC string
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<Enrollment>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

impl User {
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Request body for `POST /api/users`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub enrolled_courses: Option<Vec<NewEnrollment>>,
    pub certificates: Option<Vec<NewCertificate>>,
}

impl NewUser {
    /// Replaces a present, non-empty plaintext password with its hash.
    pub fn hash_password(mut self) -> AuthResult<Self> {
        if let Some(plain) = self.password.as_deref().filter(|p| !p.is_empty()) {
            self.password = Some(hash_password(plain)?);
        }
        Ok(self)
    }

    /// Validates and normalizes the body. `now` stamps defaulted dates.
    pub fn validate(self, now: &str) -> ModelResult<User> {
        let enrolled_courses = self
            .enrolled_courses
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, e)| e.validate(i, now))
            .collect::<ModelResult<Vec<_>>>()?;

        let certificates = self
            .certificates
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.validate(i, now))
            .collect::<ModelResult<Vec<_>>>()?;

        Ok(User {
            name: required("name", self.name, true)?,
            email: required("email", self.email, true)?.to_lowercase(),
            password: required("password", self.password, false)?,
            role: Role::parse(self.role)?,
            department: optional_trimmed(self.department),
            position: optional_trimmed(self.position),
            enrolled_courses,
            certificates,
        })
    }
}
