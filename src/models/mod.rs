//! Document types and field constraints
//!
//! Request bodies deserialize into `New*` types, which `validate()` into
//! normalized documents. Field names are camelCase on the wire and at rest.

mod content;
mod course;
mod errors;
mod fields;
mod user;

pub use content::{Content, NewContent};
pub use course::{Course, CourseLevel, Lesson, NewCourse, NewLesson};
pub use errors::{ModelResult, ValidationError};
pub use user::{Certificate, Enrollment, NewCertificate, NewEnrollment, NewUser, Role, User};

use crate::index::IndexSpec;
use crate::store::CollectionSpec;

pub const USERS: &str = "users";
pub const COURSES: &str = "courses";
pub const CONTENTS: &str = "contents";

/// Compound lookup index for a lesson's content
pub const CONTENT_LESSON_INDEX: &str = "courseId_1_lessonId_1";

/// Every collection the application stores, with its indexes
pub fn catalog() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec::new(USERS, vec![IndexSpec::unique("email")]),
        CollectionSpec::new(
            COURSES,
            vec![
                IndexSpec::unique("slug"),
                IndexSpec::single("category"),
                IndexSpec::single("isPublished"),
            ],
        ),
        CollectionSpec::new(CONTENTS, vec![IndexSpec::compound(&["courseId", "lessonId"])]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_indexes() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);

        let contents = catalog.iter().find(|c| c.name == CONTENTS).unwrap();
        assert_eq!(contents.indexes[0].name, CONTENT_LESSON_INDEX);

        let users = catalog.iter().find(|c| c.name == USERS).unwrap();
        assert!(users.indexes[0].unique);
    }
}
