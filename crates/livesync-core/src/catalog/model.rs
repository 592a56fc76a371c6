//! Class and course domain models.

use livesync_store::Fields;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection holding classes.
pub const CLASSES: &str = "classes";

/// Collection holding courses.
pub const COURSES: &str = "courses";

/// A class, e.g. "C1".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub alias: String,
}

/// A course taught to a set of classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub subject: String,
    /// Ids of the classes attending this course.
    #[serde(default)]
    pub class_ids: Vec<String>,
}

/// Full catalog state: every class and every course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub classes: Vec<Class>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassPatch {
    pub alias: Option<String>,
}

impl ClassPatch {
    pub fn is_empty(&self) -> bool {
        self.alias.is_none()
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        if let Some(alias) = self.alias {
            fields.insert("alias".to_string(), Value::String(alias));
        }
        fields
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    pub subject: Option<String>,
    pub class_ids: Option<Vec<String>>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.class_ids.is_none()
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        if let Some(subject) = self.subject {
            fields.insert("subject".to_string(), Value::String(subject));
        }
        if let Some(class_ids) = self.class_ids {
            fields.insert(
                "class_ids".to_string(),
                Value::Array(class_ids.into_iter().map(Value::String).collect()),
            );
        }
        fields
    }
}
