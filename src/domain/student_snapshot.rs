use serde::Deserialize;

use crate::domain::student_status::StudentStatus;

/// State of a student record as the Record Store saw it at one point in time.
///
/// Contact fields are optional here because only a notification needs them;
/// they are validated when a snapshot is turned into an `AcceptedStudent`.
/// Fields the notifier does not care about are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudentSnapshot {
    pub id: String,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "firstName", alias = "fname")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName", alias = "lname")]
    pub last_name: Option<String>,
}
