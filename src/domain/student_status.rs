use serde::Deserialize;

/// Admission status stored on a student record.
///
/// Only `Accepted` matters to the notifier. Statuses the admissions dashboard
/// adds later are kept verbatim in `Other`, and a record whose status is
/// missing or null is still waiting for a decision, so it reads as `Pending`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum StudentStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Other(String),
}

impl StudentStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, StudentStatus::Accepted)
    }

    pub fn parse(status: Option<String>) -> StudentStatus {
        match status.as_deref() {
            None | Some("Pending") => StudentStatus::Pending,
            Some("Accepted") => StudentStatus::Accepted,
            Some("Rejected") => StudentStatus::Rejected,
            Some(other) => StudentStatus::Other(other.to_string()),
        }
    }
}

impl From<Option<String>> for StudentStatus {
    fn from(status: Option<String>) -> Self {
        StudentStatus::parse(status)
    }
}

impl AsRef<str> for StudentStatus {
    fn as_ref(&self) -> &str {
        match self {
            StudentStatus::Pending => "Pending",
            StudentStatus::Accepted => "Accepted",
            StudentStatus::Rejected => "Rejected",
            StudentStatus::Other(status) => status,
        }
    }
}
