use actix_web::web;
use serde::Deserialize;

use crate::domain::student_snapshot::StudentSnapshot;

/// One committed update to a student record: the record before and after the
/// write.
#[derive(Debug, Clone)]
pub struct StudentChange {
    pub event_id: Option<String>,
    pub before: StudentSnapshot,
    pub after: StudentSnapshot,
}

#[derive(Deserialize)]
pub struct StudentChangeBody {
    #[serde(default)]
    pub event_id: Option<String>,
    pub before: StudentSnapshot,
    pub after: StudentSnapshot,
}

impl StudentChange {
    pub fn new(before: StudentSnapshot, after: StudentSnapshot) -> Result<StudentChange, String> {
        if before.id != after.id {
            return Err(format!(
                "before snapshot {} and after snapshot {} belong to different records",
                before.id, after.id
            ));
        }

        Ok(StudentChange {
            event_id: None,
            before,
            after,
        })
    }

    pub fn with_event_id(mut self, event_id: Option<String>) -> Self {
        self.event_id = event_id.filter(|id| !id.trim().is_empty());
        self
    }

    pub fn student_id(&self) -> &str {
        &self.after.id
    }

    /// True only for the edge into `Accepted`. Rewrites that keep the record
    /// accepted, and moves out of `Accepted`, do not count.
    pub fn is_acceptance(&self) -> bool {
        !self.before.status.is_accepted() && self.after.status.is_accepted()
    }
}

impl TryFrom<web::Json<StudentChangeBody>> for StudentChange {
    type Error = String;

    fn try_from(body: web::Json<StudentChangeBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();

        Ok(StudentChange::new(body.before, body.after)?.with_event_id(body.event_id))
    }
}
