mod health_check;
mod student_updated;

pub use health_check::health_check;
pub use student_updated::{handle_student_updated, TriggerError};
