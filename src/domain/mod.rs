pub mod accepted_student;
pub mod student_change;
pub mod student_email;
pub mod student_name;
pub mod student_snapshot;
pub mod student_status;
