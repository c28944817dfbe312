use crate::domain::student_email::StudentEmail;
use crate::domain::student_name::StudentName;
use crate::domain::student_snapshot::StudentSnapshot;

/// A student whose record has just moved into `Accepted`, with every field a
/// notification needs already validated.
#[derive(Debug, Clone)]
pub struct AcceptedStudent {
    pub id: String,
    pub email: StudentEmail,
    pub name: StudentName,
}

impl TryFrom<&StudentSnapshot> for AcceptedStudent {
    type Error = String;

    fn try_from(snapshot: &StudentSnapshot) -> Result<Self, Self::Error> {
        let email = snapshot
            .email
            .clone()
            .ok_or_else(|| format!("student {} has no email", snapshot.id))?;
        let first_name = snapshot
            .first_name
            .clone()
            .ok_or_else(|| format!("student {} has no first name", snapshot.id))?;
        let last_name = snapshot
            .last_name
            .clone()
            .ok_or_else(|| format!("student {} has no last name", snapshot.id))?;

        Ok(AcceptedStudent {
            id: snapshot.id.clone(),
            email: StudentEmail::parse(email)?,
            name: StudentName::parse(first_name, last_name)?,
        })
    }
}
