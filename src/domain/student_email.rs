use validator::validate_email;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentEmail(String);

impl StudentEmail {
    pub fn parse(email: String) -> Result<StudentEmail, String> {
        let email = email.trim().to_string();

        if !validate_email(&email) {
            return Err(format!("{} is not a valid student email", email));
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for StudentEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
