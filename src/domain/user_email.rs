use validator::ValidateEmail;

// Emails are compared case-insensitively, so they are stored lowercase
#[derive(Debug, Clone, PartialEq)]
pub struct UserEmail(pub String);

impl UserEmail{
    pub fn parse(email: String) -> Result<UserEmail, String>{
        let email = email.trim().to_lowercase();

        if email.validate_email(){
            Ok(Self(email))
        } else {
            Err(format!("{} is not a valid user email", email))
        }
    }

    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
