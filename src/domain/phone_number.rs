use std::fmt::Debug;

use phonenumber::{country, Mode};

// Numbers without a country code are read as Bangladeshi and stored in E.164
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNumberDomain(pub String);

impl PhoneNumberDomain{
    pub fn parse(number: String) -> Result<PhoneNumberDomain, String>{
        match phonenumber::parse(Some(country::BD), number.trim()) {
            Ok(parsed) if phonenumber::is_valid(&parsed) => {
                Ok(Self(parsed.format().mode(Mode::E164).to_string()))
            },
            _ => Err(format!("{} is not a valid phone number", number))
        }
    }

    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl std::fmt::Display for PhoneNumberDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
