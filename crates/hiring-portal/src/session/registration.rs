use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use serde::Serialize;

use super::identity::Role;

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 8;

/// Account creation form, checked locally before it is sent to `auth/register`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl fmt::Debug for RegistrationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationProfile")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("skills", &self.skills)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be at least 2 characters long")]
    NameTooShort(&'static str),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least 8 characters with an uppercase letter, a lowercase letter and a number")]
    WeakPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("candidates must list at least one skill")]
    SkillsRequired,
    #[error("accounts cannot be registered with role {0}")]
    RoleNotRegistrable(Role),
}

impl RegistrationProfile {
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
            ("password confirmation", &self.confirm_password),
        ];
        if let Some((field, _)) = required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(RegistrationError::MissingField(field));
        }

        if self.first_name.trim().chars().count() < MIN_NAME_LEN {
            return Err(RegistrationError::NameTooShort("first name"));
        }
        if self.last_name.trim().chars().count() < MIN_NAME_LEN {
            return Err(RegistrationError::NameTooShort("last name"));
        }

        if !looks_like_email(self.email.trim()) {
            return Err(RegistrationError::InvalidEmail);
        }

        if !is_strong_password(&self.password) {
            return Err(RegistrationError::WeakPassword);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        match self.role {
            Role::Candidate if self.skills.iter().all(|s| s.trim().is_empty()) => {
                Err(RegistrationError::SkillsRequired)
            }
            Role::Admin | Role::Unknown => Err(RegistrationError::RoleNotRegistrable(self.role)),
            _ => Ok(()),
        }
    }
}

/// Same shape check the sign-up form applies: `local@domain.tld`, no spaces, one `@`.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn looks_like_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
        .is_match(value)
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
