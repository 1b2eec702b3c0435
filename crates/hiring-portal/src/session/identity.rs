use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a portal user as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Portal roles. Anything the backend sends that we do not recognise lands in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Recruiter,
    Interviewer,
    Candidate,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::Recruiter,
        Role::Interviewer,
        Role::Candidate,
    ];

    pub fn from_claim(raw: &str) -> Self {
        match raw.trim() {
            "ADMIN" => Role::Admin,
            "RECRUITER" => Role::Recruiter,
            "INTERVIEWER" => Role::Interviewer,
            "CANDIDATE" => Role::Candidate,
            _ => Role::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Recruiter => "RECRUITER",
            Role::Interviewer => "INTERVIEWER",
            Role::Candidate => "CANDIDATE",
            Role::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed view of the signed-in user. Built once from a decoded credential and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    id: UserId,
    display_name: String,
    email: Option<String>,
    role: Role,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            id: UserId(id.into()),
            display_name: display_name.into(),
            email,
            role,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognised_roles_deserialize_as_unknown() {
        let role: Role = serde_json::from_str("\"SUPERUSER\"").expect("role parses");
        assert_eq!(role, Role::Unknown);
        let role: Role = serde_json::from_str("\"INTERVIEWER\"").expect("role parses");
        assert_eq!(role, Role::Interviewer);
    }

    #[test]
    fn claim_parsing_is_case_sensitive() {
        assert_eq!(Role::from_claim("RECRUITER"), Role::Recruiter);
        assert_eq!(Role::from_claim("recruiter"), Role::Unknown);
    }
}
