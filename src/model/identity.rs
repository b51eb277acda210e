use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller identity as handed over by the external identity provider. The
/// engine trusts it without re-validating role-based access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerIdentity {
    id: Uuid,
    email: String,
    role: Role,
}

impl LearnerIdentity {
    pub fn new<S: Into<String>>(id: Uuid, email: S, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "instructor" => Self::Instructor,
            _ => Self::Student,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Instructor => write!(f, "instructor"),
        }
    }
}
