use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProjectAdmin,
    Member,
}

impl Role {
    pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
    pub const MANAGERS: &[Role] = &[Role::Admin, Role::ProjectAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ProjectAdmin => "project_admin",
            Role::Member => "member",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "project_admin" => Some(Role::ProjectAdmin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the "my role in this project" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub role: String,
}

/// Rendering guard: whether `current` is one of `allowed`.
///
/// Advisory only. The server enforces the real permission check, this just
/// decides which controls are drawn. An unset or unrecognised role never
/// passes.
pub fn allowed(current: Option<&str>, allowed: &[Role]) -> bool {
    current
        .and_then(Role::from_str)
        .is_some_and(|role| allowed.contains(&role))
}
