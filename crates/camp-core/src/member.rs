use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CampError;

/// Roles that can be granted when inviting someone to a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteRole {
    #[default]
    Member,
    ProjectAdmin,
}

impl InviteRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteRole::Member => "member",
            InviteRole::ProjectAdmin => "project_admin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InviteRole::Member => "Member",
            InviteRole::ProjectAdmin => "Project Admin",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            InviteRole::Member => InviteRole::ProjectAdmin,
            InviteRole::ProjectAdmin => InviteRole::Member,
        }
    }
}

impl fmt::Display for InviteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMember {
    pub email: String,
    pub role: InviteRole,
}

impl AddMember {
    pub fn new(email: &str, role: InviteRole) -> Result<Self, CampError> {
        if email.is_empty() {
            return Err(CampError::InvalidInput("Email is required".into()));
        }
        Ok(Self {
            email: email.to_string(),
            role,
        })
    }
}
