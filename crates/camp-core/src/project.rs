use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CampError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
}

impl ProjectStatus {
    pub const ALL: &[ProjectStatus] = &[ProjectStatus::Active, ProjectStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProjectStatus::Active),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }

    /// The other status. Used by two-value pickers.
    pub fn toggled(&self) -> Self {
        match self {
            ProjectStatus::Active => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::Active,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl Project {
    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    /// Text of the confirmation shown before the project is deleted.
    pub fn delete_prompt(&self) -> String {
        format!(
            "Are you sure you want to delete project \"{}\"? This action cannot be undone.",
            self.name
        )
    }
}

/// Partial project update. Unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl UpdateProject {
    pub fn validate(&self) -> Result<(), CampError> {
        match &self.name {
            Some(name) if name.is_empty() => Err(CampError::InvalidInput(
                "Project name is required".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_mongo_id_and_defaults() {
        let p: Project = serde_json::from_str(r#"{"_id":"p1","name":"Camp"}"#).unwrap();
        assert_eq!(p.id, "p1");
        assert_eq!(p.description, "");
        assert_eq!(p.status, ProjectStatus::Active);
    }

    #[test]
    fn completed_status_round_trips_as_snake_case() {
        let p: Project = serde_json::from_str(
            r#"{"_id":"p1","name":"Camp","description":"d","status":"completed"}"#,
        )
        .unwrap();
        assert!(p.is_completed());
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["_id"], "p1");
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = UpdateProject {
            description: Some("new".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"description":"new"}"#);
    }

    #[test]
    fn only_empty_name_is_rejected() {
        let update = UpdateProject {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        let spaces = UpdateProject {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(spaces.validate().is_ok());
        assert!(UpdateProject::default().validate().is_ok());
    }

    #[test]
    fn delete_prompt_names_the_project() {
        let p = Project {
            id: "p1".into(),
            name: "Apollo".into(),
            description: String::new(),
            status: ProjectStatus::Active,
        };
        assert!(p.delete_prompt().contains("\"Apollo\""));
    }

    #[test]
    fn status_helpers() {
        assert_eq!(ProjectStatus::from_str("completed"), Some(ProjectStatus::Completed));
        assert_eq!(ProjectStatus::from_str("archived"), None);
        assert_eq!(ProjectStatus::Active.toggled(), ProjectStatus::Completed);
        assert_eq!(ProjectStatus::Completed.to_string(), "Completed");
    }
}
