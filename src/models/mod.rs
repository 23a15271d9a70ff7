use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Category of a study material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Notes,
    Textbook,
    Paper,
    Assignment,
    Lab,
    Ppt,
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notes" => Ok(Self::Notes),
            "textbook" => Ok(Self::Textbook),
            "paper" => Ok(Self::Paper),
            "assignment" => Ok(Self::Assignment),
            "lab" => Ok(Self::Lab),
            "ppt" => Ok(Self::Ppt),
            other => Err(format!("unknown material type '{}'", other)),
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Notes => "notes",
            Self::Textbook => "textbook",
            Self::Paper => "paper",
            Self::Assignment => "assignment",
            Self::Lab => "lab",
            Self::Ppt => "ppt",
        };
        f.write_str(s)
    }
}

/// Metadata record for one uploaded file. Immutable after creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Material {
    pub id: u64,
    pub title: String,
    pub subject: String,
    pub semester: String,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    /// Generated on-disk name (uuid-prefixed, traversal-safe).
    pub filename: String,
    /// Client-supplied name, kept for display only.
    pub originalname: String,
    pub mimetype: String,
    pub size: u64,
    pub path: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

/// Admin identity as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminUser {
    pub email: String,
    pub role: String,
}

impl AdminUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: "admin".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_type_round_trip() {
        for s in ["notes", "textbook", "paper", "assignment", "lab", "ppt"] {
            let kind: MaterialType = s.parse().unwrap();
            assert_eq!(kind.to_string(), s);
        }
        assert!("video".parse::<MaterialType>().is_err());
        assert!("Notes".parse::<MaterialType>().is_err());
    }

    #[test]
    fn test_material_wire_field_names() {
        let material = Material {
            id: 1,
            title: "Calc Notes".to_string(),
            subject: "Math".to_string(),
            semester: "1".to_string(),
            kind: MaterialType::Notes,
            filename: "abc_notes.txt".to_string(),
            originalname: "notes.txt".to_string(),
            mimetype: "text/plain".to_string(),
            size: 42,
            path: "/uploads/abc_notes.txt".to_string(),
            uploaded_at: Utc::now(),
        };

        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["type"], "notes");
        assert_eq!(json["originalname"], "notes.txt");
        assert!(json["uploadedAt"].is_string());
    }
}
