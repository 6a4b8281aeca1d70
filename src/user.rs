use chrono::{DateTime, Utc};
use crate::error::HubError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub type UuidString = String;

pub const STARTER_BADGES: [&str; 3] = ["early-bird", "collaborator", "achiever"];

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
    Mentor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professor => "professor",
            Role::Mentor => "mentor",
        }
    }

    pub fn dashboard_path(self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Role, HubError> {
        match s.trim().to_lowercase().as_ref() {
            "student" => Ok(Role::Student),
            "professor" => Ok(Role::Professor),
            "mentor" => Ok(Role::Mentor),
            other => Err(HubError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UuidString,
    pub email: String,
    pub name: String,
    pub avatar: String,
    // Fixed at login, UserUpdate has no way to touch it
    pub role: Role,
    pub xp: u32,
    pub level: u32,
    pub badges: BTreeSet<String>,
    pub institution: String,
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.contains(badge)
    }
}

/// Partial profile edit. `None` leaves the field as it is.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub xp: Option<u32>,
    pub level: Option<u32>,
    pub badges: Option<BTreeSet<String>>,
    pub institution: Option<String>,
}

impl UserUpdate {
    pub fn apply_to(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
        if let Some(xp) = self.xp {
            user.xp = xp;
        }
        if let Some(level) = self.level {
            user.level = level;
        }
        if let Some(badges) = self.badges {
            user.badges = badges;
        }
        if let Some(institution) = self.institution {
            user.institution = institution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            id: "user-uuid".to_string(),
            email: "ada@uni.edu".to_string(),
            name: "ada".to_string(),
            avatar: "avatar".to_string(),
            role: Role::Student,
            xp: 100,
            level: 2,
            badges: BTreeSet::new(),
            institution: "Demo University".to_string(),
            joined_at: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!(" Professor ".parse::<Role>().unwrap(), Role::Professor);
        assert_eq!("mentor".parse::<Role>().unwrap(), Role::Mentor);
        match "dean".parse::<Role>() {
            Err(HubError::UnknownRole(role)) => assert_eq!(role, "dean"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let mut user = sample_user();
        UserUpdate {
            xp: Some(250),
            institution: Some("Night School".to_string()),
            ..UserUpdate::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.xp, 250);
        assert_eq!(user.institution, "Night School");
        assert_eq!(user.name, "ada");
        assert_eq!(user.level, 2);
        assert_eq!(user.role, Role::Student);
    }

    #[test]
    fn test_user_json_shape() {
        let json = serde_json::to_value(&sample_user()).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["joinedAt"], "1970-01-01T00:00:00Z");
    }
}
