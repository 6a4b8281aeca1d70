use chrono::{DateTime, Utc};
use crate::clock::RecordId;

/// A room where a group works on an assignment together.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    pub id: RecordId,
    pub name: String,
    pub assignment_id: Option<RecordId>,
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationDraft {
    pub name: String,
    #[serde(default)]
    pub assignment_id: Option<RecordId>,
    #[serde(default)]
    pub members: Vec<String>,
}

impl CollaborationDraft {
    pub fn into_collaboration(self, id: RecordId, created_at: DateTime<Utc>) -> Collaboration {
        let mut members: Vec<String> = Vec::with_capacity(self.members.len());
        for member in self.members {
            if !members.contains(&member) {
                members.push(member);
            }
        }
        Collaboration {
            id,
            name: self.name,
            assignment_id: self.assignment_id,
            members,
            created_at,
        }
    }
}
