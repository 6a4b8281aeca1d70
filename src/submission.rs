use chrono::{DateTime, Utc};
use crate::clock::RecordId;
use crate::user::UuidString;

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: RecordId,
    pub assignment_id: RecordId,
    pub student_id: UuidString,
    pub content: String,
    pub files: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub status: SubmissionStatus,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    pub assignment_id: RecordId,
    pub student_id: UuidString,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<String>,
}

impl SubmissionDraft {
    pub fn into_submission(self, id: RecordId, timestamp: DateTime<Utc>) -> Submission {
        Submission {
            id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            files: self.files,
            timestamp,
            status: SubmissionStatus::Submitted,
        }
    }
}
