use chrono::{DateTime, Utc};
use crate::clock::RecordId;
use crate::error::{HubError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    Individual,
    Group,
}

impl AssignmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentKind::Individual => "individual",
            AssignmentKind::Group => "group",
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentKind {
    type Err = HubError;

    fn from_str(s: &str) -> Result<AssignmentKind> {
        match s.trim().to_lowercase().as_ref() {
            "individual" => Ok(AssignmentKind::Individual),
            "group" => Ok(AssignmentKind::Group),
            other => Err(HubError::InvalidInput(format!(
                "assignment type must be individual or group, got {:?}",
                other
            ))),
        }
    }
}

// Declaration order is difficulty order.
#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Difficulty {
        Difficulty::Intermediate
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Difficulty> {
        match s.trim().to_lowercase().as_ref() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(HubError::InvalidInput(format!("unknown difficulty {:?}", other))),
        }
    }
}

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
}

/// Ordered tag list. Insertion order is kept, exact duplicates and blank
/// tags are dropped on the way in.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new() -> Tags {
        Tags(Vec::new())
    }

    /// Returns false when the tag was blank or already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> std::slice::Iter<String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> std::iter::FromIterator<&'a str> for Tags {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Tags {
        let mut tags = Tags::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

impl From<Vec<String>> for Tags {
    fn from(raw: Vec<String>) -> Tags {
        raw.iter().map(|t| t.as_str()).collect()
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Vec<String> {
        tags.0
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    pub points: u32,
    pub difficulty: Difficulty,
    pub tags: Tags,
    pub professor: String,
    // Expected to stay <= total_students, nothing clamps it
    pub submissions: u32,
    pub total_students: u32,
    pub status: AssignmentStatus,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
    #[serde(default)]
    pub max_file_size_mb: u32,
}

impl Assignment {
    /// Fraction of students who have submitted, 0.0 for an empty class.
    pub fn completion_ratio(&self) -> f32 {
        if self.total_students == 0 {
            return 0.0;
        }
        self.submissions as f32 / self.total_students as f32
    }
}

pub fn default_file_types() -> Vec<String> {
    vec!["pdf".to_string(), "doc".to_string(), "txt".to_string()]
}

fn default_points() -> u32 {
    100
}

fn default_max_file_size() -> u32 {
    10
}

/// What a professor fills in. Counters, status and id are owned by the store.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDraft {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub professor: String,
    #[serde(default)]
    pub total_students: Option<u32>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default = "default_file_types")]
    pub allowed_file_types: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u32,
}

impl AssignmentDraft {
    pub fn new(title: &str, description: &str, due_date: DateTime<Utc>) -> AssignmentDraft {
        AssignmentDraft {
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            kind: AssignmentKind::Individual,
            points: default_points(),
            difficulty: Difficulty::default(),
            tags: vec![],
            professor: String::new(),
            total_students: None,
            instructions: String::new(),
            resources: vec![],
            allowed_file_types: default_file_types(),
            max_file_size_mb: default_max_file_size(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(HubError::InvalidInput("assignment title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(HubError::InvalidInput(
                "assignment description is required".to_string(),
            ));
        }
        if self.points == 0 {
            return Err(HubError::InvalidInput("points must be at least 1".to_string()));
        }
        if self
            .resources
            .iter()
            .any(|r| r.title.trim().is_empty() || r.url.trim().is_empty())
        {
            return Err(HubError::InvalidInput(
                "resources need both a title and a url".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_assignment(self, id: RecordId, default_total_students: u32) -> Assignment {
        Assignment {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            kind: self.kind,
            points: self.points,
            difficulty: self.difficulty,
            tags: self.tags.iter().map(|t| t.as_str()).collect(),
            professor: self.professor,
            submissions: 0,
            total_students: self.total_students.unwrap_or(default_total_students),
            status: AssignmentStatus::Active,
            instructions: self.instructions,
            resources: self.resources,
            allowed_file_types: self.allowed_file_types,
            max_file_size_mb: self.max_file_size_mb,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<AssignmentKind>,
    pub points: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub professor: Option<String>,
    pub submissions: Option<u32>,
    pub total_students: Option<u32>,
    pub instructions: Option<String>,
    pub resources: Option<Vec<Resource>>,
    pub allowed_file_types: Option<Vec<String>>,
    pub max_file_size_mb: Option<u32>,
}

impl AssignmentUpdate {
    pub fn apply_to(self, assignment: &mut Assignment) {
        if let Some(title) = self.title {
            assignment.title = title;
        }
        if let Some(description) = self.description {
            assignment.description = description;
        }
        if let Some(due_date) = self.due_date {
            assignment.due_date = due_date;
        }
        if let Some(kind) = self.kind {
            assignment.kind = kind;
        }
        if let Some(points) = self.points {
            assignment.points = points;
        }
        if let Some(difficulty) = self.difficulty {
            assignment.difficulty = difficulty;
        }
        if let Some(tags) = self.tags {
            assignment.tags = Tags::from(tags);
        }
        if let Some(professor) = self.professor {
            assignment.professor = professor;
        }
        if let Some(submissions) = self.submissions {
            assignment.submissions = submissions;
        }
        if let Some(total_students) = self.total_students {
            assignment.total_students = total_students;
        }
        if let Some(instructions) = self.instructions {
            assignment.instructions = instructions;
        }
        if let Some(resources) = self.resources {
            assignment.resources = resources;
        }
        if let Some(allowed_file_types) = self.allowed_file_types {
            assignment.allowed_file_types = allowed_file_types;
        }
        if let Some(max_file_size_mb) = self.max_file_size_mb {
            assignment.max_file_size_mb = max_file_size_mb;
        }
    }
}
