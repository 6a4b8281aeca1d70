use chrono::{DateTime, Utc};
use crate::assignment::{Assignment, AssignmentKind};
use crate::error::HubError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const DAY_IN_MILLIS: i64 = 24 * 60 * 60 * 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Only(AssignmentKind),
}

impl TypeFilter {
    pub fn accepts(self, kind: AssignmentKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted == kind,
        }
    }
}

impl Default for TypeFilter {
    fn default() -> TypeFilter {
        TypeFilter::All
    }
}

impl FromStr for TypeFilter {
    type Err = HubError;

    fn from_str(s: &str) -> Result<TypeFilter, HubError> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Earliest due date first.
    DueDate,
    /// Highest points first.
    Points,
    Title,
}

impl Default for SortKey {
    fn default() -> SortKey {
        SortKey::DueDate
    }
}

impl FromStr for SortKey {
    type Err = HubError;

    fn from_str(s: &str) -> Result<SortKey, HubError> {
        match s.trim() {
            "dueDate" | "due-date" | "due" => Ok(SortKey::DueDate),
            "points" => Ok(SortKey::Points),
            "title" => Ok(SortKey::Title),
            other => Err(HubError::InvalidInput(format!(
                "sort must be dueDate, points or title, got {:?}",
                other
            ))),
        }
    }
}

/// Base letters only: decomposed, accents dropped, case folded.
fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Decomposed and case folded, accents kept.
fn accent_key(title: &str) -> String {
    title.nfd().collect::<String>().to_lowercase()
}

/// Collator-style ordering: base letters first, then accents, then case
/// with lower case ahead, so "apple" < "Apple" < "Éclair" < "Zebra".
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| b.cmp(a))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentQuery {
    pub search: String,
    pub type_filter: TypeFilter,
    pub sort: SortKey,
}

impl AssignmentQuery {
    pub fn new(search: &str, type_filter: TypeFilter, sort: SortKey) -> AssignmentQuery {
        AssignmentQuery {
            search: search.to_string(),
            type_filter,
            sort,
        }
    }

    pub fn matches(&self, assignment: &Assignment) -> bool {
        let needle = self.search.to_lowercase();
        let text_match = assignment.title.to_lowercase().contains(&needle)
            || assignment.description.to_lowercase().contains(&needle);
        text_match && self.type_filter.accepts(assignment.kind)
    }

    /// Filtered, sorted view over `assignments`. Equal keys keep their
    /// original relative order.
    pub fn apply<'a>(&self, assignments: &'a [Assignment]) -> Vec<&'a Assignment> {
        let mut view: Vec<&Assignment> = assignments.iter().filter(|a| self.matches(a)).collect();
        match self.sort {
            SortKey::DueDate => view.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
            SortKey::Points => view.sort_by(|a, b| b.points.cmp(&a.points)),
            SortKey::Title => view.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        }
        view
    }
}

/// Whole days until `due`, any partial day counting as a full one.
pub fn days_until_due(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = due.signed_duration_since(now).num_milliseconds();
    let days = millis / DAY_IN_MILLIS;
    if millis % DAY_IN_MILLIS > 0 {
        days + 1
    } else {
        days
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    DueToday,
    DueTomorrow,
    DaysLeft(i64),
}

impl Urgency {
    pub fn classify(due: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
        match days_until_due(due, now) {
            days if days < 0 => Urgency::Overdue,
            0 => Urgency::DueToday,
            1 => Urgency::DueTomorrow,
            days => Urgency::DaysLeft(days),
        }
    }

    pub fn is_urgent(self) -> bool {
        match self {
            Urgency::DaysLeft(_) => false,
            _ => true,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Urgency::Overdue => f.write_str("Overdue"),
            Urgency::DueToday => f.write_str("Due today"),
            Urgency::DueTomorrow => f.write_str("Due tomorrow"),
            Urgency::DaysLeft(days) => write!(f, "{} days left", days),
        }
    }
}
