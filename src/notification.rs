use chrono::{DateTime, Utc};
use crate::clock::RecordId;
use std::fmt;

/// Notification category. Kinds this build does not know about are kept
/// verbatim in `Other` so newer producers never break the panel.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Assignment,
    Grade,
    Collaboration,
    Badge,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match *self {
            NotificationKind::Assignment => "assignment",
            NotificationKind::Grade => "grade",
            NotificationKind::Collaboration => "collaboration",
            NotificationKind::Badge => "badge",
            NotificationKind::Other(ref kind) => kind,
        }
    }

    pub fn icon(&self) -> &'static str {
        match *self {
            NotificationKind::Assignment => "📝",
            NotificationKind::Grade => "🎯",
            NotificationKind::Collaboration => "👥",
            NotificationKind::Badge => "🏆",
            NotificationKind::Other(_) => "📢",
        }
    }
}

impl From<String> for NotificationKind {
    fn from(kind: String) -> NotificationKind {
        match kind.as_ref() {
            "assignment" => NotificationKind::Assignment,
            "grade" => NotificationKind::Grade,
            "collaboration" => NotificationKind::Collaboration,
            "badge" => NotificationKind::Badge,
            _ => NotificationKind::Other(kind),
        }
    }
}

impl<'a> From<&'a str> for NotificationKind {
    fn from(kind: &'a str) -> NotificationKind {
        NotificationKind::from(kind.to_string())
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> String {
        match kind {
            NotificationKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Notification {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    // Only ever goes false -> true
    pub read: bool,
}

impl Notification {
    /// Coarse "2 hours ago" style age relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> String {
        relative_age(self.timestamp, now)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NotificationDraft {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl NotificationDraft {
    pub fn new<K: Into<NotificationKind>>(
        kind: K,
        title: &str,
        message: &str,
    ) -> NotificationDraft {
        NotificationDraft {
            kind: kind.into(),
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let future = elapsed.num_seconds() < 0;
    let seconds = elapsed.num_seconds().abs();
    let text = if seconds < 45 {
        "less than a minute".to_string()
    } else if seconds < 45 * 60 {
        plural(((seconds as f64) / 60.0).round().max(1.0) as i64, "minute")
    } else if seconds < 24 * 60 * 60 {
        plural(((seconds as f64) / 3600.0).round().max(1.0) as i64, "hour")
    } else if seconds < 30 * 24 * 60 * 60 {
        plural(((seconds as f64) / 86400.0).round() as i64, "day")
    } else {
        plural(((seconds as f64) / (30.0 * 86400.0)).round() as i64, "month")
    };
    if future {
        format!("in {}", text)
    } else {
        format!("{} ago", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_known_kinds_round_trip_names() {
        for name in &["assignment", "grade", "collaboration", "badge"] {
            let kind = NotificationKind::from(*name);
            assert_eq!(kind.as_str(), *name);
            assert_ne!(kind.icon(), "📢", "{} should have its own icon", name);
        }
    }

    #[test]
    fn test_unknown_kind_gets_default_icon() {
        let parsed: Notification = serde_json::from_str(
            r#"{"id":9,"type":"mentorship","title":"t","message":"m",
                "timestamp":"2026-10-16T10:00:00Z","read":false}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.kind,
            NotificationKind::Other("mentorship".to_string())
        );
        assert_eq!(parsed.kind.icon(), "📢");

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["type"], "mentorship");
    }

    #[test]
    fn test_relative_age() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert_eq!(relative_age(now, now), "less than a minute ago");
        assert_eq!(relative_age(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_age(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(relative_age(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_age(now + Duration::hours(1), now), "in 1 hour");
    }
}
