use chrono::{DateTime, Utc};
use crate::assignment::Assignment;
use crate::query::Urgency;
use crate::user::{Role, User};

const UPCOMING_LIMIT: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct UpcomingItem {
    pub id: u64,
    pub title: String,
    pub urgency: Urgency,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Overview {
    Student {
        greeting: String,
        level: u32,
        xp: u32,
        badges: usize,
        upcoming: Vec<UpcomingItem>,
    },
    Professor {
        greeting: String,
        active_assignments: usize,
        average_completion: f32,
        upcoming: Vec<UpcomingItem>,
    },
    Mentor {
        greeting: String,
    },
}

/// The first few assignments in store order, which is most recent first.
fn upcoming(assignments: &[Assignment], now: DateTime<Utc>) -> Vec<UpcomingItem> {
    assignments
        .iter()
        .take(UPCOMING_LIMIT)
        .map(|a| UpcomingItem {
            id: a.id,
            title: a.title.clone(),
            urgency: Urgency::classify(a.due_date, now),
            points: a.points,
        })
        .collect()
}

pub fn average_completion(assignments: &[Assignment]) -> f32 {
    if assignments.is_empty() {
        return 0.0;
    }
    let total: f32 = assignments.iter().map(|a| a.completion_ratio()).sum();
    total / assignments.len() as f32
}

pub fn overview(user: &User, assignments: &[Assignment], now: DateTime<Utc>) -> Overview {
    match user.role {
        Role::Student => Overview::Student {
            greeting: format!("Welcome back, {}!", user.name),
            level: user.level,
            xp: user.xp,
            badges: user.badges.len(),
            upcoming: upcoming(assignments, now),
        },
        Role::Professor => Overview::Professor {
            greeting: format!("Welcome back, Prof. {}!", user.name),
            active_assignments: assignments.len(),
            average_completion: average_completion(assignments),
            upcoming: upcoming(assignments, now),
        },
        Role::Mentor => Overview::Mentor {
            greeting: format!("Welcome back, {}!", user.name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::platform::PlatformStore;
    use std::collections::BTreeSet;

    fn user(role: Role) -> User {
        User {
            id: "user-1".to_string(),
            email: "ada@uni.edu".to_string(),
            name: "ada".to_string(),
            avatar: "a".to_string(),
            role,
            xp: 300,
            level: 2,
            badges: BTreeSet::new(),
            institution: "Demo University".to_string(),
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_student_overview() {
        let clock = FixedClock::at_millis(1_760_000_000_000);
        let store = PlatformStore::new(&clock, 45);
        match overview(&user(Role::Student), store.assignments(), clock.now()) {
            Overview::Student {
                greeting,
                level,
                xp,
                badges,
                upcoming,
            } => {
                assert_eq!(greeting, "Welcome back, ada!");
                assert_eq!((level, xp, badges), (2, 300, 0));
                let ids: Vec<u64> = upcoming.iter().map(|u| u.id).collect();
                assert_eq!(ids, vec![1, 2, 3]);
                assert_eq!(upcoming[0].urgency, Urgency::DaysLeft(7));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_professor_overview() {
        let clock = FixedClock::at_millis(1_760_000_000_000);
        let store = PlatformStore::new(&clock, 45);
        match overview(&user(Role::Professor), store.assignments(), clock.now()) {
            Overview::Professor {
                greeting,
                active_assignments,
                average_completion,
                upcoming,
            } => {
                assert_eq!(greeting, "Welcome back, Prof. ada!");
                assert_eq!(active_assignments, 3);
                // (23 + 8 + 12) / 45 / 3
                assert_approx_eq!(average_completion, 43.0f32 / 135.0);
                assert_eq!(upcoming.len(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_average_completion_empty() {
        assert_approx_eq!(average_completion(&[]), 0.0f32);
    }

    #[test]
    fn test_mentor_overview() {
        let now = Utc::now();
        assert_eq!(
            overview(&user(Role::Mentor), &[], now),
            Overview::Mentor {
                greeting: "Welcome back, ada!".to_string()
            }
        );
    }
}
