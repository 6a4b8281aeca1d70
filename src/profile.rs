use crate::user::UuidString;
use rand::Rng;

pub const MAX_STARTING_XP: u32 = 5000;
pub const MAX_STARTING_LEVEL: u32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StudentStats {
    pub xp: u32,
    pub level: u32,
}

/// Source of the made-up parts of a freshly logged in profile.
pub trait ProfileGenerator {
    fn user_id(&mut self) -> UuidString;
    /// xp in [0, MAX_STARTING_XP), level in [1, MAX_STARTING_LEVEL].
    fn student_stats(&mut self) -> StudentStats;
}

#[derive(Debug, Default)]
pub struct RandomProfileGenerator;

impl ProfileGenerator for RandomProfileGenerator {
    fn user_id(&mut self) -> UuidString {
        uuid::Uuid::new_v4().to_string()
    }

    fn student_stats(&mut self) -> StudentStats {
        let mut rng = rand::rng();
        StudentStats {
            xp: rng.random_range(0..MAX_STARTING_XP),
            level: rng.random_range(1..=MAX_STARTING_LEVEL),
        }
    }
}

/// Always hands out the same stats. Ids are `user-1`, `user-2`, ...
#[derive(Debug)]
pub struct FixedProfileGenerator {
    pub stats: StudentStats,
    id_prefix: String,
    issued: u32,
}

impl FixedProfileGenerator {
    pub fn new(xp: u32, level: u32) -> FixedProfileGenerator {
        FixedProfileGenerator {
            stats: StudentStats { xp, level },
            id_prefix: "user".to_string(),
            issued: 0,
        }
    }
}

impl ProfileGenerator for FixedProfileGenerator {
    fn user_id(&mut self) -> UuidString {
        self.issued += 1;
        format!("{}-{}", self.id_prefix, self.issued)
    }

    fn student_stats(&mut self) -> StudentStats {
        self.stats
    }
}
