use crate::config::Config;
use crate::error::HubError;
use crate::user::User;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tab {
    Overall,
    Weekly,
}

impl FromStr for Tab {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Tab, HubError> {
        match s.trim().to_lowercase().as_ref() {
            "overall" => Ok(Tab::Overall),
            "weekly" => Ok(Tab::Weekly),
            other => Err(HubError::InvalidInput(format!("unknown leaderboard tab {:?}", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub name: String,
    pub avatar: String,
    pub xp: u32,
    pub level: u32,
    pub badges: usize,
    pub is_current_user: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    pub rank: usize,
    pub entry: Entry,
}

// (name, avatar background, xp, level, badges)
const OVERALL_PEERS: [(&str, &str, u32, u32, usize); 4] = [
    ("Alex Johnson", "6366f1", 4850, 12, 8),
    ("Sarah Chen", "10b981", 4720, 11, 7),
    ("Mike Rodriguez", "f59e0b", 4580, 11, 6),
    ("Emma Wilson", "ef4444", 4320, 10, 5),
];

const WEEKLY_PEERS: [(&str, &str, u32, u32, usize); 4] = [
    ("Sarah Chen", "10b981", 520, 11, 2),
    ("Alex Johnson", "6366f1", 485, 12, 1),
    ("Mike Rodriguez", "f59e0b", 380, 11, 1),
    ("Emma Wilson", "ef4444", 350, 10, 0),
];

const CURRENT_USER_WEEKLY_XP: u32 = 420;

fn peer_entries(tab: Tab, config: &Config) -> Vec<Entry> {
    let peers = match tab {
        Tab::Overall => &OVERALL_PEERS,
        Tab::Weekly => &WEEKLY_PEERS,
    };
    peers
        .iter()
        .map(|&(name, background, xp, level, badges)| Entry {
            name: name.to_string(),
            avatar: Config {
                avatar_background: background.to_string(),
                ..config.clone()
            }
            .avatar_for(name),
            xp,
            level,
            badges,
            is_current_user: false,
        })
        .collect()
}

fn user_entry(tab: Tab, user: &User) -> Entry {
    let (xp, badges) = match tab {
        Tab::Overall => (user.xp, user.badges.len()),
        Tab::Weekly => (CURRENT_USER_WEEKLY_XP, 1),
    };
    Entry {
        name: user.name.clone(),
        avatar: user.avatar.clone(),
        xp,
        level: user.level,
        badges,
        is_current_user: true,
    }
}

/// Peers plus `user`, highest XP first. Equal XP keeps table order with the
/// peers ahead of the user.
pub fn standings(tab: Tab, user: &User, config: &Config) -> Vec<Standing> {
    let mut entries = peer_entries(tab, config);
    entries.push(user_entry(tab, user));

    let mut ranking = PriorityQueue::new();
    for (index, entry) in entries.iter().enumerate() {
        ranking.push(index, (entry.xp, Reverse(index)));
    }

    ranking
        .into_sorted_iter()
        .enumerate()
        .map(|(position, (index, _))| Standing {
            rank: position + 1,
            entry: entries[index].clone(),
        })
        .collect()
}

pub fn user_rank(standings: &[Standing]) -> Option<usize> {
    standings
        .iter()
        .find(|s| s.entry.is_current_user)
        .map(|s| s.rank)
}

pub fn rank_icon(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        _ => rank.to_string(),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BadgeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const BADGES: [BadgeInfo; 6] = [
    BadgeInfo {
        id: "early-bird",
        name: "Early Bird",
        description: "Submit assignments early",
        icon: "🌅",
    },
    BadgeInfo {
        id: "collaborator",
        name: "Collaborator",
        description: "Active in team projects",
        icon: "🤝",
    },
    BadgeInfo {
        id: "achiever",
        name: "Achiever",
        description: "Complete all assignments",
        icon: "🎯",
    },
    BadgeInfo {
        id: "code-master",
        name: "Code Master",
        description: "Excel in programming tasks",
        icon: "💻",
    },
    BadgeInfo {
        id: "team-player",
        name: "Team Player",
        description: "Help teammates succeed",
        icon: "👥",
    },
    BadgeInfo {
        id: "innovation",
        name: "Innovation",
        description: "Creative problem solving",
        icon: "💡",
    },
];

/// Every known badge with whether `user` holds it.
pub fn badge_catalog(user: &User) -> Vec<(BadgeInfo, bool)> {
    BADGES.iter().map(|b| (*b, user.has_badge(b.id))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{Role, STARTER_BADGES};
    use chrono::{TimeZone, Utc};

    fn student(xp: u32) -> User {
        User {
            id: "user-1".to_string(),
            email: "ada@uni.edu".to_string(),
            name: "ada".to_string(),
            avatar: "ada-avatar".to_string(),
            role: Role::Student,
            xp,
            level: 7,
            badges: STARTER_BADGES.iter().map(|b| b.to_string()).collect(),
            institution: "Demo University".to_string(),
            joined_at: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    fn names(standings: &[Standing]) -> Vec<&str> {
        standings.iter().map(|s| s.entry.name.as_ref()).collect()
    }

    #[test]
    fn test_user_ranked_by_xp() {
        let config = Config::default();
        let table = vec![(4999, 1), (4850, 2), (4600, 3), (4400, 4), (10, 5)];
        for (i, &(xp, rank)) in table.iter().enumerate() {
            let board = standings(Tab::Overall, &student(xp), &config);
            assert_eq!(board.len(), 5, "row {}", i);
            assert_eq!(user_rank(&board), Some(rank), "row {}", i);
            let ranks: Vec<usize> = board.iter().map(|s| s.rank).collect();
            assert_eq!(ranks, vec![1, 2, 3, 4, 5], "row {}", i);
        }
    }

    #[test]
    fn test_weekly_board() {
        let board = standings(Tab::Weekly, &student(0), &Config::default());
        assert_eq!(
            names(&board),
            vec!["Sarah Chen", "Alex Johnson", "ada", "Mike Rodriguez", "Emma Wilson"]
        );
        assert_eq!(user_rank(&board), Some(3));
    }

    #[test]
    fn test_peer_avatars_use_their_colours() {
        let board = standings(Tab::Overall, &student(0), &Config::default());
        assert_eq!(
            board[0].entry.avatar,
            "https://ui-avatars.com/api/?name=Alex+Johnson&background=6366f1&color=fff"
        );
        assert!(board[1].entry.avatar.contains("background=10b981"));
    }

    #[test]
    fn test_rank_icons() {
        assert_eq!(rank_icon(1), "🥇");
        assert_eq!(rank_icon(3), "🥉");
        assert_eq!(rank_icon(4), "4");
    }

    #[test]
    fn test_badge_catalog_reflects_user() {
        let catalog = badge_catalog(&student(0));
        let earned: Vec<&str> = catalog.iter().filter(|(_, e)| *e).map(|(b, _)| b.id).collect();
        assert_eq!(earned, vec!["early-bird", "collaborator", "achiever"]);
        assert_eq!(catalog.len(), 6);
    }
}
