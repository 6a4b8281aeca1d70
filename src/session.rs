use crate::clock::Clock;
use crate::config::Config;
use crate::error::{HubError, Result};
use crate::profile::ProfileGenerator;
use crate::storage::KeyValueStorage;
use crate::user::{Role, User, UserUpdate, STARTER_BADGES};
use std::collections::BTreeSet;

pub const USER_KEY: &str = "user";
pub const RECORD_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug)]
struct PersistedUser {
    version: u32,
    user: User,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Session {
    LoggedOut,
    LoggedIn(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match *self {
            Session::LoggedIn(ref user) => Some(user),
            Session::LoggedOut => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    pub fn is_logged_in(&self) -> bool {
        self.user().is_some()
    }
}

fn encode_record(user: &User) -> Result<String> {
    Ok(serde_json::to_string(&PersistedUser {
        version: RECORD_VERSION,
        user: user.clone(),
    })?)
}

fn decode_record(raw: &str) -> Result<User> {
    let record: PersistedUser = serde_json::from_str(raw)
        .map_err(|err| HubError::MalformedPersistedRecord(err.to_string()))?;
    if record.version != RECORD_VERSION {
        return Err(HubError::MalformedPersistedRecord(format!(
            "unsupported record version {}",
            record.version
        )));
    }
    Ok(record.user)
}

/// Owns the logged in user and keeps the durable copy under `USER_KEY` in
/// step with it. Nothing else writes that key.
pub struct SessionStore<S, G, C> {
    storage: S,
    generator: G,
    clock: C,
    config: Config,
    session: Session,
}

impl<S, G, C> SessionStore<S, G, C>
where
    S: KeyValueStorage,
    G: ProfileGenerator,
    C: Clock,
{
    /// Builds the store and restores a previously persisted user, if any.
    pub fn open(storage: S, generator: G, clock: C, config: Config) -> Result<Self> {
        let mut store = SessionStore {
            storage,
            generator,
            clock,
            config,
            session: Session::LoggedOut,
        };
        store.session = store.restore()?;
        Ok(store)
    }

    fn restore(&mut self) -> Result<Session> {
        let raw = match self.storage.get(USER_KEY)? {
            Some(raw) => raw,
            None => {
                debug!("no persisted session");
                return Ok(Session::LoggedOut);
            }
        };
        match decode_record(&raw) {
            Ok(user) => {
                info!(user = %user.email, role = %user.role, "restored session");
                Ok(Session::LoggedIn(user))
            }
            Err(err) => {
                warn!(error = %err, "discarding persisted session");
                self.storage.remove(USER_KEY)?;
                Ok(Session::LoggedOut)
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mock authenticator: any non-empty email and password get in. The
    /// display name is everything before the first `@`, taken as given.
    pub fn login(&mut self, email: &str, password: &str, role: Role) -> Result<User> {
        if email.is_empty() || password.is_empty() {
            return Err(HubError::AuthenticationFailed(
                "email and password are required".to_string(),
            ));
        }
        let name = email.split('@').next().unwrap_or("").to_string();

        let (xp, level, badges) = match role {
            Role::Student => {
                let stats = self.generator.student_stats();
                let badges: BTreeSet<String> =
                    STARTER_BADGES.iter().map(|b| b.to_string()).collect();
                (stats.xp, stats.level, badges)
            }
            Role::Professor | Role::Mentor => (0, 0, BTreeSet::new()),
        };

        let user = User {
            id: self.generator.user_id(),
            email: email.to_string(),
            avatar: self.config.avatar_for(&name),
            name,
            role,
            xp,
            level,
            badges,
            institution: self.config.institution.clone(),
            joined_at: self.clock.now(),
        };

        self.storage.set(USER_KEY, &encode_record(&user)?)?;
        info!(user = %user.email, role = %role, "logged in");
        self.session = Session::LoggedIn(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Session::LoggedIn(ref user) = self.session {
            info!(user = %user.email, "logged out");
        }
        self.session = Session::LoggedOut;
        self.storage.remove(USER_KEY)
    }

    pub fn update_user(&mut self, update: UserUpdate) -> Result<User> {
        let mut user = match self.session {
            Session::LoggedIn(ref user) => user.clone(),
            Session::LoggedOut => return Err(HubError::NoActiveSession),
        };
        update.apply_to(&mut user);
        self.storage.set(USER_KEY, &encode_record(&user)?)?;
        debug!(user = %user.email, "profile updated");
        self.session = Session::LoggedIn(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::profile::FixedProfileGenerator;
    use crate::storage::MemoryStorage;

    type TestStore = SessionStore<MemoryStorage, FixedProfileGenerator, FixedClock>;

    fn open_with(storage: MemoryStorage) -> TestStore {
        SessionStore::open(
            storage,
            FixedProfileGenerator::new(1200, 4),
            FixedClock::at_millis(1_760_000_000_000),
            Config::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_login_derives_profile_from_email() {
        let table = vec![
            ("ada@uni.edu", Role::Student, "ada", 1200, 4, 3),
            ("grace.hopper@navy.mil", Role::Professor, "grace.hopper", 0, 0, 0),
            ("mentor@corp.io", Role::Mentor, "mentor", 0, 0, 0),
            ("nodomain", Role::Student, "nodomain", 1200, 4, 3),
            ("@uni.edu", Role::Mentor, "", 0, 0, 0),
            (" ada@uni.edu", Role::Student, " ada", 1200, 4, 3),
        ];
        for (i, &(email, role, name, xp, level, badges)) in table.iter().enumerate() {
            let mut store = open_with(MemoryStorage::new());
            let user = store.login(email, "pw", role).unwrap();
            assert_eq!(user.role, role, "row {}", i);
            assert_eq!(user.name, name, "row {}", i);
            assert_eq!(user.xp, xp, "row {}", i);
            assert_eq!(user.level, level, "row {}", i);
            assert_eq!(user.badges.len(), badges, "row {}", i);
            assert_eq!(user.institution, "Demo University", "row {}", i);
            assert!(user.avatar.contains(&format!("name={}", name.trim())), "row {}", i);
            assert_eq!(store.current_user(), Some(&user), "row {}", i);
        }
    }

    #[test]
    fn test_student_gets_starter_badges() {
        let mut store = open_with(MemoryStorage::new());
        let user = store.login("ada@uni.edu", "pw", Role::Student).unwrap();
        for badge in STARTER_BADGES.iter() {
            assert!(user.has_badge(badge));
        }
    }

    #[test]
    fn test_login_rejects_blank_credentials() {
        let mut store = open_with(MemoryStorage::new());
        for &(email, password) in &[("", "pw"), ("ada@uni.edu", ""), ("", "")] {
            match store.login(email, password, Role::Student) {
                Err(HubError::AuthenticationFailed(_)) => (),
                other => panic!("{:?}/{:?} gave {:?}", email, password, other),
            }
        }
        assert_eq!(*store.session(), Session::LoggedOut);
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let mut store = open_with(MemoryStorage::new());
        store.login("ada@uni.edu", "pw", Role::Student).unwrap();
        assert!(store.storage().get(USER_KEY).unwrap().is_some());

        store.logout().unwrap();
        assert_eq!(*store.session(), Session::LoggedOut);
        assert_eq!(store.storage().get(USER_KEY).unwrap(), None);

        // Already logged out
        store.logout().unwrap();
        assert_eq!(*store.session(), Session::LoggedOut);
    }

    #[test]
    fn test_update_without_session_fails() {
        let mut store = open_with(MemoryStorage::new());
        match store.update_user(UserUpdate::default()) {
            Err(HubError::NoActiveSession) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_update_merges_and_persists() {
        let mut store = open_with(MemoryStorage::new());
        store.login("ada@uni.edu", "pw", Role::Student).unwrap();
        let updated = store
            .update_user(UserUpdate {
                xp: Some(4999),
                ..UserUpdate::default()
            })
            .unwrap();
        assert_eq!(updated.xp, 4999);
        assert_eq!(updated.role, Role::Student);
        assert_eq!(updated.name, "ada");

        let raw = store.storage().get(USER_KEY).unwrap().unwrap();
        assert_eq!(decode_record(&raw).unwrap(), updated);
    }

    #[test]
    fn test_restore_previous_session() {
        let mut first = open_with(MemoryStorage::new());
        let user = first.login("ada@uni.edu", "pw", Role::Mentor).unwrap();
        let storage = first.storage().clone();

        let second = open_with(storage);
        assert_eq!(*second.session(), Session::LoggedIn(user));
        assert_eq!(second.session().role(), Some(Role::Mentor));
    }

    #[test]
    fn test_restore_discards_malformed_records() {
        let table = vec![
            "not json",
            r#"{"id":1,"email":"legacy@record"}"#,
            r#"{"version":99,"user":{}}"#,
        ];
        for (i, raw) in table.iter().enumerate() {
            let mut storage = MemoryStorage::new();
            storage.set(USER_KEY, raw).unwrap();
            let store = open_with(storage);
            assert_eq!(*store.session(), Session::LoggedOut, "row {}", i);
            assert_eq!(store.storage().get(USER_KEY).unwrap(), None, "row {}", i);
        }
    }

    #[test]
    fn test_decode_rejects_other_versions() {
        let mut store = open_with(MemoryStorage::new());
        let user = store.login("ada@uni.edu", "pw", Role::Student).unwrap();
        let raw = serde_json::to_string(&PersistedUser { version: 2, user }).unwrap();
        match decode_record(&raw) {
            Err(HubError::MalformedPersistedRecord(msg)) => assert!(msg.contains("version 2")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
