use chrono::{DateTime, Utc};
use crate::clock::{Clock, RecordId};
use crate::platform::PlatformStore;

#[derive(Clone, Debug, PartialEq)]
pub struct PanelItem {
    pub id: RecordId,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub age: String,
    pub unread: bool,
}

/// Notifications as the panel lists them, in store order.
pub fn items<C: Clock>(store: &PlatformStore<C>, now: DateTime<Utc>) -> Vec<PanelItem> {
    store
        .notifications()
        .iter()
        .map(|n| PanelItem {
            id: n.id,
            icon: n.kind.icon(),
            title: n.title.clone(),
            message: n.message.clone(),
            age: n.age(now),
            unread: !n.read,
        })
        .collect()
}

/// A click on a notification. Only an unread one reaches the store; the
/// return value says whether it did.
pub fn click<C: Clock>(store: &mut PlatformStore<C>, id: RecordId) -> bool {
    let unread = store
        .notifications()
        .iter()
        .any(|n| n.id == id && !n.read);
    if unread {
        store.mark_notification_read(id);
    }
    unread
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_items_follow_store_order() {
        let clock = FixedClock::at_millis(1_760_000_000_000);
        let store = PlatformStore::new(&clock, 45);
        let listed = items(&store, clock.now());

        let ids: Vec<RecordId> = listed.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(listed[0].icon, "📝");
        assert_eq!(listed[0].age, "2 hours ago");
        assert!(listed[0].unread);
        assert!(!listed[2].unread);
    }

    #[test]
    fn test_click_only_transitions_unread() {
        let clock = FixedClock::at_millis(1_760_000_000_000);
        let mut store = PlatformStore::new(&clock, 45);

        let table = vec![(1, true), (1, false), (3, false), (2, true), (404, false)];
        for (i, &(id, reached_store)) in table.iter().enumerate() {
            assert_eq!(click(&mut store, id), reached_store, "row {}", i);
        }
        assert_eq!(store.unread_count(), 0);
    }
}
