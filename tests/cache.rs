//! Integration tests for the TTL cache.

use bracket_contest_web::{Clock, TtlCache};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::Cell;

/// Clock the test can move forward.
struct ManualClock(Cell<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Self {
        Self(Cell::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()))
    }

    fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

#[test]
fn entries_expire_after_ttl() {
    let clock = ManualClock::new();
    let mut cache = TtlCache::new(Duration::seconds(60), &clock);
    cache.set("teams", vec!["duke"]);

    clock.advance(Duration::seconds(59));
    assert_eq!(cache.get(&"teams"), Some(vec!["duke"]));

    clock.advance(Duration::seconds(1));
    assert_eq!(cache.get(&"teams"), None);
    assert!(cache.is_empty());
}

#[test]
fn set_refreshes_the_entry() {
    let clock = ManualClock::new();
    let mut cache = TtlCache::new(Duration::seconds(60), &clock);
    cache.set("config", 1);
    clock.advance(Duration::seconds(45));
    cache.set("config", 2);
    clock.advance(Duration::seconds(45));
    assert_eq!(cache.get(&"config"), Some(2));
}

#[test]
fn expire_drops_immediately() {
    let clock = ManualClock::new();
    let mut cache = TtlCache::new(Duration::minutes(5), &clock);
    cache.set("config", 1);
    assert!(cache.expire(&"config"));
    assert!(!cache.expire(&"config"));
    assert_eq!(cache.get(&"config"), None);
}

#[test]
fn purge_removes_only_stale_entries() {
    let clock = ManualClock::new();
    let mut cache = TtlCache::new(Duration::seconds(30), &clock);
    cache.set("old", 1);
    clock.advance(Duration::seconds(20));
    cache.set("new", 2);
    clock.advance(Duration::seconds(15));

    assert_eq!(cache.purge_expired(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&"new"), Some(2));
}
