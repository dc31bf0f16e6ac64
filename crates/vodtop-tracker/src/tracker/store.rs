//! Session store: the authoritative map from session key to history.

use std::collections::{BTreeMap, HashMap};

use vodtop_core::{DomainResult, DurationValue, EventKind, SessionHistory, SessionKey, VideoCheck};

/// Histories and last-active times for every tracked session.
///
/// Histories are kept in a `BTreeMap` so iteration is already in table
/// order. Entries in both maps are created together by `put` and removed
/// together by `remove`.
#[derive(Debug, Default)]
pub struct SessionStore {
    histories: BTreeMap<SessionKey, SessionHistory>,
    last_active: HashMap<SessionKey, f64>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `kind:value` to the key's history and marks it active at `now`.
    ///
    /// `video` becomes the session's first video name only if none is
    /// stored yet. Returns true if it was stored.
    pub fn put(
        &mut self,
        key: &SessionKey,
        kind: EventKind,
        value: DurationValue,
        video: Option<&str>,
        now: f64,
    ) -> bool {
        let history = self.histories.entry(key.clone()).or_default();
        history.push(kind, value);
        let assigned = video.is_some_and(|name| history.set_first_video_if_absent(name));
        self.last_active.insert(key.clone(), now);
        assigned
    }

    /// Compares `video` with the key's first video name. Pure read.
    ///
    /// Untracked keys classify as `NewlyAssigned`.
    pub fn check_video_consistency(&self, key: &SessionKey, video: &str) -> VideoCheck {
        self.histories
            .get(key)
            .map(|history| history.check_video(video))
            .unwrap_or(VideoCheck::NewlyAssigned)
    }

    /// Enforces the key-format invariant, purging the key on violation.
    ///
    /// # Errors
    ///
    /// Returns the validation error after the key's history and last-active
    /// entry have been removed.
    pub fn validate(&mut self, key: &SessionKey) -> DomainResult<()> {
        if let Err(err) = key.validate() {
            self.remove(key);
            return Err(err);
        }
        Ok(())
    }

    /// Removes a key. Returns its history if it was tracked.
    pub fn remove(&mut self, key: &SessionKey) -> Option<SessionHistory> {
        self.last_active.remove(key);
        self.histories.remove(key)
    }

    pub fn history(&self, key: &SessionKey) -> Option<&SessionHistory> {
        self.histories.get(key)
    }

    pub fn last_active(&self, key: &SessionKey) -> Option<f64> {
        self.last_active.get(key).copied()
    }

    #[must_use]
    pub fn contains(&self, key: &SessionKey) -> bool {
        self.histories.contains_key(key)
    }

    /// Sessions in key order with their last-active time.
    pub fn iter(&self) -> impl Iterator<Item = (&SessionKey, &SessionHistory, f64)> {
        self.histories.iter().map(|(key, history)| {
            let last = self.last_active.get(key).copied().unwrap_or(0.0);
            (key, history, last)
        })
    }

    /// Number of tracked sessions from `address`.
    pub fn sessions_at(&self, address: &str) -> usize {
        self.histories
            .keys()
            .filter(|key| key.address == address)
            .count()
    }

    /// Tracked session count per source address.
    pub fn address_counts(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for key in self.histories.keys() {
            *counts.entry(key.address.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}
