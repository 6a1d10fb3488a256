//! Process-wide match registry.
//!
//! Two maps: group to match, and user to the group they are playing in.
//! The reverse index enforces the one-active-match-per-user invariant; a
//! user id appears in it exactly while that user is an entry in the
//! corresponding match's player list.
//!
//! The registry is an injectable service object, not a global, so tests
//! can instantiate isolated registries per case. Its lock is synchronous
//! and is never held across an await; per-match mutation serializes on
//! the match's own async mutex instead.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::domain::state::{GroupId, UserId};
use crate::errors::domain::EngineError;
use crate::services::match_flow::ActiveMatch;

/// Handle to a live match shared between the service and its timer tasks.
pub type SharedMatch = Arc<AsyncMutex<ActiveMatch>>;

#[derive(Default)]
struct RegistryInner {
    matches: HashMap<GroupId, SharedMatch>,
    user_groups: HashMap<UserId, GroupId>,
}

#[derive(Default)]
pub struct MatchRegistry {
    inner: Mutex<RegistryInner>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a match for `group`.
    ///
    /// Failing when one already exists is the sole concurrency guard
    /// preventing two simultaneous matches in one group.
    pub fn create(&self, group: GroupId) -> Result<SharedMatch, EngineError> {
        let mut inner = self.inner.lock();
        if inner.matches.contains_key(&group) {
            return Err(EngineError::AlreadyActive { group });
        }
        let entry = Arc::new(AsyncMutex::new(ActiveMatch::new(group)));
        inner.matches.insert(group, Arc::clone(&entry));
        Ok(entry)
    }

    pub fn get(&self, group: GroupId) -> Option<SharedMatch> {
        self.inner.lock().matches.get(&group).cloned()
    }

    pub fn remove(&self, group: GroupId) {
        self.inner.lock().matches.remove(&group);
    }

    /// Record that `user` is playing in `group`.
    pub fn bind(&self, user: UserId, group: GroupId) {
        self.inner.lock().user_groups.insert(user, group);
    }

    pub fn unbind(&self, user: UserId) {
        self.inner.lock().user_groups.remove(&user);
    }

    /// Which group is this user currently playing in, if any.
    pub fn locate(&self, user: UserId) -> Option<GroupId> {
        self.inner.lock().user_groups.get(&user).copied()
    }

    /// Number of live matches.
    pub fn match_count(&self) -> usize {
        self.inner.lock().matches.len()
    }
}
