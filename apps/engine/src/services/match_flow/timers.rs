//! Cancellable timer handles owned by a live match.
//!
//! Every handle is aborted on the state transition that obsoletes it: the
//! pick landed, the round resolved some other way, or the match ended. A
//! callback that fires anyway must re-validate state and become a no-op.
//!
//! A task must never abort itself mid-callback, so the expiry paths use
//! the `disarm_*` variants, which drop the firing task's own handle
//! without aborting it.

use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::domain::state::UserId;

#[derive(Debug, Default)]
pub struct TimerSet {
    /// Per-player pick deadline tasks.
    pick_timeouts: HashMap<UserId, JoinHandle<()>>,
    /// Per-player pick warning tasks.
    pick_warnings: HashMap<UserId, JoinHandle<()>>,
    /// Join-phase expiry task.
    join_timer: Option<JoinHandle<()>>,
    /// Join-phase countdown warning tasks.
    join_warnings: Vec<JoinHandle<()>>,
}

impl TimerSet {
    pub fn arm_pick_timeout(&mut self, user: UserId, handle: JoinHandle<()>) {
        if let Some(old) = self.pick_timeouts.insert(user, handle) {
            old.abort();
        }
    }

    pub fn arm_pick_warning(&mut self, user: UserId, handle: JoinHandle<()>) {
        if let Some(old) = self.pick_warnings.insert(user, handle) {
            old.abort();
        }
    }

    /// The player acted; both of their timers are obsolete.
    pub fn cancel_player_timers(&mut self, user: UserId) {
        if let Some(h) = self.pick_timeouts.remove(&user) {
            h.abort();
        }
        if let Some(h) = self.pick_warnings.remove(&user) {
            h.abort();
        }
    }

    /// Called from within a player's own timeout task after it fired:
    /// drops that handle without aborting and cancels the warning.
    pub fn disarm_after_pick_timeout(&mut self, user: UserId) {
        self.pick_timeouts.remove(&user);
        if let Some(h) = self.pick_warnings.remove(&user) {
            h.abort();
        }
    }

    /// Cancel every per-player timer of the current round.
    pub fn cancel_round_timers(&mut self) {
        for (_, h) in self.pick_timeouts.drain() {
            h.abort();
        }
        for (_, h) in self.pick_warnings.drain() {
            h.abort();
        }
    }

    pub fn set_join_timer(&mut self, handle: JoinHandle<()>) {
        if let Some(old) = self.join_timer.replace(handle) {
            old.abort();
        }
    }

    pub fn push_join_warning(&mut self, handle: JoinHandle<()>) {
        self.join_warnings.push(handle);
    }

    /// Called from within the join timer task after natural expiry.
    pub fn disarm_after_join_expiry(&mut self) {
        self.join_timer.take();
        for h in self.join_warnings.drain(..) {
            h.abort();
        }
    }

    /// The join phase settled early; the timer and its warnings go away.
    pub fn cancel_join_timers(&mut self) {
        if let Some(h) = self.join_timer.take() {
            h.abort();
        }
        for h in self.join_warnings.drain(..) {
            h.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel_round_timers();
        self.cancel_join_timers();
    }

    /// Live pick-deadline timers for the round in progress.
    pub fn pending_pick_timers(&self) -> usize {
        self.pick_timeouts.len()
    }
}
