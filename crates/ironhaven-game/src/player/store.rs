//! Thread-safe store handle shared with the renderer and the network layer

use std::sync::Arc;

use ironhaven_core::Millis;
use parking_lot::RwLock;

use super::action_log::LoggedAction;
use super::stats::{PlayerState, PlayerStats, PlayerStatsPort};

/// Cloneable handle onto one [`PlayerState`]
#[derive(Debug, Clone, Default)]
pub struct SharedPlayerStore {
    inner: Arc<RwLock<PlayerState>>,
}

impl SharedPlayerStore {
    pub fn new(state: PlayerState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Run `f` with read access to the whole state
    pub fn read<R>(&self, f: impl FnOnce(&PlayerState) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with write access to the whole state
    pub fn write<R>(&self, f: impl FnOnce(&mut PlayerState) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl PlayerStatsPort for SharedPlayerStore {
    fn snapshot(&self) -> PlayerStats {
        self.inner.read().snapshot()
    }

    fn damage_player(&mut self, amount: f32) {
        self.inner.write().damage_player(amount);
    }

    fn add_reputation(&mut self, amount: u32) {
        self.inner.write().add_reputation(amount);
    }

    fn adjust_wanted(&mut self, delta: i32) -> u8 {
        self.inner.write().adjust_wanted(delta)
    }

    fn record_police_kill(&mut self) {
        self.inner.write().record_police_kill();
    }

    fn push_action(&mut self, tag: &str, now: Millis) {
        self.inner.write().push_action(tag, now);
    }

    fn actions_after(&self, seq: u64) -> Vec<LoggedAction> {
        self.inner.read().actions_after(seq)
    }

    fn latest_action_seq(&self) -> u64 {
        self.inner.read().latest_action_seq()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let mut store = SharedPlayerStore::default();
        let observer = store.clone();
        store.adjust_wanted(2);
        store.add_reputation(15);
        assert_eq!(observer.snapshot().wanted_level, 2);
        assert_eq!(observer.read(|s| s.stats.reputation), 15);
    }
}
