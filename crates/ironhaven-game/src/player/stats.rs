//! Player stats and the port the simulation uses to read and change them
//!
//! The simulation never owns these numbers. It reads a snapshot at the start
//! of each step and proposes changes through [`PlayerStatsPort`]; the store
//! behind the port decides how to apply and persist them.

use ironhaven_core::Millis;
use serde::{Deserialize, Serialize};

use super::action_log::{ActionLog, LoggedAction};

pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_WANTED_LEVEL: u8 = 5;

/// Player values the behavior model and heat tracker read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// 0-100
    pub health: f32,
    /// Only ever increases
    pub reputation: u32,
    /// 0-5
    pub wanted_level: u8,
    pub money: u64,
    pub police_kill_count: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: MAX_HEALTH,
            reputation: 0,
            wanted_level: 0,
            money: 500,
            police_kill_count: 0,
        }
    }
}

impl PlayerStats {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply a wanted-level change, saturating at [0, 5]
    pub fn adjust_wanted(&mut self, delta: i32) -> u8 {
        let level = (self.wanted_level as i32 + delta).clamp(0, MAX_WANTED_LEVEL as i32);
        self.wanted_level = level as u8;
        self.wanted_level
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, MAX_HEALTH);
    }
}

/// Narrow read/write interface onto the external game store
pub trait PlayerStatsPort {
    /// Current values
    fn snapshot(&self) -> PlayerStats;

    fn damage_player(&mut self, amount: f32);

    fn add_reputation(&mut self, amount: u32);

    /// Change the wanted level and return the clamped result
    fn adjust_wanted(&mut self, delta: i32) -> u8;

    fn record_police_kill(&mut self);

    /// Append an action tag to the store's action log
    fn push_action(&mut self, tag: &str, now: Millis);

    /// Actions logged after sequence number `seq`, oldest first
    fn actions_after(&self, seq: u64) -> Vec<LoggedAction>;

    /// Sequence number of the newest logged action, 0 if none
    fn latest_action_seq(&self) -> u64;
}

/// Plain single-owner store: stats plus action log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub stats: PlayerStats,
    pub log: ActionLog,
}

impl PlayerStatsPort for PlayerState {
    fn snapshot(&self) -> PlayerStats {
        self.stats.clone()
    }

    fn damage_player(&mut self, amount: f32) {
        self.stats.take_damage(amount);
    }

    fn add_reputation(&mut self, amount: u32) {
        self.stats.reputation = self.stats.reputation.saturating_add(amount);
    }

    fn adjust_wanted(&mut self, delta: i32) -> u8 {
        self.stats.adjust_wanted(delta)
    }

    fn record_police_kill(&mut self) {
        self.stats.police_kill_count += 1;
    }

    fn push_action(&mut self, tag: &str, now: Millis) {
        self.log.push(tag, now);
    }

    fn actions_after(&self, seq: u64) -> Vec<LoggedAction> {
        self.log.after(seq).cloned().collect()
    }

    fn latest_action_seq(&self) -> u64 {
        self.log.latest().map_or(0, |action| action.seq)
    }
}
