//! Crime heat tracking
//!
//! Heat is the age-weighted sum of recent crime severities: each event
//! contributes `severity × (1 - age / 5 min)` and nothing after five minutes.
//! The sum is capped at 100, then a slower passive decay knocks one more
//! point off every ten seconds until the next crime lands. Events are kept
//! for ten minutes, then pruned.

use glam::Vec3;
use ironhaven_core::time::{MINUTE, SECOND};
use ironhaven_core::{Interval, Millis};
use tracing::{debug, info};

use super::{classify_action, CrimeEvent};
use crate::events::GameEventSink;
use crate::player::stats::PlayerStatsPort;

/// Civilians inside this radius count as witnesses
pub const WITNESS_RADIUS: f32 = 20.0;
/// Events stop contributing to heat after this long
pub const HEAT_WINDOW: Millis = 5 * MINUTE;
/// Events are dropped from the log after this long
pub const RETENTION: Millis = 10 * MINUTE;
pub const DECAY_PERIOD: Millis = 10 * SECOND;
pub const PRUNE_PERIOD: Millis = MINUTE;
pub const MAX_HEAT: f32 = 100.0;

/// Police response score: severity plus 10 per witness, capped at 100
pub fn police_response(severity: u8, witnesses: u32) -> u8 {
    (severity as u32 + witnesses * 10).min(100) as u8
}

/// Wanted levels a crime adds: `ceil((severity + witnesses × 5) / 30)`
pub fn wanted_increase(severity: u8, witnesses: u32) -> i32 {
    (severity as u32 + witnesses * 5).div_ceil(30) as i32
}

#[derive(Debug, Clone)]
pub struct CrimeHeatTracker {
    events: Vec<CrimeEvent>,
    /// Passive decay applied on top of the age-weighted sum
    decay_offset: f32,
    decay: Interval,
    prune: Interval,
    next_id: u64,
}

impl Default for CrimeHeatTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeHeatTracker {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            decay_offset: 0.0,
            decay: Interval::new(DECAY_PERIOD),
            prune: Interval::new(PRUNE_PERIOD),
            next_id: 1,
        }
    }

    /// Events still in the retention window, oldest first
    pub fn events(&self) -> &[CrimeEvent] {
        &self.events
    }

    /// Classify `tag` and, if it is a crime, record it.
    ///
    /// Witnesses are the `civilians` within [`WITNESS_RADIUS`] of `location`.
    /// The wanted increase is proposed through `port`, which clamps it, and
    /// the event is passed to `sink`.
    pub fn record<P, S>(
        &mut self,
        tag: &str,
        location: Vec3,
        civilians: impl IntoIterator<Item = Vec3>,
        now: Millis,
        port: &mut P,
        sink: &mut S,
    ) -> Option<CrimeEvent>
    where
        P: PlayerStatsPort + ?Sized,
        S: GameEventSink + ?Sized,
    {
        let (kind, severity) = classify_action(tag)?;

        let witnesses = civilians
            .into_iter()
            .filter(|pos| pos.distance(location) <= WITNESS_RADIUS)
            .count() as u32;

        let event = CrimeEvent {
            id: self.next_id,
            kind,
            severity,
            witnesses,
            police_response: police_response(severity, witnesses),
            location,
            timestamp: now,
        };
        self.next_id += 1;
        self.events.push(event.clone());
        // Fresh recompute: passive decay starts over from here
        self.decay_offset = 0.0;
        self.decay.reset(now);

        let wanted = port.adjust_wanted(wanted_increase(severity, witnesses));
        info!(
            "Crime {} ({}): severity {}, {} witnesses, wanted now {}",
            tag, kind, severity, witnesses, wanted
        );

        sink.on_crime_committed(&event);
        Some(event)
    }

    /// Heat score in [0, 100] at time `now`
    pub fn heat_at(&self, now: Millis) -> f32 {
        let weighted: f32 = self
            .events
            .iter()
            .filter_map(|event| {
                let age = now.saturating_sub(event.timestamp);
                (age < HEAT_WINDOW).then(|| {
                    let weight = (1.0 - age as f32 / HEAT_WINDOW as f32).max(0.0);
                    event.severity as f32 * weight
                })
            })
            .sum();
        // Cap first so passive decay is visible even while the sum saturates
        (weighted.min(MAX_HEAT) - self.decay_offset).max(0.0)
    }

    /// Run the passive decay and pruning intervals
    pub fn update(&mut self, now: Millis) {
        let decay_steps = self.decay.poll(now);
        if decay_steps > 0 {
            self.decay_offset = (self.decay_offset + decay_steps as f32).min(MAX_HEAT);
        }

        if self.prune.ready(now) {
            let before = self.events.len();
            self.events
                .retain(|event| now.saturating_sub(event.timestamp) <= RETENTION);
            let pruned = before - self.events.len();
            if pruned > 0 {
                debug!("Pruned {} crime events older than {} ms", pruned, RETENTION);
            }
        }
    }

    /// Forget everything, e.g. after the player is busted
    pub fn clear(&mut self) {
        self.events.clear();
        self.decay_offset = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crime::CrimeKind;
    use crate::events::EventRecorder;
    use crate::player::stats::PlayerState;

    fn record(
        tracker: &mut CrimeHeatTracker,
        tag: &str,
        civilians: &[Vec3],
        now: Millis,
        port: &mut PlayerState,
        sink: &mut EventRecorder,
    ) -> Option<CrimeEvent> {
        tracker.record(tag, Vec3::ZERO, civilians.iter().copied(), now, port, sink)
    }

    #[test]
    fn test_murder_with_three_witnesses() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        let civilians = [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -12.0),
            Vec3::new(14.0, 0.0, 14.0),
            // Too far to see anything
            Vec3::new(25.0, 0.0, 0.0),
        ];

        let event =
            record(&mut tracker, "killed_civilian", &civilians, 1_000, &mut player, &mut sink);
        let event = event.unwrap();
        assert_eq!(event.kind, CrimeKind::Murder);
        assert_eq!(event.severity, 95);
        assert_eq!(event.witnesses, 3);
        assert_eq!(event.police_response, 100);
        assert_eq!(player.stats.wanted_level, 4);
        assert_eq!(sink.crimes, vec![event]);
    }

    #[test]
    fn test_wanted_saturates_at_five() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        record(&mut tracker, "killed_police", &[], 0, &mut player, &mut sink);
        assert_eq!(player.stats.wanted_level, 4);
        record(&mut tracker, "killed_police", &[], 10, &mut player, &mut sink);
        assert_eq!(player.stats.wanted_level, 5);
        assert_eq!(tracker.events().len(), 2);
    }

    #[test]
    fn test_non_crime_is_ignored() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        let event = record(&mut tracker, "bought_coffee", &[Vec3::ZERO], 0, &mut player, &mut sink);
        assert!(event.is_none());
        assert!(tracker.events().is_empty());
        assert!(sink.crimes.is_empty());
        assert_eq!(player.stats.wanted_level, 0);
    }

    #[test]
    fn test_small_crime_wanted_increase() {
        assert_eq!(wanted_increase(25, 0), 1);
        assert_eq!(wanted_increase(40, 0), 2);
        assert_eq!(wanted_increase(60, 0), 2);
        assert_eq!(wanted_increase(60, 1), 3);
        assert_eq!(police_response(40, 2), 60);
    }

    #[test]
    fn test_heat_weighted_by_age() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        record(&mut tracker, "stole_car", &[], 0, &mut player, &mut sink);

        assert_eq!(tracker.heat_at(0), 40.0);
        assert!((tracker.heat_at(150 * SECOND) - 20.0).abs() < 1e-3);
        assert_eq!(tracker.heat_at(HEAT_WINDOW), 0.0);
    }

    #[test]
    fn test_heat_bounded_and_cools_after_five_minutes() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        for i in 0..5 {
            record(&mut tracker, "killed_police", &[], i * SECOND, &mut player, &mut sink);
        }
        assert_eq!(tracker.heat_at(5 * SECOND), MAX_HEAT);

        let mut now = 5 * SECOND;
        while now <= 5 * SECOND + HEAT_WINDOW {
            tracker.update(now);
            let heat = tracker.heat_at(now);
            assert!((0.0..=MAX_HEAT).contains(&heat));
            now += SECOND;
        }
        assert_eq!(tracker.heat_at(now), 0.0);
    }

    #[test]
    fn test_saturated_heat_still_decays() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        for _ in 0..5 {
            record(&mut tracker, "killed_police", &[], 0, &mut player, &mut sink);
        }

        let mut now = 0;
        while now < 120 * SECOND {
            now += SECOND;
            tracker.update(now);
        }
        // Weighted sum is still 300, well over the cap; twelve decay steps show
        assert!((tracker.heat_at(now) - 88.0).abs() < 1e-3);
        assert!(tracker.heat_at(now) < MAX_HEAT);
    }

    #[test]
    fn test_passive_decay_stacks_on_age_weight() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        record(&mut tracker, "stole_car", &[], 0, &mut player, &mut sink);

        tracker.update(30 * SECOND);
        // 40 × 0.9 age weight minus three decay steps
        assert!((tracker.heat_at(30 * SECOND) - 33.0).abs() < 1e-3);

        // A new crime restarts the passive decay
        record(&mut tracker, "destroyed_hydrant", &[], 30 * SECOND, &mut player, &mut sink);
        assert!((tracker.heat_at(30 * SECOND) - 61.0).abs() < 1e-3);
    }

    #[test]
    fn test_old_events_pruned() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        record(&mut tracker, "stole_bike", &[], 0, &mut player, &mut sink);
        record(&mut tracker, "stole_car", &[], 8 * MINUTE, &mut player, &mut sink);

        tracker.update(9 * MINUTE);
        assert_eq!(tracker.events().len(), 2);

        tracker.update(11 * MINUTE);
        assert_eq!(tracker.events().len(), 1);
        assert_eq!(tracker.events()[0].timestamp, 8 * MINUTE);
    }

    #[test]
    fn test_event_ids_increase() {
        let mut tracker = CrimeHeatTracker::new();
        let mut player = PlayerState::default();
        let mut sink = EventRecorder::default();
        let a = record(&mut tracker, "stole_car", &[], 0, &mut player, &mut sink).unwrap();
        let b = record(&mut tracker, "stole_car", &[], 1, &mut player, &mut sink).unwrap();
        assert!(b.id > a.id);
    }
}
