//! Per-frame simulation step
//!
//! [`Simulation::tick`] is the only clock. World streaming, crime intake,
//! police dispatch, NPC decisions and heat decay all run from it in a fixed
//! order, each gated by its own throttle or [`Interval`](ironhaven_core::Interval).

use std::sync::Arc;

use glam::Vec3;
use ironhaven_core::{EntityId, GameTime, Millis, TimeConfig};
use ironhaven_world::{
    ChunkConfig, ChunkManager, GenerationMode, NpcCategory, StreamingThrottle, WorldChunk,
    WorldError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::crime::heat::CrimeHeatTracker;
use crate::crime::CrimeEvent;
use crate::events::{GameEventSink, NpcEvent};
use crate::npc::behavior::{HitOutcome, PerceptionContext};
use crate::npc::manager::NpcManager;
use crate::player::stats::PlayerStatsPort;

/// What happened during one tick
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickReport {
    pub now: Millis,
    /// A streaming pass ran this tick
    pub streamed: bool,
    pub crimes: Vec<CrimeEvent>,
    pub npc_events: Vec<NpcEvent>,
    pub heat: f32,
}

pub struct Simulation {
    time: GameTime,
    world: ChunkManager,
    npcs: NpcManager,
    crime: CrimeHeatTracker,
    throttle: StreamingThrottle,
    /// Highest action-log sequence already fed to the crime tracker.
    /// Starts at the store's newest entry on the first tick, so history
    /// restored from a save is not charged again.
    last_action_seq: Option<u64>,
    rng: StdRng,
}

impl Simulation {
    /// Behavior RNG follows the world seed in seeded mode, entropy otherwise
    pub fn new(config: ChunkConfig) -> Result<Self, WorldError> {
        let rng = match config.generation {
            GenerationMode::Seeded { world_seed } => {
                StdRng::seed_from_u64(world_seed ^ 0x5EED_BEEF)
            }
            GenerationMode::Random => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Use an explicit behavior RNG, e.g. for replays
    pub fn with_rng(config: ChunkConfig, rng: StdRng) -> Result<Self, WorldError> {
        let throttle = StreamingThrottle::new(config.stream_interval_ms);
        let world = ChunkManager::new(config)?;
        Ok(Self {
            time: GameTime::new(TimeConfig::default()),
            world,
            npcs: NpcManager::new(),
            crime: CrimeHeatTracker::new(),
            throttle,
            last_action_seq: None,
            rng,
        })
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut GameTime {
        &mut self.time
    }

    pub fn now(&self) -> Millis {
        self.time.now()
    }

    pub fn world(&self) -> &ChunkManager {
        &self.world
    }

    pub fn npcs(&self) -> &NpcManager {
        &self.npcs
    }

    pub fn crime(&self) -> &CrimeHeatTracker {
        &self.crime
    }

    /// Window from the most recent streaming pass
    pub fn active_chunks(&self) -> &[Arc<WorldChunk>] {
        self.world.active_chunks()
    }

    pub fn heat(&self) -> f32 {
        self.crime.heat_at(self.time.now())
    }

    /// Advance the simulation by `raw_delta` seconds
    pub fn tick<P, S>(
        &mut self,
        raw_delta: f32,
        player_pos: Vec3,
        port: &mut P,
        sink: &mut S,
    ) -> TickReport
    where
        P: PlayerStatsPort + ?Sized,
        S: GameEventSink + ?Sized,
    {
        let mut cursor = match self.last_action_seq {
            Some(seq) => seq,
            None => {
                let seq = port.latest_action_seq();
                if seq > 0 {
                    info!("Attached to action log at #{}; earlier entries are history", seq);
                }
                seq
            }
        };
        self.last_action_seq = Some(cursor);

        self.time.update(raw_delta);
        let now = self.time.now();
        let mut report = TickReport {
            now,
            ..Default::default()
        };
        if self.time.paused {
            report.heat = self.crime.heat_at(now);
            return report;
        }

        // 1. Streaming
        if self.throttle.should_run(now) {
            self.world.update_world(player_pos);
            self.sync_chunk_residents();
            report.streamed = true;
        }

        // 2. Crimes from actions logged since the last tick
        for action in port.actions_after(cursor) {
            cursor = cursor.max(action.seq);
            let civilians = self.npcs.civilian_positions();
            let recorded = self
                .crime
                .record(&action.tag, player_pos, civilians, now, port, sink);
            if let Some(event) = recorded {
                report.crimes.push(event);
            }
        }
        self.last_action_seq = Some(cursor);

        // 3. Police presence follows the wanted level
        let wanted = port.snapshot().wanted_level;
        self.npcs.sync_reinforcements(wanted, player_pos, &mut self.rng);

        // 4. NPC decisions against fresh stats
        let ctx = PerceptionContext {
            player_pos,
            stats: port.snapshot(),
            now,
            delta: self.time.delta_time,
        };
        let events = self.npcs.update(&ctx, &mut self.rng);
        for event in &events {
            if let NpcEvent::AttackedPlayer { damage, .. } = event {
                port.damage_player(*damage);
            }
            if let Some(tag) = event.action_tag() {
                port.push_action(&tag, now);
            }
            sink.on_npc_event(event);
        }
        report.npc_events = events;

        // 5. Heat decay and pruning
        self.crime.update(now);
        report.heat = self.crime.heat_at(now);
        report
    }

    /// The player strikes NPC `id`.
    ///
    /// A kill adds reputation and logs `killed_{category}`; the crime tracker
    /// picks the tag up on the next tick.
    pub fn player_attack<P, S>(&mut self, id: EntityId, port: &mut P, sink: &mut S) -> HitOutcome
    where
        P: PlayerStatsPort + ?Sized,
        S: GameEventSink + ?Sized,
    {
        let now = self.time.now();
        let outcome = self.npcs.player_attack(id, now, &mut self.rng);
        if let HitOutcome::Killed(report) = &outcome {
            info!("Player killed {} {}", report.category, report.npc);
            port.add_reputation(report.reputation_gain);
            port.push_action(&report.action_tag(), now);
            if report.category == NpcCategory::Police {
                port.record_police_kill();
                sink.on_police_killed(report.npc);
            }
            sink.on_npc_event(&NpcEvent::Killed(report.clone()));
        }
        outcome
    }

    /// Drop every chunk and its residents; the next tick streams them back
    pub fn reload_world(&mut self) {
        self.world.reload_all();
        for coord in std::mem::take(&mut self.world.newly_unloaded) {
            self.npcs.on_chunk_unloaded(coord);
        }
        self.throttle.invalidate();
    }

    /// Player got busted: wipe the crime log and stand down the police
    pub fn clear_heat<P: PlayerStatsPort + ?Sized>(&mut self, port: &mut P) {
        let wanted = port.snapshot().wanted_level;
        port.adjust_wanted(-(wanted as i32));
        self.crime.clear();
        warn!("Heat cleared (wanted was {})", wanted);
    }

    fn sync_chunk_residents(&mut self) {
        for coord in &self.world.newly_unloaded {
            self.npcs.on_chunk_unloaded(*coord);
        }
        for coord in &self.world.newly_loaded {
            if let Some(chunk) = self.world.get_chunk(coord) {
                self.npcs.on_chunk_loaded(chunk);
            }
        }
    }
}
