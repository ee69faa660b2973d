//! NPC manager: spawn, despawn, and update all active NPCs

use std::collections::BTreeMap;

use glam::Vec3;
use ironhaven_core::{EntityId, Millis};
use ironhaven_world::{ChunkCoord, NpcCategory, WorldChunk};
use rand::Rng;
use tracing::{debug, warn};

use super::behavior::{decide, take_player_hit, HitOutcome, PerceptionContext};
use super::Npc;
use crate::events::NpcEvent;

/// Reinforcements spawn in this ring around the player
const REINFORCEMENT_SPAWN_MIN: f32 = 30.0;
const REINFORCEMENT_SPAWN_MAX: f32 = 40.0;
/// Police units dispatched per wanted level
pub const POLICE_PER_WANTED_LEVEL: usize = 2;
/// Player hits deal a random amount in this range
pub const PLAYER_HIT_DAMAGE: std::ops::RangeInclusive<f32> = 50.0..=80.0;

/// Manages all active NPC instances.
///
/// Kept in a `BTreeMap` so per-tick iteration order, and with it every RNG
/// draw, is stable under a seeded RNG.
#[derive(Debug, Default)]
pub struct NpcManager {
    npcs: BTreeMap<EntityId, Npc>,
}

impl NpcManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when a chunk finishes loading. Spawns its resident NPCs.
    ///
    /// An id that is already live keeps its current NPC.
    pub fn on_chunk_loaded(&mut self, chunk: &WorldChunk) {
        for seed in &chunk.npcs {
            if let Some(existing) = self.npcs.get(&seed.id) {
                warn!(
                    "NPC id {} from chunk {:?} already belongs to {:?}, skipping",
                    seed.id, chunk.coord, existing.chunk
                );
                continue;
            }
            self.npcs.insert(seed.id, Npc::from_seed(seed, chunk.coord));
        }
    }

    /// Called when a chunk is unloaded. Removes all NPCs from that chunk.
    pub fn on_chunk_unloaded(&mut self, coord: ChunkCoord) {
        self.npcs.retain(|_, npc| npc.chunk != Some(coord));
    }

    /// Keep `wanted × 2` live police reinforcements around the player.
    ///
    /// Dead reinforcements are cleared first. Surplus units are withdrawn
    /// farthest first. Missing units spawn 30-40 units from the player.
    /// Returns the number spawned and removed.
    pub fn sync_reinforcements<R: Rng + ?Sized>(
        &mut self,
        wanted_level: u8,
        player_pos: Vec3,
        rng: &mut R,
    ) -> (usize, usize) {
        let target = wanted_level as usize * POLICE_PER_WANTED_LEVEL;

        let before = self.npcs.len();
        self.npcs
            .retain(|_, npc| npc.chunk.is_some() || npc.is_alive());
        let mut removed = before - self.npcs.len();

        let mut units: Vec<(EntityId, f32)> = self
            .npcs
            .values()
            .filter(|npc| npc.chunk.is_none())
            .map(|npc| (npc.id, npc.position.distance(player_pos)))
            .collect();

        if units.len() > target {
            units.sort_by(|a, b| b.1.total_cmp(&a.1));
            let surplus = units.len() - target;
            for (id, _) in units.drain(..surplus) {
                self.npcs.remove(&id);
                removed += 1;
            }
        }

        let mut spawned = 0;
        while units.len() + spawned < target {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let distance = rng.gen_range(REINFORCEMENT_SPAWN_MIN..=REINFORCEMENT_SPAWN_MAX);
            let offset = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
            let position = player_pos + offset;
            let unit = Npc::reinforcement(EntityId::from_bytes(rng.gen()), position);
            self.npcs.insert(unit.id, unit);
            spawned += 1;
        }

        if spawned > 0 || removed > 0 {
            debug!(
                "Police reinforcements for wanted {}: +{} -{} ({} on duty)",
                wanted_level,
                spawned,
                removed,
                self.reinforcement_count()
            );
        }
        (spawned, removed)
    }

    /// Run one behavior tick for every NPC
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &PerceptionContext,
        rng: &mut R,
    ) -> Vec<NpcEvent> {
        let mut events = Vec::new();
        for npc in self.npcs.values_mut() {
            events.extend(decide(npc, ctx, rng));
        }
        events
    }

    /// The player strikes `id` for 50-80 damage
    pub fn player_attack<R: Rng + ?Sized>(
        &mut self,
        id: EntityId,
        now: Millis,
        rng: &mut R,
    ) -> HitOutcome {
        let Some(npc) = self.npcs.get_mut(&id) else {
            return HitOutcome::Ignored;
        };
        let damage = rng.gen_range(PLAYER_HIT_DAMAGE);
        take_player_hit(npc, damage, now)
    }

    /// Positions of live civilians, for witness counting
    pub fn civilian_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.npcs
            .values()
            .filter(|npc| npc.is_alive() && npc.category() == NpcCategory::Civilian)
            .map(|npc| npc.position)
    }

    /// Closest live NPC within `radius` of `pos`
    pub fn npc_at(&self, pos: Vec3, radius: f32) -> Option<&Npc> {
        self.npcs
            .values()
            .filter(|npc| npc.is_attackable())
            .map(|npc| (npc, npc.position.distance(pos)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(npc, _)| npc)
    }

    pub fn get(&self, id: &EntityId) -> Option<&Npc> {
        self.npcs.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Npc> {
        self.npcs.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.values()
    }

    pub fn count(&self) -> usize {
        self.npcs.len()
    }

    pub fn count_alive(&self) -> usize {
        self.npcs.values().filter(|npc| npc.is_alive()).count()
    }

    pub fn count_by_category(&self, category: NpcCategory) -> usize {
        self.npcs
            .values()
            .filter(|npc| npc.category() == category)
            .count()
    }

    /// Live police units that follow the player rather than a chunk
    pub fn reinforcement_count(&self) -> usize {
        self.npcs
            .values()
            .filter(|npc| npc.chunk.is_none() && npc.is_alive())
            .count()
    }
}
