//! Chunk-based city streaming
//!
//! Keeps a square window of generated chunks around the player. Chunks are
//! immutable once generated and shared as `Arc`s, so the renderer can hold on
//! to a chunk across frames and compare identity cheaply.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use ironhaven_core::Millis;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::biome::Biome;
use crate::content::{Building, ContentGenerator, NpcSeed, Prop, Vehicle};
use crate::error::WorldError;
use crate::seed::GenerationMode;

/// Grid coordinate for a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert a world position to the chunk coordinate that contains it
    pub fn from_world_pos(pos: Vec3, chunk_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_size).floor() as i32,
            z: (pos.z / chunk_size).floor() as i32,
        }
    }

    /// World-space origin (min corner) of this chunk
    pub fn world_origin(&self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }

    /// World-space center of this chunk at ground level
    pub fn world_center(&self, chunk_size: f32) -> Vec3 {
        self.world_origin(chunk_size) + Vec3::new(chunk_size * 0.5, 0.0, chunk_size * 0.5)
    }

    /// Chebyshev distance to another chunk coord
    pub fn distance(&self, other: &ChunkCoord) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.z - other.z).unsigned_abs())
    }
}

/// Configuration for the chunk system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Edge length of a chunk in world units
    pub chunk_size: f32,
    /// Chunks kept on each side of the player's chunk
    pub render_distance: u32,
    /// Seeded or fully random content
    pub generation: GenerationMode,
    /// Minimum game time between streaming passes
    pub stream_interval_ms: Millis,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 50.0,
            render_distance: 2,
            generation: GenerationMode::default(),
            stream_interval_ms: 1_000,
        }
    }
}

impl ChunkConfig {
    /// Chebyshev distance past which loaded chunks are dropped.
    ///
    /// One chunk wider than the render window so a player standing on a
    /// boundary doesn't thrash load/unload.
    pub fn unload_distance(&self) -> u32 {
        self.render_distance + 1
    }

    /// Number of chunks in the active window
    pub fn window_len(&self) -> usize {
        let side = (2 * self.render_distance + 1) as usize;
        side * side
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.chunk_size.is_finite() && self.chunk_size > 0.0) {
            return Err(WorldError::InvalidConfig(format!(
                "chunk_size must be positive, got {}",
                self.chunk_size
            )));
        }
        // TOML integers are i64; a larger seed could not be saved back
        if let GenerationMode::Seeded { world_seed } = self.generation {
            if i64::try_from(world_seed).is_err() {
                return Err(WorldError::InvalidConfig(format!(
                    "world_seed must be at most {}, got {}",
                    i64::MAX,
                    world_seed
                )));
            }
        }
        Ok(())
    }
}

/// A generated city block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldChunk {
    pub coord: ChunkCoord,
    pub biome: Biome,
    /// Seed the content was generated from
    pub seed: u64,
    pub buildings: Vec<Building>,
    pub npcs: Vec<NpcSeed>,
    pub vehicles: Vec<Vehicle>,
    pub props: Vec<Prop>,
}

/// Rate limiter for streaming passes
#[derive(Debug, Clone)]
pub struct StreamingThrottle {
    min_interval: Millis,
    last_run: Option<Millis>,
}

impl StreamingThrottle {
    pub fn new(min_interval: Millis) -> Self {
        Self {
            min_interval,
            last_run: None,
        }
    }

    /// Whether a pass should run at `now`. Marks the pass as run if so.
    pub fn should_run(&mut self, now: Millis) -> bool {
        match self.last_run {
            Some(last) if now < last.saturating_add(self.min_interval) => false,
            _ => {
                self.last_run = Some(now);
                true
            }
        }
    }

    /// Force the next call to `should_run` to pass
    pub fn invalidate(&mut self) {
        self.last_run = None;
    }
}

/// Manages loading/unloading of chunks around the player
pub struct ChunkManager {
    config: ChunkConfig,
    generator: ContentGenerator,
    loaded_chunks: HashMap<ChunkCoord, Arc<WorldChunk>>,
    /// Window returned by the last successful update
    active: Vec<Arc<WorldChunk>>,
    /// Chunks generated by the last update (for NPC spawning)
    pub newly_loaded: Vec<ChunkCoord>,
    /// Chunks evicted by the last update (for NPC cleanup)
    pub newly_unloaded: Vec<ChunkCoord>,
}

impl ChunkManager {
    pub fn new(config: ChunkConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let generator = ContentGenerator::new(config.chunk_size, config.generation);
        Ok(Self::with_generator(config, generator))
    }

    /// Use a custom generator (e.g. with tuned biome profiles)
    pub fn with_generator(config: ChunkConfig, generator: ContentGenerator) -> Self {
        Self {
            config,
            generator,
            loaded_chunks: HashMap::new(),
            active: Vec::new(),
            newly_loaded: Vec::new(),
            newly_unloaded: Vec::new(),
        }
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    pub fn generator_mut(&mut self) -> &mut ContentGenerator {
        &mut self.generator
    }

    /// Get the chunk coordinate for a world position
    pub fn player_chunk(&self, player_pos: Vec3) -> ChunkCoord {
        ChunkCoord::from_world_pos(player_pos, self.config.chunk_size)
    }

    pub fn get_chunk(&self, coord: &ChunkCoord) -> Option<&Arc<WorldChunk>> {
        self.loaded_chunks.get(coord)
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = &Arc<WorldChunk>> {
        self.loaded_chunks.values()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_chunks.len()
    }

    /// Window returned by the last successful update
    pub fn active_chunks(&self) -> &[Arc<WorldChunk>] {
        &self.active
    }

    /// Recompute the window around the player.
    ///
    /// Loaded chunks are reused as-is; missing ones are generated. If any
    /// generation fails nothing is committed and the previous window is
    /// returned unchanged.
    pub fn update_world(&mut self, player_pos: Vec3) -> Vec<Arc<WorldChunk>> {
        self.newly_loaded.clear();
        self.newly_unloaded.clear();

        let center = self.player_chunk(player_pos);
        let radius = self.config.render_distance as i32;

        let mut generated = Vec::new();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if self.loaded_chunks.contains_key(&coord) {
                    continue;
                }
                match self.generator.generate_chunk(coord) {
                    Ok(chunk) => generated.push(Arc::new(chunk)),
                    Err(e) => {
                        error!(
                            "Chunk generation failed at ({}, {}): {}; keeping previous world",
                            coord.x, coord.z, e
                        );
                        return self.active.clone();
                    }
                }
            }
        }

        // Unload distant chunks
        let unload_distance = self.config.unload_distance();
        let to_unload: Vec<ChunkCoord> = self
            .loaded_chunks
            .keys()
            .filter(|coord| coord.distance(&center) > unload_distance)
            .copied()
            .collect();
        for coord in to_unload {
            self.loaded_chunks.remove(&coord);
            self.newly_unloaded.push(coord);
        }

        for chunk in generated {
            self.newly_loaded.push(chunk.coord);
            self.loaded_chunks.insert(chunk.coord, chunk);
        }

        if !self.newly_loaded.is_empty() || !self.newly_unloaded.is_empty() {
            debug!(
                "Streamed around ({}, {}): +{} -{} ({} loaded)",
                center.x,
                center.z,
                self.newly_loaded.len(),
                self.newly_unloaded.len(),
                self.loaded_chunks.len()
            );
        }

        let mut window = Vec::with_capacity(self.config.window_len());
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if let Some(chunk) = self.loaded_chunks.get(&coord) {
                    window.push(Arc::clone(chunk));
                }
            }
        }
        self.active = window.clone();
        window
    }

    /// Drop every chunk; the next update regenerates the window
    pub fn reload_all(&mut self) {
        info!("Reloading all {} chunks", self.loaded_chunks.len());
        self.newly_unloaded = self.loaded_chunks.keys().copied().collect();
        self.loaded_chunks.clear();
        self.active.clear();
    }

    /// First building around `pos` that a body of `radius` would overlap
    pub fn building_collision(&self, pos: Vec3, radius: f32) -> Option<&Building> {
        let center = self.player_chunk(pos);
        // Buildings never reach further than one chunk past their own
        for dz in -1..=1 {
            for dx in -1..=1 {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                let Some(chunk) = self.loaded_chunks.get(&coord) else {
                    continue;
                };
                if let Some(b) = chunk.buildings.iter().find(|b| b.contains_point(pos, radius)) {
                    return Some(b);
                }
            }
        }
        None
    }
}
