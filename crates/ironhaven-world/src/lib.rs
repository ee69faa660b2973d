//! Ironhaven World - City streaming and procedural generation
//!
//! Provides chunk-based world streaming around the player, biome classification
//! by distance from downtown, and per-biome content generation.

pub mod biome;
pub mod chunk;
pub mod content;
pub mod error;
pub mod seed;

pub use biome::{classify, Biome};
pub use chunk::{ChunkConfig, ChunkCoord, ChunkManager, StreamingThrottle, WorldChunk};
pub use content::{
    BiomeProfile, Building, BuildingKind, ChunkContent, ContentGenerator, NpcCategory, NpcSeed,
    Prop, PropKind, Vehicle, VehicleKind,
};
pub use error::WorldError;
pub use seed::GenerationMode;
