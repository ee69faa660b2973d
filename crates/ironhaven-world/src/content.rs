//! Procedural chunk content: buildings, NPC seeds, vehicles, and props
//!
//! Every biome has a fixed [`BiomeProfile`]: counts, size ranges, and weight
//! tables. Generation draws everything from the caller's RNG, so a seeded
//! generator reproduces a chunk exactly.

use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use ironhaven_core::{Color, EntityId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::biome::{classify, Biome};
use crate::chunk::{ChunkCoord, WorldChunk};
use crate::error::WorldError;
use crate::seed::{chunk_rng, GenerationMode};

/// Fraction of the chunk edge used for placement, centered
const FOOTPRINT_FRACTION: f32 = 0.9;

/// Structural type of a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Residential,
    Commercial,
    Industrial,
    Office,
    Warehouse,
}

/// A static building; only rendered and collided against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Center of the box in world space
    pub position: Vec3,
    /// Width (x), height (y), depth (z)
    pub size: Vec3,
    pub kind: BuildingKind,
    pub color: Color,
    pub has_windows: bool,
    pub has_neon: bool,
}

impl Building {
    /// Axis-aligned bounds as (min, max)
    pub fn aabb(&self) -> (Vec3, Vec3) {
        let half = self.size * 0.5;
        (self.position - half, self.position + half)
    }

    /// Whether a point (grown by `margin` horizontally) is inside the footprint
    /// and below the roof.
    pub fn contains_point(&self, point: Vec3, margin: f32) -> bool {
        let (min, max) = self.aabb();
        point.x >= min.x - margin
            && point.x <= max.x + margin
            && point.z >= min.z - margin
            && point.z <= max.z + margin
            && point.y >= min.y
            && point.y <= max.y
    }
}

/// NPC archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcCategory {
    Civilian,
    Gangster,
    Police,
    Dealer,
    Hitman,
    Boss,
}

impl NpcCategory {
    pub const ALL: [NpcCategory; 6] = [
        NpcCategory::Civilian,
        NpcCategory::Gangster,
        NpcCategory::Police,
        NpcCategory::Dealer,
        NpcCategory::Hitman,
        NpcCategory::Boss,
    ];

    /// Starting (and maximum) health
    pub fn max_health(&self) -> f32 {
        match self {
            NpcCategory::Hitman => 150.0,
            NpcCategory::Boss => 200.0,
            _ => 100.0,
        }
    }

    /// Lowercase tag used in action-log entries (`killed_police`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            NpcCategory::Civilian => "civilian",
            NpcCategory::Gangster => "gangster",
            NpcCategory::Police => "police",
            NpcCategory::Dealer => "dealer",
            NpcCategory::Hitman => "hitman",
            NpcCategory::Boss => "boss",
        }
    }
}

impl fmt::Display for NpcCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to spawn a resident NPC when its chunk loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSeed {
    pub id: EntityId,
    pub position: Vec3,
    pub category: NpcCategory,
    pub weapon: Option<String>,
    pub dialogue: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Sedan,
    Suv,
    Truck,
    Van,
    Sports,
    PoliceCar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: Vec3,
    /// Yaw in radians
    pub rotation: f32,
    pub kind: VehicleKind,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    Streetlight,
    TrashCan,
    Hydrant,
    Bench,
    Dumpster,
    Barrel,
    Crate,
    GraffitiWall,
    BusStop,
    Newsstand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub position: Vec3,
    pub kind: PropKind,
}

/// Generated content of one chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkContent {
    pub buildings: Vec<Building>,
    pub npcs: Vec<NpcSeed>,
    pub vehicles: Vec<Vehicle>,
    pub props: Vec<Prop>,
}

/// Generation tables for a single biome
#[derive(Debug, Clone)]
pub struct BiomeProfile {
    pub building_count: u32,
    pub density: f32,
    /// Height range (min, max)
    pub height: (f32, f32),
    /// Width/depth range (min, max)
    pub footprint: (f32, f32),
    pub building_kinds: Vec<(BuildingKind, u32)>,
    pub palette: Vec<Color>,
    pub window_chance: f64,
    pub neon_chance: f64,
    pub npc_count: u32,
    pub npc_categories: Vec<(NpcCategory, u32)>,
    pub vehicle_count: u32,
    pub vehicle_kinds: Vec<(VehicleKind, u32)>,
    pub prop_count: u32,
    pub prop_kinds: Vec<(PropKind, u32)>,
}

impl BiomeProfile {
    /// Number of buildings actually placed (count scaled by density)
    pub fn buildings_to_place(&self) -> usize {
        // Epsilon absorbs f32 error in products like 25 × 1.8
        (self.building_count as f32 * self.density + 1e-4).floor() as usize
    }

    pub fn for_biome(biome: Biome) -> Self {
        use BuildingKind as B;
        use NpcCategory as N;
        use PropKind as P;
        use VehicleKind as V;

        match biome {
            Biome::Downtown => Self {
                building_count: 15,
                density: 1.5,
                height: (20.0, 60.0),
                footprint: (8.0, 16.0),
                building_kinds: vec![(B::Office, 50), (B::Commercial, 40), (B::Residential, 10)],
                palette: hex_palette(&[0x2C3E50, 0x34495E, 0x5D6D7E, 0x1B2631, 0x85929E]),
                window_chance: 0.9,
                neon_chance: 0.4,
                npc_count: 12,
                npc_categories: vec![
                    (N::Civilian, 50),
                    (N::Police, 20),
                    (N::Gangster, 15),
                    (N::Dealer, 10),
                    (N::Hitman, 3),
                    (N::Boss, 2),
                ],
                vehicle_count: 8,
                vehicle_kinds: vec![
                    (V::Sedan, 35),
                    (V::Sports, 25),
                    (V::Suv, 20),
                    (V::PoliceCar, 20),
                ],
                prop_count: 20,
                prop_kinds: vec![
                    (P::Streetlight, 30),
                    (P::TrashCan, 20),
                    (P::Hydrant, 15),
                    (P::BusStop, 15),
                    (P::Newsstand, 10),
                    (P::Bench, 10),
                ],
            },
            Biome::Residential => Self {
                building_count: 12,
                density: 1.2,
                height: (5.0, 15.0),
                footprint: (6.0, 12.0),
                building_kinds: vec![(B::Residential, 80), (B::Commercial, 20)],
                palette: hex_palette(&[0xD35400, 0xA04000, 0xF5CBA7, 0xE59866, 0xFAD7A0]),
                window_chance: 0.85,
                neon_chance: 0.1,
                npc_count: 8,
                npc_categories: vec![
                    (N::Civilian, 60),
                    (N::Police, 20),
                    (N::Dealer, 15),
                    (N::Gangster, 5),
                ],
                vehicle_count: 6,
                vehicle_kinds: vec![(V::Sedan, 45), (V::Suv, 35), (V::Van, 15), (V::PoliceCar, 5)],
                prop_count: 15,
                prop_kinds: vec![
                    (P::Streetlight, 30),
                    (P::Bench, 25),
                    (P::TrashCan, 20),
                    (P::Hydrant, 15),
                    (P::BusStop, 10),
                ],
            },
            Biome::Industrial => Self {
                building_count: 8,
                density: 1.0,
                height: (10.0, 25.0),
                footprint: (12.0, 22.0),
                building_kinds: vec![(B::Industrial, 70), (B::Warehouse, 30)],
                palette: hex_palette(&[0x616A6B, 0x7B7D7D, 0x4D5656, 0x935116]),
                window_chance: 0.4,
                neon_chance: 0.05,
                npc_count: 6,
                npc_categories: vec![
                    (N::Gangster, 40),
                    (N::Hitman, 25),
                    (N::Civilian, 15),
                    (N::Boss, 10),
                    (N::Dealer, 10),
                ],
                vehicle_count: 5,
                vehicle_kinds: vec![(V::Truck, 50), (V::Van, 30), (V::Sedan, 20)],
                prop_count: 12,
                prop_kinds: vec![
                    (P::Barrel, 35),
                    (P::Crate, 30),
                    (P::Dumpster, 20),
                    (P::Streetlight, 15),
                ],
            },
            Biome::Warehouse => Self {
                building_count: 6,
                density: 0.8,
                height: (8.0, 20.0),
                footprint: (15.0, 25.0),
                building_kinds: vec![(B::Warehouse, 80), (B::Industrial, 20)],
                palette: hex_palette(&[0x6E2C00, 0x784212, 0x5F6A6A, 0x873600]),
                window_chance: 0.3,
                neon_chance: 0.05,
                npc_count: 5,
                npc_categories: vec![
                    (N::Gangster, 35),
                    (N::Dealer, 25),
                    (N::Hitman, 20),
                    (N::Boss, 10),
                    (N::Civilian, 10),
                ],
                vehicle_count: 4,
                vehicle_kinds: vec![(V::Truck, 55), (V::Van, 35), (V::Suv, 10)],
                prop_count: 10,
                prop_kinds: vec![
                    (P::Crate, 40),
                    (P::Barrel, 30),
                    (P::Dumpster, 20),
                    (P::Streetlight, 10),
                ],
            },
            Biome::Slums => Self {
                building_count: 25,
                density: 1.8,
                height: (2.0, 8.0),
                footprint: (4.0, 8.0),
                building_kinds: vec![
                    (B::Residential, 70),
                    (B::Commercial, 20),
                    (B::Industrial, 10),
                ],
                palette: hex_palette(&[0x4A235A, 0x512E5F, 0x5B2C6F, 0x6C3483, 0x424949]),
                window_chance: 0.5,
                neon_chance: 0.15,
                npc_count: 15,
                npc_categories: vec![
                    (N::Gangster, 35),
                    (N::Dealer, 30),
                    (N::Civilian, 25),
                    (N::Hitman, 5),
                    (N::Police, 5),
                ],
                vehicle_count: 3,
                vehicle_kinds: vec![(V::Sedan, 60), (V::Van, 40)],
                prop_count: 25,
                prop_kinds: vec![
                    (P::GraffitiWall, 30),
                    (P::Dumpster, 25),
                    (P::Barrel, 20),
                    (P::TrashCan, 15),
                    (P::Streetlight, 10),
                ],
            },
        }
    }
}

fn hex_palette(hex: &[u32]) -> Vec<Color> {
    hex.iter().copied().map(Color::from_hex).collect()
}

const VEHICLE_PALETTE: [u32; 8] = [
    0x1C1C1C, 0xF2F3F4, 0x922B21, 0x1F618D, 0x7D6608, 0x616A6B, 0x0E6655, 0x4A235A,
];

/// Lines an NPC may open with, by district and archetype
fn dialogue_lines(biome: Biome, category: NpcCategory) -> &'static [&'static str] {
    use NpcCategory as N;
    match (biome, category) {
        (Biome::Downtown, N::Civilian) => &[
            "Excuse me, I'm late for a meeting.",
            "Rent downtown is criminal.",
            "Did you see the news this morning?",
        ],
        (Biome::Downtown, N::Police) => &["Move along.", "Keep your hands where I can see them."],
        (Biome::Downtown, N::Dealer) => &["Psst. Looking for something special?"],
        (Biome::Downtown, N::Gangster) => &["This block pays us, not the city."],
        (Biome::Downtown, N::Boss) => &["You're standing in my city."],
        (Biome::Residential, N::Civilian) => &[
            "Nice quiet street, let's keep it that way.",
            "Have you seen my dog?",
            "The neighbors are at it again.",
        ],
        (Biome::Residential, N::Police) => &["Everything alright here?"],
        (Biome::Residential, N::Dealer) => &["Not here, the neighbors watch. Around back."],
        (Biome::Industrial, N::Civilian) => &["Shift doesn't end till six."],
        (Biome::Industrial, N::Gangster) => &["Wrong part of town, friend.", "You lost?"],
        (Biome::Industrial, N::Hitman) => &["..."],
        (Biome::Industrial, N::Boss) => &["Business is business."],
        (Biome::Warehouse, N::Gangster) => &["Shipment's not for you.", "Keep walking."],
        (Biome::Warehouse, N::Dealer) => &["Fresh off the boat. Interested?"],
        (Biome::Warehouse, N::Boss) => &["Nobody comes down here by accident."],
        (Biome::Slums, N::Civilian) => &["Spare some change?", "Don't trust anyone around here."],
        (Biome::Slums, N::Gangster) => &["This is our turf.", "Pay up or get out."],
        (Biome::Slums, N::Dealer) => &["Best prices in Ironhaven."],
        (Biome::Slums, N::Police) => &["We don't come here alone."],
        _ => &[],
    }
}

/// Builds chunks from per-biome profiles
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    chunk_size: f32,
    mode: GenerationMode,
    profiles: HashMap<Biome, BiomeProfile>,
}

impl ContentGenerator {
    pub fn new(chunk_size: f32, mode: GenerationMode) -> Self {
        let profiles = Biome::ALL
            .iter()
            .map(|&biome| (biome, BiomeProfile::for_biome(biome)))
            .collect();
        Self {
            chunk_size,
            mode,
            profiles,
        }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn profile(&self, biome: Biome) -> &BiomeProfile {
        &self.profiles[&biome]
    }

    /// Replace the tables used for a biome (tuning/modding hook)
    pub fn set_profile(&mut self, biome: Biome, profile: BiomeProfile) {
        self.profiles.insert(biome, profile);
    }

    /// Classify and populate the chunk at `coord`
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Result<WorldChunk, WorldError> {
        let seed = self.mode.chunk_seed(coord.x, coord.z);
        let mut rng = chunk_rng(seed);
        let biome = classify(coord.x, coord.z, &mut rng);
        let content = self.generate(coord, biome, &mut rng)?;

        debug!(
            "Generated chunk ({}, {}) as {}: {} buildings, {} npcs",
            coord.x,
            coord.z,
            biome,
            content.buildings.len(),
            content.npcs.len()
        );

        Ok(WorldChunk {
            coord,
            biome,
            seed,
            buildings: content.buildings,
            npcs: content.npcs,
            vehicles: content.vehicles,
            props: content.props,
        })
    }

    /// Populate a chunk of the given biome
    pub fn generate<R: Rng + ?Sized>(
        &self,
        coord: ChunkCoord,
        biome: Biome,
        rng: &mut R,
    ) -> Result<ChunkContent, WorldError> {
        let profile = self.profile(biome);
        let center = coord.world_center(self.chunk_size);
        let span = self.chunk_size * FOOTPRINT_FRACTION * 0.5;

        let mut content = ChunkContent::default();

        for _ in 0..profile.buildings_to_place() {
            let kind = pick(rng, &profile.building_kinds, biome, "building")?;
            let height = rng.gen_range(profile.height.0..=profile.height.1);
            let width = rng.gen_range(profile.footprint.0..=profile.footprint.1);
            let depth = rng.gen_range(profile.footprint.0..=profile.footprint.1);
            let ground = scatter(rng, center, span);
            content.buildings.push(Building {
                position: Vec3::new(ground.x, height * 0.5, ground.z),
                size: Vec3::new(width, height, depth),
                kind,
                color: profile.palette.choose(rng).copied().unwrap_or(Color::from_hex(0x808080)),
                has_windows: rng.gen_bool(profile.window_chance),
                has_neon: rng.gen_bool(profile.neon_chance),
            });
        }

        for _ in 0..profile.npc_count {
            let category = pick(rng, &profile.npc_categories, biome, "npc")?;
            let position = scatter(rng, center, span);
            let weapon = roll_weapon(rng, category).map(str::to_string);
            let dialogue = dialogue_lines(biome, category)
                .choose(rng)
                .copied()
                .unwrap_or("...")
                .to_string();
            content.npcs.push(NpcSeed {
                id: EntityId::from_bytes(rng.gen()),
                position,
                category,
                weapon,
                dialogue,
            });
        }

        for _ in 0..profile.vehicle_count {
            let kind = pick(rng, &profile.vehicle_kinds, biome, "vehicle")?;
            let color = if kind == VehicleKind::PoliceCar {
                Color::WHITE
            } else {
                Color::from_hex(VEHICLE_PALETTE[rng.gen_range(0..VEHICLE_PALETTE.len())])
            };
            content.vehicles.push(Vehicle {
                position: scatter(rng, center, span),
                rotation: rng.gen_range(0.0..std::f32::consts::TAU),
                kind,
                color,
            });
        }

        for _ in 0..profile.prop_count {
            let kind = pick(rng, &profile.prop_kinds, biome, "prop")?;
            content.props.push(Prop {
                position: scatter(rng, center, span),
                kind,
            });
        }

        Ok(content)
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(
    rng: &mut R,
    table: &[(T, u32)],
    biome: Biome,
    name: &'static str,
) -> Result<T, WorldError> {
    table
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(item, _)| *item)
        .map_err(|source| WorldError::WeightTable {
            biome,
            table: name,
            source,
        })
}

/// Uniform ground-level point within `span` of `center` on both axes
fn scatter<R: Rng + ?Sized>(rng: &mut R, center: Vec3, span: f32) -> Vec3 {
    Vec3::new(
        center.x + rng.gen_range(-span..=span),
        0.0,
        center.z + rng.gen_range(-span..=span),
    )
}

fn roll_weapon<R: Rng + ?Sized>(rng: &mut R, category: NpcCategory) -> Option<&'static str> {
    match category {
        NpcCategory::Civilian => None,
        NpcCategory::Police => Some("pistol"),
        NpcCategory::Gangster => ["pistol", "bat", "knife"].choose(rng).copied(),
        NpcCategory::Dealer => rng.gen_bool(0.3).then_some("knife"),
        NpcCategory::Hitman => Some("silenced_pistol"),
        NpcCategory::Boss => Some("smg"),
    }
}
