//! Biome classification by radial distance from the origin chunk
//!
//! Produces the rough city shape: a downtown core, a ring of suburbs mixed
//! with downtown blocks, a mixed band, and outer decay.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// City district type controlling a chunk's generation tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Downtown,
    Residential,
    Industrial,
    Warehouse,
    Slums,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Downtown,
        Biome::Residential,
        Biome::Industrial,
        Biome::Warehouse,
        Biome::Slums,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Downtown => "downtown",
            Biome::Residential => "residential",
            Biome::Industrial => "industrial",
            Biome::Warehouse => "warehouse",
            Biome::Slums => "slums",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a chunk by its Euclidean distance (in chunks) from the origin.
///
/// Only `d < 1` is fixed; every other band draws from `rng`, so the result is
/// reproducible only when the caller passes a per-chunk seeded generator.
pub fn classify<R: Rng + ?Sized>(chunk_x: i32, chunk_z: i32, rng: &mut R) -> Biome {
    let (x, z) = (chunk_x as f64, chunk_z as f64);
    let distance = (x * x + z * z).sqrt();

    if distance < 1.0 {
        Biome::Downtown
    } else if distance < 2.0 {
        if rng.gen_bool(0.5) {
            Biome::Residential
        } else {
            Biome::Downtown
        }
    } else if distance < 4.0 {
        let roll: f64 = rng.gen();
        if roll < 0.3 {
            Biome::Industrial
        } else if roll < 0.6 {
            Biome::Residential
        } else if roll < 0.8 {
            Biome::Slums
        } else {
            Biome::Warehouse
        }
    } else if rng.gen_bool(0.7) {
        Biome::Slums
    } else {
        Biome::Industrial
    }
}
