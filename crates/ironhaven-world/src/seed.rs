//! Per-chunk randomness
//!
//! In seeded mode every chunk gets its own generator derived from a hash of the
//! world seed and the chunk coordinates, so leaving and re-entering a district
//! rebuilds the same buildings and residents.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How chunk content is randomized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GenerationMode {
    /// Same coordinates always produce the same chunk
    Seeded { world_seed: u64 },
    /// Fresh content on every load ("living city")
    Random,
}

impl Default for GenerationMode {
    fn default() -> Self {
        GenerationMode::Seeded { world_seed: 0x1803_4A7E }
    }
}

impl GenerationMode {
    /// Seed for the chunk at `(cx, cz)`
    pub fn chunk_seed(&self, cx: i32, cz: i32) -> u64 {
        match self {
            GenerationMode::Seeded { world_seed } => chunk_hash(*world_seed, cx, cz),
            GenerationMode::Random => rand::thread_rng().gen(),
        }
    }
}

/// Generator for a chunk seed
pub fn chunk_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// One splitmix64 step: a bijective 64-bit finalizer
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Mix chunk coordinates into a 64-bit seed.
///
/// Each input is folded through a full splitmix64 round, so mirrored or
/// swapped coordinates land on unrelated seeds.
pub fn chunk_hash(world_seed: u64, cx: i32, cz: i32) -> u64 {
    let h = splitmix64(world_seed);
    let h = splitmix64(h ^ cx as u32 as u64);
    splitmix64(h ^ cz as u32 as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_stable() {
        let mode = GenerationMode::Seeded { world_seed: 42 };
        assert_eq!(mode.chunk_seed(3, -7), mode.chunk_seed(3, -7));
        assert_ne!(mode.chunk_seed(3, -7), mode.chunk_seed(-7, 3));
    }

    #[test]
    fn test_seeds_unique_across_city() {
        let mut seen = std::collections::HashMap::new();
        for cx in -50..=50 {
            for cz in -50..=50 {
                let seed = chunk_hash(0x1803_4A7E, cx, cz);
                if let Some(other) = seen.insert(seed, (cx, cz)) {
                    panic!("seed collision {:?} vs {:?}", other, (cx, cz));
                }
            }
        }
        assert_eq!(seen.len(), 101 * 101);
    }

    #[test]
    fn test_mirrored_chunks_differ() {
        let pairs = [
            ((1, 1), (-1, -1)),
            ((-1, 1), (1, -1)),
            ((2, 2), (-2, -2)),
            ((0, 1), (1, 0)),
        ];
        for (a, b) in pairs {
            assert_ne!(chunk_hash(7, a.0, a.1), chunk_hash(7, b.0, b.1));
        }
    }

    #[test]
    fn test_world_seed_changes_chunks() {
        assert_ne!(chunk_hash(1, 0, 0), chunk_hash(2, 0, 0));
    }

    #[test]
    fn test_mode_toml_shape() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            generation: GenerationMode,
        }
        let parsed: Wrapper = toml::from_str("[generation]\nmode = \"random\"\n").unwrap();
        assert_eq!(parsed.generation, GenerationMode::Random);
    }
}
