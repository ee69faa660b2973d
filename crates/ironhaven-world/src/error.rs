use rand::distributions::WeightedError;
use thiserror::Error;

use crate::biome::Biome;

/// Errors that can occur while generating or streaming chunks.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("invalid {table} weight table for biome {biome}")]
    WeightTable {
        biome: Biome,
        table: &'static str,
        #[source]
        source: WeightedError,
    },

    #[error("invalid chunk config: {0}")]
    InvalidConfig(String),
}
