//! Crime classification and the heat tracker

pub mod heat;

use glam::Vec3;
use ironhaven_core::Millis;
use serde::{Deserialize, Serialize};

/// Crime category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrimeKind {
    Murder,
    Theft,
    Assault,
    Vandalism,
    DrugDeal,
}

impl CrimeKind {
    pub fn name(&self) -> &'static str {
        match self {
            CrimeKind::Murder => "murder",
            CrimeKind::Theft => "theft",
            CrimeKind::Assault => "assault",
            CrimeKind::Vandalism => "vandalism",
            CrimeKind::DrugDeal => "drug_deal",
        }
    }
}

impl std::fmt::Display for CrimeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A recorded crime. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeEvent {
    pub id: u64,
    pub kind: CrimeKind,
    /// 0-100
    pub severity: u8,
    /// Civilians close enough to see it
    pub witnesses: u32,
    /// 0-100
    pub police_response: u8,
    pub location: Vec3,
    pub timestamp: Millis,
}

/// Map an action tag to its crime kind and base severity.
///
/// Tags that are not crimes (including NPC-emitted ones like
/// `hitman_attacked_player`) return `None`.
pub fn classify_action(tag: &str) -> Option<(CrimeKind, u8)> {
    match tag {
        "killed_civilian" => Some((CrimeKind::Murder, 95)),
        "killed_gangster" => Some((CrimeKind::Murder, 80)),
        "killed_police" => Some((CrimeKind::Murder, 100)),
        "drug_deal" => Some((CrimeKind::DrugDeal, 50)),
        _ if tag.starts_with("stole_") => Some((CrimeKind::Theft, 40)),
        _ if tag.starts_with("attacked_") => Some((CrimeKind::Assault, 60)),
        _ if tag.starts_with("destroyed_") => Some((CrimeKind::Vandalism, 25)),
        _ => None,
    }
}
