//! NPC profiles and behavior state

pub mod behavior;
pub mod manager;

use glam::Vec3;
use ironhaven_core::{EntityId, Millis};
use ironhaven_world::{ChunkCoord, NpcCategory, NpcSeed};
use serde::{Deserialize, Serialize};

/// Emotional state; `Dead` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Calm,
    Alert,
    Hostile,
    Fleeing,
    Dead,
}

/// What the NPC is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcAction {
    Idle,
    Patrol,
    Investigate,
    Attack,
    Flee,
    SeekCover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GangRank {
    Gangster,
    Hitman,
    Boss,
}

/// Category plus the state only that category's policy needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NpcProfile {
    Civilian {
        /// Last time this civilian reported the player
        last_report: Option<Millis>,
    },
    Police {
        /// Patrol points are picked around this spot
        patrol_anchor: Vec3,
    },
    Gang {
        rank: GangRank,
        /// Already paid respects during the current approach
        greeted: bool,
    },
    Dealer,
}

impl NpcProfile {
    pub fn for_category(category: NpcCategory, home: Vec3) -> Self {
        match category {
            NpcCategory::Civilian => NpcProfile::Civilian { last_report: None },
            NpcCategory::Police => NpcProfile::Police {
                patrol_anchor: home,
            },
            NpcCategory::Gangster => NpcProfile::gang(GangRank::Gangster),
            NpcCategory::Hitman => NpcProfile::gang(GangRank::Hitman),
            NpcCategory::Boss => NpcProfile::gang(GangRank::Boss),
            NpcCategory::Dealer => NpcProfile::Dealer,
        }
    }

    fn gang(rank: GangRank) -> Self {
        NpcProfile::Gang {
            rank,
            greeted: false,
        }
    }

    pub fn category(&self) -> NpcCategory {
        match self {
            NpcProfile::Civilian { .. } => NpcCategory::Civilian,
            NpcProfile::Police { .. } => NpcCategory::Police,
            NpcProfile::Gang { rank, .. } => match rank {
                GangRank::Gangster => NpcCategory::Gangster,
                GangRank::Hitman => NpcCategory::Hitman,
                GangRank::Boss => NpcCategory::Boss,
            },
            NpcProfile::Dealer => NpcCategory::Dealer,
        }
    }
}

/// Mutable per-NPC behavior state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorState {
    pub health: f32,
    pub max_health: f32,
    pub mood: Mood,
    /// 0-1
    pub awareness: f32,
    pub action: NpcAction,
    pub target: Option<Vec3>,
    pub weapon: Option<String>,
    pub last_player_seen: Option<Millis>,
}

impl BehaviorState {
    pub fn new(category: NpcCategory, weapon: Option<String>) -> Self {
        let max_health = category.max_health();
        Self {
            health: max_health,
            max_health,
            mood: Mood::Calm,
            awareness: 0.0,
            action: NpcAction::Idle,
            target: None,
            weapon,
            last_player_seen: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.mood == Mood::Dead
    }
}

/// A live NPC in the city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: EntityId,
    /// Owning chunk; `None` for police reinforcements that follow the player
    pub chunk: Option<ChunkCoord>,
    pub position: Vec3,
    pub profile: NpcProfile,
    pub state: BehaviorState,
    pub dialogue: String,
}

impl Npc {
    /// Spawn a resident from its chunk seed
    pub fn from_seed(seed: &NpcSeed, chunk: ChunkCoord) -> Self {
        Self {
            id: seed.id,
            chunk: Some(chunk),
            position: seed.position,
            profile: NpcProfile::for_category(seed.category, seed.position),
            state: BehaviorState::new(seed.category, seed.weapon.clone()),
            dialogue: seed.dialogue.clone(),
        }
    }

    /// A police unit dispatched because of the wanted level
    pub fn reinforcement(id: EntityId, position: Vec3) -> Self {
        Self {
            id,
            chunk: None,
            position,
            profile: NpcProfile::for_category(NpcCategory::Police, position),
            state: BehaviorState::new(NpcCategory::Police, Some("pistol".to_string())),
            dialogue: "Freeze!".to_string(),
        }
    }

    pub fn category(&self) -> NpcCategory {
        self.profile.category()
    }

    pub fn is_alive(&self) -> bool {
        !self.state.is_dead()
    }

    /// Whether the interaction layer should offer this NPC as a target
    pub fn is_attackable(&self) -> bool {
        self.is_alive()
    }
}
