//! Events the simulation emits to the rendering and store layers

use glam::Vec3;
use ironhaven_core::EntityId;
use ironhaven_world::NpcCategory;
use serde::{Deserialize, Serialize};

use crate::crime::CrimeEvent;
use crate::npc::behavior::KillReport;

/// Something an NPC did this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NpcEvent {
    /// Talk bubble; does not change mood
    Dialogue { npc: EntityId, line: String },
    /// A landed hit on the player
    AttackedPlayer {
        npc: EntityId,
        category: NpcCategory,
        damage: f32,
    },
    /// A civilian witness phoned it in
    CalledPolice { npc: EntityId, position: Vec3 },
    /// The player killed this NPC
    Killed(KillReport),
}

impl NpcEvent {
    pub fn npc(&self) -> EntityId {
        match self {
            NpcEvent::Dialogue { npc, .. }
            | NpcEvent::AttackedPlayer { npc, .. }
            | NpcEvent::CalledPolice { npc, .. } => *npc,
            NpcEvent::Killed(report) => report.npc,
        }
    }

    /// Tag written to the action log, if any
    pub fn action_tag(&self) -> Option<String> {
        match self {
            NpcEvent::Dialogue { .. } => None,
            NpcEvent::AttackedPlayer { category, .. } => {
                Some(format!("{category}_attacked_player"))
            }
            NpcEvent::CalledPolice { .. } => Some("civilian_called_police".to_string()),
            NpcEvent::Killed(report) => Some(report.action_tag()),
        }
    }
}

/// Callbacks into the external game store.
///
/// All methods default to no-ops so listeners implement only what they need.
pub trait GameEventSink {
    fn on_crime_committed(&mut self, _event: &CrimeEvent) {}

    fn on_police_killed(&mut self, _npc: EntityId) {}

    fn on_npc_event(&mut self, _event: &NpcEvent) {}
}

impl GameEventSink for () {}

/// Sink that keeps everything it receives
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub crimes: Vec<CrimeEvent>,
    pub police_killed: Vec<EntityId>,
    pub npc_events: Vec<NpcEvent>,
}

impl GameEventSink for EventRecorder {
    fn on_crime_committed(&mut self, event: &CrimeEvent) {
        self.crimes.push(event.clone());
    }

    fn on_police_killed(&mut self, npc: EntityId) {
        self.police_killed.push(npc);
    }

    fn on_npc_event(&mut self, event: &NpcEvent) {
        self.npc_events.push(event.clone());
    }
}
