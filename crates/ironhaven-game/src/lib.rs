//! Ironhaven Game - Simulation logic
//!
//! Provides NPC behavior, crime heat and wanted escalation, the player-stats
//! port the external store implements, and the per-frame simulation step that
//! ties them to world streaming.

pub mod crime;
pub mod events;
pub mod npc;
pub mod player;
pub mod simulation;

pub use crime::heat::CrimeHeatTracker;
pub use crime::{classify_action, CrimeEvent, CrimeKind};
pub use events::{EventRecorder, GameEventSink, NpcEvent};
pub use npc::behavior::{decide, HitOutcome, KillReport, PerceptionContext};
pub use npc::manager::NpcManager;
pub use npc::{BehaviorState, GangRank, Mood, Npc, NpcAction, NpcProfile};
pub use player::action_log::{ActionLog, LoggedAction};
pub use player::stats::{PlayerState, PlayerStats, PlayerStatsPort};
pub use player::store::SharedPlayerStore;
pub use simulation::{Simulation, TickReport};
