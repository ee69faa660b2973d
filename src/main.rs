//! Ironhaven - headless city simulation driver
//!
//! Streams the city around a scripted walk, feeds the player's actions into
//! the crime tracker, and lets the NPCs react. Prints the final player state
//! as JSON.

mod settings;

use anyhow::{Context, Result};
use glam::Vec3;
use ironhaven_core::time::SECOND;
use ironhaven_core::{EntityId, Millis};
use ironhaven_game::{
    CrimeEvent, GameEventSink, HitOutcome, NpcEvent, PlayerState, PlayerStatsPort,
    SharedPlayerStore, Simulation,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use settings::SimSettings;

/// Player radius for building collision
const PLAYER_RADIUS: f32 = 0.5;
/// How close an NPC must be for the scripted player to attack it
const MELEE_RANGE: f32 = 15.0;

/// Stand-in for the HUD: logs what the renderer would show
#[derive(Debug, Default)]
struct HudLog {
    crimes: usize,
    police_killed: usize,
    dialogue: usize,
    hits_taken: usize,
    reports: usize,
}

impl GameEventSink for HudLog {
    fn on_crime_committed(&mut self, event: &CrimeEvent) {
        self.crimes += 1;
        warn!(
            "CRIME: {} (severity {}, {} witnesses, response {})",
            event.kind, event.severity, event.witnesses, event.police_response
        );
    }

    fn on_police_killed(&mut self, npc: EntityId) {
        self.police_killed += 1;
        warn!("Officer {} down", npc);
    }

    fn on_npc_event(&mut self, event: &NpcEvent) {
        match event {
            NpcEvent::Dialogue { line, .. } => {
                self.dialogue += 1;
                debug!("\"{}\"", line);
            }
            NpcEvent::AttackedPlayer { category, damage, .. } => {
                self.hits_taken += 1;
                info!("Hit by {} for {}", category, damage);
            }
            NpcEvent::CalledPolice { .. } => self.reports += 1,
            NpcEvent::Killed(_) => {}
        }
    }
}

/// One scripted player action
enum Step {
    /// Log an action tag
    Act(&'static str),
    /// Attack the nearest NPC until it dies
    Fight,
}

/// The walk's action script, by game time
const SCRIPT: [(Millis, Step); 5] = [
    (5 * SECOND, Step::Act("stole_car")),
    (20 * SECOND, Step::Fight),
    (35 * SECOND, Step::Act("destroyed_hydrant")),
    (50 * SECOND, Step::Act("drug_deal")),
    (65 * SECOND, Step::Fight),
];

#[derive(Serialize)]
struct Summary {
    game_seconds: f64,
    player: ironhaven_game::PlayerStats,
    heat: f32,
    chunks_loaded: usize,
    npcs_alive: usize,
    crimes_on_record: usize,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Ironhaven simulation...");

    let settings = SimSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save().context("Failed to save settings")?;
    }

    let mut sim = Simulation::new(settings.world.clone()).context("Invalid world settings")?;
    sim.time_mut().set_time_scale(settings.simulation.time_scale);

    let mut store = SharedPlayerStore::new(PlayerState::default());
    let mut hud = HudLog::default();

    let delta = settings.simulation.frame_delta();
    let mut player_pos = Vec3::ZERO;
    let mut heading = Vec3::X;
    let mut script = SCRIPT.iter().peekable();

    for _ in 0..settings.simulation.total_ticks() {
        let report = sim.tick(delta, player_pos, &mut store, &mut hud);
        if report.streamed {
            debug!(
                "Streamed window: {} chunks, {} npcs",
                sim.active_chunks().len(),
                sim.npcs().count()
            );
        }

        if !store.snapshot().is_alive() {
            warn!("Player died at {:.1}s", sim.time().total_time);
            break;
        }

        while let Some((_, step)) = script.next_if(|(at, _)| *at <= report.now) {
            match step {
                Step::Act(tag) => {
                    info!("Player: {}", tag);
                    store.push_action(tag, report.now);
                }
                Step::Fight => fight_nearest(&mut sim, player_pos, &mut store, &mut hud),
            }
        }

        // Walk, turning away from buildings in the way
        let step = heading * settings.simulation.walk_speed * sim.time().delta_time;
        if sim.world().building_collision(player_pos + step, PLAYER_RADIUS).is_some() {
            heading = Vec3::new(-heading.z, 0.0, heading.x);
        } else {
            player_pos += step;
        }
    }

    let summary = Summary {
        game_seconds: sim.time().total_time,
        player: store.snapshot(),
        heat: sim.heat(),
        chunks_loaded: sim.world().loaded_count(),
        npcs_alive: sim.npcs().count_alive(),
        crimes_on_record: sim.crime().events().len(),
    };
    info!(
        "Done: {} crimes, {} officers killed, {} hits taken, {} witness reports, {} dialogue lines",
        hud.crimes, hud.police_killed, hud.hits_taken, hud.reports, hud.dialogue
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn fight_nearest(
    sim: &mut Simulation,
    player_pos: Vec3,
    store: &mut SharedPlayerStore,
    hud: &mut HudLog,
) {
    let Some(target) = sim.npcs().npc_at(player_pos, MELEE_RANGE).map(|npc| npc.id) else {
        info!("Nobody around to fight");
        return;
    };
    loop {
        match sim.player_attack(target, store, hud) {
            HitOutcome::Wounded { remaining, .. } => {
                debug!("Target {} at {:.0} health", target, remaining)
            }
            HitOutcome::Killed(report) => {
                info!("Player: {} (+{} rep)", report.action_tag(), report.reputation_gain);
                break;
            }
            HitOutcome::Ignored => break,
        }
    }
}
