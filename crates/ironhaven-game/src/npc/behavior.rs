//! Per-NPC decision making
//!
//! Every tick each live NPC runs through perception (distance, a noisy
//! line-of-sight roll, awareness), then its category policy picks a mood,
//! action and target, and finally it moves toward that target. All chance
//! checks draw from the RNG passed in, so a seeded RNG replays exactly.

use glam::Vec3;
use ironhaven_core::{EntityId, Millis};
use ironhaven_world::NpcCategory;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GangRank, Mood, Npc, NpcAction, NpcProfile};
use crate::events::NpcEvent;
use crate::player::stats::PlayerStats;

/// Line of sight is only possible inside this distance
pub const SIGHT_RANGE: f32 = 30.0;
/// Chance a sight roll fails even in range
pub const SIGHT_MISS_CHANCE: f32 = 0.2;
/// Awareness gained per tick of sight
pub const AWARENESS_GAIN: f32 = 0.15;
/// Awareness starts decaying this long after the player was last seen
pub const AWARENESS_MEMORY_MS: Millis = 5_000;
/// Awareness lost per second once memory expires
pub const AWARENESS_DECAY_PER_SEC: f32 = 0.1;
/// NPCs stop this close to their target
pub const ARRIVAL_RADIUS: f32 = 1.0;
/// Melee/firing range for NPC attacks
pub const ATTACK_RANGE: f32 = 5.0;
/// Per-tick chance an attacking NPC in range lands a hit
pub const HIT_CHANCE: f64 = 0.07;

const CIVILIAN_CHAT_RANGE: f32 = 8.0;
const CIVILIAN_CHAT_CHANCE: f64 = 0.1;
const CIVILIAN_REPORT_CHANCE: f64 = 0.3;
const DEALER_PITCH_RANGE: f32 = 12.0;
const DEALER_PITCH_CHANCE: f64 = 0.2;
const PATROL_RADIUS: f32 = 15.0;
const PATROL_START_CHANCE: f64 = 0.02;
/// Hostile gang members give up once the player is this far away
const GANG_DEAGGRO_RANGE: f32 = 30.0;

const RESPECT_LINES: [&str; 3] = [
    "Respect. We don't want trouble with you.",
    "Word is you run these streets now.",
    "Anything you need, just ask.",
];

/// Everything an NPC can perceive this tick
#[derive(Debug, Clone)]
pub struct PerceptionContext {
    pub player_pos: Vec3,
    pub stats: PlayerStats,
    pub now: Millis,
    /// Seconds since the previous tick
    pub delta: f32,
}

/// Result of the player hitting an NPC
#[derive(Debug, Clone, PartialEq)]
pub enum HitOutcome {
    /// Target was already dead (or unknown); nothing happened
    Ignored,
    Wounded { damage: f32, remaining: f32 },
    Killed(KillReport),
}

/// A kill credited to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillReport {
    pub npc: EntityId,
    pub category: NpcCategory,
    pub position: Vec3,
    pub reputation_gain: u32,
}

impl KillReport {
    /// `killed_{category}`
    pub fn action_tag(&self) -> String {
        format!("killed_{}", self.category)
    }
}

/// Damage an NPC of this category deals per landed hit
pub fn attack_damage(category: NpcCategory) -> f32 {
    match category {
        NpcCategory::Boss => 35.0,
        NpcCategory::Hitman => 25.0,
        NpcCategory::Police => 20.0,
        _ => 15.0,
    }
}

/// Reputation the player earns for killing this category
pub fn kill_reputation(category: NpcCategory) -> u32 {
    match category {
        NpcCategory::Boss => 30,
        NpcCategory::Hitman => 20,
        NpcCategory::Police => 15,
        NpcCategory::Gangster => 8,
        _ => 5,
    }
}

/// Movement speed in units per second
pub fn move_speed(category: NpcCategory, action: NpcAction) -> f32 {
    let base = match action {
        NpcAction::Flee => 9.0,
        NpcAction::Attack => 6.0,
        NpcAction::Investigate => 4.5,
        NpcAction::Patrol => 3.0,
        NpcAction::Idle | NpcAction::SeekCover => 0.0,
    };
    let multiplier = match category {
        NpcCategory::Police => 1.1,
        NpcCategory::Hitman => 1.2,
        NpcCategory::Boss => 0.9,
        _ => 1.0,
    };
    base * multiplier
}

fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

/// Run one tick of perception, policy, and movement for `npc`.
///
/// Dead NPCs are skipped. Health at or below zero kills the NPC before any
/// other evaluation, whoever set it.
pub fn decide<R: Rng + ?Sized>(
    npc: &mut Npc,
    ctx: &PerceptionContext,
    rng: &mut R,
) -> Vec<NpcEvent> {
    let mut events = Vec::new();

    if npc.state.health <= 0.0 {
        mark_dead(npc);
    }
    if npc.state.is_dead() {
        return events;
    }

    // Perception
    let distance = planar_distance(npc.position, ctx.player_pos);
    let sees_player = distance < SIGHT_RANGE && rng.gen::<f32>() > SIGHT_MISS_CHANCE;
    if sees_player {
        npc.state.awareness = (npc.state.awareness + AWARENESS_GAIN).min(1.0);
        npc.state.last_player_seen = Some(ctx.now);
    }
    let memory_expired = npc
        .state
        .last_player_seen
        .map_or(true, |seen| ctx.now.saturating_sub(seen) > AWARENESS_MEMORY_MS);
    if memory_expired {
        let decayed = npc.state.awareness - AWARENESS_DECAY_PER_SEC * ctx.delta;
        npc.state.awareness = decayed.max(0.0);
    }

    match npc.category() {
        NpcCategory::Civilian => civilian_policy(npc, ctx, distance, rng, &mut events),
        NpcCategory::Police => police_policy(npc, ctx, rng),
        NpcCategory::Gangster | NpcCategory::Hitman | NpcCategory::Boss => {
            gang_policy(npc, ctx, distance, rng, &mut events)
        }
        NpcCategory::Dealer => {
            if distance < DEALER_PITCH_RANGE && rng.gen_bool(DEALER_PITCH_CHANCE) {
                events.push(NpcEvent::Dialogue {
                    npc: npc.id,
                    line: npc.dialogue.clone(),
                });
            }
        }
    }

    let arrived = step_toward_target(npc, ctx.delta);
    if arrived && npc.state.action == NpcAction::Patrol {
        npc.state.action = NpcAction::Idle;
        npc.state.target = None;
    }

    if npc.state.action == NpcAction::Attack
        && planar_distance(npc.position, ctx.player_pos) < ATTACK_RANGE
        && rng.gen_bool(HIT_CHANCE)
    {
        let category = npc.category();
        events.push(NpcEvent::AttackedPlayer {
            npc: npc.id,
            category,
            damage: attack_damage(category),
        });
    }

    events
}

fn civilian_policy<R: Rng + ?Sized>(
    npc: &mut Npc,
    ctx: &PerceptionContext,
    distance: f32,
    rng: &mut R,
    events: &mut Vec<NpcEvent>,
) {
    let stats = &ctx.stats;
    let threatened =
        npc.state.awareness > 0.5 || stats.wanted_level > 1 || stats.police_kill_count > 5;

    if threatened {
        let needs_target = npc.state.action != NpcAction::Flee
            || npc
                .state
                .target
                .map_or(true, |t| planar_distance(npc.position, t) <= ARRIVAL_RADIUS);
        npc.state.mood = Mood::Fleeing;
        npc.state.action = NpcAction::Flee;
        if needs_target {
            npc.state.target = Some(flee_point(npc.position, ctx.player_pos, rng));
        }
    } else if npc.state.mood == Mood::Fleeing {
        npc.state.mood = Mood::Calm;
        npc.state.action = NpcAction::Idle;
        npc.state.target = None;
    }

    // Reporting is independent of whether this civilian is fleeing
    if stats.wanted_level > 2 && rng.gen_bool(CIVILIAN_REPORT_CHANCE) {
        if let NpcProfile::Civilian { last_report } = &mut npc.profile {
            *last_report = Some(ctx.now);
        }
        events.push(NpcEvent::CalledPolice {
            npc: npc.id,
            position: npc.position,
        });
    }

    if !threatened && distance < CIVILIAN_CHAT_RANGE && rng.gen_bool(CIVILIAN_CHAT_CHANCE) {
        events.push(NpcEvent::Dialogue {
            npc: npc.id,
            line: npc.dialogue.clone(),
        });
    }
}

fn police_policy<R: Rng + ?Sized>(npc: &mut Npc, ctx: &PerceptionContext, rng: &mut R) {
    let stats = &ctx.stats;
    if stats.wanted_level > 0 || stats.police_kill_count > 0 {
        npc.state.mood = Mood::Hostile;
        npc.state.action = NpcAction::Attack;
        npc.state.target = Some(ctx.player_pos);
    } else if npc.state.awareness > 0.5 {
        npc.state.mood = Mood::Alert;
        npc.state.action = NpcAction::Investigate;
        npc.state.target = Some(ctx.player_pos);
    } else {
        npc.state.mood = Mood::Calm;
        match npc.state.action {
            NpcAction::Patrol => {}
            NpcAction::Idle => {
                if rng.gen_bool(PATROL_START_CHANCE) {
                    let anchor = match npc.profile {
                        NpcProfile::Police { patrol_anchor } => patrol_anchor,
                        _ => npc.position,
                    };
                    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                    let radius = rng.gen_range(0.0..PATROL_RADIUS);
                    npc.state.action = NpcAction::Patrol;
                    npc.state.target =
                        Some(anchor + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius));
                }
            }
            // Lost interest: stand down where we are
            _ => {
                npc.state.action = NpcAction::Idle;
                npc.state.target = None;
            }
        }
    }
}

fn gang_policy<R: Rng + ?Sized>(
    npc: &mut Npc,
    ctx: &PerceptionContext,
    distance: f32,
    rng: &mut R,
    events: &mut Vec<NpcEvent>,
) {
    let NpcProfile::Gang { rank, greeted } = &mut npc.profile else {
        return;
    };
    let reputation = ctx.stats.reputation;

    if distance >= 10.0 {
        *greeted = false;
    }

    let hostile = if *rank == GangRank::Boss && reputation > 80 {
        // A rival this big gets hunted wherever they are
        true
    } else if reputation > 50 && distance < 10.0 {
        if !*greeted {
            *greeted = true;
            let line = RESPECT_LINES[rng.gen_range(0..RESPECT_LINES.len())];
            events.push(NpcEvent::Dialogue {
                npc: npc.id,
                line: line.to_string(),
            });
        }
        // Mood and action stay as they were
        return;
    } else {
        let unknown = reputation < 20 && distance < 20.0;
        let rival = (20..=80).contains(&reputation) && distance < 15.0;
        unknown || rival
    };

    if hostile {
        npc.state.mood = Mood::Hostile;
        npc.state.action = NpcAction::Attack;
        npc.state.target = Some(ctx.player_pos);
    } else if npc.state.mood == Mood::Hostile {
        if distance > GANG_DEAGGRO_RANGE {
            npc.state.mood = Mood::Calm;
            npc.state.action = NpcAction::Idle;
            npc.state.target = None;
        } else {
            // Keep chasing the player's latest position
            npc.state.target = Some(ctx.player_pos);
        }
    }
}

/// A point 20-35 units from `from`, roughly away from `threat`
fn flee_point<R: Rng + ?Sized>(from: Vec3, threat: Vec3, rng: &mut R) -> Vec3 {
    let away = Vec3::new(from.x - threat.x, 0.0, from.z - threat.z);
    let base_angle = if away.length_squared() > f32::EPSILON {
        away.z.atan2(away.x)
    } else {
        rng.gen_range(0.0..std::f32::consts::TAU)
    };
    let angle = base_angle + rng.gen_range(-0.5..0.5);
    let distance = rng.gen_range(20.0..=35.0);
    Vec3::new(
        from.x + angle.cos() * distance,
        from.y,
        from.z + angle.sin() * distance,
    )
}

/// Move toward the current target. Returns true if within the arrival radius.
fn step_toward_target(npc: &mut Npc, delta: f32) -> bool {
    let Some(target) = npc.state.target else {
        return false;
    };
    if !matches!(
        npc.state.action,
        NpcAction::Attack | NpcAction::Investigate | NpcAction::Flee | NpcAction::Patrol
    ) {
        return false;
    }

    let to_target = Vec3::new(target.x - npc.position.x, 0.0, target.z - npc.position.z);
    let distance = to_target.length();
    if distance <= ARRIVAL_RADIUS {
        return true;
    }

    let speed = move_speed(npc.category(), npc.state.action);
    let step = (speed * delta).min(distance - ARRIVAL_RADIUS);
    npc.position += to_target / distance * step;
    distance - step <= ARRIVAL_RADIUS
}

fn mark_dead(npc: &mut Npc) {
    npc.state.health = npc.state.health.min(0.0);
    npc.state.mood = Mood::Dead;
    npc.state.action = NpcAction::Idle;
    npc.state.target = None;
}

/// Apply a player hit of `damage` to `npc`.
///
/// A killing blow marks the NPC dead for good and returns the kill report
/// exactly once; later hits on the corpse are ignored.
pub fn take_player_hit(npc: &mut Npc, damage: f32, now: Millis) -> HitOutcome {
    if npc.state.is_dead() {
        return HitOutcome::Ignored;
    }

    npc.state.health -= damage;
    if npc.state.health <= 0.0 {
        mark_dead(npc);
        let category = npc.category();
        return HitOutcome::Killed(KillReport {
            npc: npc.id,
            category,
            position: npc.position,
            reputation_gain: kill_reputation(category),
        });
    }

    // Getting shot gets your attention
    npc.state.awareness = 1.0;
    npc.state.last_player_seen = Some(now);
    HitOutcome::Wounded {
        damage,
        remaining: npc.state.health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironhaven_world::{ChunkCoord, NpcSeed};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn npc(category: NpcCategory, position: Vec3) -> Npc {
        let seed = NpcSeed {
            id: EntityId::new(),
            position,
            category,
            weapon: None,
            dialogue: "Hey.".into(),
        };
        Npc::from_seed(&seed, ChunkCoord::new(0, 0))
    }

    fn ctx(player_pos: Vec3, stats: PlayerStats, now: Millis) -> PerceptionContext {
        PerceptionContext {
            player_pos,
            stats,
            now,
            delta: 1.0 / 60.0,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn test_zero_health_is_dead_and_stays_dead() {
        let mut rng = rng();
        let mut civilian = npc(NpcCategory::Civilian, Vec3::ZERO);
        civilian.state.health = 0.0;

        let hot = PlayerStats {
            wanted_level: 5,
            ..Default::default()
        };
        let player = Vec3::new(1.0, 0.0, 0.0);
        decide(&mut civilian, &ctx(player, hot.clone(), 0), &mut rng);
        assert_eq!(civilian.state.mood, Mood::Dead);

        let before = civilian.position;
        for tick in 1..500 {
            let events = decide(&mut civilian, &ctx(player, hot.clone(), tick * 16), &mut rng);
            assert!(events.is_empty());
            assert_eq!(civilian.state.mood, Mood::Dead);
        }
        assert_eq!(civilian.position, before);
    }

    #[test]
    fn test_awareness_builds_with_sight_and_caps() {
        let mut rng = rng();
        let mut dealer = npc(NpcCategory::Dealer, Vec3::ZERO);
        let player = Vec3::new(5.0, 0.0, 0.0);
        for tick in 0..100 {
            decide(&mut dealer, &ctx(player, PlayerStats::default(), tick * 16), &mut rng);
        }
        assert_eq!(dealer.state.awareness, 1.0);
        assert!(dealer.state.last_player_seen.is_some());
    }

    #[test]
    fn test_awareness_decays_after_memory_expires() {
        let mut rng = rng();
        let mut dealer = npc(NpcCategory::Dealer, Vec3::ZERO);
        dealer.state.awareness = 1.0;
        dealer.state.last_player_seen = Some(0);
        let far = Vec3::new(500.0, 0.0, 0.0);

        // Still remembered
        decide(&mut dealer, &ctx(far, PlayerStats::default(), 4_000), &mut rng);
        assert_eq!(dealer.state.awareness, 1.0);

        let mut context = ctx(far, PlayerStats::default(), 6_000);
        context.delta = 2.0;
        decide(&mut dealer, &context, &mut rng);
        assert!((dealer.state.awareness - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_never_sees() {
        let mut rng = rng();
        let mut civilian = npc(NpcCategory::Civilian, Vec3::ZERO);
        let player = Vec3::new(30.0, 0.0, 0.0);
        for tick in 0..200 {
            decide(&mut civilian, &ctx(player, PlayerStats::default(), tick * 16), &mut rng);
        }
        assert_eq!(civilian.state.awareness, 0.0);
        assert!(civilian.state.last_player_seen.is_none());
    }

    #[test]
    fn test_civilian_flees_wanted_player() {
        let mut rng = rng();
        let mut civilian = npc(NpcCategory::Civilian, Vec3::ZERO);
        let player = Vec3::new(10.0, 0.0, 0.0);
        let stats = PlayerStats {
            wanted_level: 2,
            ..Default::default()
        };
        decide(&mut civilian, &ctx(player, stats, 0), &mut rng);

        assert_eq!(civilian.state.mood, Mood::Fleeing);
        assert_eq!(civilian.state.action, NpcAction::Flee);
        let target = civilian.state.target.unwrap();
        let dist = planar_distance(Vec3::ZERO, target);
        assert!((20.0..=35.0).contains(&dist), "flee distance {dist}");
        // Target lies on the far side of the civilian from the player
        assert!(target.x < 0.0);
        assert!(civilian.position.x < 0.0);
    }

    #[test]
    fn test_civilian_flees_cop_killer() {
        let mut rng = rng();
        let mut civilian = npc(NpcCategory::Civilian, Vec3::ZERO);
        let stats = PlayerStats {
            police_kill_count: 6,
            ..Default::default()
        };
        decide(&mut civilian, &ctx(Vec3::new(200.0, 0.0, 0.0), stats, 0), &mut rng);
        assert_eq!(civilian.state.action, NpcAction::Flee);
    }

    #[test]
    fn test_civilian_flees_on_awareness_alone() {
        let mut rng = rng();
        let mut civilian = npc(NpcCategory::Civilian, Vec3::ZERO);
        civilian.state.awareness = 0.9;
        civilian.state.last_player_seen = Some(1_000);

        // Clean record, player out of sight: only awareness can trigger this
        let player = Vec3::new(50.0, 0.0, 0.0);
        decide(&mut civilian, &ctx(player, PlayerStats::default(), 1_000), &mut rng);
        assert_eq!(civilian.state.mood, Mood::Fleeing);
        assert_eq!(civilian.state.action, NpcAction::Flee);
        assert!(civilian.state.target.is_some());
    }

    #[test]
    fn test_civilian_calls_police_at_high_wanted() {
        let mut rng = rng();
        let mut reports = 0;
        for _ in 0..50 {
            let mut civilian = npc(NpcCategory::Civilian, Vec3::ZERO);
            let stats = PlayerStats {
                wanted_level: 3,
                ..Default::default()
            };
            let player = Vec3::new(100.0, 0.0, 0.0);
            let events = decide(&mut civilian, &ctx(player, stats, 0), &mut rng);
            reports += events
                .iter()
                .filter(|e| matches!(e, NpcEvent::CalledPolice { .. }))
                .count();
        }
        assert!(reports > 0 && reports < 50, "reports {reports}");
    }

    #[test]
    fn test_civilian_reports_every_tick_at_fixed_odds() {
        let mut rng = rng();
        let mut civilian = npc(NpcCategory::Civilian, Vec3::ZERO);
        let stats = PlayerStats {
            wanted_level: 4,
            ..Default::default()
        };
        let player = Vec3::new(100.0, 0.0, 0.0);
        let mut reports = 0;
        for tick in 0..1_000 {
            let events = decide(&mut civilian, &ctx(player, stats.clone(), tick * 16), &mut rng);
            reports += events
                .iter()
                .filter(|e| matches!(e, NpcEvent::CalledPolice { .. }))
                .count();
        }
        // 30% per tick, no cooldown between reports
        assert!((220..=380).contains(&reports), "reports {reports}");
        let NpcProfile::Civilian { last_report } = civilian.profile else {
            panic!("civilian lost its profile");
        };
        assert!(last_report.is_some());
    }

    #[test]
    fn test_calm_civilian_chats_nearby() {
        let mut rng = rng();
        let mut near = npc(NpcCategory::Civilian, Vec3::ZERO);
        let mut far = npc(NpcCategory::Civilian, Vec3::ZERO);
        let mut near_chats = 0;
        let mut far_chats = 0;
        for tick in 0..1_000 {
            // Keep awareness below the flee threshold
            near.state.awareness = 0.0;
            far.state.awareness = 0.0;
            let stats = PlayerStats::default();

            let close = ctx(Vec3::new(3.0, 0.0, 0.0), stats.clone(), tick);
            let events = decide(&mut near, &close, &mut rng);
            near_chats += events
                .iter()
                .filter(|e| matches!(e, NpcEvent::Dialogue { .. }))
                .count();
            assert_eq!(near.state.mood, Mood::Calm);

            let distant = ctx(Vec3::new(10.0, 0.0, 0.0), stats, tick);
            let events = decide(&mut far, &distant, &mut rng);
            far_chats += events
                .iter()
                .filter(|e| matches!(e, NpcEvent::Dialogue { .. }))
                .count();
        }
        // 10% per tick inside 8 units, never outside
        assert!((50..=150).contains(&near_chats), "chats {near_chats}");
        assert_eq!(far_chats, 0);
    }

    #[test]
    fn test_police_attack_wanted_player() {
        let mut rng = rng();
        let mut cop = npc(NpcCategory::Police, Vec3::ZERO);
        let player = Vec3::new(50.0, 0.0, 0.0);
        let stats = PlayerStats {
            wanted_level: 1,
            ..Default::default()
        };
        decide(&mut cop, &ctx(player, stats, 0), &mut rng);
        assert_eq!(cop.state.mood, Mood::Hostile);
        assert_eq!(cop.state.action, NpcAction::Attack);
        assert_eq!(cop.state.target, Some(player));
        // 6 * 1.1 units/s for one frame
        assert!((cop.position.x - 6.6 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_police_investigate_when_aware() {
        let mut rng = rng();
        let mut cop = npc(NpcCategory::Police, Vec3::ZERO);
        cop.state.awareness = 0.9;
        cop.state.last_player_seen = Some(0);
        let player = Vec3::new(40.0, 0.0, 0.0);
        decide(&mut cop, &ctx(player, PlayerStats::default(), 10), &mut rng);
        assert_eq!(cop.state.mood, Mood::Alert);
        assert_eq!(cop.state.action, NpcAction::Investigate);
    }

    #[test]
    fn test_police_calm_without_trigger() {
        let mut rng = rng();
        let mut cop = npc(NpcCategory::Police, Vec3::ZERO);
        let player = Vec3::new(300.0, 0.0, 0.0);
        for tick in 0..400 {
            decide(&mut cop, &ctx(player, PlayerStats::default(), tick * 16), &mut rng);
            assert_eq!(cop.state.mood, Mood::Calm);
            assert!(matches!(cop.state.action, NpcAction::Idle | NpcAction::Patrol));
            assert!(planar_distance(cop.position, Vec3::ZERO) <= PATROL_RADIUS + 0.01);
        }
    }

    #[test]
    fn test_gang_hostile_to_nobody_close() {
        let mut rng = rng();
        let mut gangster = npc(NpcCategory::Gangster, Vec3::ZERO);
        decide(&mut gangster, &ctx(Vec3::new(15.0, 0.0, 0.0), PlayerStats::default(), 0), &mut rng);
        assert_eq!(gangster.state.mood, Mood::Hostile);
        assert_eq!(gangster.state.action, NpcAction::Attack);
    }

    #[test]
    fn test_gang_mid_reputation_band() {
        let mut rng = rng();
        let stats = PlayerStats {
            reputation: 40,
            ..Default::default()
        };
        let mut far = npc(NpcCategory::Hitman, Vec3::ZERO);
        decide(&mut far, &ctx(Vec3::new(18.0, 0.0, 0.0), stats.clone(), 0), &mut rng);
        assert_eq!(far.state.mood, Mood::Calm);

        let mut near = npc(NpcCategory::Hitman, Vec3::ZERO);
        decide(&mut near, &ctx(Vec3::new(12.0, 0.0, 0.0), stats, 0), &mut rng);
        assert_eq!(near.state.mood, Mood::Hostile);
    }

    #[test]
    fn test_boss_hunts_famous_player_anywhere() {
        let mut rng = rng();
        let stats = PlayerStats {
            reputation: 90,
            ..Default::default()
        };
        let mut boss = npc(NpcCategory::Boss, Vec3::ZERO);
        decide(&mut boss, &ctx(Vec3::new(400.0, 0.0, 0.0), stats.clone(), 0), &mut rng);
        assert_eq!(boss.state.mood, Mood::Hostile);

        let mut gangster = npc(NpcCategory::Gangster, Vec3::ZERO);
        decide(&mut gangster, &ctx(Vec3::new(400.0, 0.0, 0.0), stats, 0), &mut rng);
        assert_eq!(gangster.state.mood, Mood::Calm);
    }

    #[test]
    fn test_gang_pays_respect_once_per_approach() {
        let mut rng = rng();
        let stats = PlayerStats {
            reputation: 60,
            ..Default::default()
        };
        let mut gangster = npc(NpcCategory::Gangster, Vec3::ZERO);
        let mut greetings = 0;
        let player = Vec3::new(5.0, 0.0, 0.0);
        for tick in 0..30 {
            let events = decide(&mut gangster, &ctx(player, stats.clone(), tick), &mut rng);
            greetings += events.len();
            assert_eq!(gangster.state.mood, Mood::Calm);
        }
        assert_eq!(greetings, 1);

        // Walk away and come back
        decide(&mut gangster, &ctx(Vec3::new(25.0, 0.0, 0.0), stats.clone(), 40), &mut rng);
        let events = decide(&mut gangster, &ctx(Vec3::new(5.0, 0.0, 0.0), stats, 50), &mut rng);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_dealer_never_hostile() {
        let mut rng = rng();
        let mut dealer = npc(NpcCategory::Dealer, Vec3::ZERO);
        let stats = PlayerStats {
            wanted_level: 5,
            police_kill_count: 10,
            ..Default::default()
        };
        let player = Vec3::new(2.0, 0.0, 0.0);
        for tick in 0..100 {
            let events = decide(&mut dealer, &ctx(player, stats.clone(), tick), &mut rng);
            assert!(events.iter().all(|e| matches!(e, NpcEvent::Dialogue { .. })));
        }
        assert_eq!(dealer.state.mood, Mood::Calm);
        assert_eq!(dealer.position, Vec3::ZERO);
    }

    #[test]
    fn test_movement_stops_within_arrival_radius() {
        let mut rng = rng();
        let mut cop = npc(NpcCategory::Police, Vec3::ZERO);
        let player = Vec3::new(3.0, 0.0, 0.0);
        let stats = PlayerStats {
            wanted_level: 3,
            ..Default::default()
        };
        let mut context = ctx(player, stats, 0);
        context.delta = 10.0;
        decide(&mut cop, &context, &mut rng);
        assert!((planar_distance(cop.position, player) - ARRIVAL_RADIUS).abs() < 1e-4);
    }

    #[test]
    fn test_attack_hits_use_category_damage() {
        let mut rng = rng();
        let mut hits = Vec::new();
        let player = Vec3::new(2.0, 0.0, 0.0);
        for tick in 0..2_000 {
            let mut boss = npc(NpcCategory::Boss, Vec3::ZERO);
            let events = decide(&mut boss, &ctx(player, PlayerStats::default(), tick), &mut rng);
            for event in events {
                if let NpcEvent::AttackedPlayer { damage, category, .. } = event {
                    assert_eq!(category, NpcCategory::Boss);
                    hits.push(damage);
                }
            }
        }
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|&d| d == 35.0));
        // About 7% of attempts land
        assert!(hits.len() > 60 && hits.len() < 240, "hits {}", hits.len());
    }

    #[test]
    fn test_boss_dies_on_third_hit() {
        let mut boss = npc(NpcCategory::Boss, Vec3::ZERO);
        assert!(matches!(
            take_player_hit(&mut boss, 80.0, 0),
            HitOutcome::Wounded { remaining, .. } if remaining == 120.0
        ));
        assert!(matches!(
            take_player_hit(&mut boss, 80.0, 1),
            HitOutcome::Wounded { remaining, .. } if remaining == 40.0
        ));
        let HitOutcome::Killed(report) = take_player_hit(&mut boss, 80.0, 2) else {
            panic!("third hit should kill");
        };
        assert_eq!(report.reputation_gain, 30);
        assert_eq!(report.action_tag(), "killed_boss");
        assert_eq!(boss.state.mood, Mood::Dead);
        assert_eq!(take_player_hit(&mut boss, 80.0, 3), HitOutcome::Ignored);
    }

    #[test]
    fn test_reward_and_damage_tables() {
        assert_eq!(kill_reputation(NpcCategory::Hitman), 20);
        assert_eq!(kill_reputation(NpcCategory::Police), 15);
        assert_eq!(kill_reputation(NpcCategory::Gangster), 8);
        assert_eq!(kill_reputation(NpcCategory::Civilian), 5);
        assert_eq!(attack_damage(NpcCategory::Hitman), 25.0);
        assert_eq!(attack_damage(NpcCategory::Police), 20.0);
        assert_eq!(attack_damage(NpcCategory::Gangster), 15.0);
        let flee = move_speed(NpcCategory::Civilian, NpcAction::Flee);
        assert!(flee > move_speed(NpcCategory::Civilian, NpcAction::Patrol));
    }
}
