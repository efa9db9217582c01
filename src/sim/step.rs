/// The step function: advances the world by one frame.
///
/// Processing order:
///   0. Suspension: while a death/victory pose is showing, only its
///      countdown runs
///   1. Level exit: player standing in an exit door → victory pose on the
///      completed map, nothing else this frame; the next level (wrapping)
///      loads when the pose ends
///   2. Player state machine
///   3. NPCs in roster order: overlap damage, fall-out removal, update
///
/// The player resolves completely before any NPC moves or is tested for
/// overlap. Every frame produces a valid next state; nothing here fails.

use crate::domain::input::FrameInput;
use crate::domain::kinematics::MapView;
use crate::domain::player::{DamageCause, DamageOutcome, Suspend};
use super::event::GameEvent;
use super::level::load_level;
use super::world::World;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut World, input: FrameInput) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if resolve_suspend(world, &mut events) { return events; }
    if resolve_level_exit(world, &mut events) { return events; }
    resolve_player(world, input, &mut events);
    resolve_npcs(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Pauses
// ══════════════════════════════════════════════════════════════

fn resolve_suspend(world: &mut World, events: &mut Vec<GameEvent>) -> bool {
    let Some(s) = world.suspend.as_mut() else { return false };
    s.frames = s.frames.saturating_sub(1);
    if s.frames == 0 {
        world.suspend = None;
        if let Some(next) = world.pending_level.take() {
            load_level(world, next);
        }
        events.push(GameEvent::Resumed);
    }
    true
}

fn suspend(world: &mut World, s: Suspend) {
    if s.frames > 0 {
        world.suspend = Some(s);
    }
}

// ══════════════════════════════════════════════════════════════
// Level exit
// ══════════════════════════════════════════════════════════════

fn resolve_level_exit(world: &mut World, events: &mut Vec<GameEvent>) -> bool {
    let map = MapView::new(&world.grid, &world.config.physics);
    let behind = world.player.body.tile_behind(&map);
    if !world.grid.classes().is_exit_door(behind) { return false; }

    let pose = world.player.victory_pose(&world.config.player);
    let from = world.level_number();
    let next = (world.current_level + 1) % world.levels.len();
    let to = next + 1;

    log::info!("level {from} complete, entering level {to}");
    events.push(GameEvent::LevelComplete { from, to });
    if pose.frames > 0 {
        world.pending_level = Some(next);
        suspend(world, pose);
    } else {
        load_level(world, next);
    }
    true
}

// ══════════════════════════════════════════════════════════════
// Characters
// ══════════════════════════════════════════════════════════════

fn resolve_player(world: &mut World, input: FrameInput, events: &mut Vec<GameEvent>) {
    let map = MapView::new(&world.grid, &world.config.physics);
    if let Some((cause, outcome)) = world.player.update(input, &map, &world.config.player) {
        apply_damage(world, cause, outcome, events);
    }
}

fn resolve_npcs(world: &mut World, events: &mut Vec<GameEvent>) {
    let map = MapView::new(&world.grid, &world.config.physics);
    let size = world.config.physics.character_size;
    let bottom = world.grid.pixel_height();
    let player = &mut world.player;
    let player_cfg = &world.config.player;

    let mut hurts = Vec::new();
    let mut index = 0;
    // retain_mut visits every NPC exactly once, removals included.
    world.npcs.retain_mut(|npc| {
        let i = index;
        index += 1;

        if npc.body.overlaps(&player.body, size) {
            hurts.push((npc.kind, player.take_damage(player_cfg)));
        }
        if npc.body.y + npc.body.limits.height_offset > bottom {
            log::debug!("{:?} #{i} fell out of the map", npc.kind);
            events.push(GameEvent::NpcRemoved { index: i, kind: npc.kind });
            return false;
        }
        npc.update(&map);
        true
    });

    for (kind, outcome) in hurts {
        apply_damage(world, DamageCause::Npc(kind), outcome, events);
    }
}

fn apply_damage(
    world: &mut World,
    cause: DamageCause,
    outcome: DamageOutcome,
    events: &mut Vec<GameEvent>,
) {
    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Shrunk => {
            log::debug!("player hurt ({cause:?}), invincible for {} frames", world.player.invincibility);
            events.push(GameEvent::PlayerDamaged { cause });
        }
        DamageOutcome::Died(s) => {
            log::info!("player died ({cause:?}) at ({}, {})", s.x, s.y);
            events.push(GameEvent::PlayerDied { cause });
            suspend(world, s);
        }
    }
}
