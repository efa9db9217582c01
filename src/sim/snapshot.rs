/// Per-frame view for the presentation layer.
///
/// Read-only and detached from the world: hosts may keep, diff or
/// serialize snapshots without borrowing the simulation.

use serde::Serialize;

use crate::domain::kinematics::Body;
use crate::domain::npc::NpcKind;
use crate::domain::player::Pose;

use super::world::World;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntitySnapshot {
    pub x: i32,
    pub y: i32,
    pub facing_right: bool,
    pub stance: usize,
    pub crouching: bool,
    pub climbing: bool,
    pub invincible: bool,
}

impl EntitySnapshot {
    fn of(body: &Body, invincible: bool) -> Self {
        EntitySnapshot {
            x: body.x,
            y: body.y,
            facing_right: body.facing_right,
            stance: body.stance,
            crouching: body.crouching,
            climbing: body.climbing,
            invincible,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub big: bool,
    /// Which climbing pose to show while `climbing`.
    pub climb_stance: usize,
    #[serde(flatten)]
    pub entity: EntitySnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NpcSnapshot {
    pub kind: NpcKind,
    #[serde(flatten)]
    pub entity: EntitySnapshot,
}

/// Fixed pose to draw instead of the player while the world is suspended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PoseSnapshot {
    pub pose: Pose,
    pub x: i32,
    pub y: i32,
    pub frames_remaining: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    /// 1-based.
    pub level: usize,
    pub player: PlayerSnapshot,
    pub npcs: Vec<NpcSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<PoseSnapshot>,
}

impl FrameSnapshot {
    pub fn capture(world: &World) -> Self {
        let p = &world.player;
        FrameSnapshot {
            tick: world.tick,
            level: world.level_number(),
            player: PlayerSnapshot {
                big: p.is_big(),
                climb_stance: p.climb_stance(&world.map()),
                entity: EntitySnapshot::of(&p.body, p.is_invincible()),
            },
            npcs: world
                .npcs
                .iter()
                .map(|n| NpcSnapshot { kind: n.kind, entity: EntitySnapshot::of(&n.body, false) })
                .collect(),
            pose: world.suspend.map(|s| PoseSnapshot {
                pose: s.pose,
                x: s.x,
                y: s.y,
                frames_remaining: s.frames,
            }),
        }
    }
}
