/// Non-player characters.
///
/// Every NPC is a `Body` that walks (or flies) in its facing direction at
/// constant drive. Kinds differ only by their `NpcProfile`:
///
/// | kind           | motion | turns at                           | extra             |
/// |----------------|--------|------------------------------------|-------------------|
/// | Walker         | ground | walls                              |                   |
/// | CautiousWalker | ground | walls, ledges                      |                   |
/// | Jumper         | ground | walls                              | jumps when it can |
/// | ErraticFlyer   | air    | walls, map edges, every N frames   | 3 poses           |
/// | PatrolFlyer    | air    | walls, map edges                   | 6 poses           |
/// | GroundHazard   | ground | walls, ledges                      | 3 poses           |
/// | Turret         | ground | walls                              | never moves       |

use serde::{Deserialize, Serialize};

use crate::config::NpcConfig;

use super::kinematics::{Body, BodyLimits, MapView};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcKind {
    Walker,
    CautiousWalker,
    Jumper,
    ErraticFlyer,
    PatrolFlyer,
    GroundHazard,
    Turret,
}

/// Behavior switches and motion limits for one kind.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct NpcProfile {
    pub limits: BodyLimits,
    pub flying: bool,
    pub avoids_ledges: bool,
    pub jumps: bool,
    /// Spontaneous reversal every this many frames.
    pub turn_period: Option<u32>,
}

impl NpcKind {
    pub const ALL: [NpcKind; 7] = [
        NpcKind::Walker,
        NpcKind::CautiousWalker,
        NpcKind::Jumper,
        NpcKind::ErraticFlyer,
        NpcKind::PatrolFlyer,
        NpcKind::GroundHazard,
        NpcKind::Turret,
    ];

    pub fn profile(self, cfg: &NpcConfig) -> NpcProfile {
        let base = NpcProfile {
            limits: BodyLimits {
                max_speed_x: cfg.max_speed_x,
                max_speed_y: cfg.max_speed_y,
                acceleration: cfg.acceleration,
                width_offset: cfg.width_offset,
                height_offset: cfg.height_offset,
                stances: cfg.stances,
                airborne_stance: None,
            },
            flying: false,
            avoids_ledges: false,
            jumps: false,
            turn_period: None,
        };
        match self {
            NpcKind::Walker => base,
            NpcKind::CautiousWalker => NpcProfile { avoids_ledges: true, ..base },
            NpcKind::GroundHazard => NpcProfile {
                avoids_ledges: true,
                limits: BodyLimits { stances: 3, ..base.limits },
                ..base
            },
            NpcKind::Jumper => NpcProfile {
                jumps: true,
                limits: BodyLimits { airborne_stance: Some(1), ..base.limits },
                ..base
            },
            NpcKind::ErraticFlyer => NpcProfile {
                flying: true,
                turn_period: Some(cfg.erratic_turn_frames).filter(|&n| n > 0),
                limits: BodyLimits { stances: 3, ..base.limits },
                ..base
            },
            NpcKind::PatrolFlyer => NpcProfile {
                flying: true,
                limits: BodyLimits { stances: 6, ..base.limits },
                ..base
            },
            NpcKind::Turret => NpcProfile {
                limits: BodyLimits { acceleration: 0.0, stances: 0, ..base.limits },
                ..base
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub kind: NpcKind,
    pub profile: NpcProfile,
    pub body: Body,
    /// Frames updated so far.
    pub age: u32,
}

impl Npc {
    /// New NPC at pixel `(x, y)`, facing left.
    pub fn spawn(kind: NpcKind, x: i32, y: i32, cfg: &NpcConfig) -> Self {
        let profile = kind.profile(cfg);
        let mut body = Body::new(x, y, false, profile.limits);
        body.flying = profile.flying;
        Npc { kind, profile, body, age: 0 }
    }

    pub fn update(&mut self, map: &MapView) {
        self.age = self.age.wrapping_add(1);

        if self.should_turn(map) {
            self.body.facing_right = !self.body.facing_right;
            self.body.dx = -self.body.dx;
        }

        self.body.apply_friction(map);
        if self.body.facing_right {
            self.body.drive_right(1.0);
        } else {
            self.body.drive_left(1.0);
        }
        self.body.apply_gravity(map.physics);
        if self.profile.jumps {
            self.body.jump(map);
        }
        self.body.advance(map);
    }

    fn should_turn(&self, map: &MapView) -> bool {
        let b = &self.body;
        let ahead = if b.facing_right { 1 } else { -1 };
        if b.is_colliding(b.x + ahead, b.y, map) {
            return true;
        }
        if self.profile.flying {
            let f = b.footprint(map.physics.character_size);
            let leaving = if b.facing_right {
                f.right + 1 >= map.grid.pixel_width()
            } else {
                f.left - 1 < 0
            };
            if leaving {
                return true;
            }
        }
        if self.profile.avoids_ledges && b.will_fall(map) {
            return true;
        }
        self.profile.turn_period.is_some_and(|n| self.age % n == 0)
    }
}
