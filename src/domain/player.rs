/// Player state machine.
///
/// States: {Big, Small} × {grounded, crouching, climbing, airborne},
/// plus an orthogonal invincibility timer.
///
/// Per-frame order (`update`):
///   a. hazard below → damage; fell below the map → death
///   b. invincibility timer counts down
///   c. crouch released when Down is no longer held
///   d. climbing ends when the tile behind stops being climbable,
///      otherwise vertical velocity is frozen
///   e. horizontal drive: friction + full drive on the ground (or ladder),
///      reduced drive and no friction in the air
///   f. gravity, then jump on a fresh press
///   g. Up/Down next to a climbable tile takes over vertical motion
///   h. Down (not climbing) crouches
///   i. commit motion
///
/// Death and victory never block: they return a `Suspend` describing the
/// pose to show and how many frames the host should freeze the world.

use serde::Serialize;

use crate::config::PlayerConfig;

use super::input::{FrameInput, Key};
use super::kinematics::{Body, BodyLimits, MapView};
use super::npc::NpcKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Big,
    Small,
}

/// Fixed pose shown while the world is suspended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pose {
    Dead,
    Victory { big: bool, facing_right: bool },
}

/// Freeze-the-simulation request: show `pose` at `(x, y)` for `frames` ticks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Suspend {
    pub pose: Pose,
    pub x: i32,
    pub y: i32,
    pub frames: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DamageCause {
    Hazard,
    Fell,
    Npc(NpcKind),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DamageOutcome {
    /// Invincible: nothing happened.
    Ignored,
    /// Big → Small, invincibility started.
    Shrunk,
    /// Already small: dead and respawned at the level start.
    Died(Suspend),
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub health: Health,
    pub invincibility: u32,
    /// Vertical pixels climbed; drives the two-pose climbing cycle.
    pub climb_distance: u32,
    start: (i32, i32),
}

fn limits(cfg: &PlayerConfig, health: Health) -> BodyLimits {
    BodyLimits {
        max_speed_x: cfg.max_speed_x,
        max_speed_y: cfg.max_speed_y,
        acceleration: cfg.acceleration,
        width_offset: cfg.width_offset,
        height_offset: match health {
            Health::Big => cfg.height_offset_big,
            Health::Small => cfg.height_offset_small,
        },
        stances: cfg.stances,
        airborne_stance: Some(cfg.jumping_stance),
    }
}

impl Player {
    /// New big player facing right at pixel `(x, y)`, which also becomes
    /// the respawn point.
    pub fn spawn(x: i32, y: i32, cfg: &PlayerConfig) -> Self {
        Player {
            body: Body::new(x, y, true, limits(cfg, Health::Big)),
            health: Health::Big,
            invincibility: 0,
            climb_distance: 0,
            start: (x, y),
        }
    }

    pub fn start(&self) -> (i32, i32) {
        self.start
    }

    pub fn is_big(&self) -> bool {
        self.health == Health::Big
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0
    }

    pub fn can_climb(&self, map: &MapView) -> bool {
        map.grid.classes().is_climbable(self.body.tile_behind(map))
    }

    /// Which of the two climbing poses to show.
    pub fn climb_stance(&self, map: &MapView) -> usize {
        ((self.climb_distance / map.physics.pixels_per_stance_change) % 2) as usize
    }

    pub fn update(
        &mut self,
        input: FrameInput,
        map: &MapView,
        cfg: &PlayerConfig,
    ) -> Option<(DamageCause, DamageOutcome)> {
        // a. damage and death
        let hurt = if map.grid.classes().is_hazard(self.body.tile_below(map)) {
            Some((DamageCause::Hazard, self.take_damage(cfg)))
        } else if self.body.y + self.body.limits.height_offset > map.grid.pixel_height() {
            Some((DamageCause::Fell, DamageOutcome::Died(self.die(cfg))))
        } else {
            None
        };
        if let Some((_, DamageOutcome::Died(_))) = hurt {
            return hurt;
        }

        // b. invincibility
        if self.invincibility > 0 {
            self.invincibility -= 1;
        }

        // c/d. crouch and climb release
        if self.body.crouching && !input.is_held(Key::Down) {
            self.body.crouching = false;
        }
        if self.body.climbing {
            if self.can_climb(map) {
                self.body.dy = 0.0;
            } else {
                self.body.climbing = false;
            }
        }

        // e. horizontal
        let footing = self.body.climbing || self.body.grounded(map);
        let authority = if footing {
            self.body.apply_friction(map);
            1.0
        } else {
            map.physics.air_control
        };
        if input.is_held(Key::Left) {
            self.body.drive_left(authority);
        }
        if input.is_held(Key::Right) {
            self.body.drive_right(authority);
        }

        // f. vertical
        self.body.apply_gravity(map.physics);
        if input.just_pressed(Key::Jump) {
            self.body.jump(map);
        }

        // g. climbing
        if input.is_held(Key::Up) && self.can_climb(map) {
            self.climb(-1.0, cfg);
        } else if input.is_held(Key::Down) && self.can_climb(map) {
            self.climb(1.0, cfg);
        }

        // h. crouching
        if input.is_held(Key::Down) && !self.body.climbing {
            self.body.crouching = true;
        }

        // i. motion
        let moved = self.body.advance(map);
        if self.body.climbing {
            self.climb_distance = self.climb_distance.wrapping_add(moved.y as u32);
        }

        hurt
    }

    fn climb(&mut self, direction: f32, cfg: &PlayerConfig) {
        if !self.body.climbing {
            self.body.climbing = true;
            self.body.dx = 0.0;
            self.body.dy = 0.0;
        }
        let max = self.body.limits.max_speed_y;
        self.body.dy = (cfg.climb_rate * direction).clamp(-max, max);
    }

    pub fn take_damage(&mut self, cfg: &PlayerConfig) -> DamageOutcome {
        if self.is_invincible() {
            return DamageOutcome::Ignored;
        }
        match self.health {
            Health::Small => DamageOutcome::Died(self.die(cfg)),
            Health::Big => {
                self.set_health(Health::Small, cfg);
                self.invincibility = cfg.invincibility_frames;
                DamageOutcome::Shrunk
            }
        }
    }

    /// Dead pose at the current spot, then back to the start: big,
    /// facing right, motionless.
    pub fn die(&mut self, cfg: &PlayerConfig) -> Suspend {
        let suspend = Suspend {
            pose: Pose::Dead,
            x: self.body.x,
            y: self.body.y,
            frames: cfg.death_pause_frames,
        };
        self.set_health(Health::Big, cfg);
        let b = &mut self.body;
        (b.x, b.y) = self.start;
        (b.dx, b.dy) = (0.0, 0.0);
        b.facing_right = true;
        b.crouching = false;
        b.climbing = false;
        b.stance = 0;
        b.move_count = 0;
        self.climb_distance = 0;
        suspend
    }

    pub fn victory_pose(&self, cfg: &PlayerConfig) -> Suspend {
        Suspend {
            pose: Pose::Victory { big: self.is_big(), facing_right: self.body.facing_right },
            x: self.body.x,
            y: self.body.y,
            frames: cfg.victory_pause_frames,
        }
    }

    fn set_health(&mut self, health: Health, cfg: &PlayerConfig) {
        self.health = health;
        self.body.limits = limits(cfg, health);
    }
}
