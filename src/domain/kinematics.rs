/// Kinematics and collision: the shared motion layer for player and NPCs.
///
/// ## Model
///
/// A `Body` is a character-sized square sprite at integer pixel
/// position `(x, y)` (top-left corner) with a real-valued velocity
/// `(dx, dy)` in pixels per frame. Its collision FOOTPRINT is the sprite
/// shrunk by `width_offset` on both sides and `height_offset` on top:
///
/// ```text
///   left   = x + width_offset
///   right  = x + size - 1 - width_offset
///   top    = y + height_offset
///   bottom = y + size - 1
/// ```
///
/// ## Motion (`advance`)
///
///   1. |dx|, |dy| are rounded UP to a multiple of `min_pixels_per_frame`.
///   2. Horizontal first, then vertical, one pixel at a time.
///   3. Before each pixel: `is_colliding` at the candidate position.
///      A predicted collision stops that axis for this frame.
///   4. Velocity is NOT zeroed on impact. A character pressed against a
///      wall keeps its intended velocity and resumes the instant the
///      obstruction clears.
///   5. Stance bookkeeping from horizontal distance moved.
///
/// ## Collision (`is_colliding`)
///
/// Eight samples: four corners, left/right mid-height, top/bottom
/// mid-width. Any sample on a SOLID tile collides. While moving down or
/// vertically still (`dy >= 0`), a TOP-SOLID tile under the bottom-left
/// or bottom-right sample also collides: one-way platforms.
///
/// ## Invariant
///
/// After every velocity mutation: |dx| <= max_speed_x, |dy| <= max_speed_y.

use crate::config::PhysicsConfig;

use super::grid::TileGrid;
use super::tile::TileId;

/// Read-only context every motion query needs.
#[derive(Clone, Copy)]
pub struct MapView<'a> {
    pub grid: &'a TileGrid,
    pub physics: &'a PhysicsConfig,
}

impl<'a> MapView<'a> {
    pub fn new(grid: &'a TileGrid, physics: &'a PhysicsConfig) -> Self {
        MapView { grid, physics }
    }

    #[inline]
    fn size(&self) -> i32 {
        self.physics.character_size
    }
}

/// Per-character motion parameters, fixed at construction
/// (the player's height offset changes with its health tier).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BodyLimits {
    pub max_speed_x: f32,
    pub max_speed_y: f32,
    pub acceleration: f32,
    pub width_offset: i32,
    pub height_offset: i32,
    /// Walking poses per direction.
    pub stances: usize,
    /// Pose used while airborne, if the character has one.
    pub airborne_stance: Option<usize>,
}

/// Axis-aligned collision rectangle, inclusive pixel bounds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Footprint {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Footprint {
    /// Touching counts as overlap.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.right >= other.left
            && self.left <= other.right
            && self.top <= other.bottom
            && self.bottom >= other.top
    }
}

/// Pixels actually travelled by one `advance`, per axis (unsigned).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Moved {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Body {
    pub x: i32,
    pub y: i32,
    pub dx: f32,
    pub dy: f32,
    pub facing_right: bool,
    pub stance: usize,
    /// Horizontal pixels travelled within the current stance cycle.
    pub move_count: u32,
    pub flying: bool,
    pub climbing: bool,
    pub crouching: bool,
    pub limits: BodyLimits,
}

/// Round a non-negative speed up to whole pixels, in multiples of `step`.
pub fn round_up(n: f32, step: i32) -> i32 {
    let whole = n.ceil() as i32;
    (whole + step - 1) / step * step
}

impl Body {
    pub fn new(x: i32, y: i32, facing_right: bool, limits: BodyLimits) -> Self {
        Body {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            facing_right,
            stance: 0,
            move_count: 0,
            flying: false,
            climbing: false,
            crouching: false,
            limits,
        }
    }

    #[inline]
    fn check_speed_caps(&self) {
        debug_assert!(
            self.dx.abs() <= self.limits.max_speed_x,
            "dx {} exceeds cap {}", self.dx, self.limits.max_speed_x
        );
        debug_assert!(
            self.dy.abs() <= self.limits.max_speed_y,
            "dy {} exceeds cap {}", self.dy, self.limits.max_speed_y
        );
    }

    // ── Velocity ──

    /// Accelerate horizontally; clamps and turns to face the motion.
    pub fn push_x(&mut self, ddx: f32) {
        let max = self.limits.max_speed_x;
        self.dx += ddx;
        if self.dx > 0.0 {
            self.facing_right = true;
            if self.dx > max { self.dx = max; }
        } else if self.dx < 0.0 {
            self.facing_right = false;
            if self.dx < -max { self.dx = -max; }
        }
        self.check_speed_caps();
    }

    pub fn push_y(&mut self, ddy: f32) {
        let max = self.limits.max_speed_y;
        self.dy = (self.dy + ddy).clamp(-max, max);
        self.check_speed_caps();
    }

    /// One frame of drive toward the left, scaled by `authority` (1.0 = full).
    pub fn drive_left(&mut self, authority: f32) {
        self.push_x(-self.limits.acceleration * authority);
    }

    pub fn drive_right(&mut self, authority: f32) {
        self.push_x(self.limits.acceleration * authority);
    }

    /// Slow toward zero; weaker on ice, never past zero, no-op in flight.
    pub fn apply_friction(&mut self, map: &MapView) {
        if self.flying { return; }
        let friction = if self.on_ice(map) {
            map.physics.ice_friction
        } else {
            map.physics.friction
        };
        if self.dx > 0.0 {
            if self.dx - friction < 0.0 { self.dx = 0.0; } else { self.push_x(-friction); }
        } else if self.dx < 0.0 {
            if self.dx + friction > 0.0 { self.dx = 0.0; } else { self.push_x(friction); }
        }
        self.check_speed_caps();
    }

    pub fn apply_gravity(&mut self, physics: &PhysicsConfig) {
        if !self.climbing && !self.flying {
            self.push_y(physics.gravity);
        }
    }

    /// Instant upward impulse, only from the ground. Returns whether it fired.
    pub fn jump(&mut self, map: &MapView) -> bool {
        if !self.grounded(map) { return false; }
        // Doubled so the cap, not the current dy, decides the result.
        self.push_y(-2.0 * self.limits.max_speed_y);
        true
    }

    // ── Motion ──

    pub fn advance(&mut self, map: &MapView) -> Moved {
        let step = map.physics.min_pixels_per_frame;
        let steps_x = round_up(self.dx.abs(), step);
        let steps_y = round_up(self.dy.abs(), step);
        let sign_x = if self.dx < 0.0 { -1 } else { 1 };
        let sign_y = if self.dy < 0.0 { -1 } else { 1 };

        let mut moved = Moved::default();
        for _ in 0..steps_x {
            if self.is_colliding(self.x + sign_x, self.y, map) { break; }
            self.x += sign_x;
            moved.x += 1;
        }
        for _ in 0..steps_y {
            if self.is_colliding(self.x, self.y + sign_y, map) { break; }
            self.y += sign_y;
            moved.y += 1;
        }

        self.update_stance(moved.x as u32, map);
        moved
    }

    fn update_stance(&mut self, pixels: u32, map: &MapView) {
        let per_stance = map.physics.pixels_per_stance_change;
        let stances = self.limits.stances;
        self.move_count = (self.move_count + pixels) % (per_stance * 2);

        if stances > 0 {
            if self.move_count < per_stance {
                self.stance = (self.stance + 1).min(stances - 1);
            } else if self.stance == 0 {
                self.stance = 1.min(stances - 1);
            } else {
                self.stance -= 1;
            }
        }
        if self.dx == 0.0 {
            self.stance = 0;
            self.move_count = 0;
        }
        if !self.grounded(map) {
            if let Some(airborne) = self.limits.airborne_stance {
                self.stance = airborne;
                self.move_count = 0;
            }
        }
    }

    // ── Collision ──

    pub fn footprint_at(&self, x: i32, y: i32, size: i32) -> Footprint {
        Footprint {
            left: x + self.limits.width_offset,
            right: x + size - 1 - self.limits.width_offset,
            top: y + self.limits.height_offset,
            bottom: y + size - 1,
        }
    }

    pub fn footprint(&self, size: i32) -> Footprint {
        self.footprint_at(self.x, self.y, size)
    }

    /// Would the footprint with its sprite corner at `(x, y)` hit the map?
    pub fn is_colliding(&self, x: i32, y: i32, map: &MapView) -> bool {
        let size = map.size();
        let f = self.footprint_at(x, y, size);
        let mid_x = x + size / 2;
        let mid_y = y + size / 2;
        let grid = map.grid;

        let samples = [
            (f.left, f.top),
            (f.right, f.top),
            (f.left, f.bottom),
            (f.right, f.bottom),
            (f.left, mid_y),
            (f.right, mid_y),
            (mid_x, f.top),
            (mid_x, f.bottom),
        ];
        if samples.iter().any(|&(px, py)| grid.is_solid_at(px, py)) {
            return true;
        }

        self.dy >= 0.0
            && (grid.is_top_solid_at(f.left, f.bottom) || grid.is_top_solid_at(f.right, f.bottom))
    }

    pub fn overlaps(&self, other: &Body, size: i32) -> bool {
        self.footprint(size).overlaps(&other.footprint(size))
    }

    // ── Derived predicates ──

    /// Feet resting on something that blocks downward motion.
    pub fn grounded(&self, map: &MapView) -> bool {
        self.is_colliding(self.x, self.y + 1, map)
    }

    pub fn on_ice(&self, map: &MapView) -> bool {
        map.grid.classes().is_icy(self.tile_below(map))
    }

    /// Grounded, with open space diagonally ahead of the feet.
    pub fn will_fall(&self, map: &MapView) -> bool {
        let size = map.size();
        let ahead_y = self.y + size + 1;
        let ahead_x = if self.facing_right { self.x + size + 1 } else { self.x };
        self.grounded(map) && map.grid.is_non_solid_at(ahead_x, ahead_y)
    }

    /// Tile behind the centre of the feet.
    pub fn tile_behind(&self, map: &MapView) -> TileId {
        let size = map.size();
        map.grid.tile_at_pixel(self.x + size / 2, self.y + size - 1)
    }

    /// Tile just under the centre of the feet.
    pub fn tile_below(&self, map: &MapView) -> TileId {
        let size = map.size();
        map.grid.tile_at_pixel(self.x + size / 2, self.y + size + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::tiles_from;

    fn limits() -> BodyLimits {
        BodyLimits {
            max_speed_x: 6.0,
            max_speed_y: 7.0,
            acceleration: 1.0,
            width_offset: 9,
            height_offset: 6,
            stances: 3,
            airborne_stance: Some(2),
        }
    }

    fn open_floor() -> TileGrid {
        tiles_from(&[
            "........",
            "........",
            "........",
            "........",
            "........",
            "########",
        ])
    }

    // Standing on row 5: bottom pixel 79, floor starts at 80.
    const FLOOR_Y: i32 = 48;

    // ── Velocity ──

    #[test]
    fn push_clamps_and_turns() {
        let mut b = Body::new(0, 0, true, limits());
        b.push_x(-20.0);
        assert_eq!(b.dx, -6.0);
        assert!(!b.facing_right);
        b.push_x(6.0);
        assert_eq!(b.dx, 0.0);
        assert!(!b.facing_right, "zero velocity keeps orientation");
        b.push_y(100.0);
        assert_eq!(b.dy, 7.0);
        b.push_y(-100.0);
        assert_eq!(b.dy, -7.0);
    }

    #[test]
    fn caps_hold_after_any_mutation() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, FLOOR_Y, true, limits());
        let pushes = [3.5, -11.0, 0.25, 9.0, -0.75, 40.0, -40.0, 1.0];
        for (i, &p) in pushes.iter().cycle().take(64).enumerate() {
            match i % 4 {
                0 => b.push_x(p),
                1 => b.push_y(p),
                2 => b.apply_friction(&map),
                _ => b.apply_gravity(&physics),
            }
            assert!(b.dx.abs() <= 6.0 && b.dy.abs() <= 7.0, "step {i}: {b:?}");
        }
    }

    #[test]
    fn friction_stops_at_zero() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, FLOOR_Y, true, limits());
        b.dx = 0.3;
        b.apply_friction(&map);
        assert_eq!(b.dx, 0.0);
        b.dx = -1.0;
        b.apply_friction(&map);
        assert_eq!(b.dx, -0.5);
        assert!(!b.facing_right);
    }

    #[test]
    fn ice_friction_is_weaker() {
        let grid = tiles_from(&["....", "....", "IIII"]);
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(16, 0, true, limits());
        assert!(b.on_ice(&map));
        b.dx = 2.0;
        b.apply_friction(&map);
        assert_eq!(b.dx, 1.75);
    }

    #[test]
    fn flying_ignores_friction_and_gravity() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, 0, true, limits());
        b.flying = true;
        b.dx = 2.0;
        b.apply_friction(&map);
        b.apply_gravity(&physics);
        assert_eq!((b.dx, b.dy), (2.0, 0.0));
    }

    #[test]
    fn climbing_ignores_gravity() {
        let physics = PhysicsConfig::default();
        let mut b = Body::new(0, 0, true, limits());
        b.climbing = true;
        b.apply_gravity(&physics);
        assert_eq!(b.dy, 0.0);
        b.climbing = false;
        b.apply_gravity(&physics);
        assert_eq!(b.dy, 0.5);
    }

    #[test]
    fn jump_from_rest_hits_the_cap() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, FLOOR_Y, true, limits());
        assert!(b.grounded(&map));
        assert!(b.jump(&map));
        assert_eq!(b.dy, -7.0);
    }

    #[test]
    fn no_jump_in_midair() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, 10, true, limits());
        assert!(!b.grounded(&map));
        assert!(!b.jump(&map));
        assert_eq!(b.dy, 0.0);
    }

    // ── Motion ──

    #[test]
    fn round_up_to_step() {
        assert_eq!(round_up(0.0, 2), 0);
        assert_eq!(round_up(0.25, 2), 2);
        assert_eq!(round_up(2.0, 2), 2);
        assert_eq!(round_up(2.5, 2), 4);
        assert_eq!(round_up(7.0, 2), 8);
        assert_eq!(round_up(6.0, 1), 6);
    }

    #[test]
    fn falls_to_floor_and_keeps_velocity() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, 0, true, limits());
        for _ in 0..40 {
            b.apply_gravity(&physics);
            b.advance(&map);
        }
        assert_eq!(b.y, FLOOR_Y);
        assert!(b.grounded(&map));
        // Landing halts position only.
        assert_eq!(b.dy, 7.0);
    }

    #[test]
    fn wall_stops_horizontal_motion() {
        let grid = tiles_from(&[
            "........",
            "........",
            "......#.",
            "......#.",
            "......#.",
            "########",
        ]);
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(70, FLOOR_Y, true, limits());
        b.dx = 6.0;
        let moved = b.advance(&map);
        // Right edge 73 + 31 - 9 = 95, wall starts at 96.
        assert_eq!(b.x, 73);
        assert_eq!(moved.x, 3);
        assert_eq!(b.dx, 6.0);
        assert!(b.is_colliding(b.x + 1, b.y, &map));
    }

    #[test]
    fn never_rests_inside_solid() {
        let grid = tiles_from(&[
            "#......#",
            "#......#",
            "#..##..#",
            "#......#",
            "#......#",
            "########",
        ]);
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(16, 0, true, limits());
        for frame in 0..200 {
            if (frame / 25) % 2 == 0 { b.drive_right(1.0); } else { b.drive_left(1.0); }
            if frame % 30 == 0 { b.jump(&map); }
            b.apply_gravity(&physics);
            b.advance(&map);
            let f = b.footprint(32);
            let (mid_x, mid_y) = (b.x + 16, b.y + 16);
            let samples = [
                (f.left, f.top),
                (f.right, f.top),
                (f.left, f.bottom),
                (f.right, f.bottom),
                (f.left, mid_y),
                (f.right, mid_y),
                (mid_x, f.top),
                (mid_x, f.bottom),
            ];
            for (px, py) in samples {
                assert!(
                    !grid.is_solid_at(px, py),
                    "frame {frame}: edge point {:?} in wall at {:?}", (px, py), (b.x, b.y)
                );
            }
        }
    }

    #[test]
    fn lands_on_top_solid_from_above() {
        let grid = tiles_from(&[
            "........",
            "........",
            "........",
            "..====..",
            "........",
            "########",
        ]);
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, 0, true, limits());
        b.dy = 2.0;
        for _ in 0..20 { b.advance(&map); }
        assert_eq!(b.y, 16);
        assert!(b.grounded(&map));
    }

    #[test]
    fn rises_through_top_solid_from_below() {
        let grid = tiles_from(&[
            "........",
            "........",
            "........",
            "..====..",
            "........",
            "########",
        ]);
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(32, 40, true, limits());
        b.dy = -7.0;
        b.advance(&map);
        assert_eq!(b.y, 32);
    }

    // ── Predicates ──

    #[test]
    fn will_fall_at_ledge_edge() {
        let grid = tiles_from(&[
            "........",
            "........",
            "........",
            "........",
            "........",
            "####....",
        ]);
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let b = Body::new(32, FLOOR_Y, true, limits());
        assert!(b.will_fall(&map));
        let b = Body::new(0, FLOOR_Y, true, limits());
        assert!(!b.will_fall(&map));
        let b = Body::new(32, FLOOR_Y, false, limits());
        assert!(!b.will_fall(&map));
        let airborne = Body::new(32, 20, true, limits());
        assert!(!airborne.will_fall(&map));
    }

    #[test]
    fn overlap_includes_touching() {
        let a = Body::new(0, 0, true, limits());
        // a.right = 22; b.left = x + 9.
        let b = Body::new(13, 0, true, limits());
        assert!(a.overlaps(&b, 32));
        let c = Body::new(14, 0, true, limits());
        assert!(!a.overlaps(&c, 32));
        let d = Body::new(0, 32, true, limits());
        assert!(!a.overlaps(&d, 32));
    }

    #[test]
    fn tile_behind_and_below() {
        let grid = tiles_from(&[
            "....",
            "..D.",
            "..^.",
        ]);
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        // Feet centre at x + 16 = 40 (col 2), bottom row pixel y + 31 = 31 (row 1).
        let b = Body::new(24, 0, true, limits());
        assert_eq!(b.tile_behind(&map), TileId(62));
        assert_eq!(b.tile_below(&map), TileId(132));
    }

    // ── Stance ──

    #[test]
    fn stance_walks_resets_and_jumps() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(16, FLOOR_Y, true, limits());
        b.dx = 2.0;
        b.advance(&map);
        assert_eq!(b.stance, 1);
        b.advance(&map);
        assert_eq!(b.stance, 2);
        b.advance(&map);
        assert_eq!(b.stance, 2, "capped at last stance");

        b.dx = 0.0;
        b.advance(&map);
        assert_eq!((b.stance, b.move_count), (0, 0));

        let mut air = Body::new(16, 0, true, limits());
        air.advance(&map);
        assert_eq!(air.stance, 2);
    }

    #[test]
    fn stance_steps_back_in_second_half_of_cycle() {
        let grid = open_floor();
        let physics = PhysicsConfig::default();
        let map = MapView::new(&grid, &physics);
        let mut b = Body::new(0, FLOOR_Y, true, limits());
        b.dx = 2.0;
        for _ in 0..8 { b.advance(&map); }
        // 16 pixels travelled: second half of the 32-pixel cycle.
        assert_eq!(b.move_count, 16);
        assert_eq!(b.stance, 1);
    }
}
