/// Level definitions and loading.
///
/// The host supplies levels already decoded into tile ids (no file format
/// is parsed here). Each one carries:
///   - `rows`:          row-major tile ids, all rows the same length
///   - `player_start`:  the player's start cell
///   - `npcs`:          ordered `(kind, tile_x, tile_y)` placements
///
/// ## Placement cells
///
/// A placement names the map cell under the right half of the
/// character's feet. The sprite corner is
///
/// ```text
///   pixel = (tile + 1) * tile_size - character_size
/// ```
///
/// on each axis, so a character placed on a cell directly above the
/// floor stands on that floor.

use serde::Deserialize;
use thiserror::Error;

use crate::config::{GameConfig, PhysicsConfig};
use crate::domain::grid::{GridError, TileGrid};
use crate::domain::npc::{Npc, NpcKind};
use crate::domain::player::Player;
use crate::domain::tile::{TileClasses, TileId};
use crate::sim::world::World;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no levels supplied")]
    NoLevels,
    #[error("level {level}: {source}")]
    Grid { level: usize, source: GridError },
    #[error("level {level}: player start ({x}, {y}) is outside the map")]
    StartOutOfBounds { level: usize, x: i32, y: i32 },
}

/// Level as handed over by the host.
#[derive(Clone, Debug, Deserialize)]
pub struct LevelDef {
    #[serde(default)]
    pub name: String,
    pub rows: Vec<Vec<TileId>>,
    pub player_start: (i32, i32),
    #[serde(default)]
    pub npcs: Vec<NpcPlacement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct NpcPlacement {
    pub kind: NpcKind,
    pub tile_x: i32,
    pub tile_y: i32,
}

/// A validated level, ready to be (re)loaded any number of times.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    pub player_start: (i32, i32),
    pub npcs: Vec<NpcPlacement>,
}

/// Sprite corner for a placement cell.
pub fn placement_pixels(tile_x: i32, tile_y: i32, physics: &PhysicsConfig) -> (i32, i32) {
    let corner = |t: i32| (t + 1) * physics.tile_size - physics.character_size;
    (corner(tile_x), corner(tile_y))
}

impl Level {
    /// Validate `def` (0-based `index`, used in errors) against `config`.
    pub fn prepare(index: usize, def: LevelDef, config: &GameConfig) -> Result<Self, LevelError> {
        let classes = TileClasses::from_config(&config.tiles);
        let grid = TileGrid::from_rows(&def.rows, config.physics.tile_size, classes)
            .map_err(|source| LevelError::Grid { level: index, source })?;

        let (x, y) = def.player_start;
        if x < 0 || y < 0 || x as usize >= grid.width() || y as usize >= grid.height() {
            return Err(LevelError::StartOutOfBounds { level: index, x, y });
        }

        Ok(Level {
            name: def.name,
            grid,
            player_start: def.player_start,
            npcs: def.npcs,
        })
    }

    pub fn spawn_player(&self, config: &GameConfig) -> Player {
        let (tx, ty) = self.player_start;
        let (x, y) = placement_pixels(tx, ty, &config.physics);
        Player::spawn(x, y, &config.player)
    }

    pub fn spawn_npcs(&self, config: &GameConfig) -> Vec<Npc> {
        self.npcs
            .iter()
            .map(|p| {
                let (x, y) = placement_pixels(p.tile_x, p.tile_y, &config.physics);
                Npc::spawn(p.kind, x, y, &config.npc)
            })
            .collect()
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Reload the map and roster of level `level_idx` (0-based) with a fresh,
/// big player at the start cell.
pub fn load_level(world: &mut World, level_idx: usize) {
    let Some(level) = world.levels.get(level_idx) else {
        log::warn!("level index {level_idx} out of range ({} levels)", world.levels.len());
        return;
    };
    world.grid = level.grid.clone();
    world.player = level.spawn_player(&world.config);
    world.npcs = level.spawn_npcs(&world.config);
    world.current_level = level_idx;
    log::debug!(
        "loaded level {} \"{}\" ({}x{}, {} npcs)",
        level_idx + 1,
        level.name,
        level.grid.width(),
        level.grid.height(),
        world.npcs.len()
    );
}
