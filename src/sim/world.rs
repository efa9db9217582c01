/// World: everything a running session owns.
///
///   - `levels`:       every validated level, reloaded from here on entry
///   - `grid`:         the current level's map, read-only during play
///   - `player`:       the single player, never destroyed, only respawned
///   - `npcs`:         live roster in placement order; members only leave
///   - `suspend`:      active death/victory pause, if any
///   - `pending_level`: level to load once the victory pause ends
///
/// Only `sim` (the step function and level loading) mutates a running world.

use crate::config::GameConfig;
use crate::domain::grid::TileGrid;
use crate::domain::kinematics::MapView;
use crate::domain::npc::Npc;
use crate::domain::player::{Player, Suspend};

use super::level::{Level, LevelDef, LevelError};
use super::snapshot::FrameSnapshot;

#[derive(Clone, Debug)]
pub struct World {
    pub config: GameConfig,
    pub levels: Vec<Level>,
    /// 0-based index into `levels`.
    pub current_level: usize,
    pub grid: TileGrid,
    pub player: Player,
    pub npcs: Vec<Npc>,
    pub suspend: Option<Suspend>,
    /// 0-based; the completed map stays loaded until the pause ends.
    pub pending_level: Option<usize>,
    pub tick: u64,
}

impl World {
    /// Validate every level up front and start on the first one.
    pub fn new(config: GameConfig, defs: Vec<LevelDef>) -> Result<Self, LevelError> {
        let levels = defs
            .into_iter()
            .enumerate()
            .map(|(i, def)| Level::prepare(i, def, &config))
            .collect::<Result<Vec<_>, _>>()?;
        let first = levels.first().ok_or(LevelError::NoLevels)?;

        let grid = first.grid.clone();
        let player = first.spawn_player(&config);
        let npcs = first.spawn_npcs(&config);
        log::debug!("session started with {} levels", levels.len());

        Ok(World {
            config,
            levels,
            current_level: 0,
            grid,
            player,
            npcs,
            suspend: None,
            pending_level: None,
            tick: 0,
        })
    }

    pub fn map(&self) -> MapView<'_> {
        MapView::new(&self.grid, &self.config.physics)
    }

    /// 1-based, as shown to players.
    pub fn level_number(&self) -> usize {
        self.current_level + 1
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend.is_some()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }
}
