/// Tile identifiers and their classification.
/// Properties are queried via methods, not scattered through the
/// collision code, so tile semantics are centralized here.

use serde::{Deserialize, Serialize};

use crate::config::{TileConfig, MAX_TILE_COUNT};

/// Integer identifier naming a tile's visual/behavioral class.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub i32);

impl TileId {
    /// Returned for any lookup outside the grid.
    pub const INVALID: TileId = TileId(-1);

    pub fn is_invalid(self) -> bool {
        self == TileId::INVALID
    }
}

/// Collision class. Every valid id has exactly one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileClass {
    Solid,
    TopSolid, // one-way platform: blocks from above only
    NonSolid,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct TileInfo {
    class: TileClass,
    icy: bool,
    climbable: bool,
    hazard: bool,
    exit_door: bool,
    locked_door: bool,
}

impl TileInfo {
    const UNKNOWN: TileInfo = TileInfo {
        class: TileClass::NonSolid,
        icy: false,
        climbable: false,
        hazard: false,
        exit_door: false,
        locked_door: false,
    };
}

/// Static lookup table from `TileId` to its tags.
///
/// Ids outside `0..count` (including `TileId::INVALID`) carry no tags and
/// behave as non-solid, so characters outside the map never collide.
#[derive(Clone, Debug)]
pub struct TileClasses {
    table: Vec<TileInfo>,
}

impl TileClasses {
    pub fn from_config(cfg: &TileConfig) -> Self {
        let count = cfg.count.clamp(0, MAX_TILE_COUNT) as usize;
        let mut table = vec![
            TileInfo { class: TileClass::Solid, ..TileInfo::UNKNOWN };
            count
        ];

        let mut tag = |ids: &[i32], apply: fn(&mut TileInfo)| {
            for &id in ids {
                if id >= 0 && (id as usize) < count {
                    apply(&mut table[id as usize]);
                }
            }
        };
        // Non-solid wins over top-solid; config validation rejects overlaps anyway.
        tag(&cfg.top_solid, |t| t.class = TileClass::TopSolid);
        tag(&cfg.non_solid, |t| t.class = TileClass::NonSolid);
        tag(&cfg.icy, |t| t.icy = true);
        tag(&cfg.climbable, |t| t.climbable = true);
        tag(&cfg.hazard, |t| t.hazard = true);
        tag(&cfg.exit_doors, |t| t.exit_door = true);
        tag(&cfg.locked_doors, |t| t.locked_door = true);

        TileClasses { table }
    }

    pub fn tile_count(&self) -> usize {
        self.table.len()
    }

    fn info(&self, id: TileId) -> TileInfo {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.table.get(i).copied())
            .unwrap_or(TileInfo::UNKNOWN)
    }

    pub fn class(&self, id: TileId) -> TileClass {
        self.info(id).class
    }

    /// Blocks on every side.
    pub fn is_solid(&self, id: TileId) -> bool {
        self.class(id) == TileClass::Solid
    }

    /// Blocks only when entered from above.
    pub fn is_top_solid_only(&self, id: TileId) -> bool {
        self.class(id) == TileClass::TopSolid
    }

    pub fn is_non_solid(&self, id: TileId) -> bool {
        self.class(id) == TileClass::NonSolid
    }

    pub fn is_icy(&self, id: TileId) -> bool {
        self.info(id).icy
    }

    pub fn is_climbable(&self, id: TileId) -> bool {
        self.info(id).climbable
    }

    pub fn is_hazard(&self, id: TileId) -> bool {
        self.info(id).hazard
    }

    pub fn is_exit_door(&self, id: TileId) -> bool {
        self.info(id).exit_door
    }

    pub fn is_door(&self, id: TileId) -> bool {
        let info = self.info(id);
        info.exit_door || info.locked_door
    }
}

impl Default for TileClasses {
    fn default() -> Self {
        TileClasses::from_config(&TileConfig::default())
    }
}
