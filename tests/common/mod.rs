#![allow(dead_code)]

use tilehop::domain::npc::NpcKind;
use tilehop::domain::tile::TileId;
use tilehop::sim::level::{LevelDef, NpcPlacement};

/// Level from ASCII rows: '#' solid, '=' one-way platform, 'H' ladder,
/// '^' spikes, 'D' exit door, anything else sky.
pub fn level(rows: &[&str], start: (i32, i32), npcs: &[(NpcKind, i32, i32)]) -> LevelDef {
    LevelDef {
        name: String::from("test"),
        rows: rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        '#' => TileId(0),
                        '=' => TileId(3),
                        'H' => TileId(57),
                        '^' => TileId(132),
                        'D' => TileId(62),
                        _ => TileId(21),
                    })
                    .collect()
            })
            .collect(),
        player_start: start,
        npcs: npcs
            .iter()
            .map(|&(kind, tile_x, tile_y)| NpcPlacement { kind, tile_x, tile_y })
            .collect(),
    }
}

pub const PLAYGROUND: &[&str] = &[
    "####################",
    "#..................#",
    "#..................#",
    "#.........====.....#",
    "#..................#",
    "#....H.............#",
    "#....H........#....#",
    "#....H........#....#",
    "######=###########.#",
    "#..................#",
    "#.......^^.........#",
    "####################",
];
