/// Headless host: runs a scripted session over two built-in levels and
/// prints the final frame as TOML.
///
/// Usage: `tilehop [FRAMES]` (default 600). Set `RUST_LOG=debug` to follow
/// damage, NPC removals and level loads.

use tilehop::config::GameConfig;
use tilehop::domain::input::{InputTracker, Key, KeySet};
use tilehop::domain::npc::NpcKind;
use tilehop::domain::tile::TileId;
use tilehop::sim::level::{LevelDef, NpcPlacement};
use tilehop::sim::{step, World};

const DEFAULT_FRAMES: u64 = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };

    let config = GameConfig::load();
    let mut world = World::new(config, demo_levels())?;
    let mut tracker = InputTracker::new();

    for frame in 0..frames {
        let input = tracker.frame(scripted_keys(frame));
        for event in step(&mut world, input) {
            log::debug!("frame {frame}: {event:?}");
        }
    }

    print!("{}", toml::to_string(&world.snapshot())?);
    Ok(())
}

/// Run right, hop every 48 frames, try the ladder for a while.
fn scripted_keys(frame: u64) -> KeySet {
    if (150..190).contains(&frame) {
        return KeySet::EMPTY.with(Key::Up);
    }
    let mut keys = KeySet::EMPTY.with(Key::Right);
    if frame % 48 < 2 {
        keys.insert(Key::Jump);
    }
    keys
}

// ══════════════════════════════════════════════════════════════
// Built-in levels
// ══════════════════════════════════════════════════════════════

/// '#' solid, '=' one-way platform, 'I' ice, 'H' ladder, '^' spikes,
/// 'D' exit door, anything else sky.
fn tiles(rows: &[&str]) -> Vec<Vec<TileId>> {
    rows.iter()
        .map(|row| {
            row.chars()
                .map(|ch| match ch {
                    '#' => TileId(0),
                    '=' => TileId(3),
                    'I' => TileId(12),
                    'H' => TileId(57),
                    '^' => TileId(132),
                    'D' => TileId(62),
                    _ => TileId(21),
                })
                .collect()
        })
        .collect()
}

fn place(kind: NpcKind, tile_x: i32, tile_y: i32) -> NpcPlacement {
    NpcPlacement { kind, tile_x, tile_y }
}

fn demo_levels() -> Vec<LevelDef> {
    vec![
        LevelDef {
            name: "Meadow".into(),
            rows: tiles(&[
                "##############################",
                "#............................#",
                "#............................#",
                "#............................#",
                "#.............====...........#",
                "#............................#",
                "#......H.....................#",
                "#......H...........#.........#",
                "#......H...........#........D#",
                "#####=####IIIIII####.....##^##",
                "#..................#.....#...#",
                "####################.....#####",
            ]),
            player_start: (2, 8),
            npcs: vec![
                place(NpcKind::GroundHazard, 5, 8),
                place(NpcKind::PatrolFlyer, 10, 3),
                place(NpcKind::Walker, 12, 8),
                place(NpcKind::CautiousWalker, 16, 8),
                place(NpcKind::Turret, 18, 8),
                place(NpcKind::Jumper, 24, 8),
            ],
        },
        LevelDef {
            name: "Tower".into(),
            rows: tiles(&[
                "################",
                "#..............#",
                "#..............#",
                "#..............#",
                "#.....====.....#",
                "#..............#",
                "#.............D#",
                "################",
            ]),
            player_start: (2, 6),
            npcs: vec![place(NpcKind::ErraticFlyer, 8, 2)],
        },
    ]
}
