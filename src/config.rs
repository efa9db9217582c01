/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the stock game tuning if the file is missing or incomplete.
///
/// One `GameConfig` is built at startup and handed by reference to every
/// component; nothing in the engine reads tuning from anywhere else.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Public Config Struct ──

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub npc: NpcConfig,
    #[serde(default)]
    pub tiles: TileConfig,
}

/// World-wide motion constants. All rates are pixels per frame.
#[derive(Clone, Debug, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default = "default_tile_size")]
    pub tile_size: i32,
    #[serde(default = "default_character_size")]
    pub character_size: i32,
    /// Any motion is rounded up to a multiple of this many pixels.
    #[serde(default = "default_min_pixels")]
    pub min_pixels_per_frame: i32,
    #[serde(default = "default_pixels_per_stance")]
    pub pixels_per_stance_change: u32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default = "default_ice_friction")]
    pub ice_friction: f32,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Fraction of ground acceleration available while airborne.
    #[serde(default = "default_air_control")]
    pub air_control: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_max_x")]
    pub max_speed_x: f32,
    #[serde(default = "default_player_max_y")]
    pub max_speed_y: f32,
    #[serde(default = "default_player_accel")]
    pub acceleration: f32,
    #[serde(default = "default_climb_rate")]
    pub climb_rate: f32,
    #[serde(default = "default_player_width_offset")]
    pub width_offset: i32,
    #[serde(default = "default_height_offset_big")]
    pub height_offset_big: i32,
    #[serde(default = "default_height_offset_small")]
    pub height_offset_small: i32,
    #[serde(default = "default_player_stances")]
    pub stances: usize,
    #[serde(default = "default_player_jumping_stance")]
    pub jumping_stance: usize,
    #[serde(default = "default_invincibility")]
    pub invincibility_frames: u32,
    #[serde(default = "default_pause_frames")]
    pub death_pause_frames: u32,
    #[serde(default = "default_pause_frames")]
    pub victory_pause_frames: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NpcConfig {
    #[serde(default = "default_npc_max_x")]
    pub max_speed_x: f32,
    #[serde(default = "default_npc_max_y")]
    pub max_speed_y: f32,
    #[serde(default = "default_npc_accel")]
    pub acceleration: f32,
    #[serde(default = "default_npc_width_offset")]
    pub width_offset: i32,
    #[serde(default = "default_npc_height_offset")]
    pub height_offset: i32,
    #[serde(default = "default_npc_stances")]
    pub stances: usize,
    #[serde(default = "default_erratic_turn")]
    pub erratic_turn_frames: u32,
}

/// Tile classification table. Ids in `0..count` that are neither
/// non-solid nor top-solid are fully solid.
#[derive(Clone, Debug, Deserialize)]
pub struct TileConfig {
    #[serde(default = "default_tile_count")]
    pub count: i32,
    #[serde(default = "default_non_solid")]
    pub non_solid: Vec<i32>,
    #[serde(default = "default_top_solid")]
    pub top_solid: Vec<i32>,
    #[serde(default = "default_icy")]
    pub icy: Vec<i32>,
    #[serde(default = "default_climbable")]
    pub climbable: Vec<i32>,
    #[serde(default = "default_hazard")]
    pub hazard: Vec<i32>,
    #[serde(default = "default_exit_doors")]
    pub exit_doors: Vec<i32>,
    #[serde(default = "default_locked_doors")]
    pub locked_doors: Vec<i32>,
}

// ── Defaults ──

/// Upper bound on the tile table size.
pub const MAX_TILE_COUNT: i32 = 4096;

fn default_tile_size() -> i32 { 16 }
fn default_character_size() -> i32 { 32 }
fn default_min_pixels() -> i32 { 2 }
fn default_pixels_per_stance() -> u32 { 16 }
fn default_friction() -> f32 { 0.5 }
fn default_ice_friction() -> f32 { 0.25 }
fn default_gravity() -> f32 { 0.5 }
fn default_air_control() -> f32 { 0.5 }

fn default_player_max_x() -> f32 { 6.0 }
fn default_player_max_y() -> f32 { 7.0 }
fn default_player_accel() -> f32 { 1.0 }
fn default_climb_rate() -> f32 { 2.0 }
fn default_player_width_offset() -> i32 { 9 }
fn default_height_offset_big() -> i32 { 6 }
fn default_height_offset_small() -> i32 { 13 }
fn default_player_stances() -> usize { 3 }
fn default_player_jumping_stance() -> usize { 2 }
fn default_invincibility() -> u32 { 150 } // 2.5s at 60 fps
fn default_pause_frames() -> u32 { 60 }

fn default_npc_max_x() -> f32 { 0.5 }
fn default_npc_max_y() -> f32 { 7.0 }
fn default_npc_accel() -> f32 { 0.5 }
fn default_npc_width_offset() -> i32 { 10 }
fn default_npc_height_offset() -> i32 { 13 }
fn default_npc_stances() -> usize { 2 }
fn default_erratic_turn() -> u32 { 90 }

fn default_tile_count() -> i32 { 144 }
fn default_non_solid() -> Vec<i32> {
    vec![
        21, 22, 23, 24, 25, 26, 37, 38, 39, 44, 57, 62, 63, 64, 65, 72, 73, 80,
        81, 82, 83, 84, 85, 86, 87, 88, 90, 91, 94, 95, 99, 100, 101, 102, 103,
        104, 105, 106, 108, 111, 112, 113, 114, 126,
    ]
}
fn default_top_solid() -> Vec<i32> {
    vec![
        3, 4, 5, 6, 7, 8, 9, 10, 11, 27, 28, 29, 40, 41, 42, 43, 45, 46, 47, 58,
        59, 60, 61, 76, 77, 78, 79, 96, 130, 131,
    ]
}
fn default_icy() -> Vec<i32> {
    vec![12, 13, 14, 15, 27, 28, 29, 30, 31, 32, 33, 48, 49, 50, 51, 66, 67, 68, 129]
}
fn default_climbable() -> Vec<i32> { vec![57, 73, 90, 91, 108] }
fn default_hazard() -> Vec<i32> { vec![132] }
fn default_exit_doors() -> Vec<i32> { vec![62] }
fn default_locked_doors() -> Vec<i32> { vec![80] }

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            tile_size: default_tile_size(),
            character_size: default_character_size(),
            min_pixels_per_frame: default_min_pixels(),
            pixels_per_stance_change: default_pixels_per_stance(),
            friction: default_friction(),
            ice_friction: default_ice_friction(),
            gravity: default_gravity(),
            air_control: default_air_control(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            max_speed_x: default_player_max_x(),
            max_speed_y: default_player_max_y(),
            acceleration: default_player_accel(),
            climb_rate: default_climb_rate(),
            width_offset: default_player_width_offset(),
            height_offset_big: default_height_offset_big(),
            height_offset_small: default_height_offset_small(),
            stances: default_player_stances(),
            jumping_stance: default_player_jumping_stance(),
            invincibility_frames: default_invincibility(),
            death_pause_frames: default_pause_frames(),
            victory_pause_frames: default_pause_frames(),
        }
    }
}

impl Default for NpcConfig {
    fn default() -> Self {
        NpcConfig {
            max_speed_x: default_npc_max_x(),
            max_speed_y: default_npc_max_y(),
            acceleration: default_npc_accel(),
            width_offset: default_npc_width_offset(),
            height_offset: default_npc_height_offset(),
            stances: default_npc_stances(),
            erratic_turn_frames: default_erratic_turn(),
        }
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        TileConfig {
            count: default_tile_count(),
            non_solid: default_non_solid(),
            top_solid: default_top_solid(),
            icy: default_icy(),
            climbable: default_climbable(),
            hazard: default_hazard(),
            exit_doors: default_exit_doors(),
            locked_doors: default_locked_doors(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file gracefully falls back to defaults; a broken one is
    /// reported and also falls back.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() { continue; }
            match GameConfig::from_file(&path) {
                Ok(cfg) => {
                    log::debug!("loaded {}", path.display());
                    return cfg;
                }
                Err(ConfigError::Io(e)) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
                Err(e) => {
                    log::warn!("{}: {e}; using default settings", path.display());
                    return GameConfig::default();
                }
            }
        }
        GameConfig::default()
    }

    /// Read, parse and validate one config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        GameConfig::from_toml_str(&text)
    }

    /// Parse and validate a TOML document. Absent keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if p.tile_size <= 0 || p.character_size <= 0 {
            return Err(ConfigError::Invalid("tile and character sizes must be positive".into()));
        }
        if p.min_pixels_per_frame <= 0 {
            return Err(ConfigError::Invalid("min_pixels_per_frame must be positive".into()));
        }
        if p.pixels_per_stance_change == 0 {
            return Err(ConfigError::Invalid("pixels_per_stance_change must be positive".into()));
        }
        if !(0..=MAX_TILE_COUNT).contains(&self.tiles.count) {
            return Err(ConfigError::Invalid(format!(
                "tile count must be within 0..={MAX_TILE_COUNT}"
            )));
        }

        // Written as "must hold" so NaN fails every check.
        let non_negative = [
            ("physics.friction", p.friction),
            ("physics.ice_friction", p.ice_friction),
            ("physics.gravity", p.gravity),
            ("physics.air_control", p.air_control),
            ("player.acceleration", self.player.acceleration),
            ("player.climb_rate", self.player.climb_rate),
            ("npc.acceleration", self.npc.acceleration),
        ];
        for (key, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ConfigError::Invalid(format!("{key} must be finite and >= 0, got {v}")));
            }
        }
        let positive = [
            ("player.max_speed_x", self.player.max_speed_x),
            ("player.max_speed_y", self.player.max_speed_y),
            ("npc.max_speed_x", self.npc.max_speed_x),
            ("npc.max_speed_y", self.npc.max_speed_y),
        ];
        for (key, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(ConfigError::Invalid(format!("{key} must be finite and > 0, got {v}")));
            }
        }

        let non_solid: BTreeSet<i32> = self.tiles.non_solid.iter().copied().collect();
        if let Some(id) = self.tiles.top_solid.iter().find(|id| non_solid.contains(id)) {
            return Err(ConfigError::Invalid(format!(
                "tile {id} is listed as both top-solid and non-solid"
            )));
        }
        Ok(())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.physics.tile_size, 16);
        assert_eq!(cfg.physics.character_size, 32);
        assert_eq!(cfg.player.invincibility_frames, 150);
        assert_eq!(cfg.tiles.count, 144);
        assert_eq!(cfg.tiles.exit_doors, vec![62]);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = GameConfig::from_toml_str("[player]\nmax_speed_x = 4.0\n").unwrap();
        assert_eq!(cfg.player.max_speed_x, 4.0);
        assert_eq!(cfg.player.max_speed_y, 7.0);
        assert_eq!(cfg.npc.max_speed_x, 0.5);
    }

    #[test]
    fn overlapping_tile_classes_rejected() {
        let err = GameConfig::from_toml_str("[tiles]\nnon_solid = [3]\ntop_solid = [3]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_step_rejected() {
        let err = GameConfig::from_toml_str("[physics]\nmin_pixels_per_frame = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn nan_rejected() {
        for doc in [
            "[player]\nmax_speed_y = nan\n",
            "[player]\nmax_speed_x = nan\n",
            "[npc]\nmax_speed_y = nan\n",
            "[physics]\ngravity = nan\n",
            "[physics]\nair_control = nan\n",
            "[physics]\nfriction = nan\n",
            "[player]\nacceleration = nan\n",
            "[player]\nclimb_rate = nan\n",
            "[npc]\nacceleration = nan\n",
        ] {
            let err = GameConfig::from_toml_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{doc:?} accepted");
        }
    }

    #[test]
    fn infinity_rejected() {
        let err = GameConfig::from_toml_str("[player]\nmax_speed_x = inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = GameConfig::from_toml_str("[physics]\ngravity = -inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn oversized_tile_table_rejected() {
        let err = GameConfig::from_toml_str("[tiles]\ncount = 2147483647\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = GameConfig::from_toml_str("[tiles]\ncount = -1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(GameConfig::from_toml_str("[tiles]\ncount = 4096\n").is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tilehop-no-such-dir").join("config.toml");
        let err = GameConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = GameConfig::from_toml_str("[physics\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
