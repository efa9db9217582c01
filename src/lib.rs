//! Tilehop: movement, collision and character-state engine for a
//! tile-based side-scroller.
//!
//! `domain` holds the rules (tile classes, motion, player and NPC state
//! machines); `sim` owns a running session and advances it one frame at a
//! time through `sim::step`. Rendering, audio and input devices belong
//! to the host.

pub mod config;
pub mod domain;
pub mod sim;
