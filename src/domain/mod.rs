/// Pure game rules over an immutable tile map: classification, lookup,
/// motion/collision and the character state machines.

pub mod grid;
pub mod input;
pub mod kinematics;
pub mod npc;
pub mod player;
pub mod tile;
