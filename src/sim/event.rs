/// Events emitted during a simulation step.
/// The host consumes these for sound, effects and logging.

use crate::domain::npc::NpcKind;
use crate::domain::player::DamageCause;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Big → Small.
    PlayerDamaged { cause: DamageCause },
    /// The player respawned at the level start; a death pose follows.
    PlayerDied { cause: DamageCause },
    /// `index` is the NPC's roster position at the start of the frame.
    NpcRemoved { index: usize, kind: NpcKind },
    /// 1-based level numbers; `to` wraps back to 1 after the last level.
    LevelComplete { from: usize, to: usize },
    /// A death or victory pause has run out.
    Resumed,
}
