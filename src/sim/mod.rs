/// Session coordination: world state, level loading, the per-frame step,
/// events and presentation snapshots.

pub mod event;
pub mod level;
pub mod snapshot;
pub mod step;
pub mod world;

pub use event::GameEvent;
pub use step::step;
pub use world::World;
