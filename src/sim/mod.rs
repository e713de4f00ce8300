//! Deterministic controller simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Side effects leave through the session event queue
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{collide_with_object, collide_with_tile, set_death};
pub use input::{InputSample, InputState, sample};
pub use state::{DeathFx, GameEvent, ObjectInfo, ObjectKind, Player, Session, tile_id};
pub use tick::{TickInput, tick};
pub use timer::Timer;
