//! Spike Steps - platformer player-controller core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, jump state machine, step
//!   counter, spike-ball bursts, collision and death handling)
//! - `settings`: Data-driven gameplay tuning
//!
//! The host engine owns rendering, tile maps, audio playback and base
//! physics integration; it drives [`sim::tick`] once per frame and drains
//! the resulting [`sim::GameEvent`]s.

pub mod settings;
pub mod sim;

pub use settings::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz frame loop)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Maximum horizontal speed (tiles per frame)
    pub const MAX_SPEED: f32 = 0.25;
    /// Per-frame horizontal acceleration from full input
    pub const MOVE_ACCEL: f32 = 0.042;
    /// Air-control factor when input pushes with current velocity
    pub const AIR_CONTROL_WITH: f32 = 0.1;
    /// Air-control factor when input brakes against current velocity
    pub const AIR_CONTROL_AGAINST: f32 = 0.2;

    /// Vertical launch speed when a jump fires
    pub const JUMP_LAUNCH_SPEED: f32 = 0.15;
    /// Extra upward acceleration per frame while the jump button stays held
    pub const JUMP_HOLD_ACCEL: f32 = 0.017;
    /// Window during which a buffered jump press stays valid (seconds)
    pub const JUMP_BUFFER_TIME: f32 = 0.3;
    /// Duration of the jump-active phase (seconds)
    pub const JUMP_ACTIVE_TIME: f32 = 0.2;

    /// Crossing count that fires the spike-ball trigger (counts 0..=11,
    /// the 12th crossing triggers)
    pub const STEP_TRIGGER_COUNT: u32 = 12;
    /// Cooldown between counted tile crossings (seconds)
    pub const STEP_COOLDOWN: f32 = 0.5;

    /// Delay between spawns within one spike-ball burst (seconds)
    pub const SPIKE_COOLDOWN_PERIOD: f32 = 0.8;
    /// Burst capacity at the start of a run
    pub const SPIKE_CAPACITY_START: u32 = 1;
    /// Burst capacity never grows past this
    pub const SPIKE_CAPACITY_MAX: u32 = 3;
    /// Number of candidate spawn tiles in the band above the player
    pub const SPIKE_SPAWN_CANDIDATES: i32 = 4;
    /// Horizontal offset of the first candidate tile
    pub const SPIKE_SPAWN_X_OFFSET: f32 = -2.0;
    /// Vertical offset of the spawn band above the player
    pub const SPIKE_SPAWN_Y_OFFSET: f32 = 2.0;

    /// Death animation duration (seconds)
    pub const DEATH_DURATION: f32 = 1.0;
    /// Spin speed range for the death tumble (radians per frame)
    pub const DEATH_SPIN_MIN: f32 = 0.14;
    pub const DEATH_SPIN_MAX: f32 = 0.22;
    /// Angular damping applied to the death tumble
    pub const DEATH_SPIN_DAMPING: f32 = 0.9;
}

/// Tile-grid column index for a world-space x coordinate
#[inline]
pub fn tile_x(x: f32) -> i32 {
    x.floor() as i32
}

/// Snap a world-space position to its tile corner
#[inline]
pub fn tile_floor(pos: Vec2) -> Vec2 {
    Vec2::new(pos.x.floor(), pos.y.floor())
}

/// Sign of a float as -1.0, 0.0 or 1.0; the movement code compares input
/// direction against velocity direction with this
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
