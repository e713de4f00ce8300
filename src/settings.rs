//! Data-driven gameplay tuning
//!
//! Every balance knob the simulation reads, in one serializable struct.
//! Defaults mirror [`crate::consts`]; hosts can persist or hot-swap a JSON
//! tuning file without recompiling.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance knobs carried by the player and read by the tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Maximum horizontal speed (tiles per frame)
    pub max_speed: f32,
    /// Per-frame horizontal acceleration from full input
    pub move_accel: f32,
    /// Air-control factor when pushing with current velocity
    pub air_control_with: f32,
    /// Air-control factor when braking against current velocity
    pub air_control_against: f32,

    /// Vertical launch speed when a jump fires
    pub jump_launch_speed: f32,
    /// Upward acceleration per frame while the jump button stays held
    pub jump_hold_accel: f32,
    /// Buffered jump press window (seconds)
    pub jump_buffer_time: f32,
    /// Jump-active phase duration (seconds)
    pub jump_active_time: f32,

    /// Crossing count that fires the spike trigger
    pub step_trigger_count: u32,
    /// Cooldown between counted crossings (seconds)
    pub step_cooldown: f32,

    /// Delay between spawns within one spike burst (seconds)
    pub spike_cooldown_period: f32,
    /// Burst capacity at the start of a run
    pub spike_capacity_start: u32,
    /// Burst capacity cap
    pub spike_capacity_max: u32,

    /// Death animation duration (seconds)
    pub death_duration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            move_accel: MOVE_ACCEL,
            air_control_with: AIR_CONTROL_WITH,
            air_control_against: AIR_CONTROL_AGAINST,
            jump_launch_speed: JUMP_LAUNCH_SPEED,
            jump_hold_accel: JUMP_HOLD_ACCEL,
            jump_buffer_time: JUMP_BUFFER_TIME,
            jump_active_time: JUMP_ACTIVE_TIME,
            step_trigger_count: STEP_TRIGGER_COUNT,
            step_cooldown: STEP_COOLDOWN,
            spike_cooldown_period: SPIKE_COOLDOWN_PERIOD,
            spike_capacity_start: SPIKE_CAPACITY_START,
            spike_capacity_max: SPIKE_CAPACITY_MAX,
            death_duration: DEATH_DURATION,
        }
    }
}

impl Tuning {
    /// Serialize for the host's settings store.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load from the host's settings store. Missing fields fall back to
    /// defaults, so old tuning files keep working.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
