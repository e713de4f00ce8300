//! Player and session state
//!
//! All state that must be persisted for determinism lives here. The player
//! exclusively owns its timers, counters and RNG; the session context holds
//! the run-wide accumulators and the event queue the host drains.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timer::Timer;
use crate::settings::Tuning;

/// Tile-type lookup constants shared with the host's tile map.
pub mod tile_id {
    /// Collectible key tile; destroyed on pickup
    pub const KEY: u32 = 8;
    /// Exit door tile; consumes the key and ends the run
    pub const DOOR: u32 = 9;
}

/// What kind of thing the host collided the player with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A spawned hazard; contact is lethal
    SpikeBall,
    /// Anything else; resolved as a normal solid contact
    Other,
}

/// Snapshot of the colliding object, as passed by the host's collision pass.
#[derive(Debug, Clone, Copy)]
pub struct ObjectInfo {
    pub kind: ObjectKind,
    pub vel: Vec2,
}

/// Side effects the controller requests from the host. Drained once per
/// frame; the controller never calls into the engine directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play the jump sound
    Jump,
    /// Spawn a spike ball at the given tile position
    SpawnSpikeBall(Vec2),
    /// A grounded tile crossing was counted; `total` is the run-wide tally
    StepCounted { total: u64 },
    /// Remove the tile at the given position (key pickup)
    DestroyTile(Vec2),
    /// The player just died; death animation parameters are now set
    Died,
    /// The death timer ran out; host may show game-over UI
    DeathAnimationOver,
    /// The session ended
    GameOver { victory: bool },
}

/// Death tumble parameters for the host's renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathFx {
    /// Signed spin speed, radians per frame
    pub angle_velocity: f32,
    pub angle_damping: f32,
    /// Pushed behind other layers while the corpse tumbles
    pub render_order: i32,
}

/// Run-wide context: accumulators and the outgoing event queue.
///
/// Passed by reference into `tick` and the collision callbacks so the core
/// stays testable without ambient globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Total counted steps across the whole run
    pub total_steps: u64,
    /// `Some(true)` on victory, `Some(false)` on defeat, `None` while live
    pub game_over: Option<bool>,
    /// Side effects requested this frame
    pub events: Vec<GameEvent>,
}

impl Session {
    /// Take this frame's events, leaving the queue empty.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// The controlled entity: position/velocity, the seven gameplay timers,
/// step-counter and spike-burst state, and the seeded RNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Render/collision size; halved once on death
    pub size: Vec2,
    /// Facing flag: true when last horizontal input pointed left
    pub mirror: bool,
    pub alive: bool,
    pub has_key: bool,
    /// False once dead; the host skips collision response for the corpse
    pub collision_enabled: bool,
    /// Death tumble parameters, set once on death
    pub death_fx: Option<DeathFx>,

    /// Gameplay balance knobs
    pub tuning: Tuning,

    /// Indefinite flag while standing on ground, unset while airborne
    pub ground_timer: Timer,
    /// Buffered jump press window
    pub pressed_jump_timer: Timer,
    /// Running while the jump arc accepts hold acceleration
    pub jump_timer: Timer,
    /// Blocks double-counting a single tile crossing
    pub step_cooldown: Timer,
    /// Cadence between spawns within a spike burst
    pub spike_cooldown: Timer,
    /// Indefinite flag while a spike burst is running
    pub spike_in_effect: Timer,
    /// Death animation countdown
    pub death_timer: Timer,

    /// Previous-frame jump hold, for press edge detection
    pub(crate) was_holding_jump: bool,
    /// Baseline x for tile-crossing detection
    pub(crate) prev_x: f32,
    /// Crossings counted toward the next spike trigger, in [0, 12)
    pub(crate) step_count: u32,
    /// Spawns per burst; grows by one per completed burst, capped
    pub burst_capacity: u32,
    /// Spawns left in the burst in progress
    pub burst_remaining: u32,
    /// Latch so `DeathAnimationOver` fires once
    pub(crate) death_reported: bool,

    /// Run seed, kept for reproducibility reports
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl Player {
    /// Create a player at `pos` with all timers unset and burst capacity 1.
    pub fn new(pos: Vec2, seed: u64) -> Self {
        let tuning = Tuning::default();
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::ONE,
            mirror: false,
            alive: true,
            has_key: false,
            collision_enabled: true,
            death_fx: None,
            ground_timer: Timer::new(),
            pressed_jump_timer: Timer::new(),
            jump_timer: Timer::new(),
            step_cooldown: Timer::new(),
            spike_cooldown: Timer::new(),
            spike_in_effect: Timer::new(),
            death_timer: Timer::new(),
            was_holding_jump: false,
            prev_x: pos.x,
            step_count: 0,
            burst_capacity: tuning.spike_capacity_start,
            burst_remaining: tuning.spike_capacity_start,
            death_reported: false,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reset for a fresh run without reallocating the entity: unset every
    /// timer, zero the step counter, restore burst capacity and the
    /// crossing baseline, revive. Key possession survives the reset.
    pub fn set_start_game_params(&mut self) {
        self.ground_timer.unset();
        self.pressed_jump_timer.unset();
        self.jump_timer.unset();
        self.step_cooldown.unset();
        self.spike_cooldown.unset();
        self.spike_in_effect.unset();
        self.death_timer.unset();

        self.prev_x = self.pos.x;
        self.step_count = 0;
        self.burst_capacity = self.tuning.spike_capacity_start;
        self.burst_remaining = self.burst_capacity;
        self.alive = true;
        self.collision_enabled = true;
        self.size = Vec2::ONE;
        self.death_fx = None;
        self.death_reported = false;
        self.was_holding_jump = false;
    }

    pub fn set_key_state(&mut self, state: bool) {
        self.has_key = state;
    }

    /// Crossings counted toward the next spike trigger.
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Grounded is the single boolean derived from the ground timer: the
    /// timer is an indefinite flag while standing, unset while airborne.
    pub fn grounded(&self) -> bool {
        self.ground_timer.active()
    }

    /// Advance every timer by one frame.
    pub(crate) fn tick_timers(&mut self, dt: f32) {
        self.ground_timer.tick(dt);
        self.pressed_jump_timer.tick(dt);
        self.jump_timer.tick(dt);
        self.step_cooldown.tick(dt);
        self.spike_cooldown.tick(dt);
        self.spike_in_effect.tick(dt);
        self.death_timer.tick(dt);
    }
}
