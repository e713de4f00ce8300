//! Countdown/flag timer primitive
//!
//! Every per-frame mechanic (ground contact, jump buffering, step cooldown,
//! spike-ball cadence, death) runs off one of these. A timer is either
//! unset, an indefinite flag (`set()`), or a countdown (`set_for()`). A
//! countdown that reaches zero stays *set* until explicitly cleared, so
//! "this already happened" remains observable after the window closes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
enum TimerState {
    #[default]
    Unset,
    /// Armed with no duration; active until unset
    Indefinite,
    /// Armed countdown; active while remaining > 0, then expired-but-set
    Countdown { remaining: f32 },
}

/// A countdown/flag value owned by exactly one gameplay concern.
///
/// All clear operations are no-ops on an already-unset timer; there is no
/// error surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timer(TimerState);

impl Timer {
    pub fn new() -> Self {
        Self(TimerState::Unset)
    }

    /// Arm as an indefinite flag: `is_set()` and `active()` until `unset()`.
    pub fn set(&mut self) {
        self.0 = TimerState::Indefinite;
    }

    /// Arm a countdown for `secs` seconds.
    pub fn set_for(&mut self, secs: f32) {
        self.0 = TimerState::Countdown { remaining: secs };
    }

    /// Clear the timer. Idempotent.
    pub fn unset(&mut self) {
        self.0 = TimerState::Unset;
    }

    /// Armed in any form, including an expired countdown.
    pub fn is_set(&self) -> bool {
        self.0 != TimerState::Unset
    }

    /// Indefinite flag, or a countdown with time remaining.
    pub fn active(&self) -> bool {
        match self.0 {
            TimerState::Unset => false,
            TimerState::Indefinite => true,
            TimerState::Countdown { remaining } => remaining > 0.0,
        }
    }

    /// A countdown that has run out but was never cleared.
    pub fn elapsed(&self) -> bool {
        self.is_set() && !self.active()
    }

    /// Advance the countdown by one frame. Indefinite flags never expire.
    pub fn tick(&mut self, dt: f32) {
        if let TimerState::Countdown { remaining } = &mut self.0 {
            *remaining -= dt;
        }
    }
}
