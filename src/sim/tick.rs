//! Fixed timestep controller tick
//!
//! Advances the player one frame in strict system order: timers, ground
//! contact, jump state machine, step counter, movement integration, spike
//! burst sequencer. The host runs its base physics (gravity, position
//! integration, contact detection) around this and reports ground contact
//! through [`TickInput`].

use glam::Vec2;
use rand::Rng;

use super::input::InputSample;
use super::state::{GameEvent, Player, Session};
use crate::consts::{SPIKE_SPAWN_CANDIDATES, SPIKE_SPAWN_X_OFFSET, SPIKE_SPAWN_Y_OFFSET};
use crate::{sign, tile_floor, tile_x};

/// Everything the controller consumes for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Sampled directional input and jump hold
    pub input: InputSample,
    /// Host physics verdict: standing on ground this frame
    pub on_ground: bool,
}

/// Advance the controller by one fixed timestep.
///
/// While dead, gameplay systems are suppressed; the host's base physics
/// keeps integrating the tumbling corpse on its own.
pub fn tick(player: &mut Player, session: &mut Session, input: &TickInput, dt: f32) {
    player.tick_timers(dt);

    if !player.alive {
        if player.death_timer.elapsed() && !player.death_reported {
            player.death_reported = true;
            session.events.push(GameEvent::DeathAnimationOver);
            log::info!("death animation over");
        }
        return;
    }

    // Ground contact is an indefinite flag while standing, unset in air
    if input.on_ground {
        player.ground_timer.set();
    } else {
        player.ground_timer.unset();
    }

    handle_jump(player, session, input.input.jump_held);
    count_steps(player, session);

    let move_dir = air_control(player, input.input.move_dir);
    apply_move(player, move_dir);
    update_mirror(player, move_dir);

    update_spike_burst(player, session);
}

/// Dampen horizontal input while airborne: 10% when pushing with current
/// velocity, 20% when braking against it. Full authority on the ground.
fn air_control(player: &Player, mut move_dir: Vec2) -> Vec2 {
    if !player.ground_timer.is_set() {
        if sign(move_dir.x) == sign(player.vel.x) {
            move_dir.x *= player.tuning.air_control_with;
        } else {
            move_dir.x *= player.tuning.air_control_against;
        }
    }
    move_dir
}

/// Integrate horizontal velocity from (possibly damped) input, clamped to
/// max speed. Vertical velocity belongs to the jump system and the host.
fn apply_move(player: &mut Player, move_dir: Vec2) {
    let t = player.tuning;
    player.vel.x = (player.vel.x + move_dir.x * t.move_accel).clamp(-t.max_speed, t.max_speed);
}

/// Sticky facing: only a non-zero horizontal input changes the mirror flag.
fn update_mirror(player: &mut Player, move_dir: Vec2) {
    if move_dir.x != 0.0 {
        player.mirror = move_dir.x < 0.0;
    }
}

/// Jump state machine. A press buffers for a fixed window so a jump input
/// shortly before landing still fires on touchdown; holding the button
/// through the jump-active phase extends the arc.
fn handle_jump(player: &mut Player, session: &mut Session, jump_held: bool) {
    let t = player.tuning;

    if !jump_held {
        player.pressed_jump_timer.unset();
    } else if !player.was_holding_jump {
        player.pressed_jump_timer.set_for(t.jump_buffer_time);
    }
    player.was_holding_jump = jump_held;

    if player.ground_timer.active()
        && player.pressed_jump_timer.active()
        && !player.jump_timer.active()
    {
        player.vel.y = t.jump_launch_speed;
        player.jump_timer.set_for(t.jump_active_time);
        session.events.push(GameEvent::Jump);
        log::debug!("jump at x={:.2}", player.pos.x);
    }

    if player.jump_timer.active() {
        // Airborne for the rest of this frame regardless of contact
        player.ground_timer.unset();
        if jump_held && player.vel.y > 0.0 {
            player.vel.y += t.jump_hold_accel;
        }
    }
}

/// Count grounded tile crossings. The 12th crossing arms the spike burst
/// instead of counting; a cooldown prevents double-counting one crossing,
/// and the stale baseline means a multi-tile move still counts as one.
fn count_steps(player: &mut Player, session: &mut Session) {
    if tile_x(player.prev_x) == tile_x(player.pos.x)
        || player.step_cooldown.active()
        || !player.ground_timer.active()
    {
        return;
    }

    let t = player.tuning;
    if player.step_count >= t.step_trigger_count.saturating_sub(1) {
        player.step_count = 0;
        // Indefinite flag: the burst sequencer runs until it unsets this
        player.spike_in_effect.set();
        log::info!("step counter hit {}, spike burst armed", t.step_trigger_count);
    } else {
        player.step_count += 1;
        session.total_steps += 1;
        session.events.push(GameEvent::StepCounted {
            total: session.total_steps,
        });
    }
    player.step_cooldown.set_for(t.step_cooldown);
    player.prev_x = player.pos.x;
}

/// Spike-ball burst sequencer. While armed, spawns one hazard per cooldown
/// period at a random tile in the band above the player; when the burst is
/// spent, grows capacity (capped) and disarms.
fn update_spike_burst(player: &mut Player, session: &mut Session) {
    if !player.spike_in_effect.is_set() {
        return;
    }

    let t = player.tuning;
    if !player.spike_cooldown.active() && player.burst_remaining > 0 {
        let pos = pick_spike_spawn_pos(player);
        session.events.push(GameEvent::SpawnSpikeBall(pos));
        player.spike_cooldown.set_for(t.spike_cooldown_period);
        player.burst_remaining = player.burst_remaining.saturating_sub(1);
        log::debug!("spike ball spawn at {pos}, {} left in burst", player.burst_remaining);
    } else if player.burst_remaining == 0 {
        player.burst_capacity = (player.burst_capacity + 1).min(t.spike_capacity_max);
        player.burst_remaining = player.burst_capacity;
        player.spike_in_effect.unset();
        player.spike_cooldown.unset();
        log::info!("spike burst concluded, capacity now {}", player.burst_capacity);
    }
}

/// Uniform pick among the candidate tiles along a fixed band above the
/// player's current tile.
fn pick_spike_spawn_pos(player: &mut Player) -> Vec2 {
    let slot = player.rng.random_range(0..SPIKE_SPAWN_CANDIDATES);
    tile_floor(player.pos) + Vec2::new(SPIKE_SPAWN_X_OFFSET + slot as f32, SPIKE_SPAWN_Y_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn grounded_input() -> TickInput {
        TickInput {
            on_ground: true,
            ..Default::default()
        }
    }

    fn tick_frames(player: &mut Player, session: &mut Session, input: &TickInput, frames: u32) {
        for _ in 0..frames {
            tick(player, session, input, SIM_DT);
        }
    }

    #[test]
    fn test_ground_timer_tracks_contact() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();

        tick(&mut p, &mut s, &grounded_input(), SIM_DT);
        assert!(p.grounded());

        tick(&mut p, &mut s, &TickInput::default(), SIM_DT);
        assert!(!p.grounded());
        assert!(!p.ground_timer.is_set());
    }

    #[test]
    fn test_velocity_clamped_to_max_speed() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();
        let input = TickInput {
            input: InputSample {
                move_dir: Vec2::new(1.0, 0.0),
                jump_held: false,
            },
            on_ground: true,
        };

        tick_frames(&mut p, &mut s, &input, 120);
        assert!((p.vel.x - p.tuning.max_speed).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_post_move_speed_within_max(
            vel_x in -10.0f32..10.0,
            move_x in -1.0f32..1.0,
            on_ground in any::<bool>(),
        ) {
            let mut p = Player::new(Vec2::ZERO, 1);
            let mut s = Session::default();
            p.vel.x = vel_x;
            let input = TickInput {
                input: InputSample { move_dir: Vec2::new(move_x, 0.0), jump_held: false },
                on_ground,
            };
            tick(&mut p, &mut s, &input, SIM_DT);
            prop_assert!(p.vel.x.abs() <= p.tuning.max_speed + 1e-6);
        }
    }

    #[test]
    fn test_air_control_dampens_input() {
        let mut p = Player::new(Vec2::ZERO, 1);
        p.vel.x = 0.1;

        // Airborne, pushing with velocity: 10%
        let damped = air_control(&p, Vec2::new(1.0, 0.0));
        assert!((damped.x - 0.1).abs() < 1e-6);

        // Airborne, braking: 20%
        let damped = air_control(&p, Vec2::new(-1.0, 0.0));
        assert!((damped.x + 0.2).abs() < 1e-6);

        // Grounded: full authority
        p.ground_timer.set();
        let damped = air_control(&p, Vec2::new(1.0, 0.0));
        assert!((damped.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mirror_is_sticky() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();

        let left = TickInput {
            input: InputSample {
                move_dir: Vec2::new(-1.0, 0.0),
                jump_held: false,
            },
            on_ground: true,
        };
        tick(&mut p, &mut s, &left, SIM_DT);
        assert!(p.mirror);

        // Neutral input keeps the last facing
        tick(&mut p, &mut s, &grounded_input(), SIM_DT);
        assert!(p.mirror);
    }

    #[test]
    fn test_grounded_press_jumps_immediately() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();
        let jump = TickInput {
            input: InputSample {
                move_dir: Vec2::ZERO,
                jump_held: true,
            },
            on_ground: true,
        };

        tick(&mut p, &mut s, &jump, SIM_DT);
        assert!(p.vel.y > 0.0);
        assert!(p.jump_timer.active());
        assert!(s.events.contains(&GameEvent::Jump));
        // Jump-active frame counts as airborne
        assert!(!p.ground_timer.is_set());
    }

    #[test]
    fn test_release_cancels_buffered_press() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();

        // Press while airborne, then release before landing
        let airborne_jump = TickInput {
            input: InputSample {
                move_dir: Vec2::ZERO,
                jump_held: true,
            },
            on_ground: false,
        };
        tick(&mut p, &mut s, &airborne_jump, SIM_DT);
        assert!(p.pressed_jump_timer.active());

        tick(&mut p, &mut s, &TickInput::default(), SIM_DT);
        assert!(!p.pressed_jump_timer.is_set());

        // Landing now does not jump
        tick(&mut p, &mut s, &grounded_input(), SIM_DT);
        assert_eq!(p.vel.y, 0.0);
        assert!(!s.events.contains(&GameEvent::Jump));
    }

    #[test]
    fn test_buffered_press_fires_on_landing_within_window() {
        // Buffer window is 0.3s = 18 frames. Landing 17 frames (~0.28s)
        // after the press fires; 19 frames (~0.32s) after does not.
        for (airborne_frames, should_fire) in [(17u32, true), (19u32, false)] {
            let mut p = Player::new(Vec2::ZERO, 1);
            let mut s = Session::default();
            let airborne_jump = TickInput {
                input: InputSample {
                    move_dir: Vec2::ZERO,
                    jump_held: true,
                },
                on_ground: false,
            };
            let landed_jump = TickInput {
                on_ground: true,
                ..airborne_jump
            };

            tick_frames(&mut p, &mut s, &airborne_jump, airborne_frames);
            assert_eq!(p.vel.y, 0.0);

            tick(&mut p, &mut s, &landed_jump, SIM_DT);
            assert_eq!(
                s.events.contains(&GameEvent::Jump),
                should_fire,
                "landing after {airborne_frames} airborne frames"
            );
        }
    }

    #[test]
    fn test_holding_jump_extends_arc() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();
        let jump_held = TickInput {
            input: InputSample {
                move_dir: Vec2::ZERO,
                jump_held: true,
            },
            on_ground: true,
        };

        tick(&mut p, &mut s, &jump_held, SIM_DT);
        let launch_vel = p.vel.y;

        // Still holding, still rising: hold acceleration applies
        let airborne_held = TickInput {
            on_ground: false,
            ..jump_held
        };
        tick(&mut p, &mut s, &airborne_held, SIM_DT);
        assert!(p.vel.y > launch_vel);

        // Released: no further boost
        let before = p.vel.y;
        tick(&mut p, &mut s, &TickInput::default(), SIM_DT);
        assert_eq!(p.vel.y, before);
    }

    #[test]
    fn test_no_double_jump_while_active() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();
        let jump = TickInput {
            input: InputSample {
                move_dir: Vec2::ZERO,
                jump_held: true,
            },
            on_ground: true,
        };

        tick(&mut p, &mut s, &jump, SIM_DT);
        s.drain_events();

        // Host still reports contact next frame; jump timer blocks refire
        tick(&mut p, &mut s, &jump, SIM_DT);
        assert!(!s.events.contains(&GameEvent::Jump));
    }

    /// Walk the player across `n` tile boundaries, waiting out the step
    /// cooldown between crossings.
    fn cross_tiles(p: &mut Player, s: &mut Session, n: u32) {
        for _ in 0..n {
            p.pos.x += 1.0;
            tick(p, s, &grounded_input(), SIM_DT);
            // Wait out the 0.5s cooldown (30 frames)
            tick_frames(p, s, &grounded_input(), 31);
        }
    }

    #[test]
    fn test_steps_count_and_accumulate() {
        let mut p = Player::new(Vec2::new(0.5, 0.0), 1);
        let mut s = Session::default();

        cross_tiles(&mut p, &mut s, 3);
        assert_eq!(p.step_count(), 3);
        assert_eq!(s.total_steps, 3);
        assert!(s
            .drain_events()
            .contains(&GameEvent::StepCounted { total: 3 }));
    }

    #[test]
    fn test_crossing_during_cooldown_not_counted() {
        let mut p = Player::new(Vec2::new(0.5, 0.0), 1);
        let mut s = Session::default();

        p.pos.x += 1.0;
        tick(&mut p, &mut s, &grounded_input(), SIM_DT);
        assert_eq!(p.step_count(), 1);

        // Another crossing immediately after: cooldown still active
        p.pos.x += 1.0;
        tick(&mut p, &mut s, &grounded_input(), SIM_DT);
        assert_eq!(p.step_count(), 1);
    }

    #[test]
    fn test_airborne_crossing_not_counted() {
        let mut p = Player::new(Vec2::new(0.5, 0.0), 1);
        let mut s = Session::default();

        p.pos.x += 1.0;
        tick(&mut p, &mut s, &TickInput::default(), SIM_DT);
        assert_eq!(p.step_count(), 0);
        assert_eq!(s.total_steps, 0);
    }

    #[test]
    fn test_multi_tile_move_counts_once() {
        let mut p = Player::new(Vec2::new(0.5, 0.0), 1);
        let mut s = Session::default();

        // Teleport four tiles in one frame
        p.pos.x += 4.0;
        tick(&mut p, &mut s, &grounded_input(), SIM_DT);
        assert_eq!(p.step_count(), 1);
    }

    #[test]
    fn test_twelfth_crossing_arms_burst_and_resets() {
        let mut p = Player::new(Vec2::new(0.5, 0.0), 1);
        let mut s = Session::default();

        cross_tiles(&mut p, &mut s, 11);
        assert_eq!(p.step_count(), 11);
        assert!(!p.spike_in_effect.is_set());

        p.pos.x += 1.0;
        tick(&mut p, &mut s, &grounded_input(), SIM_DT);
        assert_eq!(p.step_count(), 0);
        assert!(p.spike_in_effect.is_set());
        // The trigger crossing does not add to the run total
        assert_eq!(s.total_steps, 11);
    }

    fn spawn_events(events: &[GameEvent]) -> Vec<Vec2> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::SpawnSpikeBall(pos) => Some(*pos),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_burst_capacity_escalates_one_two_three() {
        let mut p = Player::new(Vec2::new(5.5, 3.0), 42);
        let mut s = Session::default();

        // First trigger: exactly 1 spawn, then capacity 2
        p.spike_in_effect.set();
        tick_frames(&mut p, &mut s, &grounded_input(), 120);
        assert_eq!(spawn_events(&s.drain_events()).len(), 1);
        assert!(!p.spike_in_effect.is_set());
        assert_eq!(p.burst_capacity, 2);
        assert_eq!(p.burst_remaining, 2);

        // Second trigger: exactly 2 spawns, then capacity 3
        p.spike_in_effect.set();
        tick_frames(&mut p, &mut s, &grounded_input(), 120);
        assert_eq!(spawn_events(&s.drain_events()).len(), 2);
        assert_eq!(p.burst_capacity, 3);
        assert_eq!(p.burst_remaining, 3);

        // Third trigger: capacity stays capped at 3
        p.spike_in_effect.set();
        tick_frames(&mut p, &mut s, &grounded_input(), 240);
        assert_eq!(spawn_events(&s.drain_events()).len(), 3);
        assert_eq!(p.burst_capacity, 3);
    }

    #[test]
    fn test_burst_spawns_spaced_by_cooldown() {
        let mut p = Player::new(Vec2::new(5.5, 3.0), 42);
        p.burst_capacity = 2;
        p.burst_remaining = 2;
        p.spike_in_effect.set();
        let mut s = Session::default();

        let mut spawn_frames = Vec::new();
        for frame in 0u32..200 {
            tick(&mut p, &mut s, &grounded_input(), SIM_DT);
            if !spawn_events(&s.drain_events()).is_empty() {
                spawn_frames.push(frame);
            }
        }
        assert_eq!(spawn_frames.len(), 2);
        // 0.8s cooldown at 60Hz is 48 frames
        assert!(spawn_frames[1] - spawn_frames[0] >= 48);
    }

    #[test]
    fn test_spawns_land_in_band_above_player() {
        let mut p = Player::new(Vec2::new(7.3, 2.6), 42);
        p.spike_in_effect.set();
        let mut s = Session::default();

        tick_frames(&mut p, &mut s, &grounded_input(), 60);
        let spawns = spawn_events(&s.drain_events());
        assert_eq!(spawns.len(), 1);
        let pos = spawns[0];
        assert_eq!(pos.y, 4.0);
        assert!((5.0..=8.0).contains(&pos.x));
    }

    #[test]
    fn test_same_seed_same_spawn_sequence() {
        let run = |seed: u64| {
            let mut p = Player::new(Vec2::new(5.5, 3.0), seed);
            p.burst_capacity = 3;
            p.burst_remaining = 3;
            p.spike_in_effect.set();
            let mut s = Session::default();
            tick_frames(&mut p, &mut s, &grounded_input(), 300);
            spawn_events(&s.drain_events())
        };

        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn test_dead_player_skips_gameplay_systems() {
        let mut p = Player::new(Vec2::new(0.5, 0.0), 1);
        let mut s = Session::default();
        p.alive = false;
        p.death_timer.set_for(p.tuning.death_duration);

        // Moving input, a tile crossing and an armed burst all go ignored
        p.pos.x += 1.0;
        p.spike_in_effect.set();
        let input = TickInput {
            input: InputSample {
                move_dir: Vec2::new(1.0, 0.0),
                jump_held: true,
            },
            on_ground: true,
        };
        tick(&mut p, &mut s, &input, SIM_DT);

        assert_eq!(p.vel.x, 0.0);
        assert_eq!(p.step_count(), 0);
        assert!(spawn_events(&s.events).is_empty());
    }

    #[test]
    fn test_death_animation_over_fires_once() {
        let mut p = Player::new(Vec2::ZERO, 1);
        let mut s = Session::default();
        p.alive = false;
        p.death_timer.set_for(p.tuning.death_duration);

        // 1s at 60Hz plus slack
        tick_frames(&mut p, &mut s, &TickInput::default(), 90);
        let over_count = s
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::DeathAnimationOver)
            .count();
        assert_eq!(over_count, 1);
    }
}
