//! Spike Steps headless demo host
//!
//! Stands in for the game engine: base physics (gravity, integration,
//! ground contact), a strip of tiles with a key and a door, and spike
//! balls that fall once the controller asks for them. Runs a scripted
//! input tape through the controller and logs the event stream.

use glam::Vec2;

use spike_steps::consts::SIM_DT;
use spike_steps::sim::{
    self, GameEvent, InputState, ObjectInfo, ObjectKind, Player, Session, TickInput, tile_id,
};
use spike_steps::tile_x;

const FLOOR_Y: f32 = 1.0;
const GRAVITY: f32 = -0.008;
const KEY_COLUMN: i32 = 30;
const DOOR_COLUMN: i32 = 150;
const MAX_FRAMES: u32 = 60 * 120;

struct SpikeBall {
    pos: Vec2,
    vel: Vec2,
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    log::info!("Spike Steps demo starting with seed {seed}");

    let mut player = Player::new(Vec2::new(2.5, FLOOR_Y), seed);
    let mut session = Session::default();
    player.set_start_game_params();

    let mut spikes: Vec<SpikeBall> = Vec::new();
    let mut key_on_map = true;

    for frame in 0..MAX_FRAMES {
        // Base physics update: gravity, integration, floor contact
        player.vel.y += GRAVITY;
        player.pos += player.vel;
        if player.pos.y <= FLOOR_Y {
            player.pos.y = FLOOR_Y;
            player.vel.y = player.vel.y.max(0.0);
        }
        let on_ground = player.pos.y <= FLOOR_Y;

        for spike in &mut spikes {
            spike.vel.y += GRAVITY;
            spike.pos += spike.vel;
        }

        // Input tape: walk right the whole run, tap jump every few seconds
        let input_state = InputState {
            right: true,
            up: frame % 240 >= 200 && frame % 240 < 210,
            ..Default::default()
        };

        let tick_input = TickInput {
            input: sim::sample(&input_state),
            on_ground,
        };
        sim::tick(&mut player, &mut session, &tick_input, SIM_DT);

        // Host collision pass
        if player.alive {
            let column = tile_x(player.pos.x);
            if key_on_map && column == KEY_COLUMN {
                sim::collide_with_tile(
                    &mut player,
                    &mut session,
                    tile_id::KEY,
                    Vec2::new(KEY_COLUMN as f32, FLOOR_Y),
                );
            }
            if column == DOOR_COLUMN {
                sim::collide_with_tile(
                    &mut player,
                    &mut session,
                    tile_id::DOOR,
                    Vec2::new(DOOR_COLUMN as f32, FLOOR_Y),
                );
            }
        }
        for spike in &spikes {
            if spike.pos.distance(player.pos) < 0.5 {
                sim::collide_with_object(
                    &mut player,
                    &mut session,
                    &ObjectInfo {
                        kind: ObjectKind::SpikeBall,
                        vel: spike.vel,
                    },
                );
            }
        }
        spikes.retain(|s| s.pos.y > -10.0);

        for event in session.drain_events() {
            match event {
                GameEvent::Jump => log::debug!("[{frame}] jump sound"),
                GameEvent::SpawnSpikeBall(pos) => {
                    log::info!("[{frame}] spike ball incoming at {pos}");
                    spikes.push(SpikeBall {
                        pos,
                        vel: Vec2::ZERO,
                    });
                }
                GameEvent::StepCounted { total } => {
                    log::debug!("[{frame}] step {total} (counter {})", player.step_count());
                }
                GameEvent::DestroyTile(pos) => {
                    key_on_map = false;
                    log::info!("[{frame}] key tile destroyed at {pos}");
                }
                GameEvent::Died => log::info!("[{frame}] player died"),
                GameEvent::DeathAnimationOver => {
                    session.game_over = Some(false);
                    log::info!("[{frame}] death animation over");
                }
                GameEvent::GameOver { victory } => {
                    log::info!("[{frame}] game over, victory: {victory}");
                }
            }
        }
        if session.game_over.is_some() {
            break;
        }
    }

    log::info!(
        "demo finished: {} steps counted, outcome {:?}",
        session.total_steps,
        session.game_over
    );
}
