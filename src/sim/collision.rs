//! Collision callbacks and death handling
//!
//! The host's collision pass calls these at its own point in the frame,
//! possibly before or after the controller's tick and possibly more than
//! once for the same contact. Death effects are therefore gated on the
//! alive flag so duplicate callbacks cannot double-apply them.

use glam::Vec2;
use rand::Rng;

use super::state::{DeathFx, GameEvent, ObjectInfo, ObjectKind, Player, Session, tile_id};
use crate::consts::{DEATH_SPIN_DAMPING, DEATH_SPIN_MAX, DEATH_SPIN_MIN};
use crate::sign;

/// Resolve a contact with another entity. Returns whether the contact
/// should be treated as solid by the host.
///
/// Spike-ball contact kills; the corpse stops participating in collision
/// response from the next callback on.
pub fn collide_with_object(player: &mut Player, session: &mut Session, obj: &ObjectInfo) -> bool {
    if !player.collision_enabled {
        return false;
    }
    if obj.kind == ObjectKind::SpikeBall {
        player.collision_enabled = false;
        set_death(player, session, Some(obj));
    }
    true
}

/// Resolve a contact with a special tile. Returns whether the tile should
/// block the player (always true; the host treats door tiles as decor).
pub fn collide_with_tile(
    player: &mut Player,
    session: &mut Session,
    tile: u32,
    pos: Vec2,
) -> bool {
    if !player.collision_enabled {
        return false;
    }

    if tile == tile_id::KEY {
        player.set_key_state(true);
        session.events.push(GameEvent::DestroyTile(pos));
        log::info!("key collected at {pos}");
    } else if tile == tile_id::DOOR {
        if !player.has_key {
            return true;
        }
        player.set_key_state(false);
        session.game_over = Some(true);
        session.events.push(GameEvent::GameOver { victory: true });
        log::info!("door unlocked, run complete");
    }
    true
}

/// Kill the player: arm the death timer and set the tumble parameters.
/// No-op on an already-dead player.
pub fn set_death(player: &mut Player, session: &mut Session, source: Option<&ObjectInfo>) {
    if !player.alive {
        return;
    }
    player.alive = false;
    player.death_timer.set_for(player.tuning.death_duration);
    apply_death_fx(player, source);
    session.events.push(GameEvent::Died);
    log::info!("player died at {}", player.pos);
}

/// Death tumble: halve the sprite, spin away from the killer (or a random
/// side when its velocity gives no direction), sink behind other layers.
fn apply_death_fx(player: &mut Player, source: Option<&ObjectInfo>) {
    player.size *= 0.5;

    let fall_direction = match source {
        Some(obj) if obj.vel.x != 0.0 => sign(obj.vel.x),
        _ => {
            if player.rng.random::<bool>() {
                1.0
            } else {
                -1.0
            }
        }
    };
    player.death_fx = Some(DeathFx {
        angle_velocity: fall_direction * player.rng.random_range(DEATH_SPIN_MIN..DEATH_SPIN_MAX),
        angle_damping: DEATH_SPIN_DAMPING,
        render_order: -1,
    });
}
