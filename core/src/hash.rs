use sha2::{Digest, Sha256};

use crate::replay::Transcript;
use crate::types::*;

fn team_byte(team: Team) -> u8 {
    match team {
        Team::Red => 0,
        Team::Blue => 1,
    }
}

/// SHA-256 over every simulation-relevant field of the world.
pub fn state_digest(state: &GameState) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(state.tick.to_le_bytes());
    hasher.update(state.seed.to_le_bytes());
    hasher.update(state.rng_state.to_le_bytes());

    hasher.update((state.terrain.heights.len() as u64).to_le_bytes());
    for y in &state.terrain.heights {
        hasher.update(y.to_le_bytes());
    }
    hasher.update((state.terrain.holes.len() as u64).to_le_bytes());
    for h in &state.terrain.holes {
        for v in [h.x, h.y, h.r] {
            hasher.update(v.to_le_bytes());
        }
    }

    for w in &state.worms {
        hasher.update([team_byte(w.team), w.slot, w.alive as u8, w.on_ground as u8]);
        for v in [w.x, w.y, w.vx, w.vy, w.angle] {
            hasher.update(v.to_le_bytes());
        }
        hasher.update(w.health.to_le_bytes());
    }

    for p in &state.projectiles {
        hasher.update([p.weapon as u8]);
        for v in [p.x, p.y, p.vx, p.vy, p.timer] {
            hasher.update(v.to_le_bytes());
        }
        hasher.update(p.bounces.to_le_bytes());
    }

    hasher.update((state.current_index as u64).to_le_bytes());
    hasher.update((state.weapon_index as u64).to_le_bytes());
    hasher.update([state.charging as u8, state.game_over as u8]);
    hasher.update(state.charge.to_le_bytes());
    hasher.update(state.charge_dir.to_le_bytes());
    let winner = match state.winner {
        None => 0u8,
        Some(Winner::Team(t)) => 1 + team_byte(t),
        Some(Winner::Nobody) => 3,
    };
    hasher.update([winner]);
    hasher.update(state.wind.to_le_bytes());
    hasher.update(state.turn_timer.to_le_bytes());
    hasher.finalize().into()
}

/// SHA-256 of a transcript's seed, clock and input stream.
pub fn hash_transcript(transcript: &Transcript) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(transcript.seed.to_le_bytes());
    hasher.update(transcript.tick_rate.to_le_bytes());
    for input in &transcript.inputs {
        hasher.update(input.tick.to_le_bytes());
        hasher.update([input.action as u8]);
        hasher.update(input.key.code().as_bytes());
        hasher.update([0]);
    }
    hasher.finalize().into()
}
