//! Plays a computer-vs-computer match and prints its replay transcript.
//!
//! Usage:
//!   cargo run -p artillery-core --example bot-match -- [seed] [max_seconds] > match.json

use artillery_core::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: Seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let max_seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    let config = GameConfig::default();
    let dt = 1.0 / TICK_RATE as f64;
    let mut game = Game::new(seed, config.clone());
    let mut transcript = Transcript::new(seed, config, TICK_RATE);
    let mut pilots = [
        AiPilot::new(Team::Red, AiConfig::default(), seed ^ 0x1111_1111),
        AiPilot::new(Team::Blue, AiConfig::default(), seed ^ 0x2222_2222),
    ];

    let mut shots = 0;
    for _ in 0..max_seconds * TICK_RATE {
        for pilot in &mut pilots {
            for (action, key) in pilot.update(&game, dt) {
                transcript.record(game.state().tick, action, key);
                if let Some(GameEvent::Fired { .. }) = game.apply_input(action, key) {
                    shots += 1;
                }
            }
        }
        for event in game.step(dt) {
            if matches!(event, GameEvent::Fired { .. }) {
                shots += 1;
            }
        }
        if game.state().game_over {
            break;
        }
    }

    let state = game.state();
    let digest = state_digest(state);
    eprintln!("=== Bot match (seed {seed}) ===");
    eprintln!("Map: {}", state.map_name);
    eprintln!("Final tick: {}", state.tick);
    eprintln!("Shots fired: {shots}");
    match state.winner {
        Some(winner) => eprintln!("Winner: {winner}"),
        None => eprintln!("Winner: undecided"),
    }
    for w in &state.worms {
        eprintln!("  {} hp={} alive={}", w.id(), w.health, w.alive);
    }
    eprintln!("State digest: {}", hex::encode(digest));

    match replay::verify(&transcript, state.tick, &digest) {
        Ok(_) => eprintln!("Replay verified"),
        Err(err) => {
            eprintln!("Replay failed: {err}");
            std::process::exit(1);
        }
    }

    match serde_json::to_string(&transcript) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("Could not encode transcript: {err}");
            std::process::exit(1);
        }
    }
}
