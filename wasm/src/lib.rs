use artillery_core::{
    AiConfig, ClientMessage, ClientView, GameConfig, GameEvent, InputAction, Key, LocalGame, Snapshot, Team,
    TICK_RATE,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Install panic hook so WASM panics show in browser console instead of silently freezing.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn parse_action(action: &str) -> Option<InputAction> {
    match action {
        "keydown" => Some(InputAction::KeyDown),
        "keyup" => Some(InputAction::KeyUp),
        _ => None,
    }
}

/// Per-step happenings the renderer animates.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum JsEvent {
    Fired { weapon: String, power: f64 },
    Crater { x: f64, y: f64, radius: f64 },
    WormKilled { index: usize },
    TurnChanged { index: usize },
    GameOver { winner: String },
}

impl From<&GameEvent> for JsEvent {
    fn from(e: &GameEvent) -> Self {
        match *e {
            GameEvent::Fired { weapon, power } => JsEvent::Fired {
                weapon: format!("{weapon:?}").to_lowercase(),
                power,
            },
            GameEvent::Crater { x, y, radius } => JsEvent::Crater { x, y, radius },
            GameEvent::WormKilled { index } => JsEvent::WormKilled { index },
            GameEvent::TurnChanged { index } => JsEvent::TurnChanged { index },
            GameEvent::GameOver { winner } => JsEvent::GameOver {
                winner: winner.to_string(),
            },
        }
    }
}

/// Interpolated positions for one render frame.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsPose {
    x: f64,
    y: f64,
    angle: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsFrame {
    worms: Vec<JsPose>,
    projectiles: Vec<[f64; 2]>,
}

// ── Single player ───────────────────────────────────────────

/// Local authoritative game, optionally against the computer.
#[wasm_bindgen]
pub struct WasmGame {
    inner: LocalGame,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config_json` may be empty or any subset of the camelCase rule keys.
    /// `ai_team` is "Red", "Blue" or empty for two humans at one keyboard.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, config_json: &str, ai_team: &str) -> WasmGame {
        let config: GameConfig = serde_json::from_str(config_json).unwrap_or_default();
        let mut inner = LocalGame::new(seed, config, TICK_RATE);
        if let Some(team) = Team::from_name(ai_team) {
            inner.set_ai(Some((team, AiConfig::default())));
        }
        WasmGame { inner }
    }

    /// Forward a DOM key event. Unknown codes are ignored.
    pub fn input(&mut self, action: &str, code: &str) -> Result<JsValue, JsValue> {
        let event = match (parse_action(action), Key::from_code(code)) {
            (Some(action), Some(key)) => self.inner.input(action, key),
            _ => None,
        };
        to_js(&event.as_ref().map(JsEvent::from))
    }

    /// Advance one fixed tick and return what happened.
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        let events: Vec<JsEvent> = self.inner.tick().iter().map(JsEvent::from).collect();
        to_js(&events)
    }

    pub fn reset(&mut self, seed: u32) {
        self.inner.reset(seed);
    }

    /// Full snapshot including terrain, in the same shape the server sends.
    pub fn export_state(&self) -> Result<JsValue, JsValue> {
        to_js(&Snapshot::full(self.inner.state()))
    }

    /// Replay transcript of the current match as JSON.
    pub fn transcript_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.transcript()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn state_digest(&self) -> String {
        hex::encode(artillery_core::state_digest(self.inner.state()))
    }

    pub fn tick_count(&self) -> u32 {
        self.inner.state().tick
    }

    pub fn game_over(&self) -> bool {
        self.inner.state().game_over
    }
}

// ── Network client ──────────────────────────────────────────

/// Thin client: feeds server frames in, hands interpolated frames out.
#[wasm_bindgen]
pub struct WasmClient {
    inner: ClientView,
}

impl Default for WasmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmClient {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmClient {
        WasmClient {
            inner: ClientView::new(),
        }
    }

    /// Apply one server text frame. Returns false for unreadable frames.
    pub fn handle_message(&mut self, text: &str, now_ms: f64) -> bool {
        match self.inner.handle_text(text, now_ms) {
            Ok(()) => true,
            Err(err) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!("dropped server message: {err}")));
                false
            }
        }
    }

    /// Text frame to send for a DOM key event, if it is one the server knows.
    pub fn encode_input(&self, action: &str, code: &str) -> Option<String> {
        let action = parse_action(action)?;
        let key = Key::from_code(code)?;
        ClientMessage::input(action, key).encode().ok()
    }

    pub fn encode_join(&self) -> Option<String> {
        ClientMessage::Join.encode().ok()
    }

    pub fn encode_reset(&self, seed: Option<u32>) -> Option<String> {
        ClientMessage::reset(seed).encode().ok()
    }

    pub fn is_my_turn(&self) -> bool {
        self.inner.is_my_turn()
    }

    pub fn seat(&self) -> Option<String> {
        self.inner.seat.map(|s| format!("{s:?}"))
    }

    pub fn map_name(&self) -> String {
        self.inner.world.map_name.clone()
    }

    pub fn wind(&self) -> i32 {
        self.inner.world.wind
    }

    pub fn terrain(&self) -> Vec<f64> {
        self.inner.world.terrain.heights.clone()
    }

    /// Positions blended between the last two snapshots, or null before any.
    pub fn frame(&self, now_ms: f64) -> Result<JsValue, JsValue> {
        let frame = self.inner.interpolated(now_ms).map(|f| JsFrame {
            worms: f
                .worms
                .iter()
                .map(|w| JsPose {
                    x: w.x,
                    y: w.y,
                    angle: w.angle,
                })
                .collect(),
            projectiles: f.projectiles.iter().map(|&(x, y)| [x, y]).collect(),
        });
        to_js(&frame)
    }

    /// Cave pockets under the surface, as `{x, y, r}` circles.
    pub fn holes(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.world.terrain.holes)
    }

    /// Last known world without terrain, for HUD and sprites.
    pub fn world(&self) -> Result<JsValue, JsValue> {
        let w = &self.inner.world;
        to_js(&serde_json::json!({
            "worms": w.worms,
            "projectiles": w.projectiles,
            "currentIndex": w.current_index,
            "weaponIndex": w.weapon_index,
            "charging": w.charging,
            "charge": w.charge,
            "gameOver": w.game_over,
            "winner": w.winner,
            "wind": w.wind,
            "turnTimer": w.turn_timer,
            "turnTimerMax": w.turn_timer_max,
            "players": self.inner.players,
        }))
    }
}
