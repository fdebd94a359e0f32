//! Browser bindings (WASM only)
//!
//! The page owns the canvas, the buttons and the interval timer. It calls
//! into [`WebGame`] for ticks and input and draws from the JSON snapshot.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlAudioElement, Storage};

use super::{AudioController, InputEvent, ScoreStore};
use crate::consts::SCORE_STORAGE_KEY;
use crate::settings::Settings;
use crate::sim::{Collaborators, FixedStepDriver, Game, GamePhase};

fn local_storage() -> Option<Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Best score in LocalStorage under `maxScore`
#[derive(Debug, Default)]
pub struct LocalStorageScoreStore;

impl ScoreStore for LocalStorageScoreStore {
    fn get(&self) -> u32 {
        local_storage()
            .and_then(|s| s.get_item(SCORE_STORAGE_KEY).ok().flatten())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn set(&mut self, value: u32) {
        match local_storage() {
            Some(storage) => {
                if storage
                    .set_item(SCORE_STORAGE_KEY, &value.to_string())
                    .is_err()
                {
                    log::warn!("Could not save best score");
                }
            }
            None => log::warn!("LocalStorage unavailable, best score not saved"),
        }
    }
}

/// Background music through an `<audio>` element on the page
#[derive(Debug, Default)]
pub struct BgmAudio {
    element: Option<HtmlAudioElement>,
}

impl BgmAudio {
    pub fn new(element_id: &str) -> Self {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
            .and_then(|e| e.dyn_into::<HtmlAudioElement>().ok());
        if element.is_none() {
            log::warn!("No <audio id=\"{}\"> element, music disabled", element_id);
        }
        Self { element }
    }
}

impl AudioController for BgmAudio {
    fn play(&mut self) {
        if let Some(el) = &self.element {
            // Autoplay may be refused until the user interacts with the page
            if let Err(e) = el.play() {
                log::warn!("Music playback refused: {:?}", e);
            }
        }
    }

    fn pause(&mut self) {
        if let Some(el) = &self.element {
            if let Err(e) = el.pause() {
                log::warn!("Music pause failed: {:?}", e);
            }
        }
    }
}

fn phase_name(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Ready => "ready",
        GamePhase::Playing => "playing",
        GamePhase::GameOver => "gameover",
    }
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    driver: FixedStepDriver,
    bgm_id: String,
}

impl WebGame {
    fn build(bgm_id: &str) -> Result<Game, JsValue> {
        let seed = js_sys::Date::now() as u64;
        let io = Collaborators::default()
            .with_scores(LocalStorageScoreStore)
            .with_audio(BgmAudio::new(bgm_id));
        let game = Game::new(Settings::load(), seed, io)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(game)
    }
}

#[wasm_bindgen]
impl WebGame {
    /// New session using settings from LocalStorage; `bgm_id` names the
    /// page's `<audio>` element.
    #[wasm_bindgen(constructor)]
    pub fn new(bgm_id: String) -> Result<WebGame, JsValue> {
        console_error_panic_hook::set_once();
        // Already initialised on restart
        let _ = console_log::init_with_level(log::Level::Info);

        let game = Self::build(&bgm_id)?;
        let driver = FixedStepDriver::for_game(&game);
        Ok(Self {
            game,
            driver,
            bgm_id,
        })
    }

    /// Discard the current session and begin a new one in Ready
    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.game = Self::build(&self.bgm_id)?;
        self.driver = FixedStepDriver::for_game(&self.game);
        Ok(())
    }

    /// One tick; for hosts running their own interval timer
    pub fn tick(&mut self) -> String {
        phase_name(self.game.tick()).to_string()
    }

    /// Ticks covered by `elapsed_ms` (requestAnimationFrame hosts)
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.driver.advance(&mut self.game, elapsed_ms)
    }

    pub fn start(&mut self) -> bool {
        self.game.start()
    }

    pub fn move_left(&mut self) -> bool {
        self.game.move_left()
    }

    pub fn move_right(&mut self) -> bool {
        self.game.move_right()
    }

    pub fn drop_fruit(&mut self) -> bool {
        self.game.handle_input(InputEvent::Drop)
    }

    pub fn tap(&mut self, x: f32, y: f32) -> bool {
        self.game
            .handle_input(InputEvent::TapAt(glam::Vec2::new(x, y)))
    }

    pub fn phase(&self) -> String {
        phase_name(self.game.phase()).to_string()
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn best_score(&self) -> u32 {
        self.game.best_score()
    }

    /// Falling set, active fruit and scores as JSON for the page's renderer
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Tier index → asset key table as JSON
    pub fn tiers_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.game.tiers()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
