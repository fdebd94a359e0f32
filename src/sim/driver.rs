//! Wall-clock to tick conversion
//!
//! The core has no timers. Hosts that receive frame callbacks with elapsed
//! time feed it here and the driver runs whole ticks at the configured
//! interval.

use super::state::{Game, GamePhase};
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};

/// Fixed-step accumulator
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    interval_ms: f64,
    accumulator_ms: f64,
    stopped: bool,
}

impl FixedStepDriver {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms.max(1)),
            accumulator_ms: 0.0,
            stopped: false,
        }
    }

    /// Driver matching the game's tick interval
    pub fn for_game(game: &Game) -> Self {
        Self::new(game.settings().tick_interval_ms)
    }

    /// Whether ticks are still being scheduled
    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    /// Feed `elapsed_ms` of wall-clock time and run the ticks it covers.
    ///
    /// At most [`MAX_SUBSTEPS`] ticks run per call and elapsed time is capped
    /// at [`MAX_FRAME_MS`] so a stalled host cannot spiral. Once the game is
    /// over the driver stops for good and returns 0. A non-finite
    /// `elapsed_ms` counts as no time passing.
    pub fn advance(&mut self, game: &mut Game, elapsed_ms: f64) -> u32 {
        if self.stopped || !game.is_running() {
            self.stop();
            return 0;
        }
        if !elapsed_ms.is_finite() {
            log::warn!("Ignoring non-finite frame time: {}", elapsed_ms);
            return 0;
        }

        self.accumulator_ms += elapsed_ms.clamp(0.0, MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator_ms >= self.interval_ms && substeps < MAX_SUBSTEPS {
            self.accumulator_ms -= self.interval_ms;
            substeps += 1;
            if game.tick() == GamePhase::GameOver {
                self.stop();
                break;
            }
        }
        substeps
    }

    /// Stop scheduling. Idempotent.
    pub fn stop(&mut self) {
        if !self.stopped {
            log::debug!("Tick loop stopped");
        }
        self.stopped = true;
        self.accumulator_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::InputEvent;
    use crate::settings::Settings;
    use crate::sim::Collaborators;

    fn game() -> Game {
        let settings = Settings {
            ready_delay_ms: 30,
            ..Default::default()
        };
        Game::new(settings, 42, Collaborators::default()).unwrap()
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut game = game();
        let mut driver = FixedStepDriver::for_game(&game);
        assert_eq!(driver.advance(&mut game, 4.0), 0);
        assert_eq!(driver.advance(&mut game, 4.0), 0);
        assert_eq!(driver.advance(&mut game, 4.0), 1);
        assert_eq!(driver.advance(&mut game, 25.0), 2);
    }

    #[test]
    fn test_caps_substeps() {
        let mut game = game();
        let mut driver = FixedStepDriver::for_game(&game);
        assert_eq!(driver.advance(&mut game, 10_000.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_non_finite_frame_time_is_ignored() {
        let mut game = game();
        let mut driver = FixedStepDriver::for_game(&game);
        assert_eq!(driver.advance(&mut game, f64::NAN), 0);
        assert_eq!(driver.advance(&mut game, f64::INFINITY), 0);
        assert_eq!(driver.advance(&mut game, f64::NEG_INFINITY), 0);

        // The accumulator is still usable afterwards
        assert_eq!(driver.advance(&mut game, 10.0), 1);
        let mut frames = 0;
        while game.phase() == GamePhase::Ready && frames < 10 {
            driver.advance(&mut game, 16.0);
            frames += 1;
        }
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(driver.is_running());
    }

    #[test]
    fn test_ready_delay_then_playing() {
        let mut game = game();
        let mut driver = FixedStepDriver::for_game(&game);
        driver.advance(&mut game, 20.0);
        assert_eq!(game.phase(), GamePhase::Ready);
        driver.advance(&mut game, 10.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(driver.is_running());
    }

    #[test]
    fn test_stops_on_game_over() {
        let mut game = game();
        let mut driver = FixedStepDriver::for_game(&game);
        game.start();
        game.handle_input(InputEvent::Drop);

        let mut frames = 0;
        while driver.is_running() && frames < 10_000 {
            driver.advance(&mut game, 16.0);
            frames += 1;
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(!driver.is_running());

        let ticks = game.time_ticks();
        assert_eq!(driver.advance(&mut game, 100.0), 0);
        assert_eq!(game.time_ticks(), ticks);
        driver.stop();
        assert!(!driver.is_running());
    }
}
