//! Fruit Merge entry point
//!
//! Native builds run headless sessions driven by a simple autopilot, logging
//! frames and persisting the best score to the config directory. The web
//! build is a library (`WebGame`) driven by the page.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use fruit_merge::platform::{FileScoreStore, InputEvent};
    use fruit_merge::renderer::LogRenderer;
    use fruit_merge::sim::{Collaborators, FixedStepDriver, Game};
    use fruit_merge::{GameMode, LossPolicy, Settings};
    use glam::Vec2;

    /// Run headless Fruit Merge sessions with an autopilot.
    #[derive(Debug, Parser)]
    #[command(name = "fruit-merge", version, about)]
    pub struct Args {
        /// RNG seed for the first round. Uses the clock if not set.
        pub seed: Option<u64>,

        /// Number of rounds to play; each round uses the next seed.
        #[arg(short, long, default_value = "1", value_name = "N")]
        pub rounds: u32,

        /// Settings file (JSON). Missing or invalid files fall back to defaults.
        #[arg(short, long, value_name = "FILE", default_value = Settings::DEFAULT_PATH)]
        pub settings: PathBuf,

        /// Loss rule override: floor or strict.
        #[arg(short, long, value_name = "POLICY")]
        pub loss_policy: Option<LossPolicy>,

        /// Play tap mode instead of drop-and-merge.
        #[arg(long)]
        pub tap: bool,

        /// Write the effective settings to FILE and exit.
        #[arg(long, value_name = "FILE")]
        pub save_settings: Option<PathBuf>,
    }

    /// Give up on a session that never ends
    const MAX_TICKS: u64 = 200_000;

    /// Steer the active fruit over the lowest falling fruit of the same tier
    /// and drop it there. In tap mode, tap the lowest fruit instead.
    fn autopilot(game: &mut Game) {
        if game.settings().mode == GameMode::Tap {
            let lowest = game
                .falling()
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|f| f.pos + Vec2::splat(f.size / 2.0));
            if let Some(point) = lowest {
                game.handle_input(InputEvent::TapAt(point));
            }
        }

        let Some((tier, x)) = game.active().map(|a| (a.tier, a.pos.x)) else {
            return;
        };
        let target = game
            .falling()
            .iter()
            .filter(|f| f.tier == tier)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|f| f.pos.x)
            .unwrap_or(x);

        let dx = target - x;
        if dx.abs() < game.settings().move_step {
            game.handle_input(InputEvent::Drop);
        } else if dx < 0.0 {
            game.move_left();
        } else {
            game.move_right();
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::parse();
        env_logger::init();
        log::info!("Fruit Merge (native) starting...");

        let mut settings = Settings::load_or_default(&args.settings);
        if let Some(policy) = args.loss_policy {
            settings.loss_policy = policy;
        }
        if args.tap {
            settings.mode = GameMode::Tap;
        }

        if let Some(path) = &args.save_settings {
            settings.validate()?;
            settings.save_to(path)?;
            println!("settings written to {}", path.display());
            return Ok(());
        }

        let seed = args.seed.unwrap_or_else(clock_seed);
        let rounds = args.rounds;
        log::info!("Loss policy: {}", settings.loss_policy);
        let scores = FileScoreStore::new(FileScoreStore::default_path());
        log::info!("Best score file: {}", scores.path().display());

        let mut io = Collaborators::default()
            .with_renderer(LogRenderer::new())
            .with_scores(scores);

        for round in 0..rounds {
            let round_seed = seed.wrapping_add(u64::from(round));
            let mut game = Game::new(settings.clone(), round_seed, io)?;
            let mut driver = FixedStepDriver::for_game(&game);
            let frame_ms = f64::from(settings.tick_interval_ms);

            while driver.is_running() && game.time_ticks() < MAX_TICKS {
                autopilot(&mut game);
                driver.advance(&mut game, frame_ms);
            }

            println!(
                "round {} (seed {}): score {}, best {}, {} ticks, {:?}",
                round + 1,
                round_seed,
                game.score(),
                game.best_score(),
                game.time_ticks(),
                game.phase()
            );
            io = game.into_collaborators();
        }

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition() {
            Args::command().debug_assert();
        }

        #[test]
        fn test_cli_defaults() {
            let args = Args::try_parse_from(["fruit-merge"]).unwrap();
            assert_eq!(args.seed, None);
            assert_eq!(args.rounds, 1);
            assert_eq!(args.settings, PathBuf::from(Settings::DEFAULT_PATH));
            assert_eq!(args.loss_policy, None);
            assert!(!args.tap);
        }

        #[test]
        fn test_cli_options() {
            let args = Args::try_parse_from([
                "fruit-merge",
                "42",
                "--rounds",
                "3",
                "--loss-policy",
                "strict",
                "--tap",
            ])
            .unwrap();
            assert_eq!(args.seed, Some(42));
            assert_eq!(args.rounds, 3);
            assert_eq!(args.loss_policy, Some(LossPolicy::Strict));
            assert!(args.tap);

            assert!(Args::try_parse_from(["fruit-merge", "--loss-policy", "never"]).is_err());
            assert!(Args::try_parse_from(["fruit-merge", "not-a-seed"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `WebGame`, this is just to satisfy the compiler
}
