//! Rendering contract
//!
//! The core never draws. After every tick and every input-driven change it
//! hands the host read-only views of the falling set and the active fruit;
//! the host maps `Fruit::tier` to an asset and paints it.

use crate::sim::Fruit;

/// Receives the playfield after each change
pub trait Renderer {
    fn render(&mut self, falling: &[Fruit], active: Option<&Fruit>);
}

/// Draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _falling: &[Fruit], _active: Option<&Fruit>) {}
}

/// Writes a one-line summary of each frame to the `trace` log
#[derive(Debug, Default, Clone)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, falling: &[Fruit], active: Option<&Fruit>) {
        self.frames += 1;
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let tiers: Vec<usize> = falling.iter().map(|f| f.tier).collect();
        match active {
            Some(a) => log::trace!(
                "frame {}: falling tiers {:?}, active tier {} at x={:.1}",
                self.frames,
                tiers,
                a.tier,
                a.pos.x
            ),
            None => log::trace!("frame {}: falling tiers {:?}", self.frames, tiers),
        }
    }
}
