//! Animation scheduler: one tick, one frame.
//!
//! Each tick is fully synchronous — advance the firework overlay, composite
//! the frame, map every pixel through the topology, hand the flat buffer to
//! the sink — and the per-tick sleep is the only suspension point. The
//! clock is injected so tests advance time without sleeping, and the quit
//! flag is checked exactly once per tick before any of the frame is
//! written, so cancellation never leaves a partial frame at the sink.

use crate::canvas::Canvas;
use crate::fireworks::FireworkSystem;
use crate::is_running;
use crate::mapping::{PanelTopology, TopologyError};
use crate::sink::{OutputSink, SinkError};
use crate::Color;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// How a scroll pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// The content scrolled for its full loop count.
    Completed,
    /// The quit signal fired; the pass stopped cleanly between frames.
    Cancelled,
}

// ── Clock ──────────────────────────────────────────────────────────

/// Frame pacing dependency. Injectable so tests tick instantly.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock pacing for the real display loop.
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

// ── Scroll state ───────────────────────────────────────────────────

/// Monotonic scroll offset over a strip of known width.
///
/// The offset only grows; wrap-around within the content is the sampling
/// window's job (`offset mod content_width`). A pass is finished once the
/// offset reaches `content_width * loops`.
#[derive(Clone, Copy, Debug)]
pub struct ScrollState {
    offset: u32,
    end: u32,
}

impl ScrollState {
    pub fn new(content_width: u32, loops: u32) -> Self {
        Self {
            offset: 0,
            end: content_width * loops,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Step forward; returns true once the pass is done. New content means
    /// a new `ScrollState`.
    pub fn advance(&mut self, step: u32) -> bool {
        self.offset = self.offset.saturating_add(step);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.offset >= self.end
    }
}

// ── Scheduler ──────────────────────────────────────────────────────

pub struct Scheduler {
    topology: PanelTopology,
    background: Color,
    brightness: u8,
    scroll_step: u32,
    frame_delay: Duration,
}

impl Scheduler {
    pub fn new(
        topology: PanelTopology,
        background: Color,
        brightness: u8,
        scroll_step: u32,
        frame_delay: Duration,
    ) -> Self {
        Self {
            topology,
            background,
            brightness,
            scroll_step: scroll_step.max(1),
            frame_delay,
        }
    }

    /// Scroll `strip` across the matrix for `loops` complete passes of its
    /// width, compositing the firework overlay beneath it.
    pub fn run_pass(
        &self,
        strip: &Canvas,
        loops: u32,
        fireworks: &mut FireworkSystem,
        sink: &mut dyn OutputSink,
        clock: &mut dyn Clock,
        quit: &AtomicBool,
    ) -> Result<PassOutcome, TickError> {
        let mut scroll = ScrollState::new(strip.width(), loops);

        loop {
            // The single cancellation point: before any frame work.
            if !is_running(quit) || sink.poll_quit() {
                return Ok(PassOutcome::Cancelled);
            }

            let frame = self.compose_frame(strip, scroll.offset(), fireworks);
            self.emit(&frame, sink)?;

            if scroll.advance(self.scroll_step) {
                return Ok(PassOutcome::Completed);
            }
            clock.sleep(self.frame_delay);
        }
    }

    /// Hold a screen-sized banner for `ticks` frames while the fireworks
    /// keep animating behind it.
    pub fn run_hold(
        &self,
        banner: &Canvas,
        ticks: u64,
        fireworks: &mut FireworkSystem,
        sink: &mut dyn OutputSink,
        clock: &mut dyn Clock,
        quit: &AtomicBool,
    ) -> Result<PassOutcome, TickError> {
        for tick in 0..ticks {
            if !is_running(quit) || sink.poll_quit() {
                return Ok(PassOutcome::Cancelled);
            }

            let frame = self.compose_frame(banner, 0, fireworks);
            self.emit(&frame, sink)?;

            if tick + 1 < ticks {
                clock.sleep(self.frame_delay);
            }
        }
        Ok(PassOutcome::Completed)
    }

    /// Build one output-sized frame: background, firework overlay, then the
    /// strip window with black treated as transparent.
    fn compose_frame(&self, strip: &Canvas, offset: u32, fireworks: &mut FireworkSystem) -> Canvas {
        fireworks.advance(self.frame_delay.as_secs_f32());

        let mut frame = Canvas::new(self.topology.led_cols(), self.topology.led_rows());
        frame.fill(self.background);
        fireworks.draw(&mut frame);

        let window = strip.sample_window(offset, frame.width());
        frame.overlay(&window);
        frame
    }

    fn emit(&self, frame: &Canvas, sink: &mut dyn OutputSink) -> Result<(), TickError> {
        let flat = self.flatten(frame)?;
        sink.write(&flat)?;
        sink.present()?;
        Ok(())
    }

    /// Map every frame pixel to its chain position, applying the global
    /// brightness scalar on the way out.
    pub fn flatten(&self, frame: &Canvas) -> Result<Vec<Color>, TopologyError> {
        let mut flat = vec![Color::BLACK; self.topology.led_count()];
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let color = frame.get_pixel(x, y).unwrap_or(Color::BLACK);
                flat[self.topology.map(x, y)?] = color.apply_brightness(self.brightness);
            }
        }
        Ok(flat)
    }
}
