//! Output sinks: where finished frames go.
//!
//! The scheduler hands every sink the same thing — a flat, chain-ordered
//! color buffer — followed by `present()`. Three consumers:
//! - [`MemorySink`]: records frames for tests.
//! - [`SimulatorSink`]: un-maps the chain back to a raster and writes
//!   scaled PNG snapshots, standing in for a display window on the host.
//! - [`SmartLedSink`]: adapts any `smart_leds` driver; the WS281x wire
//!   timing stays the driver crate's problem.
//!
//! A sink is a single-writer resource: one frame in flight at a time, and
//! `present()` commits the previously written buffer atomically.

use crate::Color;
use crate::mapping::{PanelTopology, TopologyError};
use image::{Rgb, RgbImage};
use smart_leds::{RGB8, SmartLedsWrite};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("frame has {got} pixels, sink expects {expected}")]
    FrameSize { expected: usize, got: usize },
    #[error("presented with no frame written")]
    NothingStaged,
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error("snapshot failed: {0}")]
    Snapshot(#[from] image::ImageError),
    #[error("driver write failed: {0}")]
    Driver(String),
}

/// A consumer of finished frames.
pub trait OutputSink {
    fn led_count(&self) -> usize;

    /// Stage a full chain-ordered frame. Must be followed by [`present`]
    /// before the next write.
    ///
    /// [`present`]: OutputSink::present
    fn write(&mut self, frame: &[Color]) -> Result<(), SinkError>;

    /// Commit the staged frame. Treated as atomic by the scheduler.
    fn present(&mut self) -> Result<(), SinkError>;

    /// Polled once per tick; true requests a cooperative stop.
    fn poll_quit(&mut self) -> bool {
        false
    }
}

fn check_len(expected: usize, frame: &[Color]) -> Result<(), SinkError> {
    if frame.len() != expected {
        return Err(SinkError::FrameSize {
            expected,
            got: frame.len(),
        });
    }
    Ok(())
}

// ── Memory sink ────────────────────────────────────────────────────

/// Test sink: keeps every presented frame, optionally raising its quit
/// flag after a fixed number of them.
pub struct MemorySink {
    led_count: usize,
    staged: Option<Vec<Color>>,
    frames: Vec<Vec<Color>>,
    writes: usize,
    quit_after: Option<usize>,
}

impl MemorySink {
    pub fn new(led_count: usize) -> Self {
        Self {
            led_count,
            staged: None,
            frames: Vec::new(),
            writes: 0,
            quit_after: None,
        }
    }

    /// Report quit once `frames` frames have been presented.
    pub fn quit_after(&mut self, frames: usize) {
        self.quit_after = Some(frames);
    }

    pub fn frames(&self) -> &[Vec<Color>] {
        &self.frames
    }

    /// Total successful writes; equals presented frames when the scheduler
    /// kept its write/present pairing.
    pub fn staged_writes(&self) -> usize {
        self.writes
    }
}

impl OutputSink for MemorySink {
    fn led_count(&self) -> usize {
        self.led_count
    }

    fn write(&mut self, frame: &[Color]) -> Result<(), SinkError> {
        check_len(self.led_count, frame)?;
        self.staged = Some(frame.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<(), SinkError> {
        let frame = self.staged.take().ok_or(SinkError::NothingStaged)?;
        self.frames.push(frame);
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        self.quit_after
            .is_some_and(|limit| self.frames.len() >= limit)
    }
}

// ── Simulator sink ─────────────────────────────────────────────────

/// Host-side display stand-in: reconstructs the raster from the chain
/// buffer via the topology and, when a snapshot directory is set, writes
/// each presented frame as a scaled PNG. Quit comes from the shared
/// Ctrl+C flag.
pub struct SimulatorSink {
    topology: PanelTopology,
    pixel_size: u32,
    snapshot_dir: Option<PathBuf>,
    staged: Option<Vec<Color>>,
    frame_index: u64,
    quit: Option<Arc<AtomicBool>>,
}

impl SimulatorSink {
    pub fn new(topology: PanelTopology, pixel_size: u32) -> Self {
        Self {
            topology,
            pixel_size: pixel_size.max(1),
            snapshot_dir: None,
            staged: None,
            frame_index: 0,
            quit: None,
        }
    }

    pub fn with_snapshot_dir(mut self, dir: PathBuf) -> Self {
        self.snapshot_dir = Some(dir);
        self
    }

    pub fn with_quit_flag(mut self, quit: Arc<AtomicBool>) -> Self {
        self.quit = Some(quit);
        self
    }

    pub fn frames_presented(&self) -> u64 {
        self.frame_index
    }

    /// Invert the chain mapping back into a scaled raster.
    fn rasterize(&self, frame: &[Color]) -> Result<RgbImage, TopologyError> {
        let scale = self.pixel_size;
        let mut img = RgbImage::new(
            self.topology.led_cols() * scale,
            self.topology.led_rows() * scale,
        );
        for y in 0..self.topology.led_rows() {
            for x in 0..self.topology.led_cols() {
                let c = frame[self.topology.map(x, y)?];
                let px = Rgb([c.r, c.g, c.b]);
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(x * scale + dx, y * scale + dy, px);
                    }
                }
            }
        }
        Ok(img)
    }
}

impl OutputSink for SimulatorSink {
    fn led_count(&self) -> usize {
        self.topology.led_count()
    }

    fn write(&mut self, frame: &[Color]) -> Result<(), SinkError> {
        check_len(self.led_count(), frame)?;
        self.staged = Some(frame.to_vec());
        Ok(())
    }

    fn present(&mut self) -> Result<(), SinkError> {
        let frame = self.staged.take().ok_or(SinkError::NothingStaged)?;
        if let Some(dir) = &self.snapshot_dir {
            let img = self.rasterize(&frame)?;
            let path = dir.join(format!("frame_{:05}.png", self.frame_index));
            img.save(&path)?;
        }
        self.frame_index += 1;
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        self.quit
            .as_ref()
            .is_some_and(|flag| !flag.load(Ordering::SeqCst))
    }
}

// ── Driver sink ────────────────────────────────────────────────────

/// Adapter over any `SmartLedsWrite` driver (WS281x and friends). The
/// frame converts to the driver's pixel type on write; `present()` pushes
/// the whole chain in one timing-critical call.
pub struct SmartLedSink<W> {
    driver: W,
    led_count: usize,
    staged: Option<Vec<RGB8>>,
}

impl<W> SmartLedSink<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: core::fmt::Debug,
{
    pub fn new(driver: W, led_count: usize) -> Self {
        Self {
            driver,
            led_count,
            staged: None,
        }
    }
}

impl<W> OutputSink for SmartLedSink<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: core::fmt::Debug,
{
    fn led_count(&self) -> usize {
        self.led_count
    }

    fn write(&mut self, frame: &[Color]) -> Result<(), SinkError> {
        check_len(self.led_count, frame)?;
        self.staged = Some(frame.iter().map(|&c| RGB8::from(c)).collect());
        Ok(())
    }

    fn present(&mut self) -> Result<(), SinkError> {
        let frame = self.staged.take().ok_or(SinkError::NothingStaged)?;
        self.driver
            .write(frame)
            .map_err(|e| SinkError::Driver(format!("{e:?}")))
    }
}
