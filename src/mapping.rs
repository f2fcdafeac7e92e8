//! Coordinate mapping: logical (x, y) on the full matrix → physical LED
//! chain index.
//!
//! The chain is one wire; the logical raster is not. Depending on how the
//! panels were soldered, either whole rows alternate direction
//! ([`WiringMode::RowSerpentine`]) or entire 16×16 panel blocks do
//! ([`WiringMode::PanelSerpentine`]). Both mappings are bijections over the
//! full coordinate space, so every physical LED is addressed exactly once
//! per frame.

use serde::Deserialize;
use thiserror::Error;

/// How the LED chain snakes through the tiled panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiringMode {
    /// The whole matrix is one wide strip: even rows run left-to-right,
    /// odd rows right-to-left.
    RowSerpentine,
    /// The chain visits one `pw × ph` panel at a time. Even panel columns
    /// index their pixels row-major; odd panel columns reverse the local
    /// row order.
    PanelSerpentine,
}

/// What to do with a coordinate outside the matrix.
///
/// Either choice is a loud, configured answer — the mapper never silently
/// wraps to a valid-looking but wrong index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Out-of-range coordinates are an error at the call site.
    #[default]
    Reject,
    /// Out-of-range coordinates clamp to the nearest edge pixel.
    Clamp,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("panel and matrix dimensions must be non-zero")]
    ZeroDimension,
    #[error("matrix {cols}x{rows} is not tileable by {panel_width}x{panel_height} panels")]
    Misaligned {
        cols: u32,
        rows: u32,
        panel_width: u32,
        panel_height: u32,
    },
    #[error("coordinate ({x}, {y}) outside matrix {cols}x{rows}")]
    OutOfBounds { x: u32, y: u32, cols: u32, rows: u32 },
}

/// Physical wiring description. Immutable once constructed.
#[derive(Clone, Copy, Debug)]
pub struct PanelTopology {
    panel_width: u32,
    panel_height: u32,
    panel_cols: u32,
    panel_rows: u32,
    wiring: WiringMode,
    vertical_flip: bool,
    bounds: BoundsPolicy,
}

impl PanelTopology {
    pub fn new(
        panel_width: u32,
        panel_height: u32,
        panel_cols: u32,
        panel_rows: u32,
        wiring: WiringMode,
        vertical_flip: bool,
        bounds: BoundsPolicy,
    ) -> Result<Self, TopologyError> {
        if panel_width == 0 || panel_height == 0 || panel_cols == 0 || panel_rows == 0 {
            return Err(TopologyError::ZeroDimension);
        }
        Ok(Self {
            panel_width,
            panel_height,
            panel_cols,
            panel_rows,
            wiring,
            vertical_flip,
            bounds,
        })
    }

    /// Build a topology from overall matrix dimensions, checking that the
    /// matrix tiles evenly into panels. A non-divisible matrix is a
    /// configuration error, never silently corrected.
    pub fn for_matrix(
        cols: u32,
        rows: u32,
        panel_width: u32,
        panel_height: u32,
        wiring: WiringMode,
        vertical_flip: bool,
        bounds: BoundsPolicy,
    ) -> Result<Self, TopologyError> {
        if cols == 0 || rows == 0 || panel_width == 0 || panel_height == 0 {
            return Err(TopologyError::ZeroDimension);
        }
        if cols % panel_width != 0 || rows % panel_height != 0 {
            return Err(TopologyError::Misaligned {
                cols,
                rows,
                panel_width,
                panel_height,
            });
        }
        Self::new(
            panel_width,
            panel_height,
            cols / panel_width,
            rows / panel_height,
            wiring,
            vertical_flip,
            bounds,
        )
    }

    pub fn led_cols(&self) -> u32 {
        self.panel_width * self.panel_cols
    }

    pub fn led_rows(&self) -> u32 {
        self.panel_height * self.panel_rows
    }

    pub fn led_count(&self) -> usize {
        (self.led_cols() * self.led_rows()) as usize
    }

    /// Map a logical coordinate to its physical chain index.
    ///
    /// Bijective over `[0, led_cols) × [0, led_rows)`: every in-range
    /// coordinate yields a distinct index and the indices cover
    /// `0..led_count()` exactly.
    pub fn map(&self, x: u32, y: u32) -> Result<usize, TopologyError> {
        let cols = self.led_cols();
        let rows = self.led_rows();

        let (x, y) = if x < cols && y < rows {
            (x, y)
        } else {
            match self.bounds {
                BoundsPolicy::Reject => {
                    return Err(TopologyError::OutOfBounds { x, y, cols, rows });
                }
                BoundsPolicy::Clamp => (x.min(cols - 1), y.min(rows - 1)),
            }
        };

        // Flip first: when the chain starts at the physical bottom row, the
        // serpentine parity is defined in flipped space.
        let y = if self.vertical_flip { rows - 1 - y } else { y };

        let index = match self.wiring {
            WiringMode::RowSerpentine => {
                let row_x = if y % 2 == 0 { x } else { cols - 1 - x };
                y * cols + row_x
            }
            WiringMode::PanelSerpentine => {
                let pw = self.panel_width;
                let ph = self.panel_height;
                let panel_col = x / pw;
                let panel_row = y / ph;
                let px = x % pw;
                let py = y % ph;

                let base = (panel_col + panel_row * self.panel_cols) * pw * ph;
                let local = if panel_col % 2 == 0 {
                    py * pw + px
                } else {
                    (ph - 1 - py) * pw + px
                };
                base + local
            }
        };

        Ok(index as usize)
    }
}
