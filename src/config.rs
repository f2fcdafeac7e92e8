//! Load-time configuration. Everything here is read once at startup and
//! immutable afterwards; an inconsistent topology is fatal then, never
//! papered over at runtime.

use crate::Color;
use crate::mapping::{BoundsPolicy, PanelTopology, TopologyError, WiringMode};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Physical matrix description.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatrixConfig {
    pub rows: u32,
    pub cols: u32,
    pub panel_width: u32,
    pub panel_height: u32,
    pub wiring: WiringMode,
    pub vertical_flip: bool,
    pub bounds: BoundsPolicy,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rows: 36,
            cols: 480,
            panel_width: 16,
            panel_height: 16,
            wiring: WiringMode::RowSerpentine,
            vertical_flip: false,
            bounds: BoundsPolicy::Reject,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    pub city: String,
    pub refresh_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            city: "State College".to_string(),
            refresh_secs: 300,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarqueeConfig {
    pub matrix: MatrixConfig,
    /// Global output brightness, 0-100.
    pub brightness: u8,
    /// Pixels the content moves per tick.
    pub scroll_step: u32,
    /// Tick pacing for the main banner.
    pub main_delay_ms: u64,
    /// Tick pacing for standalone announcement passes.
    pub announcement_delay_ms: u64,
    /// Complete passes of the banner before content refreshes.
    pub loops: u32,
    /// How long the static banner holds before scrolling starts.
    pub static_secs: u64,
    pub main_color: [u8; 3],
    pub announcement_color: [u8; 3],
    pub background: [u8; 3],
    pub announcements: Vec<String>,
    pub font: String,
    pub weather: WeatherConfig,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            matrix: MatrixConfig::default(),
            brightness: 75,
            scroll_step: 2,
            main_delay_ms: 8,
            announcement_delay_ms: 15,
            loops: 1,
            static_secs: 10,
            main_color: [0, 200, 255],
            announcement_color: [252, 3, 3],
            background: [0, 0, 0],
            announcements: vec!["WELCOME!".to_string(), "LED MARQUEE ONLINE".to_string()],
            font: "9x18_bold".to_string(),
            weather: WeatherConfig::default(),
        }
    }
}

impl MarqueeConfig {
    /// Read a JSON config file. Missing keys take their defaults; unknown
    /// keys are an error rather than a silent typo.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Build and validate the panel topology. Row-serpentine wiring treats
    /// the whole matrix as one wide strip, so only panel-chain wiring has
    /// to tile evenly.
    pub fn topology(&self) -> Result<PanelTopology, TopologyError> {
        let m = &self.matrix;
        match m.wiring {
            WiringMode::RowSerpentine => PanelTopology::for_matrix(
                m.cols,
                m.rows,
                m.cols,
                1,
                m.wiring,
                m.vertical_flip,
                m.bounds,
            ),
            WiringMode::PanelSerpentine => PanelTopology::for_matrix(
                m.cols,
                m.rows,
                m.panel_width,
                m.panel_height,
                m.wiring,
                m.vertical_flip,
                m.bounds,
            ),
        }
    }

    pub fn main_color(&self) -> Color {
        self.main_color.into()
    }

    pub fn announcement_color(&self) -> Color {
        self.announcement_color.into()
    }

    pub fn background(&self) -> Color {
        self.background.into()
    }
}
