//! Weather collaborator boundary.
//!
//! Fetching from a real HTTP API lives outside this crate; the marquee only
//! sees [`WeatherReport`] values through the [`WeatherProvider`] trait. Any
//! provider failure must surface as the [`WeatherReport::unavailable`]
//! sentinel, never as an error the render path has to handle.

/// Condition category keyed to an icon. Unknown strings fall back to
/// [`Condition::Default`] (the thermometer) — mandatory, not an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
    Mist,
    #[default]
    Default,
}

impl Condition {
    /// Parse an API condition string ("Clear", "clouds", "Drizzle", ...).
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" | "drizzle" => Self::Rain,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "fog" => Self::Fog,
            "mist" | "haze" => Self::Mist,
            _ => Self::Default,
        }
    }
}

/// One weather observation, already reduced to what the banner shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherReport {
    /// Degrees Fahrenheit; `None` when the fetch failed.
    pub temperature: Option<i32>,
    pub condition: Condition,
    pub description: String,
}

impl WeatherReport {
    pub fn new(temperature: Option<i32>, condition: Condition, description: impl Into<String>) -> Self {
        Self {
            temperature,
            condition,
            description: description.into(),
        }
    }

    /// The sentinel every provider returns on failure.
    pub fn unavailable() -> Self {
        Self {
            temperature: None,
            condition: Condition::Default,
            description: "Weather Unavailable".to_string(),
        }
    }

    /// Temperature as banner text, substituting the literal "N/A" when the
    /// observation is missing.
    pub fn temperature_label(&self) -> String {
        match self.temperature {
            Some(t) => t.to_string(),
            None => "N/A".to_string(),
        }
    }
}

/// Where weather comes from. Implementations must be infallible at this
/// boundary: network or parse trouble becomes the sentinel report.
pub trait WeatherProvider {
    fn fetch(&mut self, city: &str) -> WeatherReport;
}

/// Provider used when no live source is wired up (and in tests): always the
/// documented "Weather Unavailable" sentinel.
pub struct OfflineWeather;

impl WeatherProvider for OfflineWeather {
    fn fetch(&mut self, city: &str) -> WeatherReport {
        tracing::warn!("no weather source configured for {city}, using sentinel");
        WeatherReport::unavailable()
    }
}

/// Fixed report, handy for demos and deterministic tests.
pub struct StaticWeather(pub WeatherReport);

impl WeatherProvider for StaticWeather {
    fn fetch(&mut self, _city: &str) -> WeatherReport {
        self.0.clone()
    }
}
