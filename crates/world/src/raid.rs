//! Raid state carried between raids: accumulated noise and current weather.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Upper bound for accumulated raid noise.
pub const MAX_NOISE: u32 = 200;

/// Weather during a raid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    /// Clear skies.
    #[default]
    Clear,
    /// Rain slows the player down.
    Rain,
    /// Fog limits visibility.
    Fog,
}

impl Weather {
    /// All weather kinds in cycle order.
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rain, Weather::Fog];

    /// Save-file spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Fog => "fog",
        }
    }

    /// Parse a weather name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Some(Weather::Clear),
            "rain" => Some(Weather::Rain),
            "fog" => Some(Weather::Fog),
            _ => None,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown names decode as clear.
impl<'de> Deserialize<'de> for Weather {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Weather::parse(&name).unwrap_or_else(|| {
            warn!(weather = %name, "unknown weather in save; using clear");
            Weather::Clear
        }))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNoise {
    Int(i64),
    Float(f64),
    Other(serde::de::IgnoredAny),
}

// Out-of-range numbers clamp; anything else decodes as 0.
fn lenient_noise<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let noise = match RawNoise::deserialize(deserializer)? {
        RawNoise::Int(noise) => noise,
        RawNoise::Float(noise) => noise as i64,
        RawNoise::Other(_) => {
            warn!("non-numeric raid noise in save; using 0");
            0
        }
    };
    Ok(clamp_noise(noise))
}

fn clamp_noise(noise: i64) -> u32 {
    noise.clamp(0, i64::from(MAX_NOISE)) as u32
}

/// Persistent raid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidState {
    /// Accumulated noise, `0..=MAX_NOISE`.
    #[serde(deserialize_with = "lenient_noise")]
    pub noise: u32,
    /// Current weather.
    pub weather: Weather,
}

impl RaidState {
    /// Set noise, clamped to `0..=MAX_NOISE`.
    pub fn set_noise(&mut self, noise: i64) {
        self.noise = clamp_noise(noise);
    }

    /// Adjust noise by `delta`, clamped to `0..=MAX_NOISE`.
    pub fn add_noise(&mut self, delta: i64) {
        self.set_noise(i64::from(self.noise).saturating_add(delta));
    }
}
