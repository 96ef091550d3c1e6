use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://ferrari-games-itech-io.onrender.com/rodar";
pub const DEPOSIT_URL: &str = "https://ferrari-games-itech-io.onrender.com/compras/users";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid bet limits: min {min} max {max}")]
    BetLimits { min: f64, max: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlotConfig {
    pub bet_step: f64,
    pub bet_min: f64,
    pub bet_max: f64,
    pub initial_bet: f64,
    /// Mirror the reel layout (the browser adds an `inverted` class).
    pub inverted: bool,
    pub autoplay_delay_ms: u64,
    pub win_fade_ms: u64,
    pub endpoint: String,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            bet_step: 0.50,
            bet_min: 0.50,
            bet_max: 1_000_000.0,
            initial_bet: 0.50,
            inverted: false,
            autoplay_delay_ms: 200,
            win_fade_ms: 5_000,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl SlotConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: SlotConfig = serde_json::from_str(text)?;
        cfg.validate()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.bet_min.is_finite() && self.bet_max.is_finite()) || self.bet_min > self.bet_max {
            return Err(ConfigError::BetLimits {
                min: self.bet_min,
                max: self.bet_max,
            });
        }
        Ok(self)
    }

    /// Step used by the bet buttons; unusable values fall back to 0.50.
    pub fn effective_step(&self) -> f64 {
        if self.bet_step.is_finite() && self.bet_step > 0.0 {
            self.bet_step
        } else {
            0.50
        }
    }

    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }

    pub fn win_fade(&self) -> Duration {
        Duration::from_millis(self.win_fade_ms)
    }
}
