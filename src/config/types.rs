use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::effect::millis;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

/// Store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Number of past actions kept in the history ring (0 disables it).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

/// Animation timing for presented destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Expected duration of the show/hide animation in milliseconds.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: i64,
    /// The liveness timeout is `animation_ms * timeout_multiplier`.
    /// Must be at least 1.0 so the timeout never beats a healthy animation.
    #[serde(default = "default_timeout_multiplier")]
    pub timeout_multiplier: f64,
}

fn default_history_capacity() -> usize {
    100
}

fn default_animation_ms() -> i64 {
    300
}

fn default_timeout_multiplier() -> f64 {
    2.0
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            animation_ms: default_animation_ms(),
            timeout_multiplier: default_timeout_multiplier(),
        }
    }
}

impl PresentationConfig {
    pub fn new(animation: Duration, timeout_multiplier: f64) -> Self {
        Self {
            animation_ms: i64::try_from(animation.as_millis()).unwrap_or(i64::MAX),
            timeout_multiplier,
        }
    }

    /// Expected animation duration. Negative values (rejected by
    /// validation) read as zero.
    pub fn animation(&self) -> Duration {
        millis(self.animation_ms).unwrap_or_default()
    }

    /// Fallback deadline after which a lifecycle transition is forced.
    pub fn timeout(&self) -> Duration {
        if self.timeout_multiplier.is_finite() && self.timeout_multiplier >= 1.0 {
            self.animation().mul_f64(self.timeout_multiplier)
        } else {
            self.animation()
        }
    }
}
