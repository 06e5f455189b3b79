use std::time::Duration;

use thiserror::Error;

/// Errors raised while constructing effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("Effect duration must not be negative (got {millis}ms)")]
    NegativeDuration { millis: i64 },
}

/// Convert a signed millisecond count into a [`Duration`].
///
/// Timing constructors take `Duration`, so a negative delay cannot reach an
/// effect; values arriving as signed integers (config files, user input) are
/// rejected here instead.
pub fn millis(millis: i64) -> Result<Duration, EffectError> {
    u64::try_from(millis)
        .map(Duration::from_millis)
        .map_err(|_| EffectError::NegativeDuration { millis })
}
