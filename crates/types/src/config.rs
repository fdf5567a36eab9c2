//! Migration configuration.
//!
//! All knobs of the pipeline live in [`MigrationConfig`]. Values can come
//! from deserialized config files or the builder; `validate()` enforces the
//! cross-field constraints after either path.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use snafu::{Snafu, ensure};

/// Configuration validation error.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}

/// Default work queue capacity.
const DEFAULT_QUEUE_CAPACITY: usize = 20_000;

/// Default core worker count.
const DEFAULT_CORE_WORKERS: usize = 4;

/// Default maximum worker count; this many workers are spawned.
const DEFAULT_MAX_WORKERS: usize = 8;

/// Default idle keep-alive for workers.
const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Default progress monitor tick interval.
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of ticks between progress log lines.
const DEFAULT_PROGRESS_LOG_EVERY: u32 = 5;

/// Configuration for the account asset migration pipeline.
#[derive(Debug, Clone, bon::Builder, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Capacity of the bounded work queue between scanner and workers.
    #[serde(default = "default_queue_capacity")]
    #[builder(default = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
    /// Lower bound on the worker count, checked by validation only. The
    /// pool always spawns `max_workers` threads; this field is retained for
    /// configuration compatibility and has no runtime effect.
    #[serde(default = "default_core_workers")]
    #[builder(default = DEFAULT_CORE_WORKERS)]
    pub core_workers: usize,
    /// Worker pool size; the pool spawns exactly this many workers.
    #[serde(default = "default_max_workers")]
    #[builder(default = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,
    /// Retained for configuration compatibility and has no runtime effect:
    /// the fixed pool never parks or retires idle workers.
    #[serde(default = "default_keep_alive", with = "duration_secs")]
    #[builder(default = DEFAULT_KEEP_ALIVE)]
    pub keep_alive: Duration,
    /// Tick interval of the progress monitor.
    #[serde(default = "default_progress_interval", with = "duration_secs")]
    #[builder(default = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: Duration,
    /// Number of ticks between progress log lines.
    #[serde(default = "default_progress_log_every")]
    #[builder(default = DEFAULT_PROGRESS_LOG_EVERY)]
    pub progress_log_every: u32,
    /// When true, a record decode failure aborts the run instead of being
    /// counted and skipped.
    #[serde(default)]
    #[builder(default)]
    pub strict_decode: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MigrationConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range or a
    /// cross-field constraint is violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            self.queue_capacity > 0,
            ValidationSnafu { message: "queue_capacity must be > 0".to_string() }
        );
        ensure!(
            self.core_workers > 0,
            ValidationSnafu { message: "core_workers must be > 0".to_string() }
        );
        ensure!(
            self.max_workers >= self.core_workers,
            ValidationSnafu {
                message: format!(
                    "max_workers ({}) must be >= core_workers ({})",
                    self.max_workers, self.core_workers
                ),
            }
        );
        ensure!(
            self.progress_interval > Duration::ZERO,
            ValidationSnafu { message: "progress_interval must be > 0".to_string() }
        );
        ensure!(
            self.progress_log_every > 0,
            ValidationSnafu { message: "progress_log_every must be > 0".to_string() }
        );
        Ok(())
    }
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_core_workers() -> usize {
    DEFAULT_CORE_WORKERS
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_keep_alive() -> Duration {
    DEFAULT_KEEP_ALIVE
}

fn default_progress_interval() -> Duration {
    DEFAULT_PROGRESS_INTERVAL
}

fn default_progress_log_every() -> u32 {
    DEFAULT_PROGRESS_LOG_EVERY
}

/// Serde adapter storing durations as whole seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrationConfig::default();
        assert_eq!(config.queue_capacity, 20_000);
        assert_eq!(config.core_workers, 4);
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.keep_alive, Duration::from_secs(30));
        assert_eq!(config.progress_interval, Duration::from_secs(1));
        assert_eq!(config.progress_log_every, 5);
        assert!(!config.strict_decode);
        config.validate().unwrap();
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let config = MigrationConfig::builder().queue_capacity(0).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_below_core_rejected() {
        let config = MigrationConfig::builder().core_workers(4).max_workers(2).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: MigrationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.queue_capacity, 20_000);
        assert_eq!(config.max_workers, 8);
    }

    #[test]
    fn test_deserialize_duration_as_seconds() {
        let config: MigrationConfig =
            serde_json::from_str(r#"{"progress_interval": 2, "keep_alive": 10}"#).unwrap();
        assert_eq!(config.progress_interval, Duration::from_secs(2));
        assert_eq!(config.keep_alive, Duration::from_secs(10));
    }
}
