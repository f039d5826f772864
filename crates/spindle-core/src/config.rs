//! Console configuration, read from `SPINDLE_*` environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Upper bound for `SPINDLE_MAX_HISTORY_PERIODS`: ten years of days.
pub const HISTORY_PERIODS_CEILING: u32 = 3_650;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive (default: "info"). `RUST_LOG` wins when set.
    pub filter: String,
    /// Emit JSON lines instead of the human format (default: false)
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Control plane configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Store address, used for diagnostics (default: "redis://127.0.0.1:6379")
    pub redis_url: String,
    /// Upper bound on each store call in milliseconds (default: 5_000)
    pub store_timeout_ms: u64,
    /// Page size used when a list request gives none (default: 20)
    pub default_page_size: u32,
    /// Largest accepted page size (default: 100)
    pub max_page_size: u32,
    /// Largest accepted historical stats window (default: 90)
    pub max_history_periods: u32,
    /// Largest accepted enqueue-event limit (default: 100)
    pub max_events: u32,
    pub log: LogConfig,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            store_timeout_ms: 5_000,
            default_page_size: 20,
            max_page_size: 100,
            max_history_periods: 90,
            max_events: 100,
            log: LogConfig::default(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Optional Environment Variables
    /// - `SPINDLE_REDIS_URL` - Store address (default: "redis://127.0.0.1:6379")
    /// - `SPINDLE_STORE_TIMEOUT_MS` - Store call timeout (default: 5000)
    /// - `SPINDLE_DEFAULT_PAGE_SIZE` - List page size (default: 20)
    /// - `SPINDLE_MAX_PAGE_SIZE` - Largest page size (default: 100)
    /// - `SPINDLE_MAX_HISTORY_PERIODS` - Largest stats window (default: 90)
    /// - `SPINDLE_MAX_EVENTS` - Largest enqueue-event limit (default: 100)
    /// - `SPINDLE_LOG` - Log filter (default: "info")
    /// - `SPINDLE_LOG_JSON` - JSON logs (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(var) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::invalid(var, format!("{raw:?}: {e}"))),
                None => Ok(default),
            }
        };
        let small = |var: &'static str, default: u32| -> Result<u32, ConfigError> {
            let value = number(var, u64::from(default))?;
            u32::try_from(value).map_err(|_| ConfigError::invalid(var, "out of range"))
        };

        let json = match lookup("SPINDLE_LOG_JSON").as_deref().map(str::trim) {
            None => defaults.log.json,
            Some("1" | "true" | "TRUE" | "yes") => true,
            Some("0" | "false" | "FALSE" | "no" | "") => false,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "SPINDLE_LOG_JSON",
                    format!("{other:?} is not a boolean"),
                ));
            }
        };

        Ok(Self {
            redis_url: lookup("SPINDLE_REDIS_URL").unwrap_or(defaults.redis_url),
            store_timeout_ms: number("SPINDLE_STORE_TIMEOUT_MS", defaults.store_timeout_ms)?,
            default_page_size: small("SPINDLE_DEFAULT_PAGE_SIZE", defaults.default_page_size)?,
            max_page_size: small("SPINDLE_MAX_PAGE_SIZE", defaults.max_page_size)?,
            max_history_periods: small(
                "SPINDLE_MAX_HISTORY_PERIODS",
                defaults.max_history_periods,
            )?,
            max_events: small("SPINDLE_MAX_EVENTS", defaults.max_events)?,
            log: LogConfig {
                filter: lookup("SPINDLE_LOG").unwrap_or(defaults.log.filter),
                json,
            },
        })
    }

    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = url.into();
        self
    }

    pub fn with_store_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.store_timeout_ms = timeout_ms;
        self
    }

    pub fn with_page_sizes(mut self, default_size: u32, max_size: u32) -> Self {
        self.default_page_size = default_size;
        self.max_page_size = max_size;
        self
    }

    pub fn with_max_history_periods(mut self, max: u32) -> Self {
        self.max_history_periods = max;
        self
    }

    pub fn with_max_events(mut self, max: u32) -> Self {
        self.max_events = max;
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("SPINDLE_STORE_TIMEOUT_MS", self.store_timeout_ms),
            ("SPINDLE_DEFAULT_PAGE_SIZE", u64::from(self.default_page_size)),
            ("SPINDLE_MAX_PAGE_SIZE", u64::from(self.max_page_size)),
            ("SPINDLE_MAX_HISTORY_PERIODS", u64::from(self.max_history_periods)),
            ("SPINDLE_MAX_EVENTS", u64::from(self.max_events)),
        ];
        if let Some(&(var, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::invalid(var, "must be greater than zero"));
        }
        if self.max_history_periods > HISTORY_PERIODS_CEILING {
            return Err(ConfigError::invalid(
                "SPINDLE_MAX_HISTORY_PERIODS",
                format!(
                    "{} exceeds the ceiling {HISTORY_PERIODS_CEILING}",
                    self.max_history_periods
                ),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::invalid(
                "SPINDLE_DEFAULT_PAGE_SIZE",
                format!(
                    "{} exceeds the maximum page size {}",
                    self.default_page_size, self.max_page_size
                ),
            ));
        }
        if self.redis_url.trim().is_empty() {
            return Err(ConfigError::invalid("SPINDLE_REDIS_URL", "must not be empty"));
        }
        Ok(())
    }
}
