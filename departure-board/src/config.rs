//! Board configuration from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `DEPARTURES_BASE_URL` | backend serving `/api/next-trains` | `http://localhost:3000` |
//! | `DEPARTURES_MOCK_FILE` | serve a JSON snapshot instead of HTTP | unset |
//! | `BOARD_LAT`, `BOARD_LON` | position reported to the backend | unset (no location) |
//! | `BOARD_WIDTH` | startup width in cells | the terminal's own width |
//! | `BOARD_HELSINKI_ONLY` | start with the Helsinki filter on | false |

use std::path::PathBuf;
use std::time::Duration;

use crate::client::{ClientConfig, DEFAULT_BASE_URL};
use crate::domain::Coordinates;
use crate::render::DEFAULT_WIDTH;

/// Clock display tick.
const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Departure refresh tick.
const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be true/false or 1/0, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },

    #[error("{set} is set but {missing} is not")]
    IncompletePosition {
        set: &'static str,
        missing: &'static str,
    },
}

/// Timer periods for the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// How often the clock display ticks
    pub clock_interval: Duration,
    /// How often departures are refreshed
    pub refresh_interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            clock_interval: CLOCK_INTERVAL,
            refresh_interval: REFRESH_INTERVAL,
        }
    }
}

/// Everything needed to start the board.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub client: ClientConfig,
    pub mock_file: Option<PathBuf>,
    /// `None` means the host has no position source
    pub position: Option<Coordinates>,
    /// Overrides the startup width reported by the terminal
    pub width: Option<usize>,
    pub helsinki_only: bool,
    pub refresh: RefreshConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::new(DEFAULT_BASE_URL),
            mock_file: None,
            position: None,
            width: None,
            helsinki_only: false,
            refresh: RefreshConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("DEPARTURES_BASE_URL") {
            config.client = ClientConfig::new(url);
        }
        config.mock_file = get("DEPARTURES_MOCK_FILE").map(PathBuf::from);

        let lat = get("BOARD_LAT").map(|v| parse_number::<f64>("BOARD_LAT", &v)).transpose()?;
        let lon = get("BOARD_LON").map(|v| parse_number::<f64>("BOARD_LON", &v)).transpose()?;
        config.position = match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompletePosition {
                    set: "BOARD_LAT",
                    missing: "BOARD_LON",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompletePosition {
                    set: "BOARD_LON",
                    missing: "BOARD_LAT",
                });
            }
        };

        if let Some(width) = get("BOARD_WIDTH") {
            config.width = Some(parse_number("BOARD_WIDTH", &width)?);
        }
        if let Some(flag) = get("BOARD_HELSINKI_ONLY") {
            config.helsinki_only = parse_flag("BOARD_HELSINKI_ONLY", &flag)?;
        }

        Ok(config)
    }

    /// Width to lay the board out for: the override, else what the
    /// terminal reports, else [`DEFAULT_WIDTH`].
    pub fn viewport_width(&self, detected: Option<usize>) -> usize {
        self.width.or(detected).unwrap_or(DEFAULT_WIDTH)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}
