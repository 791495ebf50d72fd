use std::fmt;

/// Everything that can fail outside the per-frame simulation.
///
/// Simulation steps themselves are total: once a `GameConfig` has been
/// validated, nothing in `compute`, `wave` or `engine` returns an error.
#[derive(Debug)]
pub enum GameError {
    /// An image or sound could not be found or decoded. Recovered locally by
    /// substituting a placeholder; never fatal.
    AssetUnavailable { name: String, reason: String },
    /// The configuration cannot describe a playable game. Fatal at startup.
    InvalidConfiguration(String),
    /// The configuration file could not be read or parsed.
    ConfigIo {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetUnavailable { name, reason } => {
                write!(f, "asset '{}' unavailable: {}", name, reason)
            }
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
            Self::ConfigIo { path, source } => {
                write!(f, "cannot load configuration from {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
