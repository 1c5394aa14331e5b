use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or driving a universe.
///
/// Index operations never produce these: an insert that misses the index is
/// reported as `false`, and a query that finds nothing is empty.
#[derive(Debug, Error)]
pub enum UniverseError {
    /// A configuration value that cannot be used (e.g. a non-positive world size).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// The configuration file could not be read.
    #[error("failed to read config {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for `UniverseConfig`.
    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),
}
