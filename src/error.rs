//! Error types for loading calibration profiles, mounting tables and estimator configuration.

use alloc::string::String;
use thiserror::Error;

/// Errors raised while loading or validating external configuration.
///
/// The numerical core never fails; only the loaders return this type.
#[derive(Debug, Error)]
pub enum Error {
    /// The calibration or configuration file could not be read.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    #[error("failed to read `{}`", .path.display())]
    Io {
        /// The file that was accessed.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The calibration data is not valid JSON or does not match the schema.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    #[error("malformed calibration data: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration is not valid TOML or does not match the schema.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A calibration value is NaN or infinite.
    #[error("{sensor} calibration contains a non-finite {field} value")]
    NonFinite {
        /// The sensor section, e.g. `"accelerometer"`.
        sensor: &'static str,
        /// The offending field, e.g. `"scale_factors"`.
        field: &'static str,
    },

    /// An estimator configuration value is out of range.
    #[error("invalid estimator configuration: {0}")]
    InvalidConfig(&'static str),

    /// An axis mapping could not be parsed, e.g. `"+w"`.
    #[error("invalid axis mapping `{0}`, expected one of +x, -x, +y, -y, +z, -z")]
    InvalidAxis(String),

    /// A frame transform does not map every device axis exactly once.
    #[error("invalid {0} mounting: the rows must use each device axis exactly once")]
    InvalidMounting(&'static str),
}
