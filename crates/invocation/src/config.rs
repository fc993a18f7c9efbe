//! Declarative delay configuration.

use std::path::{Path, PathBuf};

use relay_coalesce::DelaySpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading an [`InvocationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Coalescing delays for one call-site, in milliseconds.
///
/// Absent or negative values mean "no delay".
///
/// ```toml
/// debounce_ms = 500
/// throttle_ms = 2000
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvocationConfig {
	pub debounce_ms: Option<i64>,
	pub throttle_ms: Option<i64>,
}

impl InvocationConfig {
	/// Parses a configuration from TOML source.
	pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}

	/// Reads and parses a TOML configuration file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let src = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml(&src)
	}

	pub fn debounce(&self) -> DelaySpec {
		self.debounce_ms.into()
	}

	pub fn throttle(&self) -> DelaySpec {
		self.throttle_ms.into()
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;
	use std::time::Duration;

	use super::*;

	#[test]
	fn parses_both_delays() {
		let config = InvocationConfig::from_toml("debounce_ms = 500\nthrottle_ms = 2000\n").unwrap();
		assert_eq!(
			config,
			InvocationConfig {
				debounce_ms: Some(500),
				throttle_ms: Some(2000),
			}
		);
		assert_eq!(config.debounce().resolve(), Some(Duration::from_millis(500)));
		assert_eq!(config.throttle().resolve(), Some(Duration::from_secs(2)));
	}

	#[test]
	fn missing_and_negative_delays_are_immediate() {
		let config = InvocationConfig::from_toml("throttle_ms = -1").unwrap();
		assert_eq!(config.debounce().resolve(), None);
		assert_eq!(config.throttle().resolve(), None);

		let empty = InvocationConfig::from_toml("").unwrap();
		assert_eq!(empty, InvocationConfig::default());
	}

	#[test]
	fn rejects_unknown_fields() {
		let err = InvocationConfig::from_toml("debounce = 5").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)), "unexpected error: {err}");
	}

	#[test]
	fn reads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "debounce_ms = 25").unwrap();

		let config = InvocationConfig::from_path(file.path()).unwrap();
		assert_eq!(config.debounce_ms, Some(25));
		assert_eq!(config.throttle_ms, None);
	}

	#[test]
	fn missing_file_reports_path() {
		let err = InvocationConfig::from_path("/nonexistent/relay.toml").unwrap_err();
		assert!(err.to_string().contains("/nonexistent/relay.toml"));
	}
}
