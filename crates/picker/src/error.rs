//! Error types for picker configuration and usage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading picker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error decoding TOML.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value is syntactically valid but unusable.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Usage errors raised by [`crate::MemberPicker`] actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickerError {
	/// `open_file` was invoked on a picker built without a file opener.
	#[error("no file opener is configured for this picker")]
	OpenerNotConfigured,

	/// `open_file` was invoked while opening files is switched off.
	#[error("opening files is disabled for this picker")]
	OpenFilesDisabled,
}

/// Result type for picker actions.
pub type Result<T> = std::result::Result<T, PickerError>;
