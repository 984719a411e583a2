//! Error types for loading entity trees.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading an entity tree from disk.
#[derive(Debug, Error)]
pub enum TreeError {
	/// Error reading a tree file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The tree file is not valid JSON for a list of entity nodes.
	#[error("tree decode error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
