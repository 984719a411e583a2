use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sieve_search::{DEFAULT_BATCH_SIZE, RenderContext, SearchQuery};

use crate::ConfigError;

/// Picker configuration, usually read from a TOML file.
///
/// ```toml
/// title = "Pick a type"
/// debounce_ms = 100
///
/// [search]
/// match_any_term = true
/// max_results = 500
///
/// [render]
/// language = "C#"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
	pub title: String,
	/// Quiet period after the last query edit before a search starts.
	pub debounce_ms: u64,
	pub search: SearchSettings,
	pub render: RenderSettings,
}

/// Matching options and the result cap. Both are caller policy; nothing in the
/// engine assumes a default cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
	pub case_sensitive: bool,
	pub match_whole_words: bool,
	/// Any-term matching; all terms must match when off.
	pub match_any_term: bool,
	pub search_decompiled_data: bool,
	/// Absent means uncapped.
	pub max_results: Option<usize>,
	/// Hits per engine batch.
	pub batch_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
	pub language: String,
	pub syntax_highlight: bool,
}

impl Default for PickerConfig {
	fn default() -> Self {
		Self {
			title: "Pick".to_string(),
			debounce_ms: 100,
			search: SearchSettings::default(),
			render: RenderSettings::default(),
		}
	}
}

impl Default for SearchSettings {
	fn default() -> Self {
		Self {
			case_sensitive: false,
			match_whole_words: false,
			match_any_term: false,
			search_decompiled_data: false,
			max_results: None,
			batch_size: DEFAULT_BATCH_SIZE,
		}
	}
}

impl Default for RenderSettings {
	fn default() -> Self {
		Self {
			language: "C#".to_string(),
			syntax_highlight: true,
		}
	}
}

impl PickerConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), "picker config loaded");
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.search.max_results == Some(0) {
			return Err(ConfigError::Invalid("search.max_results must be at least 1".into()));
		}
		if self.search.batch_size == 0 {
			return Err(ConfigError::Invalid("search.batch_size must be at least 1".into()));
		}
		Ok(())
	}

	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Builds the immutable query for one session over `text`.
	pub fn query(&self, text: &str) -> SearchQuery {
		SearchQuery::new(text)
			.case_sensitive(self.search.case_sensitive)
			.match_whole_words(self.search.match_whole_words)
			.match_any_term(self.search.match_any_term)
	}

	pub fn render_context(&self) -> RenderContext {
		RenderContext::new(self.render.language.as_str()).with_syntax_highlight(self.render.syntax_highlight)
	}
}
