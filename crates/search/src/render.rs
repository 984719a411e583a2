use std::fmt;
use std::sync::Arc;

use crate::Entity;

/// Produces the display text of a hit. Display text never changes what matches;
/// it is what the result list shows and sorts by.
pub trait DisplayRenderer: Send + Sync {
	fn display(&self, entity: &Entity) -> Arc<str>;
}

/// Renders entities by their bare name.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl DisplayRenderer for PlainRenderer {
	fn display(&self, entity: &Entity) -> Arc<str> {
		entity.name_arc()
	}
}

/// Rendering options passed through to the engine for display-text generation.
#[derive(Clone)]
pub struct RenderContext {
	language: Arc<str>,
	syntax_highlight: bool,
	renderer: Arc<dyn DisplayRenderer>,
}

impl RenderContext {
	pub fn new(language: impl Into<Arc<str>>) -> Self {
		Self {
			language: language.into(),
			syntax_highlight: true,
			renderer: Arc::new(PlainRenderer),
		}
	}

	pub fn with_language(mut self, language: impl Into<Arc<str>>) -> Self {
		self.language = language.into();
		self
	}

	pub fn with_syntax_highlight(mut self, yes: bool) -> Self {
		self.syntax_highlight = yes;
		self
	}

	pub fn with_renderer(mut self, renderer: Arc<dyn DisplayRenderer>) -> Self {
		self.renderer = renderer;
		self
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	pub fn syntax_highlight(&self) -> bool {
		self.syntax_highlight
	}

	pub fn display(&self, entity: &Entity) -> Arc<str> {
		self.renderer.display(entity)
	}
}

impl Default for RenderContext {
	fn default() -> Self {
		Self::new("C#")
	}
}

/// Compares the rendering options only. Two contexts with the same language and
/// highlighting produce the same search, whichever renderer they carry.
impl PartialEq for RenderContext {
	fn eq(&self, other: &Self) -> bool {
		self.language == other.language && self.syntax_highlight == other.syntax_highlight
	}
}

impl fmt::Debug for RenderContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderContext")
			.field("language", &self.language)
			.field("syntax_highlight", &self.syntax_highlight)
			.finish_non_exhaustive()
	}
}
