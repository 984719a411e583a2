use std::sync::Arc;

use crate::{EntityKind, EntityRef};

/// Display ordering key of a hit: kind priority, then case-folded display text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
	priority: u8,
	folded: Box<str>,
}

impl SortKey {
	pub fn new(kind: EntityKind, display: &str) -> Self {
		Self {
			priority: kind.priority(),
			folded: display.to_lowercase().into_boxed_str(),
		}
	}

	pub fn priority(&self) -> u8 {
		self.priority
	}
}

/// One match produced by an engine. Immutable once produced.
#[derive(Debug, Clone)]
pub struct SearchHit {
	entity: EntityRef,
	display: Arc<str>,
	container: Arc<str>,
	sort_key: SortKey,
}

impl SearchHit {
	pub fn new(entity: EntityRef, display: impl Into<Arc<str>>, container: impl Into<Arc<str>>) -> Self {
		let display = display.into();
		let sort_key = SortKey::new(entity.kind(), &display);
		Self {
			entity,
			display,
			container: container.into(),
			sort_key,
		}
	}

	pub fn entity(&self) -> &EntityRef {
		&self.entity
	}

	pub fn kind(&self) -> EntityKind {
		self.entity.kind()
	}

	pub fn display(&self) -> &str {
		&self.display
	}

	/// Owner chain of the entity rendered as `root/…/parent`; empty for roots.
	pub fn container(&self) -> &str {
		&self.container
	}

	pub fn sort_key(&self) -> &SortKey {
		&self.sort_key
	}
}
