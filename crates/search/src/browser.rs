use crate::{EntityId, EntityNode, EntityRef};

/// Host-side view of the entity tree the picker searches and selects from.
pub trait EntityBrowser: Send + Sync {
	/// Current root set; every search is scoped to it.
	fn roots(&self) -> Vec<EntityRef>;

	/// Resolves a stable identity to its entity.
	fn lookup(&self, id: EntityId) -> Option<EntityRef>;

	/// Adds a newly opened file as a root and returns it.
	fn add_root(&self, node: EntityNode) -> EntityRef;

	/// Owner chain of `id` from its root down to the entity itself.
	fn path(&self, id: EntityId) -> Vec<EntityRef> {
		let mut chain = Vec::new();
		let mut cursor = self.lookup(id);
		while let Some(entity) = cursor {
			cursor = entity.parent().and_then(|parent| self.lookup(parent));
			chain.push(entity);
		}
		chain.reverse();
		chain
	}
}

/// Asks the user for another file to load into the browser.
pub trait FileOpener: Send + Sync {
	/// Returns `None` when the user dismissed the request.
	fn open(&self) -> Option<EntityNode>;
}
