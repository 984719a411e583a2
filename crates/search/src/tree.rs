use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::entity::Entity;
use crate::error::{Result, TreeError};
use crate::{EntityBrowser, EntityId, EntityNode, EntityRef};

#[derive(Default)]
struct TreeState {
	roots: Vec<EntityRef>,
	index: HashMap<EntityId, EntityRef>,
	last_id: u64,
}

impl TreeState {
	fn insert_root(&mut self, node: EntityNode) -> EntityRef {
		let mut last_id = self.last_id;
		let root = Entity::from_node(node, None, None, &mut || {
			last_id += 1;
			EntityId(last_id)
		});
		self.last_id = last_id;

		let mut stack = vec![Arc::clone(&root)];
		while let Some(entity) = stack.pop() {
			stack.extend(entity.children().iter().cloned());
			self.index.insert(entity.id(), entity);
		}

		self.roots.push(Arc::clone(&root));
		root
	}
}

/// In-memory entity tree implementing [`EntityBrowser`].
///
/// Ids are assigned in pre-order starting at 1 and never reused, so ids held by
/// a picker stay valid while more roots are added.
#[derive(Default)]
pub struct EntityTree {
	state: RwLock<TreeState>,
}

impl EntityTree {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_nodes(nodes: impl IntoIterator<Item = EntityNode>) -> Self {
		let mut state = TreeState::default();
		for node in nodes {
			state.insert_root(node);
		}
		Self { state: RwLock::new(state) }
	}

	/// Decodes a JSON array of root nodes.
	pub fn from_json_str(json: &str) -> Result<Self> {
		let nodes: Vec<EntityNode> = serde_json::from_str(json)?;
		Ok(Self::from_nodes(nodes))
	}

	pub fn load(path: &Path) -> Result<Self> {
		let json = std::fs::read_to_string(path).map_err(|error| TreeError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let tree = Self::from_json_str(&json)?;
		tracing::debug!(path = %path.display(), entities = tree.len(), "entity tree loaded");
		Ok(tree)
	}

	pub fn len(&self) -> usize {
		self.state.read().index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl EntityBrowser for EntityTree {
	fn roots(&self) -> Vec<EntityRef> {
		self.state.read().roots.clone()
	}

	fn lookup(&self, id: EntityId) -> Option<EntityRef> {
		self.state.read().index.get(&id).cloned()
	}

	fn add_root(&self, node: EntityNode) -> EntityRef {
		let root = self.state.write().insert_root(node);
		tracing::debug!(root = %root.id(), name = root.name(), "entity tree root added");
		root
	}
}
