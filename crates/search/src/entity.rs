use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable external identity of an entity, valid for the lifetime of its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Closed set of entity kinds an inspected binary exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	Assembly,
	Module,
	Namespace,
	Type,
	Field,
	Method,
	Property,
	Event,
	AssemblyRef,
	ModuleRef,
	/// A loaded file that is neither an assembly nor a module.
	File,
}

impl EntityKind {
	pub const COUNT: usize = 11;

	pub const ALL: [EntityKind; Self::COUNT] = [
		Self::Assembly,
		Self::Module,
		Self::Namespace,
		Self::Type,
		Self::Field,
		Self::Method,
		Self::Property,
		Self::Event,
		Self::AssemblyRef,
		Self::ModuleRef,
		Self::File,
	];

	/// Slot of this kind in per-kind tables.
	pub const fn index(self) -> usize {
		self as usize
	}

	/// Display priority; lower sorts first. Plain files rank after every member kind.
	pub const fn priority(self) -> u8 {
		match self {
			Self::Assembly => 0,
			Self::Module => 1,
			Self::Namespace => 2,
			Self::Type => 3,
			Self::Field => 4,
			Self::Method => 5,
			Self::Property => 6,
			Self::Event => 7,
			Self::AssemblyRef => 8,
			Self::ModuleRef => 9,
			Self::File => 10,
		}
	}

	/// Kinds that represent a loaded file rather than something inside one.
	pub const fn is_file(self) -> bool {
		matches!(self, Self::Assembly | Self::Module | Self::File)
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Assembly => "assembly",
			Self::Module => "module",
			Self::Namespace => "namespace",
			Self::Type => "type",
			Self::Field => "field",
			Self::Method => "method",
			Self::Property => "property",
			Self::Event => "event",
			Self::AssemblyRef => "assembly_ref",
			Self::ModuleRef => "module_ref",
			Self::File => "file",
		}
	}

	/// Parses the snake_case name produced by [`Self::as_str`].
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == name)
	}
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

pub type EntityRef = Arc<Entity>;

/// Immutable node of the entity tree.
///
/// `file` points at the nearest enclosing assembly, module or file entity
/// (the entity itself when it is one), which is what a picker hands back when
/// a file-level entity is chosen.
#[derive(Debug)]
pub struct Entity {
	id: EntityId,
	kind: EntityKind,
	name: Arc<str>,
	body: Option<Arc<str>>,
	parent: Option<EntityId>,
	file: Option<EntityId>,
	children: Vec<EntityRef>,
}

impl Entity {
	pub fn id(&self) -> EntityId {
		self.id
	}

	pub fn kind(&self) -> EntityKind {
		self.kind
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn name_arc(&self) -> Arc<str> {
		Arc::clone(&self.name)
	}

	/// Decompiled text, matched only when a search opts into decompiled data.
	pub fn body(&self) -> Option<&str> {
		self.body.as_deref()
	}

	pub fn parent(&self) -> Option<EntityId> {
		self.parent
	}

	pub fn file(&self) -> Option<EntityId> {
		self.file
	}

	pub fn children(&self) -> &[EntityRef] {
		&self.children
	}

	/// Builds the shared subtree for `node`, drawing ids from `next_id` in pre-order.
	pub(crate) fn from_node(node: EntityNode, parent: Option<EntityId>, file: Option<EntityId>, next_id: &mut dyn FnMut() -> EntityId) -> EntityRef {
		let id = next_id();
		let file = if node.kind.is_file() { Some(id) } else { file };
		let children = node
			.children
			.into_iter()
			.map(|child| Self::from_node(child, Some(id), file, next_id))
			.collect();

		Arc::new(Self {
			id,
			kind: node.kind,
			name: Arc::from(node.name),
			body: node.body.map(Arc::from),
			parent,
			file,
			children,
		})
	}
}

impl PartialEq for Entity {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for Entity {}

/// Decodable description of an entity subtree, as stored in tree files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNode {
	pub kind: EntityKind,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub body: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<EntityNode>,
}

impl EntityNode {
	pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
		Self {
			kind,
			name: name.into(),
			body: None,
			children: Vec::new(),
		}
	}

	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());
		self
	}

	pub fn child(mut self, child: EntityNode) -> Self {
		self.children.push(child);
		self
	}
}
