//! Selection slot and the kind-gated validity check.

use std::fmt;
use std::sync::Arc;

use sieve_search::{EntityBrowser, EntityId, EntityKind, EntityRef, KindFilter};

use crate::{HitId, ResultList};

/// The single current choice. Holding one kind of selection excludes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionSlot {
	#[default]
	None,
	RawTreeSelection(EntityId),
	SearchHit(HitId),
}

impl SelectionSlot {
	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
	NothingSelected,
	/// Something is selected but the acceptance filter rejects it.
	WrongKind,
}

impl InvalidReason {
	pub const fn message(self) -> &'static str {
		match self {
			Self::NothingSelected => "An item must be selected",
			Self::WrongKind => "Select an item of an accepted kind",
		}
	}
}

impl fmt::Display for InvalidReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.message())
	}
}

/// What a valid selection hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptedEntity {
	/// Assemblies, modules and plain files resolve to the file that holds them.
	File(EntityRef),
	/// Namespaces are identified by name within their owning file.
	Namespace { name: Arc<str>, file: Option<EntityRef> },
	Member(EntityRef),
}

impl AcceptedEntity {
	pub fn kind(&self) -> EntityKind {
		match self {
			Self::File(entity) | Self::Member(entity) => entity.kind(),
			Self::Namespace { .. } => EntityKind::Namespace,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validity {
	Valid(AcceptedEntity),
	Invalid(InvalidReason),
}

impl Validity {
	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid(_))
	}

	pub fn accepted(&self) -> Option<&AcceptedEntity> {
		match self {
			Self::Valid(accepted) => Some(accepted),
			Self::Invalid(_) => None,
		}
	}

	pub fn reason(&self) -> Option<InvalidReason> {
		match self {
			Self::Valid(_) => None,
			Self::Invalid(reason) => Some(*reason),
		}
	}
}

/// Resolves the slot to its canonical entity.
pub fn resolve(slot: SelectionSlot, results: &ResultList, browser: &dyn EntityBrowser) -> Option<EntityRef> {
	match slot {
		SelectionSlot::None => None,
		SelectionSlot::RawTreeSelection(id) => browser.lookup(id),
		SelectionSlot::SearchHit(id) => results.hit(id).map(|hit| Arc::clone(hit.entity())),
	}
}

/// Dispatches `entity` through the filter and maps it to what the caller receives.
pub fn accept(entity: &EntityRef, filter: &KindFilter, browser: &dyn EntityBrowser) -> Option<AcceptedEntity> {
	if !filter.accepts(entity) {
		return None;
	}
	let owning_file = || entity.file().and_then(|id| browser.lookup(id));

	Some(match entity.kind() {
		kind if kind.is_file() => AcceptedEntity::File(owning_file().unwrap_or_else(|| Arc::clone(entity))),
		EntityKind::Namespace => AcceptedEntity::Namespace {
			name: entity.name_arc(),
			file: owning_file(),
		},
		_ => AcceptedEntity::Member(Arc::clone(entity)),
	})
}

/// Computes validity from scratch. Nothing about a previous answer is kept.
pub fn validate(slot: SelectionSlot, results: &ResultList, browser: &dyn EntityBrowser, filter: &KindFilter) -> Validity {
	if slot.is_none() {
		return Validity::Invalid(InvalidReason::NothingSelected);
	}
	match resolve(slot, results, browser).and_then(|entity| accept(&entity, filter, browser)) {
		Some(accepted) => Validity::Valid(accepted),
		None => Validity::Invalid(InvalidReason::WrongKind),
	}
}

#[cfg(test)]
mod tests {
	use sieve_search::{EntityNode, EntityTree, SearchHit};

	use super::*;

	fn tree() -> EntityTree {
		EntityTree::from_nodes([EntityNode::new(EntityKind::Assembly, "Demo.dll").child(
			EntityNode::new(EntityKind::Module, "Demo.dll").child(
				EntityNode::new(EntityKind::Namespace, "Demo")
					.child(EntityNode::new(EntityKind::Type, "Widget").child(EntityNode::new(EntityKind::Method, "Draw"))),
			),
		)])
	}

	fn id_of(tree: &EntityTree, kind: EntityKind) -> EntityId {
		let mut stack = tree.roots();
		while let Some(entity) = stack.pop() {
			if entity.kind() == kind {
				return entity.id();
			}
			stack.extend(entity.children().iter().cloned());
		}
		panic!("no {kind} in tree");
	}

	#[test]
	fn empty_slot_reports_nothing_selected() {
		let tree = tree();
		let validity = validate(SelectionSlot::None, &ResultList::default(), &tree, &KindFilter::all());
		assert_eq!(validity, Validity::Invalid(InvalidReason::NothingSelected));
	}

	#[test]
	fn rejected_kind_reports_wrong_kind() {
		let tree = tree();
		let slot = SelectionSlot::RawTreeSelection(id_of(&tree, EntityKind::Namespace));
		let validity = validate(slot, &ResultList::default(), &tree, &KindFilter::only([EntityKind::Type]));
		assert_eq!(validity.reason(), Some(InvalidReason::WrongKind));
	}

	#[test]
	fn unknown_entity_reports_wrong_kind() {
		let tree = tree();
		let validity = validate(SelectionSlot::RawTreeSelection(EntityId(999)), &ResultList::default(), &tree, &KindFilter::all());
		assert_eq!(validity.reason(), Some(InvalidReason::WrongKind));
		let validity = validate(SelectionSlot::SearchHit(HitId(7)), &ResultList::default(), &tree, &KindFilter::all());
		assert_eq!(validity.reason(), Some(InvalidReason::WrongKind));
	}

	#[test]
	fn file_kinds_resolve_to_their_owning_file() {
		let tree = tree();
		let module = id_of(&tree, EntityKind::Module);
		let validity = validate(SelectionSlot::RawTreeSelection(module), &ResultList::default(), &tree, &KindFilter::all());
		let Some(AcceptedEntity::File(file)) = validity.accepted() else {
			panic!("expected a file, got {validity:?}");
		};
		assert_eq!(file.id(), module);
	}

	#[test]
	fn namespaces_resolve_to_name_and_file() {
		let tree = tree();
		let slot = SelectionSlot::RawTreeSelection(id_of(&tree, EntityKind::Namespace));
		let validity = validate(slot, &ResultList::default(), &tree, &KindFilter::all());
		let Some(AcceptedEntity::Namespace { name, file }) = validity.accepted() else {
			panic!("expected a namespace, got {validity:?}");
		};
		assert_eq!(&**name, "Demo");
		assert_eq!(file.as_ref().map(|file| file.kind()), Some(EntityKind::Module));
	}

	#[test]
	fn predicate_slots_see_the_entity() {
		let tree = tree();
		let filter = KindFilter::none().accept_if(EntityKind::Method, |entity| entity.name().starts_with("Dr"));
		let slot = SelectionSlot::RawTreeSelection(id_of(&tree, EntityKind::Method));
		let validity = validate(slot, &ResultList::default(), &tree, &filter);
		assert_eq!(validity.accepted().map(AcceptedEntity::kind), Some(EntityKind::Method));

		let filter = KindFilter::none().accept_if(EntityKind::Method, |entity| entity.name() == "Paint");
		assert_eq!(validate(slot, &ResultList::default(), &tree, &filter).reason(), Some(InvalidReason::WrongKind));
	}

	#[test]
	fn search_hit_resolves_through_the_result_list() {
		let tree = tree();
		let widget = tree.lookup(id_of(&tree, EntityKind::Type)).unwrap();
		let mut results = ResultList::default();
		results.append(vec![SearchHit::new(Arc::clone(&widget), "Widget", "Demo.dll/Demo.dll/Demo")]);
		let hit = results.rows()[0].id();

		let validity = validate(SelectionSlot::SearchHit(hit), &results, &tree, &KindFilter::only([EntityKind::Type]));
		assert_eq!(validity, Validity::Valid(AcceptedEntity::Member(widget)));
	}
}
