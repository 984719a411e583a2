use std::fmt;
use std::sync::Arc;

use crate::{Entity, EntityKind};

/// Caller-supplied acceptance check for one entity kind.
pub type KindPredicate = Arc<dyn Fn(&Entity) -> bool + Send + Sync>;

#[derive(Clone)]
enum Rule {
	Reject,
	Accept,
	AcceptIf(KindPredicate),
}

/// Kind-keyed acceptance gate.
///
/// Holds one rule per [`EntityKind`]; [`KindFilter::accepts`] is a single
/// table lookup followed by the optional predicate. Different pickers restrict
/// what may be chosen ("types only", "methods with a body", ...) by building a
/// different table.
#[derive(Clone)]
pub struct KindFilter {
	rules: [Rule; EntityKind::COUNT],
}

impl KindFilter {
	/// Rejects every kind.
	pub fn none() -> Self {
		Self {
			rules: std::array::from_fn(|_| Rule::Reject),
		}
	}

	/// Accepts every kind unconditionally.
	pub fn all() -> Self {
		Self {
			rules: std::array::from_fn(|_| Rule::Accept),
		}
	}

	/// Accepts exactly the listed kinds.
	pub fn only(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
		kinds.into_iter().fold(Self::none(), Self::accept)
	}

	pub fn accept(mut self, kind: EntityKind) -> Self {
		self.rules[kind.index()] = Rule::Accept;
		self
	}

	pub fn accept_if(mut self, kind: EntityKind, predicate: impl Fn(&Entity) -> bool + Send + Sync + 'static) -> Self {
		self.rules[kind.index()] = Rule::AcceptIf(Arc::new(predicate));
		self
	}

	pub fn reject(mut self, kind: EntityKind) -> Self {
		self.rules[kind.index()] = Rule::Reject;
		self
	}

	/// Returns true if `entity` may be picked.
	pub fn accepts(&self, entity: &Entity) -> bool {
		match &self.rules[entity.kind().index()] {
			Rule::Reject => false,
			Rule::Accept => true,
			Rule::AcceptIf(predicate) => predicate(entity),
		}
	}

	/// Returns true if some entity of `kind` could pass.
	pub fn admits_kind(&self, kind: EntityKind) -> bool {
		!matches!(self.rules[kind.index()], Rule::Reject)
	}
}

impl Default for KindFilter {
	fn default() -> Self {
		Self::all()
	}
}

impl fmt::Debug for KindFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut list = f.debug_map();
		for kind in EntityKind::ALL {
			let rule = match self.rules[kind.index()] {
				Rule::Reject => "reject",
				Rule::Accept => "accept",
				Rule::AcceptIf(_) => "accept_if",
			};
			list.entry(&kind.as_str(), &rule);
		}
		list.finish()
	}
}
