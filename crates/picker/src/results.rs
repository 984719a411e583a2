use std::fmt;

use sieve_search::SearchHit;

use crate::ResultsChange;

/// Identity of a row in the result list. Ids grow monotonically for the life of
/// a picker and are never reused, so an id from a cleared list resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitId(pub u64);

impl fmt::Display for HitId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "h{}", self.0)
	}
}

#[derive(Debug, Clone)]
pub enum ResultEntry {
	Hit(SearchHit),
	/// Transient "searching" row shown while a session runs.
	Searching,
}

#[derive(Debug, Clone)]
pub struct ResultRow {
	id: HitId,
	entry: ResultEntry,
}

impl ResultRow {
	pub fn id(&self) -> HitId {
		self.id
	}

	pub fn entry(&self) -> &ResultEntry {
		&self.entry
	}

	pub fn hit(&self) -> Option<&SearchHit> {
		match &self.entry {
			ResultEntry::Hit(hit) => Some(hit),
			ResultEntry::Searching => None,
		}
	}

	pub fn is_placeholder(&self) -> bool {
		matches!(self.entry, ResultEntry::Searching)
	}
}

/// Result rows in arrival order. Mutated only by the picker.
#[derive(Debug, Default)]
pub struct ResultList {
	rows: Vec<ResultRow>,
	next_id: u64,
}

impl ResultList {
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn rows(&self) -> &[ResultRow] {
		&self.rows
	}

	/// Real hits in arrival order, skipping the placeholder.
	pub fn hits(&self) -> impl Iterator<Item = &SearchHit> {
		self.rows.iter().filter_map(ResultRow::hit)
	}

	pub fn row(&self, id: HitId) -> Option<&ResultRow> {
		self.rows.iter().find(|row| row.id == id)
	}

	pub fn hit(&self, id: HitId) -> Option<&SearchHit> {
		self.row(id).and_then(ResultRow::hit)
	}

	pub fn has_placeholder(&self) -> bool {
		self.rows.iter().any(ResultRow::is_placeholder)
	}

	fn push(&mut self, entry: ResultEntry) {
		self.next_id += 1;
		self.rows.push(ResultRow {
			id: HitId(self.next_id),
			entry,
		});
	}

	pub(crate) fn push_placeholder(&mut self) -> ResultsChange {
		debug_assert!(!self.has_placeholder(), "one placeholder per session");
		let start = self.rows.len();
		self.push(ResultEntry::Searching);
		ResultsChange::Added { start, count: 1 }
	}

	pub(crate) fn append(&mut self, hits: Vec<SearchHit>) -> Option<ResultsChange> {
		if hits.is_empty() {
			return None;
		}
		let start = self.rows.len();
		let count = hits.len();
		self.rows.reserve(count);
		for hit in hits {
			self.push(ResultEntry::Hit(hit));
		}
		Some(ResultsChange::Added { start, count })
	}

	pub(crate) fn remove_placeholder(&mut self) -> Option<ResultsChange> {
		let index = self.rows.iter().position(ResultRow::is_placeholder)?;
		self.rows.remove(index);
		Some(ResultsChange::Removed { index })
	}

	pub(crate) fn clear(&mut self) -> Option<ResultsChange> {
		if self.rows.is_empty() {
			return None;
		}
		self.rows.clear();
		Some(ResultsChange::Cleared)
	}
}
