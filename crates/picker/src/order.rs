//! Display order of result rows.

use std::cmp::Ordering;

use crate::ResultRow;

/// Total order over rows: kind priority, then case-folded display text, then
/// arrival order. The placeholder sorts after every real hit.
pub fn compare_rows(a: &ResultRow, b: &ResultRow) -> Ordering {
	match (a.hit(), b.hit()) {
		(Some(x), Some(y)) => x.sort_key().cmp(y.sort_key()).then_with(|| a.id().cmp(&b.id())),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => a.id().cmp(&b.id()),
	}
}

/// Sorted view over `rows`; the rows themselves are not reordered.
pub fn sorted<'a>(rows: impl IntoIterator<Item = &'a ResultRow>) -> Vec<&'a ResultRow> {
	let mut view: Vec<_> = rows.into_iter().collect();
	view.sort_by(|a, b| compare_rows(a, b));
	view
}
