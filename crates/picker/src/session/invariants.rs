use std::time::Duration;

use sieve_search::{EntityBrowser, EntityKind, KindFilter};

use super::scripted::{Fixture, hit};
use crate::{SearchState, SelectionSlot, Validity};

fn paused_runtime() -> tokio::runtime::Runtime {
	tokio::runtime::Builder::new_current_thread()
		.enable_time()
		.start_paused(true)
		.build()
		.expect("test runtime")
}

/// Must cancel the previous engine run before a new one starts.
///
/// - Enforced in: `MemberPicker::restart`
/// - Failure symptom: Two engines stream into the same result list.
#[cfg_attr(test, test)]
pub(crate) fn test_single_active_session() {
	paused_runtime().block_on(async {
		let mut fx = Fixture::new(KindFilter::all());
		let first = fx.search("foo");
		let second = fx.search("bar");
		assert_eq!(fx.provider.cancels(first), 1);
		assert_eq!(fx.provider.cancels(second), 0);
		assert_ne!(fx.provider.sink(first).session(), fx.provider.sink(second).session());
	});
}

/// Must invalidate the session handle at the call site of `cancel`, before the engine notices.
///
/// - Enforced in: `MemberPicker::cancel`, `MemberPicker::stop_session`
/// - Failure symptom: Hits from a cancelled search appear after the user cleared the query.
#[cfg_attr(test, test)]
pub(crate) fn test_cancel_invalidates_handle_synchronously() {
	paused_runtime().block_on(async {
		let mut fx = Fixture::new(KindFilter::all());
		let run = fx.search("foo");
		let sink = fx.provider.sink(run);
		fx.picker.cancel();
		assert_eq!(fx.picker.active_session(), None);

		sink.batch(vec![hit(&fx.tree, EntityKind::Type, "Foo")]);
		fx.picker.pump();
		assert_eq!(fx.picker.results().hits().count(), 0);
	});
}

/// Must apply at most one completion per session.
///
/// - Enforced in: `MemberPicker::on_engine_event`
/// - Failure symptom: A late duplicate completion flips the truncation flag after it was read.
#[cfg_attr(test, test)]
pub(crate) fn test_single_completion() {
	paused_runtime().block_on(async {
		let mut fx = Fixture::new(KindFilter::all());
		let run = fx.search("foo");
		let sink = fx.provider.sink(run);
		sink.complete(false);
		sink.complete(true);
		fx.picker.pump();
		assert!(!fx.picker.is_truncated());
	});
}

/// Must clear the truncation flag when a session starts and keep it clear until that session reports.
///
/// - Enforced in: `MemberPicker::restart`, `MemberPicker::cancel`, `MemberPicker::clear`
/// - Failure symptom: "Too many results" shows for a query that has not finished.
#[cfg_attr(test, test)]
pub(crate) fn test_truncation_scoped_to_session() {
	paused_runtime().block_on(async {
		let mut fx = Fixture::new(KindFilter::all());
		let run = fx.search("foo");
		fx.provider.sink(run).complete(true);
		fx.picker.pump();
		assert!(fx.picker.is_truncated());

		fx.search("bar");
		assert!(!fx.picker.is_truncated());
	});
}

/// Must fire the debounce at most once per burst, after the burst goes quiet.
///
/// - Enforced in: `Debouncer::start`, `Debouncer::accept`
/// - Failure symptom: Each keystroke starts and cancels its own search.
#[cfg_attr(test, test)]
pub(crate) fn test_debounce_coalesces_bursts() {
	paused_runtime().block_on(async {
		let mut fx = Fixture::new(KindFilter::all());
		for text in ["F", "Fo", "Foo"] {
			fx.picker.on_query_changed(text);
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
		assert!(fx.picker.next().await);
		assert_eq!(fx.provider.runs(), 1);
		assert_eq!(fx.picker.state(), SearchState::Running);
		assert!(tokio::time::timeout(Duration::from_secs(1), fx.picker.next()).await.is_err());
	});
}

/// Must hold at most one kind of selection at a time.
///
/// - Enforced in: `SelectionSlot`, `MemberPicker::select_tree_item`, `MemberPicker::select_hit`
/// - Failure symptom: The dialog returns a tree node while a search hit is highlighted.
#[cfg_attr(test, test)]
pub(crate) fn test_selection_slot_exclusive() {
	paused_runtime().block_on(async {
		let mut fx = Fixture::new(KindFilter::all());
		let run = fx.search("foo");
		fx.provider.sink(run).batch(vec![hit(&fx.tree, EntityKind::Type, "Foo")]);
		fx.picker.pump();
		let row = fx.picker.results().rows()[1].id();
		let root = fx.tree.roots()[0].id();

		fx.picker.select_item(root);
		fx.picker.select_hit(Some(row));
		assert_eq!(fx.picker.selection(), SelectionSlot::SearchHit(row));
	});
}

/// Must recompute validity from the current slot and filter on every read.
///
/// - Enforced in: `MemberPicker::validity`
/// - Failure symptom: The OK button stays enabled after the chosen hit disappeared.
#[cfg_attr(test, test)]
pub(crate) fn test_validity_never_cached() {
	paused_runtime().block_on(async {
		let mut fx = Fixture::new(KindFilter::only([EntityKind::Type]));
		let run = fx.search("foo");
		fx.provider.sink(run).batch(vec![hit(&fx.tree, EntityKind::Type, "Foo")]);
		fx.picker.pump();
		fx.picker.select_hit(Some(fx.picker.results().rows()[1].id()));
		assert!(fx.picker.validity().is_valid());

		fx.search("bar");
		assert!(matches!(fx.picker.validity(), Validity::Invalid(_)));
	});
}
