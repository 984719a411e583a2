//! Hand-driven engine provider for controller tests.

use std::sync::Arc;

use parking_lot::Mutex;
use sieve_search::{
	EntityBrowser, EntityKind, EntityNode, EntityRef, EntityTree, KindFilter, SearchEngine, SearchEngineProvider, SearchHit, SearchOptions, SearchSink,
};
use tokio::sync::mpsc;

use crate::{MemberPicker, PickerConfig, PickerDeps, PickerEvent};

pub(crate) struct RunRecord {
	pub(crate) options: SearchOptions,
	pub(crate) sink: Option<SearchSink>,
	pub(crate) roots: usize,
	pub(crate) cancels: usize,
}

/// Records every engine it creates. Tests deliver callbacks through the captured sinks.
#[derive(Clone, Default)]
pub(crate) struct ScriptedProvider {
	runs: Arc<Mutex<Vec<RunRecord>>>,
}

impl ScriptedProvider {
	pub(crate) fn runs(&self) -> usize {
		self.runs.lock().len()
	}

	pub(crate) fn sink(&self, run: usize) -> SearchSink {
		self.runs.lock()[run].sink.clone().expect("engine was started")
	}

	pub(crate) fn cancels(&self, run: usize) -> usize {
		self.runs.lock()[run].cancels
	}

	pub(crate) fn roots(&self, run: usize) -> usize {
		self.runs.lock()[run].roots
	}

	pub(crate) fn terms(&self, run: usize) -> Vec<String> {
		self.runs.lock()[run].options.comparer.terms().to_vec()
	}

	pub(crate) fn options(&self, run: usize) -> SearchOptions {
		self.runs.lock()[run].options.clone()
	}
}

impl SearchEngineProvider for ScriptedProvider {
	fn create(&self, options: SearchOptions) -> Box<dyn SearchEngine> {
		let mut runs = self.runs.lock();
		runs.push(RunRecord {
			options,
			sink: None,
			roots: 0,
			cancels: 0,
		});
		Box::new(ScriptedEngine {
			run: runs.len() - 1,
			runs: Arc::clone(&self.runs),
		})
	}
}

struct ScriptedEngine {
	run: usize,
	runs: Arc<Mutex<Vec<RunRecord>>>,
}

impl SearchEngine for ScriptedEngine {
	fn start(&mut self, roots: Vec<EntityRef>, sink: SearchSink) {
		let mut runs = self.runs.lock();
		let record = &mut runs[self.run];
		record.roots = roots.len();
		record.sink = Some(sink);
	}

	fn cancel(&mut self) {
		self.runs.lock()[self.run].cancels += 1;
	}
}

/// `Demo.dll / Demo / { Foo { foo() }, FooBar }`.
pub(crate) fn demo_tree() -> Arc<EntityTree> {
	Arc::new(EntityTree::from_nodes([EntityNode::new(EntityKind::Assembly, "Demo.dll").child(
		EntityNode::new(EntityKind::Namespace, "Demo")
			.child(EntityNode::new(EntityKind::Type, "Foo").child(EntityNode::new(EntityKind::Method, "foo")))
			.child(EntityNode::new(EntityKind::Type, "FooBar")),
	)]))
}

/// First entity named `name` in pre-order.
pub(crate) fn find(tree: &EntityTree, kind: EntityKind, name: &str) -> EntityRef {
	let mut stack: Vec<_> = tree.roots().into_iter().rev().collect();
	while let Some(entity) = stack.pop() {
		if entity.kind() == kind && entity.name() == name {
			return entity;
		}
		stack.extend(entity.children().iter().rev().cloned());
	}
	panic!("no {kind} named {name}");
}

pub(crate) fn hit(tree: &EntityTree, kind: EntityKind, name: &str) -> SearchHit {
	let entity = find(tree, kind, name);
	let display = entity.name_arc();
	SearchHit::new(entity, display, "")
}

pub(crate) struct Fixture {
	pub(crate) picker: MemberPicker,
	pub(crate) provider: ScriptedProvider,
	pub(crate) tree: Arc<EntityTree>,
	pub(crate) events: mpsc::UnboundedReceiver<PickerEvent>,
}

impl Fixture {
	pub(crate) fn new(filter: KindFilter) -> Self {
		Self::with_config(PickerConfig::default(), filter)
	}

	pub(crate) fn with_config(config: PickerConfig, filter: KindFilter) -> Self {
		let provider = ScriptedProvider::default();
		let tree = demo_tree();
		let deps = PickerDeps::new(Arc::clone(&tree) as Arc<dyn EntityBrowser>, Arc::new(provider.clone()), filter);
		let mut picker = MemberPicker::new(config, deps);
		let events = picker.subscribe();
		Self {
			picker,
			provider,
			tree,
			events,
		}
	}

	pub(crate) fn drain_events(&mut self) -> Vec<PickerEvent> {
		let mut out = Vec::new();
		while let Ok(event) = self.events.try_recv() {
			out.push(event);
		}
		out
	}

	/// Sets the query and restarts immediately, skipping the debounce.
	pub(crate) fn search(&mut self, text: &str) -> usize {
		self.picker.on_query_changed(text);
		self.picker.restart();
		self.provider.runs() - 1
	}

	pub(crate) fn displays(&self) -> Vec<String> {
		self.picker
			.sorted_results()
			.iter()
			.filter_map(|row| row.hit())
			.map(|hit| hit.display().to_string())
			.collect()
	}
}
