//! Depth-first reference engine over an in-memory entity tree.

use std::sync::Arc;

use sieve_worker::{GenerationToken, TaskClass, join_error_panic_message, spawn, spawn_blocking};

use crate::{Entity, EntityRef, SearchEngine, SearchEngineProvider, SearchHit, SearchOptions, SearchSink};

/// Hits accumulated before a batch is delivered.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Provider creating a [`TreeSearcher`] per session.
#[derive(Debug, Clone)]
pub struct TreeSearcherProvider {
	batch_size: usize,
}

impl TreeSearcherProvider {
	pub fn new() -> Self {
		Self {
			batch_size: DEFAULT_BATCH_SIZE,
		}
	}

	pub fn with_batch_size(batch_size: usize) -> Self {
		Self {
			batch_size: batch_size.max(1),
		}
	}
}

impl Default for TreeSearcherProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl SearchEngineProvider for TreeSearcherProvider {
	fn create(&self, options: SearchOptions) -> Box<dyn SearchEngine> {
		Box::new(TreeSearcher::new(options, self.batch_size))
	}
}

/// Walks roots in container → namespace → type → member order on a blocking
/// worker, checking its cancellation token before every entity.
pub struct TreeSearcher {
	options: SearchOptions,
	batch_size: usize,
	token: Option<GenerationToken>,
	cancel_requested: bool,
}

impl TreeSearcher {
	pub fn new(options: SearchOptions, batch_size: usize) -> Self {
		Self {
			options,
			batch_size: batch_size.max(1),
			token: None,
			cancel_requested: false,
		}
	}
}

impl SearchEngine for TreeSearcher {
	fn start(&mut self, roots: Vec<EntityRef>, sink: SearchSink) {
		debug_assert!(self.token.is_none(), "tree searcher is not resumable");
		let session = sink.session();
		let token = GenerationToken::new(session.0);
		if self.cancel_requested {
			token.cancel();
		}
		self.token = Some(token.clone());

		let options = self.options.clone();
		let batch_size = self.batch_size;
		let completion = sink.clone();
		tracing::debug!(%session, roots = roots.len(), "search.walk.start");

		let walk = spawn_blocking(TaskClass::CpuBlocking, move || {
			let mut walker = Walker::new(&options, batch_size, &token, &sink);
			for root in &roots {
				if !walker.visit(root) {
					break;
				}
			}
			walker.finish()
		});

		spawn(TaskClass::Background, async move {
			match walk.await {
				Ok(report) => {
					tracing::debug!(
						%session,
						visited = report.visited,
						reported = report.reported,
						truncated = report.truncated,
						cancelled = report.cancelled,
						"search.walk.done"
					);
				}
				Err(err) => {
					let reason = join_error_panic_message(err).unwrap_or_else(|| "walk task cancelled".to_string());
					tracing::warn!(%session, %reason, "search.walk.failed");
					completion.complete(false);
				}
			}
		});
	}

	fn cancel(&mut self) {
		self.cancel_requested = true;
		if let Some(token) = &self.token {
			token.cancel();
		}
	}
}

#[derive(Debug, Default)]
struct WalkReport {
	visited: usize,
	reported: usize,
	truncated: bool,
	cancelled: bool,
}

struct Walker<'a> {
	options: &'a SearchOptions,
	token: &'a GenerationToken,
	sink: &'a SearchSink,
	batch_size: usize,
	batch: Vec<SearchHit>,
	path: Vec<Arc<str>>,
	hung_up: bool,
	report: WalkReport,
}

impl<'a> Walker<'a> {
	fn new(options: &'a SearchOptions, batch_size: usize, token: &'a GenerationToken, sink: &'a SearchSink) -> Self {
		Self {
			options,
			token,
			sink,
			batch_size,
			batch: Vec::with_capacity(batch_size),
			path: Vec::new(),
			hung_up: false,
			report: WalkReport::default(),
		}
	}

	/// Returns false when the walk must stop.
	fn visit(&mut self, entity: &EntityRef) -> bool {
		if self.token.is_cancelled() {
			self.report.cancelled = true;
			return false;
		}
		self.report.visited += 1;

		if let Some(hit) = self.evaluate(entity) {
			if self.options.max_results.is_some_and(|max| self.report.reported >= max) {
				self.report.truncated = true;
				return false;
			}
			self.batch.push(hit);
			self.report.reported += 1;
			if self.batch.len() >= self.batch_size && !self.flush() {
				return false;
			}
		}

		self.path.push(entity.name_arc());
		let keep_going = entity.children().iter().all(|child| self.visit(child));
		self.path.pop();
		keep_going
	}

	fn evaluate(&self, entity: &EntityRef) -> Option<SearchHit> {
		if !self.options.filter.accepts(entity) {
			return None;
		}

		let display = self.options.render.display(entity);
		if !self.options.comparer.is_match(&match_texts(entity, &display, self.options.search_decompiled_data)) {
			return None;
		}
		Some(SearchHit::new(Arc::clone(entity), display, self.path.join("/")))
	}

	fn flush(&mut self) -> bool {
		if self.token.is_cancelled() {
			self.report.cancelled = true;
			self.batch.clear();
			return false;
		}
		if !self.sink.batch(std::mem::take(&mut self.batch)) {
			self.hung_up = true;
			return false;
		}
		true
	}

	fn finish(mut self) -> WalkReport {
		if !self.report.cancelled && !self.hung_up {
			self.flush();
		}
		if self.report.cancelled {
			tracing::trace!(generation = self.token.generation(), visited = self.report.visited, "search.walk.cancelled");
		}
		let truncated = self.report.truncated && !self.report.cancelled;
		self.sink.complete(truncated);
		self.report
	}
}

fn match_texts<'e>(entity: &'e Entity, display: &'e str, decompiled: bool) -> Vec<&'e str> {
	let mut texts = vec![entity.name()];
	if display != entity.name() {
		texts.push(display);
	}
	if decompiled && let Some(body) = entity.body() {
		texts.push(body);
	}
	texts
}
