//! Member picker search session controller.
//!
//! # Purpose
//!
//! * Owns the query text, the debounce scheduler, the active engine session and
//!   the visible result list.
//! * Reconciles asynchronous engine callbacks with owner-side state without locks.
//! * Exposes selection validity against the caller's acceptance filter.
//!
//! # Mental model
//!
//! * [`MemberPicker`] is driven by one owner through `&mut self`.
//! * Everything asynchronous (debounce expiry, engine batches and completions)
//!   is posted into a private inbox as a [`PickerMsg`] and applied only when the
//!   owner calls [`MemberPicker::pump`] or awaits [`MemberPicker::next`].
//! * Every engine run is stamped with a [`SessionId`] minted from a
//!   [`GenerationClock`]. Callbacks carrying any other id are stale and dropped.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`MemberPicker`] | Session controller | Must be the only mutator of results and selection | this module |
//! | [`SearchState`] | Lifecycle state | Must be `Running` only while an engine run is active | `set_state` |
//! | `ActiveSession` | Current engine run | Must be replaced (and cancelled) before a new run starts | `restart`, `stop_session` |
//! | [`PickerMsg`] | Inbox protocol | Must carry the debounce ticket or session stamp it was produced under | `Debouncer` fire fn, engine sink |
//! | [`PickerDeps`] | External collaborators | Browser, engine provider, acceptance filter, optional file opener | caller |
//!
//! # Invariants
//!
//! * Must cancel the previous engine run before starting another.
//! * Must drop batches and completions whose session is not the active session.
//! * Must invalidate the active session synchronously in `cancel`.
//! * Must accept at most one completion per session.
//! * Must clear the truncation flag whenever a session stops or restarts.
//! * Must recompute validity from the selection slot and filter on every query.
//!
//! # Data flow
//!
//! 1. `on_query_changed` stores the text and re-arms the debouncer.
//! 2. The debouncer posts `DebounceFired(ticket)`; an accepted ticket triggers `restart`.
//! 3. `restart` stops the old run, clears results, and either settles in `Idle`
//!    (empty text) or starts a new engine run with a fresh sink.
//! 4. The engine posts `Engine(SessionEvent)` messages; batches are appended in
//!    arrival order and the completion removes the placeholder and records truncation.
//! 5. Subscribers observe [`PickerEvent`]s for every visible change.
//!
//! # Lifecycle
//!
//! * Create with [`MemberPicker::new`] inside a tokio runtime (or let the worker
//!   fall back to its global runtime).
//! * Feed edits through `on_query_changed`; drive the inbox with `next`/`pump`.
//! * Dropping the picker cancels the active run and disarms the debouncer.
//!
//! # Concurrency & ordering
//!
//! * Engine callbacks run on worker threads and only enqueue; all mutation happens on the owner.
//! * Messages from one run keep producer order through the unbounded inbox.
//! * Messages from superseded runs may interleave with the current run but are filtered by session id.
//!
//! # Failure modes & recovery
//!
//! * Engine never completes: the session stays `Running` until a new query, `cancel` or `clear`.
//! * Engine sends a batch after its completion: dropped with a warning.
//! * Engine task panics: the engine's own join boundary reports the completion; nothing unwinds here.

use std::sync::Arc;

use sieve_search::{
	EngineEvent, EntityBrowser, EntityId, EntityRef, FileOpener, KindFilter, RenderContext, SearchComparer, SearchEngine, SearchEngineProvider,
	SearchOptions, SearchSink, SessionEvent, SessionId,
};
use sieve_worker::GenerationClock;
use tokio::sync::mpsc;

use crate::debounce::{DebounceTicket, Debouncer};
use crate::events::EventHub;
use crate::selection::{self, AcceptedEntity, SelectionSlot, Validity};
use crate::{HitId, PickerConfig, PickerError, PickerEvent, ResultList, ResultRow, Result, order};

/// Lifecycle of the picker's search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
	#[default]
	Idle,
	Debouncing,
	Running,
	Completed,
	Cancelled,
}

impl SearchState {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Debouncing => "debouncing",
			Self::Running => "running",
			Self::Completed => "completed",
			Self::Cancelled => "cancelled",
		}
	}
}

/// Inbox message applied on the owner.
#[derive(Debug)]
pub enum PickerMsg {
	DebounceFired(DebounceTicket),
	Engine(SessionEvent),
}

/// External collaborators of a picker.
#[derive(Clone)]
pub struct PickerDeps {
	pub browser: Arc<dyn EntityBrowser>,
	pub provider: Arc<dyn SearchEngineProvider>,
	pub filter: Arc<KindFilter>,
	pub opener: Option<Arc<dyn FileOpener>>,
}

impl PickerDeps {
	pub fn new(browser: Arc<dyn EntityBrowser>, provider: Arc<dyn SearchEngineProvider>, filter: KindFilter) -> Self {
		Self {
			browser,
			provider,
			filter: Arc::new(filter),
			opener: None,
		}
	}

	pub fn with_opener(mut self, opener: Arc<dyn FileOpener>) -> Self {
		self.opener = Some(opener);
		self
	}
}

struct ActiveSession {
	id: SessionId,
	engine: Box<dyn SearchEngine>,
	completed: bool,
}

pub struct MemberPicker {
	config: PickerConfig,
	deps: PickerDeps,
	render: RenderContext,
	text: String,
	state: SearchState,
	results: ResultList,
	truncated: bool,
	selection: SelectionSlot,
	can_open_files: bool,
	sessions: GenerationClock,
	active: Option<ActiveSession>,
	debouncer: Debouncer,
	inbox_tx: mpsc::UnboundedSender<PickerMsg>,
	inbox_rx: mpsc::UnboundedReceiver<PickerMsg>,
	events: EventHub,
}

impl MemberPicker {
	pub fn new(config: PickerConfig, deps: PickerDeps) -> Self {
		let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
		let fire_tx = inbox_tx.clone();
		let debouncer = Debouncer::new(config.debounce(), move |ticket| {
			let _ = fire_tx.send(PickerMsg::DebounceFired(ticket));
		});
		let render = config.render_context();

		Self {
			config,
			deps,
			render,
			text: String::new(),
			state: SearchState::Idle,
			results: ResultList::default(),
			truncated: false,
			selection: SelectionSlot::None,
			can_open_files: true,
			sessions: GenerationClock::new(),
			active: None,
			debouncer,
			inbox_tx,
			inbox_rx,
			events: EventHub::default(),
		}
	}

	pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PickerEvent> {
		self.events.subscribe()
	}

	pub fn title(&self) -> &str {
		&self.config.title
	}

	pub fn config(&self) -> &PickerConfig {
		&self.config
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn has_text(&self) -> bool {
		!self.text.is_empty()
	}

	pub fn state(&self) -> SearchState {
		self.state
	}

	/// Rows in arrival order.
	pub fn results(&self) -> &ResultList {
		&self.results
	}

	/// Display-ordered view of the result rows.
	pub fn sorted_results(&self) -> Vec<&ResultRow> {
		order::sorted(self.results.rows())
	}

	pub fn is_truncated(&self) -> bool {
		self.truncated
	}

	pub fn active_session(&self) -> Option<SessionId> {
		self.active.as_ref().map(|active| active.id)
	}

	pub fn is_debounce_pending(&self) -> bool {
		self.debouncer.is_pending()
	}

	pub fn render_context(&self) -> &RenderContext {
		&self.render
	}

	pub fn can_open_files(&self) -> bool {
		self.can_open_files
	}

	pub fn set_can_open_files(&mut self, yes: bool) {
		self.can_open_files = yes;
	}

	/// Stores the new query text and re-arms the debouncer.
	pub fn on_query_changed(&mut self, text: impl Into<String>) {
		self.set_text(text.into());
		let ticket = self.debouncer.start();
		tracing::trace!(ticket = ticket.get(), "picker.query.changed");
		self.set_state(SearchState::Debouncing);
	}

	/// Supersedes whatever is running and searches the current text now.
	pub fn restart(&mut self) {
		self.debouncer.cancel();
		self.stop_session();
		self.set_truncated(false);
		self.clear_results();

		if self.text.is_empty() {
			self.set_state(SearchState::Idle);
			return;
		}

		let session = SessionId(self.sessions.next());
		let options = self.search_options();
		let mut engine = self.deps.provider.create(options);
		let change = self.results.push_placeholder();
		self.events.emit(PickerEvent::ResultsChanged(change));
		self.set_state(SearchState::Running);

		tracing::debug!(%session, query = %self.text, "picker.search.start");
		engine.start(self.deps.browser.roots(), self.sink(session));
		self.active = Some(ActiveSession {
			id: session,
			engine,
			completed: false,
		});
	}

	/// Stops the debouncer and any running session. Idempotent.
	pub fn cancel(&mut self) {
		self.debouncer.cancel();
		self.stop_session();
		self.set_truncated(false);
		match self.state {
			SearchState::Running => self.set_state(SearchState::Cancelled),
			SearchState::Debouncing => self.set_state(SearchState::Idle),
			_ => {}
		}
	}

	/// Empties the query, stops everything and settles in `Idle`.
	pub fn clear(&mut self) {
		self.set_text(String::new());
		self.debouncer.cancel();
		self.stop_session();
		self.set_truncated(false);
		self.clear_results();
		self.set_state(SearchState::Idle);
	}

	/// Adopts `render`. Restarts only when the language or highlighting changed;
	/// a new renderer alone applies from the next search on.
	pub fn set_render_context(&mut self, render: RenderContext) {
		let changed = render != self.render;
		self.render = render;
		if changed {
			tracing::debug!(language = self.render.language(), syntax_highlight = self.render.syntax_highlight(), "picker.render.changed");
			self.restart();
		}
	}

	/// Switches the display language, keeping the current renderer.
	pub fn set_language(&mut self, language: &str) {
		let render = self.render.clone().with_language(language);
		self.set_render_context(render);
	}

	pub fn set_syntax_highlight(&mut self, yes: bool) {
		let render = self.render.clone().with_syntax_highlight(yes);
		self.set_render_context(render);
	}

	/// Call when the browser's root set changed.
	pub fn on_roots_changed(&mut self) {
		self.restart();
	}

	/// Asks the file opener for another root, adds it, and restarts.
	/// `Ok(None)` means the user dismissed the request.
	pub fn open_file(&mut self) -> Result<Option<EntityRef>> {
		let opener = self.deps.opener.clone().ok_or(PickerError::OpenerNotConfigured)?;
		if !self.can_open_files {
			return Err(PickerError::OpenFilesDisabled);
		}
		let Some(node) = opener.open() else {
			return Ok(None);
		};
		let root = self.deps.browser.add_root(node);
		tracing::debug!(root = %root.id(), name = root.name(), "picker.file.opened");
		self.on_roots_changed();
		Ok(Some(root))
	}

	pub fn selection(&self) -> SelectionSlot {
		self.selection
	}

	/// Selects `id` in the tree. Returns false if the browser does not know it.
	pub fn select_item(&mut self, id: EntityId) -> bool {
		if self.deps.browser.lookup(id).is_none() {
			return false;
		}
		self.select_tree_item(Some(id));
		true
	}

	/// Sets or clears the raw tree selection. Setting it replaces a hit selection.
	pub fn select_tree_item(&mut self, id: Option<EntityId>) {
		let next = match id {
			Some(id) => SelectionSlot::RawTreeSelection(id),
			None if matches!(self.selection, SelectionSlot::RawTreeSelection(_)) => SelectionSlot::None,
			None => return,
		};
		self.set_selection(next);
	}

	/// Sets or clears the hit selection. Setting it replaces a tree selection.
	/// Returns false if `id` does not name a hit row.
	pub fn select_hit(&mut self, id: Option<HitId>) -> bool {
		let next = match id {
			Some(id) if self.results.hit(id).is_some() => SelectionSlot::SearchHit(id),
			Some(_) => return false,
			None if matches!(self.selection, SelectionSlot::SearchHit(_)) => SelectionSlot::None,
			None => return true,
		};
		self.set_selection(next);
		true
	}

	pub fn validity(&self) -> Validity {
		selection::validate(self.selection, &self.results, self.deps.browser.as_ref(), &self.deps.filter)
	}

	pub fn accepted_entity(&self) -> Option<AcceptedEntity> {
		match self.validity() {
			Validity::Valid(accepted) => Some(accepted),
			Validity::Invalid(_) => None,
		}
	}

	/// Applies every queued message without waiting. Returns how many were applied.
	pub fn pump(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(msg) = self.inbox_rx.try_recv() {
			self.apply(msg);
			applied += 1;
		}
		applied
	}

	/// Waits for one message and applies it.
	pub async fn next(&mut self) -> bool {
		match self.inbox_rx.recv().await {
			Some(msg) => {
				self.apply(msg);
				true
			}
			None => false,
		}
	}

	/// Applies messages until no debounce is pending and no session is running.
	pub async fn settle(&mut self) {
		while self.debouncer.is_pending() || self.state == SearchState::Running {
			if !self.next().await {
				break;
			}
		}
	}

	fn apply(&mut self, msg: PickerMsg) {
		match msg {
			PickerMsg::DebounceFired(ticket) => {
				if self.debouncer.accept(ticket) {
					tracing::debug!(ticket = ticket.get(), "picker.debounce.fired");
					self.restart();
				} else {
					tracing::trace!(ticket = ticket.get(), "picker.debounce.stale");
				}
			}
			PickerMsg::Engine(SessionEvent { session, event }) => self.on_engine_event(session, event),
		}
	}

	fn on_engine_event(&mut self, session: SessionId, event: EngineEvent) {
		let Some(active) = self.active.as_mut().filter(|active| active.id == session) else {
			tracing::trace!(%session, "picker.engine.stale");
			return;
		};

		match event {
			EngineEvent::Batch(hits) => {
				if active.completed {
					tracing::warn!(%session, hits = hits.len(), "picker.engine.batch_after_completion");
					return;
				}
				tracing::trace!(%session, hits = hits.len(), "picker.engine.batch");
				if let Some(change) = self.results.append(hits) {
					self.events.emit(PickerEvent::ResultsChanged(change));
				}
			}
			EngineEvent::Completed { truncated } => {
				if active.completed {
					tracing::warn!(%session, "picker.engine.duplicate_completion");
					return;
				}
				active.completed = true;
				if let Some(change) = self.results.remove_placeholder() {
					self.events.emit(PickerEvent::ResultsChanged(change));
				}
				self.set_truncated(truncated);
				if self.state == SearchState::Running {
					self.set_state(SearchState::Completed);
				}
				tracing::debug!(%session, truncated, hits = self.results.len(), "picker.search.completed");
			}
		}
	}

	/// Cancels and forgets the active run. Later callbacks from it are stale.
	fn stop_session(&mut self) {
		let Some(mut active) = self.active.take() else {
			return;
		};
		if !active.completed {
			active.engine.cancel();
			tracing::debug!(session = %active.id, "picker.search.cancelled");
			if let Some(change) = self.results.remove_placeholder() {
				self.events.emit(PickerEvent::ResultsChanged(change));
			}
		}
	}

	fn search_options(&self) -> SearchOptions {
		let query = self.config.query(&self.text);
		SearchOptions {
			comparer: Arc::new(SearchComparer::new(&query)),
			filter: Arc::clone(&self.deps.filter),
			search_decompiled_data: self.config.search.search_decompiled_data,
			render: self.render.clone(),
			max_results: self.config.search.max_results,
		}
	}

	fn sink(&self, session: SessionId) -> SearchSink {
		let inbox = self.inbox_tx.clone();
		SearchSink::new(session, move |event| inbox.send(PickerMsg::Engine(event)).is_ok())
	}

	fn set_text(&mut self, text: String) {
		if text == self.text {
			return;
		}
		let had_text = self.has_text();
		self.text = text;
		self.events.emit(PickerEvent::QueryChanged { text: self.text.clone() });
		if had_text != self.has_text() {
			self.events.emit(PickerEvent::QueryEmptinessChanged { has_text: self.has_text() });
		}
	}

	fn set_state(&mut self, state: SearchState) {
		if self.state == state {
			return;
		}
		tracing::trace!(from = self.state.as_str(), to = state.as_str(), "picker.state");
		self.state = state;
		self.events.emit(PickerEvent::StateChanged(state));
	}

	fn set_truncated(&mut self, truncated: bool) {
		if self.truncated == truncated {
			return;
		}
		self.truncated = truncated;
		self.events.emit(PickerEvent::TruncationChanged(truncated));
	}

	/// Clearing the rows also clears a hit selection, since its row is gone.
	fn clear_results(&mut self) {
		let Some(change) = self.results.clear() else {
			return;
		};
		self.events.emit(PickerEvent::ResultsChanged(change));
		if matches!(self.selection, SelectionSlot::SearchHit(_)) {
			self.set_selection(SelectionSlot::None);
		}
	}

	fn set_selection(&mut self, slot: SelectionSlot) {
		if slot == self.selection {
			return;
		}
		let before = self.validity();
		self.selection = slot;
		self.events.emit(PickerEvent::SelectionChanged(slot));
		let after = self.validity();
		if after != before {
			self.events.emit(PickerEvent::ValidityChanged(after));
		}
	}
}

impl Drop for MemberPicker {
	fn drop(&mut self) {
		self.stop_session();
	}
}

#[cfg(test)]
pub(crate) mod scripted;

#[cfg(test)]
mod invariants;
