//! Streaming search engine contract.
//!
//! An engine instance is created per search session from [`SearchOptions`],
//! started once over a root set, and reports through a [`SearchSink`] that is
//! stamped with the session identity. The sink never decides whether a
//! message is still wanted; the receiving controller compares the stamp with
//! its active session and drops anything stale.
//!
//! Engine obligations:
//!
//! * `start` returns without blocking; the walk runs on background workers.
//! * Hits arrive as zero or more batches followed by exactly one completion.
//! * `cancel` is cooperative and idempotent. Once the engine observes it no
//!   further batches are sent; the completion may still arrive.
//! * `truncated` is reported only when the result cap stopped the walk early.

use std::fmt;
use std::sync::Arc;

use crate::{EntityRef, KindFilter, RenderContext, SearchComparer, SearchHit};

/// Identity of one engine run, compared on every callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "s{}", self.0)
	}
}

#[derive(Debug)]
pub enum EngineEvent {
	Batch(Vec<SearchHit>),
	Completed { truncated: bool },
}

/// Engine output stamped with the session that produced it.
#[derive(Debug)]
pub struct SessionEvent {
	pub session: SessionId,
	pub event: EngineEvent,
}

type Deliver = Arc<dyn Fn(SessionEvent) -> bool + Send + Sync>;

/// Session-stamped callback handle handed to an engine on start.
#[derive(Clone)]
pub struct SearchSink {
	session: SessionId,
	deliver: Deliver,
}

impl SearchSink {
	/// `deliver` marshals events to the owner; it returns false once the owner is gone.
	pub fn new(session: SessionId, deliver: impl Fn(SessionEvent) -> bool + Send + Sync + 'static) -> Self {
		Self {
			session,
			deliver: Arc::new(deliver),
		}
	}

	pub fn session(&self) -> SessionId {
		self.session
	}

	/// Sends a batch of hits. Empty batches are skipped.
	pub fn batch(&self, hits: Vec<SearchHit>) -> bool {
		if hits.is_empty() {
			return true;
		}
		(self.deliver)(SessionEvent {
			session: self.session,
			event: EngineEvent::Batch(hits),
		})
	}

	/// Sends the terminal completion for this session.
	pub fn complete(&self, truncated: bool) -> bool {
		(self.deliver)(SessionEvent {
			session: self.session,
			event: EngineEvent::Completed { truncated },
		})
	}
}

impl fmt::Debug for SearchSink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearchSink").field("session", &self.session).finish_non_exhaustive()
	}
}

/// Everything an engine needs to evaluate one session.
#[derive(Debug, Clone)]
pub struct SearchOptions {
	pub comparer: Arc<SearchComparer>,
	pub filter: Arc<KindFilter>,
	pub search_decompiled_data: bool,
	pub render: RenderContext,
	/// Maximum number of hits reported before the walk stops; `None` is uncapped.
	pub max_results: Option<usize>,
}

/// One cancellable engine run.
pub trait SearchEngine: Send {
	/// Begins enumerating `roots`. Must not block the caller.
	fn start(&mut self, roots: Vec<EntityRef>, sink: SearchSink);

	/// Requests cooperative cancellation. Idempotent.
	fn cancel(&mut self);
}

/// Factory creating a fresh engine per session.
pub trait SearchEngineProvider: Send + Sync {
	fn create(&self, options: SearchOptions) -> Box<dyn SearchEngine>;
}
