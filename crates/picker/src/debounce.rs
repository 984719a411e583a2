//! One-shot re-armable timer coalescing bursts of query edits.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sieve_worker::{TaskClass, spawn};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Identity of one arm. A fired ticket is honoured only while it is still the
/// latest arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

impl DebounceTicket {
	pub const fn get(self) -> u64 {
		self.0
	}
}

/// Deadline used when the configured delay overflows the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

type FireFn = Arc<dyn Fn(DebounceTicket) + Send + Sync>;

/// Debounce scheduler.
///
/// The timer task only posts its ticket through `fire`; the owner calls
/// [`Debouncer::accept`] when the ticket arrives, which consumes the arm. A
/// ticket from an arm that was replaced or cancelled after it was posted is
/// refused, so each arm fires at most once and only the last arm in a burst
/// can fire at all.
pub struct Debouncer {
	delay: Duration,
	arm: u64,
	pending: Option<JoinHandle<()>>,
	fire: FireFn,
}

impl Debouncer {
	pub fn new(delay: Duration, fire: impl Fn(DebounceTicket) + Send + Sync + 'static) -> Self {
		Self {
			delay,
			arm: 0,
			pending: None,
			fire: Arc::new(fire),
		}
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Arms the timer, replacing any pending arm.
	pub fn start(&mut self) -> DebounceTicket {
		if let Some(pending) = self.pending.take() {
			pending.abort();
		}
		self.arm = self.arm.wrapping_add(1);
		let ticket = DebounceTicket(self.arm);
		let now = Instant::now();
		let deadline = now.checked_add(self.delay).unwrap_or(now + FAR_FUTURE);
		let fire = Arc::clone(&self.fire);

		self.pending = Some(spawn(TaskClass::Interactive, async move {
			tokio::time::sleep_until(deadline).await;
			fire(ticket);
		}));
		tracing::trace!(ticket = ticket.0, delay = ?self.delay, "debounce.arm");
		ticket
	}

	/// Disarms without firing. Returns whether an arm was pending.
	pub fn cancel(&mut self) -> bool {
		let Some(pending) = self.pending.take() else {
			return false;
		};
		pending.abort();
		self.arm = self.arm.wrapping_add(1);
		tracing::trace!("debounce.cancel");
		true
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Consumes a fired ticket. Returns true exactly once for the latest arm.
	pub fn accept(&mut self, ticket: DebounceTicket) -> bool {
		if self.pending.is_none() || ticket.0 != self.arm {
			return false;
		}
		self.pending = None;
		true
	}
}

impl Drop for Debouncer {
	fn drop(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.abort();
		}
	}
}

impl fmt::Debug for Debouncer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Debouncer")
			.field("delay", &self.delay)
			.field("arm", &self.arm)
			.field("pending", &self.pending.is_some())
			.finish_non_exhaustive()
	}
}
