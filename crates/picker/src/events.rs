use tokio::sync::mpsc;

use crate::{SearchState, SelectionSlot, Validity};

/// Mutation of the result list, in list order at the time it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsChange {
	Added { start: usize, count: usize },
	Removed { index: usize },
	Cleared,
}

/// Typed notifications pushed to picker subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
	QueryChanged { text: String },
	/// Emitted only when the query toggles between empty and non-empty.
	QueryEmptinessChanged { has_text: bool },
	ResultsChanged(ResultsChange),
	TruncationChanged(bool),
	StateChanged(SearchState),
	SelectionChanged(SelectionSlot),
	ValidityChanged(Validity),
}

/// Fan-out to subscribers. Closed receivers are pruned on the next emit.
#[derive(Debug, Default)]
pub(crate) struct EventHub {
	subscribers: Vec<mpsc::UnboundedSender<PickerEvent>>,
}

impl EventHub {
	pub(crate) fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PickerEvent> {
		let (tx, rx) = mpsc::unbounded_channel();
		self.subscribers.push(tx);
		rx
	}

	pub(crate) fn emit(&mut self, event: PickerEvent) {
		if self.subscribers.is_empty() {
			return;
		}
		self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
	}
}
