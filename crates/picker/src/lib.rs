//! Interactive member picker.
//!
//! A [`MemberPicker`] turns query edits into debounced, cancellable search
//! sessions over an entity tree, keeps the streamed hits in a result list, and
//! validates the current selection against a kind-keyed acceptance filter.
//! Engines, the tree browser and the filter come from `sieve-search`.

mod config;
mod debounce;
mod error;
mod events;
mod order;
mod results;
mod selection;
mod session;

pub use config::{PickerConfig, RenderSettings, SearchSettings};
pub use debounce::{DebounceTicket, Debouncer};
pub use error::{ConfigError, PickerError, Result};
pub use events::{PickerEvent, ResultsChange};
pub use order::{compare_rows, sorted};
pub use results::{HitId, ResultEntry, ResultList, ResultRow};
pub use selection::{AcceptedEntity, InvalidReason, SelectionSlot, Validity, accept, resolve, validate};
pub use session::{MemberPicker, PickerDeps, PickerMsg, SearchState};
