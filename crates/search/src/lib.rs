//! Entity tree search primitives.
//!
//! This crate owns everything the picker controller consumes at its edges:
//!
//! * the entity model ([`Entity`], [`EntityKind`]) and an [`EntityBrowser`]
//!   implementation backed by an in-memory [`EntityTree`],
//! * the kind-keyed acceptance gate ([`KindFilter`]),
//! * literal term matching ([`SearchComparer`]),
//! * the streaming engine contract ([`SearchEngine`], [`SearchEngineProvider`],
//!   [`SearchSink`]) plus the depth-first reference engine ([`TreeSearcher`]).

mod browser;
mod comparer;
mod engine;
mod entity;
mod error;
mod filter;
mod hit;
mod render;
mod searcher;
mod tree;

pub use browser::{EntityBrowser, FileOpener};
pub use comparer::{SearchComparer, SearchQuery};
pub use engine::{EngineEvent, SearchEngine, SearchEngineProvider, SearchOptions, SearchSink, SessionEvent, SessionId};
pub use entity::{Entity, EntityId, EntityKind, EntityNode, EntityRef};
pub use error::{Result, TreeError};
pub use filter::{KindFilter, KindPredicate};
pub use hit::{SearchHit, SortKey};
pub use render::{DisplayRenderer, PlainRenderer, RenderContext};
pub use searcher::{DEFAULT_BATCH_SIZE, TreeSearcher, TreeSearcherProvider};
pub use tree::EntityTree;
