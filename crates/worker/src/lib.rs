//! Worker primitives shared by the search engine and the picker controller.
//!
//! Everything that leaves the owner thread goes through [`spawn`] or
//! [`spawn_blocking`] so task placement is classified and traced in one place.
//! Session identities are minted from a [`GenerationClock`] and background
//! work observes cancellation through a [`GenerationToken`].

mod class;
mod panic;
mod spawn;
mod token;

pub use class::TaskClass;
pub use panic::join_error_panic_message;
pub use spawn::{spawn, spawn_blocking};
pub use token::{GenerationClock, GenerationToken};
