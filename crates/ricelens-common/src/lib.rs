//! Shared building blocks for the ricelens crates
//!
//! - [`events`]: in-process event emitters whose listeners are released through
//!   [`Subscription`] handles
//! - [`logging`]: `tracing` subscriber initialisation and error formatting
//! - [`watch`]: debounced file change notification

pub mod events;
pub mod logging;
pub mod watch;

pub use events::{Disposable, EventEmitter, Listener, Subscription};
pub use logging::{LogLevel, LogOptions, LoggingError};
pub use watch::{FileWatch, WatchError};
