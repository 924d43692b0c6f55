//! Fake vendor library for integration testing
//!
//! Models the parts of the groupware client library the crate drives:
//!
//! autodiscover -> open service -> CreateItemRequest (hidden) ->
//! BeginExecute -> worker thread -> completion -> EndExecute
//!
//! ## Module layout
//!
//! - `library` -- the `Surface`/`Connector` implementation, hidden
//!   request type, fault injection and probes
//! - `worker` -- the background "network" thread that completes
//!   pending operations

pub mod library;
mod worker;

pub use library::FakeLibrary;
