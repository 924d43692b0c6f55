//! The contract between the adapter and an opaque library
//!
//! A [`Surface`] is the only place that knows how to reach into the
//! vendor library: it looks up hidden members by name and hands them
//! back as callables. Everything above it depends on this contract
//! alone. A lookup that returns `None` means the member does not exist
//! in the library build being driven.

use super::completion::CompletionSignal;
use super::descriptor::ErrorHandling;
use crate::error::Result;
use crate::response::ResponseCollection;

/// Builds a fresh request bound to a service with the given error mode.
pub type Constructor<S> = Box<
    dyn Fn(&<S as Surface>::Service, ErrorHandling) -> Result<<S as Surface>::Request>
        + Send
        + Sync,
>;

/// Assigns one input field on a request.
pub type Setter<S> =
    Box<dyn Fn(&mut <S as Surface>::Request, <S as Surface>::Value) -> Result<()> + Send + Sync>;

/// Starts the operation with no continuation and returns its pending handle.
pub type Begin<S> =
    Box<dyn Fn(<S as Surface>::Request) -> Result<<S as Surface>::Pending> + Send + Sync>;

/// Recovers the originating request from a pending handle.
pub type Extractor<S> = Box<
    dyn Fn(&<S as Surface>::Service, &<S as Surface>::Pending) -> Result<<S as Surface>::Request>
        + Send
        + Sync,
>;

/// Retires a pending handle and yields the operation's results.
pub type End<S> = Box<
    dyn Fn(&<S as Surface>::Request, <S as Surface>::Pending) -> Result<ResponseCollection>
        + Send
        + Sync,
>;

/// In-flight work returned by a begin primitive.
///
/// Owned by the caller that started it; the end primitive takes it by
/// value, so a handle cannot be retired twice.
pub trait PendingOperation: Send + 'static {
    /// A signal that resolves when the library finishes the work.
    fn completion(&self) -> CompletionSignal;
}

/// Member lookup on an opaque library.
pub trait Surface: Send + Sync + Sized + 'static {
    /// Authenticated service handle the operations run against.
    type Service: Clone + Send + Sync + 'static;
    /// The hidden request representation.
    type Request: Send + 'static;
    type Pending: PendingOperation;
    /// Value accepted by field setters.
    type Value: Send + 'static;

    fn constructor(&self, request_type: &str) -> Option<Constructor<Self>>;

    fn setter(&self, request_type: &str, field: &str) -> Option<Setter<Self>>;

    fn begin(&self, request_type: &str, name: &str) -> Option<Begin<Self>>;

    fn extractor(&self, request_type: &str) -> Option<Extractor<Self>>;

    fn end(&self, request_type: &str, name: &str) -> Option<End<Self>>;
}
