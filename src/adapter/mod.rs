//! Future-based calls into hidden begin/end operations
//!
//! Some operations of the vendor library are reachable only through an
//! internal request type with a paired begin/end primitive. This module
//! finds those members once through a [`Surface`], compiles them into a
//! [`CompiledAdapter`], caches it in an [`AdapterCache`], and exposes the
//! operation as a single call returning a future.
//!
//! ```text
//!   AdapterCache::get_or_build(descriptor)
//!       |  first use: Surface lookups -> CompiledAdapter (cached)
//!       v
//!   CompiledAdapter::invoke(service, values)
//!       |  construct request, set fields, begin   (sync faults here)
//!       v
//!   OperationFuture
//!       |  await completion signal, extract request, end
//!       v
//!   ResponseCollection                            (end faults here)
//! ```

mod cache;
mod compiled;
mod completion;
mod descriptor;
mod surface;

pub use cache::AdapterCache;
pub use compiled::{CompiledAdapter, OperationFuture};
pub use completion::{CompletionNotifier, CompletionSignal, completion_channel};
pub use descriptor::{ErrorHandling, OperationDescriptor};
pub use surface::{Begin, Constructor, End, Extractor, PendingOperation, Setter, Surface};
