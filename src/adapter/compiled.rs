//! Invocation plans assembled from discovered members

use super::descriptor::OperationDescriptor;
use super::surface::{Begin, Constructor, End, Extractor, PendingOperation, Setter, Surface};
use crate::error::{Error, Result};
use crate::response::ResponseCollection;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Resolves once with the results of a started operation.
pub type OperationFuture = BoxFuture<'static, Result<ResponseCollection>>;

struct CompletionPlan<S: Surface> {
    extract: Extractor<S>,
    end: End<S>,
}

impl<S: Surface> CompletionPlan<S> {
    fn run(&self, service: &S::Service, pending: S::Pending) -> Result<ResponseCollection> {
        let request = (self.extract)(service, &pending)?;
        (self.end)(&request, pending)
    }
}

/// A begin plan and a completion plan for one [`OperationDescriptor`].
///
/// Built once by [`AdapterCache`](super::AdapterCache) and reused for
/// every call. Running either plan has no effect on the adapter itself.
pub struct CompiledAdapter<S: Surface> {
    descriptor: OperationDescriptor,
    construct: Constructor<S>,
    setters: Vec<Setter<S>>,
    begin: Begin<S>,
    completion: Arc<CompletionPlan<S>>,
}

impl<S: Surface> CompiledAdapter<S> {
    /// Look up every member the descriptor names.
    ///
    /// Fails on the first missing member rather than producing a
    /// partial adapter.
    pub(crate) fn discover(surface: &S, descriptor: &OperationDescriptor) -> Result<Self> {
        let owner = descriptor.request_type();
        debug!("Discovering members of {}", owner);

        let construct = surface
            .constructor(owner)
            .ok_or_else(|| Error::contract_mismatch(owner, "constructor"))?;

        let mut setters = Vec::with_capacity(descriptor.fields().len());
        for (i, field) in descriptor.fields().iter().enumerate() {
            if descriptor.fields()[..i].contains(field) {
                return Err(Error::InvalidInput(format!(
                    "Field {field} listed twice for {owner}"
                )));
            }
            let setter = surface
                .setter(owner, field)
                .ok_or_else(|| {
                    Error::contract_mismatch(owner, format!("property {field}"))
                })?;
            setters.push(setter);
        }

        let begin = surface
            .begin(owner, descriptor.begin_name())
            .ok_or_else(|| {
                Error::contract_mismatch(owner, format!("method {}", descriptor.begin_name()))
            })?;

        let extract = surface
            .extractor(owner)
            .ok_or_else(|| Error::contract_mismatch(owner, "request extractor"))?;

        let end = surface
            .end(owner, descriptor.end_name())
            .ok_or_else(|| {
                Error::contract_mismatch(owner, format!("method {}", descriptor.end_name()))
            })?;

        Ok(Self {
            descriptor: descriptor.clone(),
            construct,
            setters,
            begin,
            completion: Arc::new(CompletionPlan { extract, end }),
        })
    }

    #[must_use]
    pub const fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    /// Construct the request, assign the inputs in descriptor order and
    /// start the operation.
    ///
    /// `values` line up with [`OperationDescriptor::fields`]. Request
    /// fields the descriptor does not name keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on an arity mismatch, or whatever
    /// the constructor, a setter or the begin primitive raises.
    pub fn begin(&self, service: &S::Service, values: Vec<S::Value>) -> Result<S::Pending> {
        if values.len() != self.setters.len() {
            return Err(Error::InvalidInput(format!(
                "{} expects {} inputs, got {}",
                self.descriptor.request_type(),
                self.setters.len(),
                values.len()
            )));
        }

        let mut request = (self.construct)(service, self.descriptor.error_handling_mode())?;
        for (set, value) in self.setters.iter().zip(values) {
            set(&mut request, value)?;
        }
        (self.begin)(request)
    }

    /// Retire a pending handle and return the operation's results.
    ///
    /// # Errors
    ///
    /// Returns whatever the extractor or the end primitive raises.
    pub fn end(&self, service: &S::Service, pending: S::Pending) -> Result<ResponseCollection> {
        self.completion.run(service, pending)
    }

    /// Start the operation and return a future for its results.
    ///
    /// Failures before a pending handle exists come back from this call
    /// directly; failures of the end primitive come back through the
    /// future. Dropping the future before it resolves leaves the
    /// pending handle unretired.
    ///
    /// # Errors
    ///
    /// See [`CompiledAdapter::begin`].
    pub fn invoke(&self, service: &S::Service, values: Vec<S::Value>) -> Result<OperationFuture> {
        let pending = self.begin(service, values)?;
        let signal = pending.completion();
        let completion = Arc::clone(&self.completion);
        let service = service.clone();

        Ok(async move {
            signal.wait().await;
            completion.run(&service, pending)
        }
        .boxed())
    }
}

impl<S: Surface> fmt::Debug for CompiledAdapter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledAdapter")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
