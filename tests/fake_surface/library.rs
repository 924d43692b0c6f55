//! The fake library's hidden members.
//!
//! Exposes one hidden request type, `CreateItemRequest`, with four
//! settable properties and a `BeginExecute`/`EndExecute` pair. Any
//! member can be hidden to simulate a library build whose internals
//! changed. Probes count lookups and calls so tests can observe how
//! often discovery runs.

use super::worker;
use groupware_mail::adapter::{
    Begin, CompletionSignal, Constructor, End, ErrorHandling, Extractor, PendingOperation, Setter,
    Surface, completion_channel,
};
use groupware_mail::{
    Connector, EmailMessage, Error, FieldValue, Folder, MailUser, MessageDisposition,
    ResponseCollection, Result, SendInvitationsMode, ServiceResponse,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

pub const REQUEST_TYPE: &str = "CreateItemRequest";

/// What the request looked like when `BeginExecute` ran.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    pub error_handling: Option<ErrorHandling>,
    pub parent_folder: Option<Folder>,
    pub items: Vec<EmailMessage>,
    pub disposition: Option<MessageDisposition>,
    pub invitations: Option<SendInvitationsMode>,
    /// Property names in the order they were assigned.
    pub assigned: Vec<&'static str>,
    pub completed: bool,
}

pub type FakeRequest = Arc<Mutex<RequestState>>;

#[derive(Debug)]
pub struct ServiceState {
    pub endpoint: String,
    pub account: String,
    pub impersonating: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FakeService(pub Arc<ServiceState>);

/// The library's async handle for an in-flight request.
pub struct FakePending {
    request: FakeRequest,
    outcome: Arc<Mutex<Option<Result<ResponseCollection>>>>,
    signal: CompletionSignal,
    worker: Option<JoinHandle<()>>,
}

impl PendingOperation for FakePending {
    fn completion(&self) -> CompletionSignal {
        self.signal.clone()
    }
}

#[derive(Default)]
struct Shared {
    hidden: HashSet<String>,
    reject_domain: Option<String>,
    fail_begin: Option<String>,
    fail_end: Option<String>,
    redirect: Option<String>,
    endpoint: String,
    password: String,
    delay: Duration,

    lookups: AtomicUsize,
    begun: AtomicUsize,
    ended: AtomicUsize,
    autodiscovers: AtomicUsize,
    last_request: Mutex<Option<RequestState>>,
}

impl Shared {
    /// What the server answers for a submitted request.
    fn process(&self, request: &RequestState) -> Result<ResponseCollection> {
        if let Some(fault) = &self.fail_end {
            return Err(Error::OperationFault(fault.clone()));
        }

        let sends = request.disposition.is_some_and(MessageDisposition::sends);
        let responses: ResponseCollection = request
            .items
            .iter()
            .map(|item| self.check_item(item, sends))
            .collect();

        if request.error_handling == Some(ErrorHandling::ThrowOnError)
            && let Some((_, failed)) = responses.failures().next()
        {
            return Err(Error::OperationFault(format!(
                "{}: {}",
                failed.error_code, failed.error_message
            )));
        }

        Ok(responses)
    }

    fn check_item(&self, item: &EmailMessage, sends: bool) -> ServiceResponse {
        let rejected = self.reject_domain.as_ref().is_some_and(|domain| {
            item.to_recipients
                .iter()
                .chain(&item.cc_recipients)
                .any(|r| r.ends_with(domain.as_str()))
        });

        if rejected {
            ServiceResponse::error(
                "ErrorInvalidRecipients",
                "One or more recipients are invalid.",
            )
        } else if sends && !item.has_recipients() {
            ServiceResponse::error(
                "ErrorInvalidRecipients",
                "At least one recipient is required.",
            )
        } else {
            ServiceResponse::success()
        }
    }
}

/// In-process stand-in for the vendor client library.
pub struct FakeLibrary {
    shared: Arc<Shared>,
}

impl FakeLibrary {
    pub fn builder() -> FakeLibraryBuilder {
        FakeLibraryBuilder {
            shared: Shared {
                endpoint: "https://mail.fake.test/EWS/Exchange.asmx".to_string(),
                password: "testpass".to_string(),
                delay: Duration::from_millis(10),
                ..Shared::default()
            },
        }
    }

    /// Constructor lookups; one per discovery run.
    pub fn lookups(&self) -> usize {
        self.shared.lookups.load(Ordering::SeqCst)
    }

    pub fn begun(&self) -> usize {
        self.shared.begun.load(Ordering::SeqCst)
    }

    pub fn ended(&self) -> usize {
        self.shared.ended.load(Ordering::SeqCst)
    }

    pub fn autodiscovers(&self) -> usize {
        self.shared.autodiscovers.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RequestState> {
        self.shared.last_request.lock().unwrap().clone()
    }

    fn exposes(&self, request_type: &str, member: &str) -> bool {
        request_type == REQUEST_TYPE && !self.shared.hidden.contains(member)
    }
}

pub struct FakeLibraryBuilder {
    shared: Shared,
}

impl FakeLibraryBuilder {
    /// Remove a member (constructor = the type name, or a property or
    /// method name, or `extractor`).
    pub fn hide(mut self, member: &str) -> Self {
        self.shared.hidden.insert(member.to_string());
        self
    }

    /// Fail items with a recipient ending in `domain`.
    pub fn reject_domain(mut self, domain: &str) -> Self {
        self.shared.reject_domain = Some(domain.to_string());
        self
    }

    pub fn fail_begin(mut self, fault: &str) -> Self {
        self.shared.fail_begin = Some(fault.to_string());
        self
    }

    pub fn fail_end(mut self, fault: &str) -> Self {
        self.shared.fail_end = Some(fault.to_string());
        self
    }

    /// Make autodiscovery redirect to `url`.
    pub fn redirect(mut self, url: &str) -> Self {
        self.shared.redirect = Some(url.to_string());
        self
    }

    pub fn build(self) -> FakeLibrary {
        FakeLibrary {
            shared: Arc::new(self.shared),
        }
    }
}

impl Surface for FakeLibrary {
    type Service = FakeService;
    type Request = FakeRequest;
    type Pending = FakePending;
    type Value = FieldValue;

    fn constructor(&self, request_type: &str) -> Option<Constructor<Self>> {
        self.shared.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.exposes(request_type, REQUEST_TYPE) {
            return None;
        }
        Some(Box::new(
            |_: &FakeService, mode: ErrorHandling| -> Result<FakeRequest> {
                Ok(Arc::new(Mutex::new(RequestState {
                    error_handling: Some(mode),
                    ..RequestState::default()
                })))
            },
        ))
    }

    fn setter(&self, request_type: &str, field: &str) -> Option<Setter<Self>> {
        if !self.exposes(request_type, field) {
            return None;
        }
        let name: &'static str = match field {
            "ParentFolderId" => "ParentFolderId",
            "Items" => "Items",
            "MessageDisposition" => "MessageDisposition",
            "SendInvitationsMode" => "SendInvitationsMode",
            _ => return None,
        };
        Some(Box::new(
            move |request: &mut FakeRequest, value: FieldValue| -> Result<()> {
                let mut state = request.lock().unwrap();
                match (name, value) {
                    ("ParentFolderId", FieldValue::Folder(f)) => state.parent_folder = f,
                    ("Items", FieldValue::Items(items)) => state.items = items,
                    ("MessageDisposition", FieldValue::MessageDisposition(d)) => {
                        state.disposition = d;
                    }
                    ("SendInvitationsMode", FieldValue::SendInvitationsMode(m)) => {
                        state.invitations = m;
                    }
                    (name, other) => {
                        return Err(Error::InvalidInput(format!(
                            "{name} cannot be set to {other:?}"
                        )));
                    }
                }
                state.assigned.push(name);
                Ok(())
            },
        ))
    }

    fn begin(&self, request_type: &str, name: &str) -> Option<Begin<Self>> {
        if name != "BeginExecute" || !self.exposes(request_type, name) {
            return None;
        }
        let shared = Arc::clone(&self.shared);
        Some(Box::new(move |request: FakeRequest| -> Result<FakePending> {
            if let Some(fault) = &shared.fail_begin {
                return Err(Error::OperationFault(fault.clone()));
            }
            let snapshot = request.lock().unwrap().clone();
            shared.begun.fetch_add(1, Ordering::SeqCst);
            *shared.last_request.lock().unwrap() = Some(snapshot.clone());

            let (notifier, signal) = completion_channel();
            let outcome = Arc::new(Mutex::new(None));
            let server = Arc::clone(&shared);
            let handle = worker::spawn(shared.delay, Arc::clone(&outcome), notifier, move || {
                server.process(&snapshot)
            });

            Ok(FakePending {
                request,
                outcome,
                signal,
                worker: Some(handle),
            })
        }))
    }

    fn extractor(&self, request_type: &str) -> Option<Extractor<Self>> {
        if !self.exposes(request_type, "extractor") {
            return None;
        }
        Some(Box::new(
            |_: &FakeService, pending: &FakePending| -> Result<FakeRequest> {
                Ok(Arc::clone(&pending.request))
            },
        ))
    }

    fn end(&self, request_type: &str, name: &str) -> Option<End<Self>> {
        if name != "EndExecute" || !self.exposes(request_type, name) {
            return None;
        }
        let shared = Arc::clone(&self.shared);
        Some(Box::new(
            move |request: &FakeRequest, mut pending: FakePending| -> Result<ResponseCollection> {
                if !Arc::ptr_eq(request, &pending.request) {
                    return Err(Error::OperationFault(
                        "Async handle belongs to another request".into(),
                    ));
                }
                // EndExecute blocks until the work is done.
                if let Some(handle) = pending.worker.take() {
                    handle
                        .join()
                        .map_err(|_| Error::OperationFault("Worker panicked".into()))?;
                }

                let mut state = request.lock().unwrap();
                if state.completed {
                    return Err(Error::OperationFault("Request already ended".into()));
                }
                state.completed = true;
                shared.ended.fetch_add(1, Ordering::SeqCst);

                pending
                    .outcome
                    .lock()
                    .unwrap()
                    .take()
                    .unwrap_or_else(|| Err(Error::OperationFault("No response".into())))
            },
        ))
    }
}

impl Connector for FakeLibrary {
    fn autodiscover(
        &self,
        _email_address: &str,
        allow_redirect: &dyn Fn(&str) -> bool,
    ) -> Result<String> {
        self.shared.autodiscovers.fetch_add(1, Ordering::SeqCst);
        match &self.shared.redirect {
            Some(url) if !allow_redirect(url) => Err(Error::OperationFault(format!(
                "Autodiscover redirection to {url} refused"
            ))),
            Some(url) => Ok(url.clone()),
            None => Ok(self.shared.endpoint.clone()),
        }
    }

    fn open(&self, user: &MailUser, endpoint: &str) -> Result<FakeService> {
        if user.password.expose() != self.shared.password {
            return Err(Error::OperationFault("401 Unauthorized".into()));
        }
        Ok(FakeService(Arc::new(ServiceState {
            endpoint: endpoint.to_string(),
            account: user.email_address.clone(),
            impersonating: user.impersonate.clone(),
        })))
    }
}
