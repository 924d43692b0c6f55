//! Groupware mail submission client

use crate::adapter::{AdapterCache, ErrorHandling, OperationDescriptor, Surface};
use crate::config::MailUser;
use crate::disposition::{MessageDisposition, SendInvitationsMode};
use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::message::EmailMessage;
use crate::response::{ResponseCollection, ServiceResult};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Input slot values for the create-items request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Folder(Option<Folder>),
    Items(Vec<EmailMessage>),
    MessageDisposition(Option<MessageDisposition>),
    SendInvitationsMode(Option<SendInvitationsMode>),
}

static CREATE_ITEMS: OnceLock<OperationDescriptor> = OnceLock::new();

/// The hidden batch create operation behind [`GroupwareClient::create_items`].
#[must_use]
pub fn create_items_descriptor() -> &'static OperationDescriptor {
    CREATE_ITEMS.get_or_init(|| {
        OperationDescriptor::new("CreateItemRequest")
            .field("ParentFolderId")
            .field("Items")
            .field("MessageDisposition")
            .field("SendInvitationsMode")
            .begin("BeginExecute")
            .end("EndExecute")
            .error_handling(ErrorHandling::ReturnErrors)
    })
}

/// Connection setup offered by the vendor library.
///
/// Blocking calls; the library performs its own network I/O.
pub trait Connector: Surface {
    /// Resolve the service endpoint for `email_address`, asking
    /// `allow_redirect` before following any redirection.
    ///
    /// # Errors
    ///
    /// Returns an error if no endpoint can be found.
    fn autodiscover(
        &self,
        email_address: &str,
        allow_redirect: &dyn Fn(&str) -> bool,
    ) -> Result<String>;

    /// Open an authenticated service handle against `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials or endpoint are rejected.
    fn open(&self, user: &MailUser, endpoint: &str) -> Result<Self::Service>;
}

/// Only follow autodiscovery redirections to `https` URLs.
#[must_use]
pub fn is_secure_redirect(url: &str) -> bool {
    url.split_once("://")
        .is_some_and(|(scheme, rest)| {
            scheme.eq_ignore_ascii_case("https") && !rest.is_empty()
        })
}

/// Mail submission client over a connected service handle
pub struct GroupwareClient<S: Surface> {
    service: S::Service,
    adapters: Arc<AdapterCache<S>>,
}

impl<S> GroupwareClient<S>
where
    S: Surface<Value = FieldValue>,
{
    /// Wrap an already connected service handle.
    ///
    /// Clients sharing one `adapters` cache share compiled adapters.
    #[must_use]
    pub const fn new(service: S::Service, adapters: Arc<AdapterCache<S>>) -> Self {
        Self { service, adapters }
    }

    /// Connect as `user`.
    ///
    /// Without a known endpoint, autodiscovery runs first and the
    /// endpoint it finds is stored on `user` for later connections.
    ///
    /// # Errors
    ///
    /// Returns an error if autodiscovery or opening the service fails.
    pub fn connect(adapters: Arc<AdapterCache<S>>, user: &mut MailUser) -> Result<Self>
    where
        S: Connector,
    {
        let surface = Arc::clone(adapters.surface());

        let endpoint = if let Some(endpoint) = &user.endpoint {
            endpoint.clone()
        } else {
            debug!("Autodiscovering service endpoint for {}", user.email_address);
            let found = surface.autodiscover(&user.email_address, &is_secure_redirect)?;
            info!("Autodiscover complete: {}", found);
            user.endpoint = Some(found.clone());
            found
        };

        if let Some(target) = &user.impersonate {
            debug!("Impersonating {}", target);
        }

        let service = surface.open(user, &endpoint)?;
        info!("Connected to {} as {}", endpoint, user.email_address);
        Ok(Self::new(service, adapters))
    }

    #[must_use]
    pub const fn service(&self) -> &S::Service {
        &self.service
    }

    /// Create several items in a single call.
    ///
    /// With `parent_folder` set to `None` items go to their default
    /// folders. `disposition` is required when `items` is non-empty.
    /// Per-item failures are reported in the returned collection, not
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractMismatch`] if the library no longer has
    /// the hidden operation, [`Error::InvalidInput`] for a missing
    /// disposition, and [`Error::OperationFault`] if the request itself
    /// fails.
    pub async fn create_items(
        &self,
        items: Vec<EmailMessage>,
        parent_folder: Option<Folder>,
        disposition: Option<MessageDisposition>,
        invitations: Option<SendInvitationsMode>,
    ) -> Result<ResponseCollection> {
        if !items.is_empty() && disposition.is_none() {
            return Err(Error::InvalidInput(
                "A message disposition is required to create messages".into(),
            ));
        }

        let adapter = self.adapters.get_or_build(create_items_descriptor())?;
        let count = items.len();
        debug!("Creating {} item(s) in {:?}", count, parent_folder);

        let values = vec![
            FieldValue::Folder(parent_folder),
            FieldValue::Items(items),
            FieldValue::MessageDisposition(disposition),
            FieldValue::SendInvitationsMode(invitations),
        ];
        let responses = adapter.invoke(&self.service, values)?.await?;

        if responses.overall_result() == ServiceResult::Success {
            info!("All {} item(s) were successfully submitted", count);
        } else {
            for (i, response) in responses.failures() {
                warn!(
                    "Item {} failed: {} ({})",
                    i, response.error_code, response.error_message
                );
            }
        }

        Ok(responses)
    }

    /// Send a single message without saving a copy.
    ///
    /// # Errors
    ///
    /// See [`GroupwareClient::create_items`].
    pub async fn send_message(&self, message: EmailMessage) -> Result<ResponseCollection> {
        self.create_items(
            vec![message],
            Some(Folder::Drafts),
            Some(MessageDisposition::SendOnly),
            None,
        )
        .await
    }
}
