//! # Context
//!
//! Collaborators of the import assistant, passed explicitly instead
//! of being reached through globals.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{api::ImportApi, consent::OAuthPopup, keys::AddressKeys, AnyBoxedError, Error};

/// Refreshes client side state after server side changes.
#[async_trait]
pub trait EventManager: Send + Sync {
    async fn call(&self) -> Result<(), AnyBoxedError>;
}

/// Event manager for environments without client side state.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventManager;

#[async_trait]
impl EventManager for NoopEventManager {
    async fn call(&self) -> Result<(), AnyBoxedError> {
        debug!("no event manager to refresh");
        Ok(())
    }
}

/// The sink every surfaced error goes through.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, err: &Error);
}

/// Error handler logging errors with [`tracing`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingErrorHandler;

impl ErrorHandler for TracingErrorHandler {
    fn handle(&self, err: &Error) {
        warn!("{err}");
        debug!("{err:?}");
    }
}

/// The context shared by every operation of the import assistant.
#[derive(Clone)]
pub struct ImportContext {
    pub api: Arc<dyn ImportApi>,
    pub keys: Arc<dyn AddressKeys>,
    pub popup: Arc<dyn OAuthPopup>,
    pub events: Arc<dyn EventManager>,
    pub errors: Arc<dyn ErrorHandler>,
}

impl ImportContext {
    /// Builds a context that does not refresh events and logs errors.
    pub fn new(
        api: impl ImportApi + 'static,
        keys: impl AddressKeys + 'static,
        popup: impl OAuthPopup + 'static,
    ) -> Self {
        Self {
            api: Arc::new(api),
            keys: Arc::new(keys),
            popup: Arc::new(popup),
            events: Arc::new(NoopEventManager),
            errors: Arc::new(TracingErrorHandler),
        }
    }

    pub fn with_event_manager(mut self, events: impl EventManager + 'static) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn with_error_handler(mut self, errors: impl ErrorHandler + 'static) -> Self {
        self.errors = Arc::new(errors);
        self
    }

    /// Sends the error to the handler, then gives it back.
    pub fn surface(&self, err: Error) -> Error {
        self.errors.handle(&err);
        err
    }

    /// Refreshes events, logging failures instead of propagating
    /// them.
    pub async fn refresh_events(&self) {
        if let Err(err) = self.events.call().await {
            let err = Error::RefreshEventsError(err);
            warn!("{err}");
            debug!("{err:?}");
        }
    }
}
