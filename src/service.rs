//! Modal dialog service
//!
//! Brokers a single outstanding confirmation request against one bound
//! [`ConfirmDialogController`]. The caller awaits the answer; the dialog's
//! next hide resolves it through a single-use oneshot resolver.
//!
//! [`ConfirmDialogController`]: crate::dialog::ConfirmDialogController

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{oneshot, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::button::{DialogButtonResult, DialogButtons};
use crate::dialog::{ConfirmDialogController, SharedDialog};
use crate::error::{DialogError, Result};
use crate::localization::{Localizer, NoLocalizer};

/// Single-use result slot: the first `resolve` wins, later calls are no-ops
#[derive(Debug)]
pub struct Resolver {
    tx: Mutex<Option<oneshot::Sender<DialogButtonResult>>>,
}

impl Resolver {
    fn new(tx: oneshot::Sender<DialogButtonResult>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    /// Fulfil the slot. Returns false if it was already used.
    pub fn resolve(&self, result: DialogButtonResult) -> bool {
        let tx = match self.tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match tx {
            Some(tx) => {
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }

    pub fn is_spent(&self) -> bool {
        match self.tx.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

/// An outstanding confirmation awaiting exactly one answer.
///
/// Only the dialog's armed result callback owns the [`Resolver`]; this record
/// keeps a weak handle, so dropping the dialog closes the channel.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: Uuid,
    pub requested_at: DateTime<Utc>,
    resolver: Weak<Resolver>,
}

impl PendingRequest {
    fn is_open(&self) -> bool {
        self.resolver
            .upgrade()
            .is_some_and(|resolver| !resolver.is_spent())
    }
}

/// Service for asking questions through a bound dialog
pub struct ModalDialogService {
    /// Bound dialog, held weakly (the host owns it)
    dialog: RwLock<Option<Weak<RwLock<ConfirmDialogController>>>>,
    /// At most one outstanding request
    pending: Mutex<Option<PendingRequest>>,
    /// Caption lookup for the generated button sets
    localizer: Arc<dyn Localizer>,
}

impl Default for ModalDialogService {
    fn default() -> Self {
        Self::new(Arc::new(NoLocalizer))
    }
}

impl ModalDialogService {
    pub fn new(localizer: Arc<dyn Localizer>) -> Self {
        Self {
            dialog: RwLock::new(None),
            pending: Mutex::new(None),
            localizer,
        }
    }

    /// Bind the dialog used for requests, replacing any previous one.
    ///
    /// A request still pending on the previous dialog resolves as Cancel and
    /// its prompt is hidden.
    pub async fn bind(&self, dialog: &SharedDialog) {
        let mut slot = self.dialog.write().await;
        self.release(slot.take(), "dialog rebound").await;
        *slot = Some(Arc::downgrade(dialog));
        debug!("Dialog bound to service");
    }

    /// Detach the bound dialog. A pending request resolves as Cancel.
    pub async fn unbind(&self) {
        let mut slot = self.dialog.write().await;
        self.release(slot.take(), "dialog unbound").await;
    }

    pub async fn is_bound(&self) -> bool {
        self.bound_dialog().await.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .map(PendingRequest::is_open)
            .unwrap_or(false)
    }

    /// Show a confirmation dialog and wait for the user's answer.
    ///
    /// Fails with `NotBound` when no dialog is bound, `InvalidArgument` for an
    /// empty message and `Busy` while another request is pending. Failures while
    /// showing are logged and answered with Cancel.
    pub async fn request_confirmation(
        &self,
        message: &str,
        title: Option<&str>,
        buttons: DialogButtons,
    ) -> Result<DialogButtonResult> {
        let Some(dialog) = self.bound_dialog().await else {
            warn!("No dialog instance is available. Make sure to call bind() first.");
            return Err(DialogError::NotBound);
        };

        if message.trim().is_empty() {
            return Err(DialogError::InvalidArgument(
                "Dialog message cannot be empty".to_string(),
            ));
        }

        let (tx, rx) = oneshot::channel();
        let resolver = Arc::new(Resolver::new(tx));
        let (request, button_items) = {
            let mut pending = self.lock_pending();
            if pending.as_ref().is_some_and(PendingRequest::is_open) {
                return Err(DialogError::Busy);
            }
            let button_items = buttons.build(self.localizer.as_ref())?;
            let request = PendingRequest {
                id: Uuid::new_v4(),
                requested_at: Utc::now(),
                resolver: Arc::downgrade(&resolver),
            };
            *pending = Some(request.clone());
            (request, button_items)
        };
        info!("Confirmation request id={} buttons={:?}", request.id, buttons);

        // From here on the armed callback is the only owner of the sender
        let shown = {
            let mut controller = dialog.write().await;
            controller.show_with_result(
                message,
                title.map(str::to_string),
                button_items,
                Box::new(move |result: DialogButtonResult| {
                    resolver.resolve(result);
                }),
            )
        };
        drop(dialog);

        match shown {
            Ok(None) => {}
            Ok(Some(unused)) => {
                warn!(
                    "Dialog is already showing other content, request id={} cancelled",
                    request.id
                );
                unused(DialogButtonResult::Cancel);
            }
            Err(e) => {
                // The callback was dropped unused, which closes the channel
                error!("Error showing confirmation dialog: {}", e);
            }
        }

        let result = match rx.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Dialog result channel closed: {}", e);
                DialogButtonResult::Cancel
            }
        };

        self.clear_pending(request.id);
        let elapsed = Utc::now() - request.requested_at;
        info!(
            "Confirmation request id={} resolved: {} after {}ms",
            request.id,
            result,
            elapsed.num_milliseconds()
        );
        Ok(result)
    }

    /// Show an information dialog with a single OK button
    pub async fn request_info(&self, message: &str, title: Option<&str>) -> Result<()> {
        self.request_confirmation(message, title, DialogButtons::Ok)
            .await?;
        Ok(())
    }

    async fn bound_dialog(&self) -> Option<SharedDialog> {
        self.dialog.read().await.as_ref().and_then(Weak::upgrade)
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<PendingRequest>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Cancel the pending request and take its prompt off `previous`
    async fn release(
        &self,
        previous: Option<Weak<RwLock<ConfirmDialogController>>>,
        reason: &str,
    ) {
        if !self.abandon_pending(reason) {
            return;
        }
        if let Some(dialog) = previous.as_ref().and_then(Weak::upgrade) {
            // Fires the armed callback into the spent resolver
            dialog.write().await.hide();
        }
    }

    /// Resolve the pending request as Cancel. Returns true if one was open.
    fn abandon_pending(&self, reason: &str) -> bool {
        let Some(request) = self.lock_pending().take() else {
            return false;
        };
        let abandoned = request
            .resolver
            .upgrade()
            .is_some_and(|resolver| resolver.resolve(DialogButtonResult::Cancel));
        if abandoned {
            warn!("Pending request id={} abandoned: {}", request.id, reason);
        }
        abandoned
    }

    fn clear_pending(&self, id: Uuid) {
        let mut pending = self.lock_pending();
        if pending.as_ref().is_some_and(|p| p.id == id) {
            *pending = None;
        }
    }
}
