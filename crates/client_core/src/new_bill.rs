use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use shared::domain::RoutePath;
use shared::protocol::BillUpdate;

use crate::session::session_identity;
use crate::{FileUpload, Navigator, RemoteStore, SessionStore};

/// Lifecycle of one submission. The service allocates the bill's identifier
/// at upload time, not at submit time, so the machine has to remember which
/// side effects already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    FileSelected,
    FileUploaded,
    Submitted,
}

/// Transient link between an uploaded proof file and the bill record being
/// built. At most one per form instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUpload {
    pub bill_id: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

/// Proof-of-purchase file picked by the user.
#[derive(Debug, Clone)]
pub struct ChosenFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Bill form fields, minus everything upload-related.
#[derive(Debug, Clone, Default)]
pub struct BillDraft {
    pub expense_type: Option<String>,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub vat: Option<String>,
    pub pct: Option<u32>,
    pub commentary: Option<String>,
}

/// New bill submission state machine: upload first, finalize on submit.
pub struct NewBillForm {
    store: Option<Arc<dyn RemoteStore>>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    state: SubmissionState,
    pending: PendingUpload,
    chosen_file: Option<ChosenFile>,
}

impl NewBillForm {
    pub fn new(
        store: Option<Arc<dyn RemoteStore>>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
            state: SubmissionState::Idle,
            pending: PendingUpload::default(),
            chosen_file: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn pending_upload(&self) -> &PendingUpload {
        &self.pending
    }

    pub fn bill_id(&self) -> Option<&str> {
        self.pending.bill_id.as_deref()
    }

    pub fn file_url(&self) -> Option<&str> {
        self.pending.file_url.as_deref()
    }

    /// File pick handler. Holds the file and immediately pushes it to the
    /// service, which stores it and allocates the bill's identifier. A
    /// failed upload is logged and leaves the machine in `FileSelected`,
    /// ready for the user to retry; nothing propagates.
    pub async fn handle_change_file(&mut self, file: ChosenFile) {
        self.pending = PendingUpload {
            file_name: Some(file.name.clone()),
            ..PendingUpload::default()
        };
        self.chosen_file = Some(file);
        self.state = SubmissionState::FileSelected;

        let Some(store) = self.store.clone() else {
            return;
        };
        let Some(file) = self.chosen_file.clone() else {
            return;
        };
        let upload = FileUpload {
            file_name: file.name,
            mime_type: file.mime_type,
            bytes: file.bytes,
            email: self.session_email().await.unwrap_or_default(),
        };
        match store.bills().create(upload).await {
            Ok(created) => {
                info!(bill_id = %created.key, "proof file stored, bill identifier allocated");
                self.pending.bill_id = Some(created.key);
                self.pending.file_url = Some(created.file_url);
                self.state = SubmissionState::FileUploaded;
            }
            Err(err) => {
                error!("proof file upload failed: {err:#}");
            }
        }
    }

    /// Form submit handler. Assembles the full payload from the draft plus
    /// whatever Pending Upload state exists at submit time; a submit racing
    /// ahead of an in-flight upload simply sees no allocated identifier.
    pub async fn handle_submit(&mut self, draft: BillDraft) {
        let payload = json!({
            "email": self.session_email().await,
            "type": draft.expense_type,
            "name": draft.name,
            "amount": draft.amount,
            "date": draft.date,
            "vat": draft.vat,
            "pct": draft.pct.unwrap_or(20),
            "commentary": draft.commentary,
            "fileUrl": self.pending.file_url,
            "fileName": self.pending.file_name,
            "status": "pending",
        });
        self.update_bill(payload).await;
    }

    /// Finalizes the record with the full metadata. Without an allocated
    /// identifier the update is skipped but navigation still proceeds: a
    /// bill submitted without a proof file is tolerated. A rejected update
    /// is logged and suppresses navigation so the user can retry.
    pub async fn update_bill(&mut self, payload: serde_json::Value) {
        if let (Some(store), Some(bill_id)) = (self.store.clone(), self.pending.bill_id.clone()) {
            let update = BillUpdate {
                data: payload.to_string(),
                selector: bill_id,
            };
            if let Err(err) = store.bills().update(update).await {
                error!("bill finalization failed: {err:#}");
                return;
            }
        }
        self.pending = PendingUpload::default();
        self.chosen_file = None;
        self.state = SubmissionState::Submitted;
        self.navigator.on_navigate(RoutePath::Bills);
    }

    async fn session_email(&self) -> Option<String> {
        match session_identity(self.session.as_ref()).await {
            Ok(identity) => identity.map(|identity| identity.email),
            Err(err) => {
                warn!("unreadable session identity: {err:#}");
                None
            }
        }
    }
}
