use crate::i18n::{Message, Translate};
use crate::upload::notify::{NotificationSink, Toast, ToastVariant};
use crate::upload::transport::FileTransport;
use crate::upload::types::{
    BatchReport, FileRejection, PendingFile, PendingSet, RejectionReason, TargetCollection,
    UploadOutcome, UploadPayload, UploadResponse,
};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Holds the busy flag for one batch; dropping it, on any path, releases it.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct BatchState {
    pending: PendingSet,
    target: Option<TargetCollection>,
}

/// Owns the pending files of one upload view and sends them off in batches.
///
/// Shared between the UI thread and the runtime behind an `Arc`. The state
/// lock is never held across an await.
pub struct UploadBatchController {
    transport: Arc<dyn FileTransport>,
    notifier: Arc<dyn NotificationSink>,
    translator: Arc<dyn Translate>,
    state: Mutex<BatchState>,
    busy: AtomicBool,
}

impl UploadBatchController {
    pub fn new(
        transport: Arc<dyn FileTransport>,
        notifier: Arc<dyn NotificationSink>,
        translator: Arc<dyn Translate>,
    ) -> Self {
        Self {
            transport,
            notifier,
            translator,
            state: Mutex::new(BatchState::default()),
            busy: AtomicBool::new(false),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, variant: ToastVariant, message: Message) {
        let text = self.translator.translate(&message);
        self.notifier.publish(Toast::new(variant, text));
    }

    pub fn set_target(&self, target: Option<TargetCollection>) {
        self.lock_state().target = target;
    }

    pub fn pending(&self) -> Vec<PendingFile> {
        self.lock_state().pending.to_vec()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn handle_drop(&self, accepted: Vec<PendingFile>, rejected: Vec<FileRejection>) {
        if let Some(first) = rejected.first() {
            let message = match first.reason {
                RejectionReason::InvalidType => Message::InvalidFileType,
                RejectionReason::TooLarge => Message::MaxSizeError,
            };
            tracing::info!(
                rejected = rejected.len(),
                dropped = accepted.len(),
                file = %first.file.name,
                "drop refused"
            );
            self.notify(ToastVariant::Danger, message);
            return;
        }

        let mut duplicates = Vec::new();
        {
            let mut state = self.lock_state();
            for file in accepted {
                if let Err(file) = state.pending.insert(file) {
                    duplicates.push(file.name);
                }
            }
            tracing::debug!(pending = state.pending.len(), "files admitted");
        }

        for file_name in duplicates {
            tracing::debug!(file = %file_name, "duplicate selection ignored");
            self.notify(ToastVariant::Warning, Message::AlreadyAdded { file_name });
        }
    }

    /// Uploads every pending file concurrently and waits for all of them.
    ///
    /// Returns `None` when nothing was sent. Files that were part of the batch
    /// leave the pending set whatever their outcome. The guards, the snapshot
    /// and the busy transition happen under one lock.
    pub async fn upload_all(&self) -> Option<BatchReport> {
        let started = {
            let state = self.lock_state();
            match state.target {
                _ if state.pending.is_empty() => Err(Message::AddFiles),
                None => Err(Message::SelectCollection),
                Some(target) => match BusyGuard::acquire(&self.busy) {
                    Some(busy) => Ok((state.pending.to_vec(), target, busy)),
                    None => Err(Message::UploadInProgress),
                },
            }
        };
        let (batch, target, busy) = match started {
            Ok(started) => started,
            Err(message) => {
                self.notify(ToastVariant::Warning, message);
                return None;
            }
        };

        tracing::info!(files = batch.len(), collection = %target, "starting upload batch");
        let outcomes = join_all(batch.iter().map(|file| self.upload(file, target))).await;

        {
            let mut state = self.lock_state();
            state.pending.remove_batch(&batch);
            drop(busy);
        }

        let report = BatchReport::from_outcomes(&outcomes);
        tracing::info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            "upload batch settled"
        );
        Some(report)
    }

    async fn upload(&self, file: &PendingFile, target: TargetCollection) -> UploadOutcome {
        tracing::info!(target: "analytics", event = "FILE_UPLOADED", file = %file.name);

        match self.transport.upload(UploadPayload::new(file, target)).await {
            Ok(UploadResponse::Success { .. }) => {
                self.notify(ToastVariant::Success, Message::UploadSuccess);
                UploadOutcome::Success
            }
            Ok(UploadResponse::Warning { message }) => {
                tracing::warn!(file = %file.name, %message, "upload answered with a warning");
                self.notify(
                    ToastVariant::Warning,
                    Message::UploadError {
                        message: message.clone(),
                    },
                );
                UploadOutcome::Failure(message)
            }
            Ok(UploadResponse::Error { message }) => {
                tracing::warn!(file = %file.name, %message, "upload refused by server");
                self.notify(
                    ToastVariant::Danger,
                    Message::UploadError {
                        message: message.clone(),
                    },
                );
                UploadOutcome::Failure(message)
            }
            Err(err) if err.is_forbidden() => {
                let detail = err.raw_detail();
                tracing::warn!(file = %file.name, %detail, "upload forbidden");
                self.notifier
                    .publish(Toast::new(ToastVariant::Danger, detail.clone()));
                UploadOutcome::Failure(detail)
            }
            Err(err) => {
                tracing::error!(file = %file.name, error = %err, "upload failed");
                let message = err.to_string();
                self.notify(
                    ToastVariant::Danger,
                    Message::UploadError {
                        message: message.clone(),
                    },
                );
                UploadOutcome::Failure(message)
            }
        }
    }
}
