use crate::upload::BatchReport;
use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionProgress {
    NotStarted,
    Uploading {
        total: usize,
    },
    Completed {
        total: usize,
        successful: usize,
        failed: usize,
    },
}

impl Default for ActionProgress {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Default)]
pub struct UploadState {
    pub progress: ActionProgress,
    /// What was shown before the current batch started.
    previous: ActionProgress,
    pub collection_input: String,
    pub collection_invalid: bool,
    pub report_receiver: Option<Receiver<Option<BatchReport>>>,
}

impl UploadState {
    pub fn begin(&mut self, total: usize, receiver: Receiver<Option<BatchReport>>) {
        let shown = std::mem::replace(&mut self.progress, ActionProgress::Uploading { total });
        if !matches!(shown, ActionProgress::Uploading { .. }) {
            self.previous = shown;
        }
        self.report_receiver = Some(receiver);
    }

    /// `None` means no batch ran; the summary shown before it comes back.
    pub fn finish(&mut self, report: Option<BatchReport>) {
        self.report_receiver = None;
        self.progress = match report {
            Some(report) => ActionProgress::Completed {
                total: report.attempted,
                successful: report.succeeded,
                failed: report.failed,
            },
            None => std::mem::take(&mut self.previous),
        };
    }

    /// Picks up the batch result, if it has arrived. A sender dropped without
    /// a report (the upload task died) settles the batch as not run.
    pub fn poll(&mut self) {
        let Some(received) = self.report_receiver.as_ref().map(Receiver::try_recv) else {
            return;
        };
        match received {
            Ok(report) => self.finish(report),
            Err(TryRecvError::Disconnected) => self.finish(None),
            Err(TryRecvError::Empty) => {}
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.progress, ActionProgress::Uploading { .. })
    }

    pub fn get_status_text(&self) -> String {
        match &self.progress {
            ActionProgress::NotStarted => String::new(),
            ActionProgress::Uploading { total } => format!("Uploading {} files...", total),
            ActionProgress::Completed {
                total,
                successful,
                failed,
            } => {
                format!(
                    "Last batch: {} files | ✅ Success: {} | ❌ Failed: {}",
                    total, successful, failed
                )
            }
        }
    }
}
