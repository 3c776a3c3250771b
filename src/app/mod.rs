mod state;
mod toasts;
mod ui;

use crate::config::Config;
use crate::i18n::English;
use crate::session::Session;
use crate::upload::{
    collect_paths, AcceptPolicy, HttpTransport, PendingFile, TargetCollection,
    UploadBatchController,
};
use eframe::{egui, App};
use state::UploadState;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::runtime::Handle;
use toasts::ToastBoard;

pub struct CollectionUploader {
    controller: Arc<UploadBatchController>,
    toasts: Arc<ToastBoard>,
    policy: AcceptPolicy,
    runtime: Handle,
    state: UploadState,
}

impl CollectionUploader {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        session: Session,
        runtime: Handle,
    ) -> Self {
        tracing::info!(upload_url = %config.upload_url, "initializing uploader view");
        let toasts = Arc::new(ToastBoard::new(cc.egui_ctx.clone()));
        let transport = Arc::new(HttpTransport::new(
            config.upload_url.clone(),
            Some(session.access_token),
        ));
        let controller = Arc::new(UploadBatchController::new(
            transport,
            toasts.clone(),
            Arc::new(English),
        ));
        controller.set_target(config.default_collection);

        let mut state = UploadState::default();
        if let Some(target) = config.default_collection {
            state.collection_input = target.to_string();
        }

        Self {
            controller,
            toasts,
            policy: AcceptPolicy::default(),
            runtime,
            state,
        }
    }

    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let candidates = collect_paths(paths);
        self.admit(candidates);
    }

    fn admit(&self, candidates: Vec<PendingFile>) {
        if candidates.is_empty() {
            return;
        }
        let batch = self.policy.classify(candidates);
        self.controller.handle_drop(batch.accepted, batch.rejected);
    }

    fn handle_os_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut paths = Vec::new();
        let mut candidates = Vec::new();
        for file in dropped {
            match (file.path, file.bytes) {
                (Some(path), _) => paths.push(path),
                (None, Some(bytes)) => candidates.push(PendingFile::from_bytes(file.name, bytes)),
                (None, None) => tracing::warn!(name = %file.name, "dropped file has no content"),
            }
        }
        candidates.extend(collect_paths(paths));
        self.admit(candidates);
    }

    pub fn update_collection(&mut self) {
        let input = self.state.collection_input.trim();
        let target = if input.is_empty() {
            None
        } else {
            input.parse::<TargetCollection>().ok()
        };
        self.state.collection_invalid = !input.is_empty() && target.is_none();
        self.controller.set_target(target);
    }

    pub fn start_upload(&mut self, ctx: &egui::Context) {
        let total = self.controller.pending().len();
        let (sender, receiver) = std_mpsc::channel();
        self.state.begin(total, receiver);

        let controller = self.controller.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let report = controller.upload_all().await;
            let _ = sender.send(report);
            ctx.request_repaint();
        });
    }

    pub fn update_state(&mut self) {
        self.state.poll();
    }
}

impl App for CollectionUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_os_drops(ctx);
        self.update_state();
        self.render(ctx);
        self.toasts.render(ctx);
    }
}
