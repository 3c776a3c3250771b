mod app;
mod config;
mod i18n;
mod session;
mod upload;
mod utils;

use anyhow::{anyhow, Context, Result};
use app::CollectionUploader;
use eframe::CreationContext;
use session::{require_session, ConfiguredSession};

fn main() -> Result<()> {
    let config = config::read_config()?;
    utils::logging::init(&config.log_level)?;

    let guard = ConfiguredSession::new(config.access_token.clone(), config.login_url.clone());
    let Some(session) = require_session(&guard) else {
        tracing::info!(login_url = %config.login_url, "sign in, then set UPLOADER_ACCESS_TOKEN and restart");
        return Ok(());
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 700.0])
            .with_min_inner_size([400.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Collection File Uploader",
        options,
        Box::new(move |cc: &CreationContext<'_>| {
            Box::new(CollectionUploader::new(cc, &config, session, handle))
        }),
    )
    .map_err(|err| anyhow!("failed to run uploader window: {err}"))
}
