use crate::engine::types::{ConnectionSnapshot, TunnelMode, traffic_total};
use crate::errors;
use crate::ui::context::UiContext;
use crate::ui::messages::Request;
use crate::ui::overlay::{OverlayGuard, ProgressReporter};
use crate::ui::resources::{Resources, StringKey};
use crate::ui::state::AboutDialog;
use crate::ui::theme::Palette;
use anyhow::Result;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

pub fn mode_label_key(mode: &TunnelMode) -> StringKey {
    match mode {
        TunnelMode::Direct => StringKey::DirectMode,
        TunnelMode::Global => StringKey::GlobalMode,
        TunnelMode::Rule => StringKey::RuleMode,
        _ => StringKey::RuleMode,
    }
}

/// Main screen of the client.
///
/// State flows in through the setters, each of which is applied on the UI
/// context before it returns. Taps flow out as [`Request`] values on the
/// receiver returned by [`MainView::new`].
#[derive(Clone)]
pub struct MainView {
    ui: UiContext,
    resources: Resources,
    requests: mpsc::Sender<Request>,
}

impl MainView {
    pub fn new(
        ui: UiContext,
        resources: Resources,
        palette: Palette,
        request_capacity: usize,
    ) -> (Self, mpsc::Receiver<Request>) {
        let (requests, receiver) = mpsc::channel(request_capacity.max(1));

        // Queued ahead of anything a caller can submit through the view.
        ui.post(move |surface| {
            surface.main.bound = true;
            surface.main.color_clash_started = Some(palette.clash_started);
            surface.main.color_clash_stopped = Some(palette.clash_stopped);
        });

        let view = Self {
            ui,
            resources,
            requests,
        };

        (view, receiver)
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    pub async fn set_profile_name(&self, name: Option<String>) -> Result<()> {
        self.ui
            .run(move |surface| surface.main.profile_name = name)
            .await
    }

    pub async fn set_clash_running(&self, running: bool) -> Result<()> {
        self.ui
            .run(move |surface| surface.main.clash_running = running)
            .await
    }

    pub async fn set_forwarded(&self, value: u64) -> Result<()> {
        let text = traffic_total(value);
        self.ui
            .run(move |surface| surface.main.forwarded = text)
            .await
    }

    pub async fn set_mode(&self, mode: TunnelMode) -> Result<()> {
        if let TunnelMode::Other(name) = &mode {
            tracing::debug!("No label for mode '{}', showing rule mode", name);
        }

        let label = self.resources.get(mode_label_key(&mode));
        self.ui.run(move |surface| surface.main.mode = label).await
    }

    pub async fn set_has_providers(&self, has: bool) -> Result<()> {
        self.ui
            .run(move |surface| surface.main.has_providers = has)
            .await
    }

    /// Pushes every field of `snapshot` to the display.
    pub async fn apply_snapshot(&self, snapshot: ConnectionSnapshot) -> Result<()> {
        self.set_profile_name(snapshot.profile_name).await?;
        self.set_clash_running(snapshot.running).await?;
        self.set_forwarded(snapshot.forwarded).await?;
        self.set_mode(snapshot.mode).await?;
        self.set_has_providers(snapshot.has_providers).await
    }

    pub async fn show_about(&self, version_name: String) -> Result<()> {
        tracing::info!("Showing about dialog for version {}", version_name);

        self.ui
            .run(move |surface| surface.about_dialogs.push(AboutDialog { version_name }))
            .await
    }

    /// Forwards a tap without waiting. Dropped if the controller is not keeping up.
    pub fn request(&self, request: Request) {
        match self.requests.try_send(request) {
            Ok(()) => {}
            Err(TrySendError::Full(request)) => {
                tracing::debug!("Request queue full, dropping {}", request);
            }
            Err(TrySendError::Closed(request)) => {
                tracing::debug!("Request receiver closed, dropping {}", request);
            }
        }
    }

    /// Runs `task` behind the progress overlay.
    ///
    /// Each call gets its own overlay. It starts indeterminate with the
    /// initializing label and is updated on every status the task reports.
    /// It is dismissed exactly once however the task ends. Task errors are
    /// logged, not returned.
    pub async fn with_processing<F, Fut>(&self, task: F)
    where
        F: FnOnce(ProgressReporter) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let guard = match OverlayGuard::show(self.ui.clone(), &self.resources).await {
            Ok(guard) => guard,
            Err(e) => {
                tracing::warn!("Cannot show progress overlay: {}", e);
                return;
            }
        };

        let reporter =
            ProgressReporter::new(self.ui.clone(), self.resources.clone(), guard.id());

        if let Err(e) = task(reporter).await {
            tracing::warn!("{}", errors::ui::task_failed(&format!("{:#}", e)));
        }

        if let Err(e) = guard.dismiss().await {
            tracing::warn!("Failed to dismiss progress overlay: {}", e);
        }
    }
}
