use crate::engine::Engine;
use crate::errors;
use crate::ui::MainView;
use crate::ui::Request;
use crate::ui::overlay::ProgressReporter;
use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const STEP_DELAY: Duration = Duration::from_millis(150);

pub struct ControllerSettings {
    pub version_name: String,
    pub help_url: String,
    pub tick: Duration,
    pub step_delay: Duration,
}

impl ControllerSettings {
    pub fn new(version_name: String, help_url: String, tick: Duration) -> Self {
        Self {
            version_name,
            help_url,
            tick,
            step_delay: STEP_DELAY,
        }
    }
}

/// Acts on main-screen requests and keeps the view in sync with the engine.
pub struct MainController {
    view: MainView,
    engine: Arc<Mutex<dyn Engine>>,
    settings: ControllerSettings,
    cancellation_token: CancellationToken,
}

impl MainController {
    pub fn new(
        view: MainView,
        engine: Arc<Mutex<dyn Engine>>,
        settings: ControllerSettings,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            view,
            engine,
            settings,
            cancellation_token,
        }
    }

    pub async fn run(self, mut requests: mpsc::Receiver<Request>) -> Result<()> {
        self.sync_view().await?;

        let mut ticker = tokio::time::interval(self.settings.tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Controller cancelled");
                    break;
                }
                request = requests.recv() => {
                    match request {
                        Some(request) => self.handle_request(request).await?,
                        None => {
                            tracing::info!("Request channel closed, controller exiting");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    let forwarded = self.engine.lock().unwrap().tick();
                    self.view.set_forwarded(forwarded).await?;
                }
            }
        }

        Ok(())
    }

    pub async fn handle_request(&self, request: Request) -> Result<()> {
        tracing::info!("Handling request: {}", request);

        match request {
            Request::ToggleStatus => {
                let result = {
                    let mut engine = self.engine.lock().unwrap();
                    if engine.is_running() {
                        engine.stop()
                    } else {
                        engine.start()
                    }
                };
                if let Err(e) = result {
                    tracing::error!("Failed to toggle engine: {}", e);
                }
                self.sync_view().await?;
            }
            Request::OpenProfiles => {
                self.update_profile().await;
                self.sync_view().await?;
            }
            Request::OpenAbout => {
                self.view
                    .show_about(self.settings.version_name.clone())
                    .await?;
            }
            Request::OpenHelp => {
                if let Err(e) = open::that(&self.settings.help_url) {
                    tracing::error!(
                        "{}",
                        errors::help::failed_to_open(&self.settings.help_url, &e.to_string())
                    );
                }
            }
            Request::OpenProxy
            | Request::OpenProviders
            | Request::OpenLogs
            | Request::OpenSettings => {
                tracing::info!("Navigating to {}", request);
            }
        }

        Ok(())
    }

    async fn sync_view(&self) -> Result<()> {
        let snapshot = self.engine.lock().unwrap().snapshot();
        self.view.apply_snapshot(snapshot).await
    }

    async fn update_profile(&self) {
        let engine = Arc::clone(&self.engine);
        let step_delay = self.settings.step_delay;

        self.view
            .with_processing(move |reporter: ProgressReporter| async move {
                let plan = engine.lock().unwrap().profile_update_plan()?;

                for status in plan {
                    tokio::time::sleep(step_delay).await;
                    reporter.report(status).await?;
                }

                engine.lock().unwrap().complete_profile_update()
            })
            .await;
    }
}
