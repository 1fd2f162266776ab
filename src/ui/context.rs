use crate::errors;
use crate::ui::state::Surface;
use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type UiJob = Box<dyn FnOnce(&mut Surface) + Send>;

enum UiCommand {
    Run(UiJob),
    Shutdown,
}

/// Handle to the task that owns all display state.
///
/// Jobs run one at a time in submission order, so every mutation of the
/// surface is serialized without locks.
#[derive(Clone)]
pub struct UiContext {
    sender: mpsc::UnboundedSender<UiCommand>,
}

impl UiContext {
    pub fn spawn(surface: Surface) -> (Self, JoinHandle<Surface>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<UiCommand>();

        let handle = tokio::spawn(async move {
            let mut surface = surface;
            tracing::debug!("UI context started");

            while let Some(command) = receiver.recv().await {
                match command {
                    UiCommand::Run(job) => {
                        job(&mut surface);
                        tracing::trace!(display = %surface.main, "Surface updated");
                    }
                    UiCommand::Shutdown => break,
                }
            }

            tracing::debug!("UI context stopped");
            surface
        });

        (Self { sender }, handle)
    }

    /// Runs `job` on the UI context and waits for its result.
    pub async fn run<R, F>(&self, job: F) -> Result<R>
    where
        F: FnOnce(&mut Surface) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, result) = oneshot::channel();

        self.sender
            .send(UiCommand::Run(Box::new(move |surface: &mut Surface| {
                let _ = reply.send(job(surface));
            })))
            .map_err(|_| anyhow::anyhow!(errors::ui::CONTEXT_CLOSED))?;

        result
            .await
            .map_err(|_| anyhow::anyhow!(errors::ui::CONTEXT_CLOSED))
    }

    /// Queues `job` without waiting. Returns false if the context is gone.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce(&mut Surface) + Send + 'static,
    {
        self.sender.send(UiCommand::Run(Box::new(job))).is_ok()
    }

    pub async fn inspect(&self) -> Result<Surface> {
        self.run(|surface| surface.clone()).await
    }

    /// Closes the queue and returns the final surface.
    ///
    /// Jobs submitted before this call still run. Anything submitted later,
    /// through this handle's clones, fails with a closed-context error.
    pub async fn shutdown(self, handle: JoinHandle<Surface>) -> Result<Surface> {
        if self.sender.send(UiCommand::Shutdown).is_err() {
            tracing::debug!("UI context already stopped");
        }

        handle.await.context(errors::ui::CONTEXT_CLOSED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_jobs_apply_in_order() {
        let (ui, handle) = UiContext::spawn(Surface::default());

        ui.post(|surface| surface.main.forwarded = "first".to_string());
        let seen = ui
            .run(|surface| {
                let before = surface.main.forwarded.clone();
                surface.main.forwarded = "second".to_string();
                before
            })
            .await
            .unwrap();

        assert_eq!(seen, "first");

        drop(ui);
        let surface = handle.await.unwrap();
        assert_eq!(surface.main.forwarded, "second");
    }

    #[tokio::test]
    async fn test_shutdown_drains_earlier_jobs_while_clones_live() {
        let (ui, handle) = UiContext::spawn(Surface::default());
        let other = ui.clone();

        other.post(|surface| surface.main.profile_name = Some("queued".to_string()));
        ui.post(|surface| surface.main.forwarded = "last".to_string());

        let surface = ui.shutdown(handle).await.unwrap();
        assert_eq!(surface.main.profile_name.as_deref(), Some("queued"));
        assert_eq!(surface.main.forwarded, "last");

        let result = other.run(|_| ()).await;
        assert!(result.unwrap_err().to_string().contains("shut down"));
        assert!(!other.post(|_| ()));
    }

    #[tokio::test]
    async fn test_run_after_shutdown_fails() {
        let (ui, handle) = UiContext::spawn(Surface::default());
        handle.abort();
        let _ = handle.await;

        let result = ui.run(|_| ()).await;
        assert!(result.unwrap_err().to_string().contains("shut down"));
        assert!(!ui.post(|_| ()));
    }
}
