use crate::engine::types::FetchStatus;
use crate::ui::context::UiContext;
use crate::ui::resources::{Resources, StringKey};
use anyhow::Result;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(u64);

/// Modal progress display shown while a background task runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressOverlay {
    pub text: String,
    pub indeterminate: bool,
    pub progress: u32,
    pub max: u32,
}

impl ProgressOverlay {
    pub fn new(text: String) -> Self {
        Self {
            text,
            indeterminate: true,
            progress: 0,
            max: 0,
        }
    }

    pub fn apply(&mut self, status: &FetchStatus, resources: &Resources) {
        match status {
            FetchStatus::FetchConfiguration { source } => {
                self.text = resources.format(StringKey::FormatFetchingConfiguration, source);
                self.indeterminate = true;
            }
            FetchStatus::FetchProviders {
                source,
                progress,
                max,
            } => {
                self.text = resources.format(StringKey::FormatFetchingProvider, source);
                self.indeterminate = false;
                self.max = *max;
                self.progress = *progress;
            }
            FetchStatus::Verifying { progress, max } => {
                self.text = resources.get(StringKey::Verifying);
                self.indeterminate = false;
                self.max = *max;
                self.progress = *progress;
            }
        }
    }
}

/// Every overlay currently on screen, one per running task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlays {
    active: BTreeMap<OverlayId, ProgressOverlay>,
    next_id: u64,
    pub show_count: u32,
    pub dismiss_count: u32,
}

impl Overlays {
    pub fn show(&mut self, text: String) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.active.insert(id, ProgressOverlay::new(text));
        self.show_count += 1;
        id
    }

    /// Returns false if `id` was already dismissed.
    pub fn apply(&mut self, id: OverlayId, status: &FetchStatus, resources: &Resources) -> bool {
        match self.active.get_mut(&id) {
            Some(overlay) => {
                overlay.apply(status, resources);
                true
            }
            None => false,
        }
    }

    /// Returns false if `id` was already dismissed.
    pub fn dismiss(&mut self, id: OverlayId) -> bool {
        if self.active.remove(&id).is_none() {
            return false;
        }
        self.dismiss_count += 1;
        true
    }

    pub fn get(&self, id: OverlayId) -> Option<&ProgressOverlay> {
        self.active.get(&id)
    }

    pub fn is_visible(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Keeps one overlay up for as long as it lives.
///
/// Dropping the guard without calling [`OverlayGuard::dismiss`] (an early
/// return, a panic or a cancelled future) still queues the dismissal.
pub struct OverlayGuard {
    ui: UiContext,
    id: OverlayId,
    active: bool,
}

impl OverlayGuard {
    pub async fn show(ui: UiContext, resources: &Resources) -> Result<Self> {
        let text = resources.get(StringKey::Initializing);
        let id = ui.run(move |surface| surface.overlays.show(text)).await?;

        Ok(Self {
            ui,
            id,
            active: true,
        })
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub async fn dismiss(mut self) -> Result<()> {
        self.active = false;
        let id = self.id;
        self.ui
            .run(move |surface| {
                surface.overlays.dismiss(id);
            })
            .await
    }
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        if self.active {
            tracing::debug!("Overlay guard dropped early, dismissing");
            let id = self.id;
            self.ui.post(move |surface| {
                surface.overlays.dismiss(id);
            });
        }
    }
}

/// Status callback handed to a task running under its own overlay.
///
/// Reports that arrive after the overlay is gone are ignored.
pub struct ProgressReporter {
    ui: UiContext,
    resources: Resources,
    id: OverlayId,
}

impl ProgressReporter {
    pub(crate) fn new(ui: UiContext, resources: Resources, id: OverlayId) -> Self {
        Self { ui, resources, id }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub async fn report(&self, status: FetchStatus) -> Result<()> {
        tracing::debug!("Progress: {}", status);

        let resources = self.resources.clone();
        let id = self.id;
        let applied = self
            .ui
            .run(move |surface| surface.overlays.apply(id, &status, &resources))
            .await?;

        if !applied {
            tracing::debug!("Overlay {:?} already dismissed, ignoring progress", id);
        }

        Ok(())
    }
}
