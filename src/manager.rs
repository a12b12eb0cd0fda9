//! Gallery orchestration.
//!
//! `GalleryManager` owns every gallery container of the page and the
//! lightbox instance mounted on each of them. It:
//! - waits for gallery images before the first layout pass and mount
//! - re-runs layout on debounced resizes, content changes and mutations
//! - defers layout of containers whose images are still loading
//! - tears instances down before remounting and on `destroy`

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
use crate::error::GalleryError;
use crate::layout::{AsymmetricGridLayout, MasonryRowSpanner};
use crate::lightbox::{LightboxConfig, LightboxInstance, LightboxItem, LightboxPlugin};
use crate::models::{
    wait_for_all, ContainerId, GalleryContainer, GalleryItem, GalleryKind, ImageRef, Slot,
};

/// Layout and lightbox settings shared by every gallery of a page.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Gap between the cells of asymmetric galleries in pixels.
    pub gap: u32,
    /// Viewport width at or below which asymmetric galleries fall back to flow layout.
    pub breakpoint: u32,
    /// Masonry auto-row height in pixels.
    pub row_height: f64,
    /// Masonry row gap in pixels.
    pub row_gap: f64,
    /// Quiet period before a resize burst triggers a relayout.
    pub resize_debounce: Duration,
    /// Viewport width assumed until the first resize.
    pub viewport_width: u32,
    /// Lightbox configuration for asymmetric galleries.
    pub lightbox: LightboxConfig,
    /// Lightbox configuration for masonry galleries.
    pub masonry_lightbox: LightboxConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let asymmetric = AsymmetricGridLayout::default();
        let masonry = MasonryRowSpanner::default();
        Self {
            gap: asymmetric.gap,
            breakpoint: asymmetric.breakpoint,
            row_height: masonry.row_height,
            row_gap: masonry.row_gap,
            resize_debounce: DEFAULT_QUIET_PERIOD,
            viewport_width: 1280,
            lightbox: LightboxConfig::default(),
            masonry_lightbox: LightboxConfig::generic(),
        }
    }
}

/// Events that invalidate gallery layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    PageReady,
    Resize { viewport_width: u32 },
    /// A previously hidden section became visible.
    ContentChanged(ContainerId),
    /// Nodes were added to or removed from a container.
    Mutated(ContainerId),
}

/// What `init` did with each container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Initialization stopped because no lightbox plugin is available.
    pub aborted: bool,
    pub mounted: Vec<ContainerId>,
    /// Mounted with the reduced configuration after the full one failed.
    pub fallback: Vec<ContainerId>,
    pub failed: Vec<ContainerId>,
    /// No item matched the lightbox selector.
    pub skipped: Vec<ContainerId>,
}

enum MountOutcome {
    Mounted,
    Fallback,
    Failed,
    Skipped,
}

struct State {
    viewport_width: u32,
    containers: Vec<GalleryContainer>,
    instances: HashMap<ContainerId, Box<dyn LightboxInstance>>,
    /// At most one deferred layout per container.
    waiters: HashMap<ContainerId, JoinHandle<()>>,
}

impl State {
    fn container_mut(&mut self, id: &ContainerId) -> Result<&mut GalleryContainer, GalleryError> {
        self.containers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| GalleryError::UnknownContainer(id.clone()))
    }
}

/// Layout half of the manager, cloned into debounced and deferred tasks.
#[derive(Clone)]
struct LayoutCore {
    asymmetric: AsymmetricGridLayout,
    masonry: MasonryRowSpanner,
    state: Arc<Mutex<State>>,
}

impl LayoutCore {
    /// Runs a layout pass over one container, or all of them.
    fn relayout(&self, target: Option<&ContainerId>) {
        let deferred = {
            let mut state = self.state.lock();
            let viewport_width = state.viewport_width;
            let mut deferred = Vec::new();
            for container in state
                .containers
                .iter_mut()
                .filter(|c| target.map_or(true, |id| &c.id == id))
            {
                let pending = self.layout_container(container, viewport_width);
                if !pending.is_empty() {
                    deferred.push((container.id.clone(), pending));
                }
            }
            deferred
        };

        for (id, pending) in deferred {
            self.defer_until_resolved(id, pending);
        }
    }

    /// Lays out one container. Returns images that must resolve first.
    fn layout_container(&self, container: &mut GalleryContainer, viewport_width: u32) -> Vec<ImageRef> {
        let width = container.measured_width(viewport_width);
        match &mut container.kind {
            GalleryKind::Asymmetric(slots) => {
                if !self.asymmetric.is_active(viewport_width) {
                    AsymmetricGridLayout::reset(&mut container.style, slots);
                    trace!(container = %container.id, viewport_width, "Below breakpoint, reset layout");
                    return Vec::new();
                }
                if slots.master.is_none() {
                    trace!(container = %container.id, "Master slot missing, skipping");
                    return Vec::new();
                }
                let images = (
                    slots.wide.as_ref().and_then(|item| item.image.clone()),
                    slots.third.as_ref().and_then(|item| item.image.clone()),
                );
                let (Some(wide), Some(third)) = images else {
                    trace!(container = %container.id, "Wide or third slot missing, skipping");
                    return Vec::new();
                };
                let pending: Vec<ImageRef> = [&wide, &third]
                    .into_iter()
                    .filter(|image| !image.is_resolved())
                    .cloned()
                    .collect();
                if !pending.is_empty() {
                    return pending;
                }
                if width <= 0.0 {
                    trace!(container = %container.id, "Container not measurable, skipping");
                    return Vec::new();
                }

                let layout = AsymmetricGridLayout::compute_layout(
                    width,
                    self.asymmetric.gap,
                    wide.layout_aspect(),
                    third.layout_aspect(),
                );
                AsymmetricGridLayout::apply(&layout, &mut container.style, slots);
                Vec::new()
            }
            GalleryKind::Masonry(grid) => {
                if width <= 0.0 {
                    trace!(container = %container.id, "Container not measurable, skipping");
                    return Vec::new();
                }
                self.masonry.apply(grid, width)
            }
        }
    }

    fn defer_until_resolved(&self, id: ContainerId, pending: Vec<ImageRef>) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(container = %id, "No runtime to wait for images on, layout deferred to next trigger");
            return;
        };
        trace!(container = %id, images = pending.len(), "Deferring layout until images resolve");

        let core = self.clone();
        let key = id.clone();
        let waiter = runtime.spawn(async move {
            wait_for_all(&pending).await;
            core.relayout(Some(&id));
        });

        let mut state = self.state.lock();
        state.waiters.retain(|_, w| !w.is_finished());
        if let Some(previous) = state.waiters.insert(key, waiter) {
            previous.abort();
        }
    }
}

/// Owner of the page's galleries and their lightbox instances.
pub struct GalleryManager {
    core: LayoutCore,
    plugin: Option<Arc<dyn LightboxPlugin>>,
    lightbox: LightboxConfig,
    masonry_lightbox: LightboxConfig,
    resize: Debouncer,
}

impl GalleryManager {
    /// Creates a manager. A missing plugin is reported by `init`.
    pub fn new(config: GalleryConfig, plugin: Option<Arc<dyn LightboxPlugin>>) -> Self {
        let state = State {
            viewport_width: config.viewport_width,
            containers: Vec::new(),
            instances: HashMap::new(),
            waiters: HashMap::new(),
        };
        Self {
            core: LayoutCore {
                asymmetric: AsymmetricGridLayout::new(config.gap, config.breakpoint),
                masonry: MasonryRowSpanner::new(config.row_height, config.row_gap),
                state: Arc::new(Mutex::new(state)),
            },
            plugin,
            lightbox: config.lightbox,
            masonry_lightbox: config.masonry_lightbox,
            resize: Debouncer::new(config.resize_debounce),
        }
    }

    /// Registers a container, replacing any container with the same id.
    pub fn add_container(&self, container: GalleryContainer) {
        let mut state = self.core.state.lock();
        state.containers.retain(|c| c.id != container.id);
        debug!(container = %container.id, "Registered gallery container");
        state.containers.push(container);
    }

    /// Snapshot of a container and its applied styles.
    pub fn container(&self, id: &ContainerId) -> Option<GalleryContainer> {
        let state = self.core.state.lock();
        state.containers.iter().find(|c| &c.id == id).cloned()
    }

    pub fn container_ids(&self) -> Vec<ContainerId> {
        let state = self.core.state.lock();
        state.containers.iter().map(|c| c.id.clone()).collect()
    }

    pub fn viewport_width(&self) -> u32 {
        self.core.state.lock().viewport_width
    }

    /// Number of containers waiting on images before their next layout pass.
    pub fn deferred_layouts(&self) -> usize {
        let state = self.core.state.lock();
        state.waiters.values().filter(|w| !w.is_finished()).count()
    }

    /// Number of mounted lightbox instances.
    pub fn active_instances(&self) -> usize {
        self.core.state.lock().instances.len()
    }

    /// Waits for every gallery image, lays out every container and mounts a
    /// lightbox on each.
    ///
    /// Safe to call again: previous instances are destroyed before remounting.
    pub async fn init(&self) -> InitReport {
        let Some(plugin) = self.plugin.clone() else {
            error!("Lightbox plugin is not loaded, skipping gallery initialization");
            return InitReport {
                aborted: true,
                ..Default::default()
            };
        };
        info!("Initializing galleries");

        let images: Vec<ImageRef> = {
            let state = self.core.state.lock();
            state.containers.iter().flat_map(|c| c.images()).collect()
        };
        debug!(images = images.len(), "Waiting for gallery images");
        wait_for_all(&images).await;

        self.core.relayout(None);

        let targets: Vec<(ContainerId, Vec<LightboxItem>, bool)> = {
            let state = self.core.state.lock();
            state
                .containers
                .iter()
                .map(|c| {
                    let items = c
                        .items()
                        .filter(|item| item.clickable)
                        .map(LightboxItem::from)
                        .collect();
                    let masonry = matches!(c.kind, GalleryKind::Masonry(_));
                    (c.id.clone(), items, masonry)
                })
                .collect()
        };

        let mut report = InitReport::default();
        for (id, items, masonry) in targets {
            let config = if masonry {
                &self.masonry_lightbox
            } else {
                &self.lightbox
            };
            match self.mount(plugin.as_ref(), &id, &items, config) {
                MountOutcome::Mounted => report.mounted.push(id),
                MountOutcome::Fallback => report.fallback.push(id),
                MountOutcome::Failed => report.failed.push(id),
                MountOutcome::Skipped => report.skipped.push(id),
            }
        }

        info!(
            mounted = report.mounted.len(),
            fallback = report.fallback.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Galleries initialized"
        );
        report
    }

    fn mount(
        &self,
        plugin: &dyn LightboxPlugin,
        id: &ContainerId,
        items: &[LightboxItem],
        config: &LightboxConfig,
    ) -> MountOutcome {
        self.teardown(id);

        if items.is_empty() {
            warn!(container = %id, "No gallery items found for lightbox");
            return MountOutcome::Skipped;
        }

        match plugin.mount(id, items, config) {
            Ok(instance) => {
                self.register(id, instance);
                MountOutcome::Mounted
            }
            Err(err) => {
                error!(container = %id, error = %err, "Error initializing lightbox");
                let fallback = LightboxConfig::fallback(config.selector.clone());
                match plugin.mount(id, items, &fallback) {
                    Ok(instance) => {
                        self.register(id, instance);
                        MountOutcome::Fallback
                    }
                    Err(err) => {
                        error!(container = %id, error = %err, "Fallback lightbox initialization also failed");
                        MountOutcome::Failed
                    }
                }
            }
        }
    }

    fn register(&self, id: &ContainerId, instance: Box<dyn LightboxInstance>) {
        self.core.state.lock().instances.insert(id.clone(), instance);
    }

    fn teardown(&self, id: &ContainerId) {
        let previous = self.core.state.lock().instances.remove(id);
        if let Some(mut instance) = previous {
            instance.destroy();
            debug!(container = %id, "Destroyed previous lightbox instance");
        }
    }

    /// Records the new viewport width and schedules a debounced relayout of
    /// every container.
    ///
    /// Outside a tokio runtime the relayout runs immediately.
    pub fn handle_resize(&self, viewport_width: u32) {
        self.core.state.lock().viewport_width = viewport_width;
        let core = self.core.clone();
        self.resize.schedule(move || {
            trace!(viewport_width, "Resize settled");
            core.relayout(None);
        });
    }

    /// Re-runs layout for a container whose content may have become
    /// measurable, e.g. after its tab was shown.
    pub fn notify_content_changed(&self, id: &ContainerId) -> Result<(), GalleryError> {
        self.edit(id, |_| Ok(()))
    }

    pub fn set_visible(&self, id: &ContainerId, visible: bool) -> Result<(), GalleryError> {
        self.edit(id, |container| {
            container.visible = visible;
            Ok(())
        })
    }

    /// Appends an item to a masonry grid.
    pub fn push_item(&self, id: &ContainerId, item: GalleryItem) -> Result<(), GalleryError> {
        self.edit(id, |container| match &mut container.kind {
            GalleryKind::Masonry(grid) => {
                grid.items.push(item);
                Ok(())
            }
            GalleryKind::Asymmetric(_) => Err(GalleryError::NotMasonry(id.clone())),
        })
    }

    /// Removes the first masonry item linking to `href`.
    pub fn remove_item(&self, id: &ContainerId, href: &str) -> Result<Option<GalleryItem>, GalleryError> {
        self.edit(id, |container| match &mut container.kind {
            GalleryKind::Masonry(grid) => Ok(grid
                .items
                .iter()
                .position(|item| item.href == href)
                .map(|index| grid.items.remove(index))),
            GalleryKind::Asymmetric(_) => Err(GalleryError::NotMasonry(id.clone())),
        })
    }

    /// Replaces one slot of an asymmetric gallery.
    pub fn set_slot(&self, id: &ContainerId, slot: Slot, item: Option<GalleryItem>) -> Result<(), GalleryError> {
        self.edit(id, |container| match &mut container.kind {
            GalleryKind::Asymmetric(slots) => {
                *slots.slot_mut(slot) = item;
                Ok(())
            }
            GalleryKind::Masonry(_) => Err(GalleryError::NotAsymmetric(id.clone())),
        })
    }

    fn edit<T>(
        &self,
        id: &ContainerId,
        f: impl FnOnce(&mut GalleryContainer) -> Result<T, GalleryError>,
    ) -> Result<T, GalleryError> {
        let out = {
            let mut state = self.core.state.lock();
            f(state.container_mut(id)?)?
        };
        self.core.relayout(Some(id));
        Ok(out)
    }

    /// Destroys every mounted instance, cancels pending layout work and
    /// drops every registered container.
    pub fn destroy(&self) {
        self.resize.cancel();
        let (instances, waiters) = {
            let mut state = self.core.state.lock();
            state.containers.clear();
            (
                std::mem::take(&mut state.instances),
                std::mem::take(&mut state.waiters),
            )
        };
        for (_, waiter) in waiters {
            waiter.abort();
        }
        let count = instances.len();
        for (_, mut instance) in instances {
            instance.destroy();
        }
        debug!(count, "Destroyed lightbox instances");
    }

    pub async fn handle(&self, trigger: Trigger) {
        match trigger {
            Trigger::PageReady => {
                self.init().await;
            }
            Trigger::Resize { viewport_width } => self.handle_resize(viewport_width),
            Trigger::ContentChanged(id) | Trigger::Mutated(id) => {
                if let Err(err) = self.notify_content_changed(&id) {
                    warn!(error = %err, "Ignoring layout trigger");
                }
            }
        }
    }

    /// Handles triggers until every sender is dropped.
    pub async fn run(&self, triggers: flume::Receiver<Trigger>) {
        while let Ok(trigger) = triggers.recv_async().await {
            trace!(?trigger, "Layout trigger");
            self.handle(trigger).await;
        }
        debug!("Trigger channel closed");
    }
}
