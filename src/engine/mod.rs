//! Dataset lifecycle management.
//!
//! [`DatasetManager`] owns the loaded dataset, one [`SliceVisual`] per
//! slice and the renderer primitives showing them. It is driven from the
//! caller's thread: [`request`](DatasetManager::request) starts a load,
//! [`poll`](DatasetManager::poll) (once per frame) installs finished loads,
//! [`set_filter`](DatasetManager::set_filter) re-filters in place, and
//! [`dispose`](DatasetManager::dispose) tears everything down.
//!
//! Every request gets a new generation number. A completion whose
//! generation is not the latest is dropped, so a slow response can never
//! overwrite a newer selection.

mod loader;
mod state;

use glam::Vec2;

pub use loader::{BackgroundLoader, DatasetLoader, LoadOutcome, LoadRequest};
pub use state::{LifecycleState, ManagerEvent};

use crate::dataset::DccmDataset;
use crate::options::{DatasetKey, FilterParameters, Options, OptionsChange};
use crate::picking::HoverInfo;
use crate::renderer::{PickHit, PointCloudRenderer, PointVertex, PrimitiveId};
use crate::slice::{SliceStyle, SliceVisual};

struct SliceSlot {
    visual: SliceVisual,
    primitive: PrimitiveId,
}

struct Installed {
    key: DatasetKey,
    dataset: DccmDataset,
    slots: Vec<SliceSlot>,
}

/// Owns the displayed dataset and keeps the renderer in sync with it.
pub struct DatasetManager {
    loader: DatasetLoader,
    state: LifecycleState,
    generation: u64,
    options: Options,
    style: SliceStyle,
    installed: Option<Installed>,
    scratch: Vec<PointVertex>,
}

impl DatasetManager {
    /// Manager with nothing loaded.
    #[must_use]
    pub fn new(loader: DatasetLoader, options: Options) -> Self {
        Self {
            loader,
            state: LifecycleState::Empty,
            generation: 0,
            style: SliceStyle::from_options(&options),
            options,
            installed: None,
            scratch: Vec::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Options the current visuals were built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Active filter.
    #[must_use]
    pub fn filter(&self) -> FilterParameters {
        self.options.filter
    }

    /// Generation of the most recent request.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Displayed dataset.
    #[must_use]
    pub fn dataset(&self) -> Option<&DccmDataset> {
        self.installed.as_ref().map(|i| &i.dataset)
    }

    /// Key of the displayed dataset.
    #[must_use]
    pub fn loaded_key(&self) -> Option<&DatasetKey> {
        self.installed.as_ref().map(|i| &i.key)
    }

    /// Slice count of the displayed dataset.
    #[must_use]
    pub fn num_slices(&self) -> Option<usize> {
        self.dataset().map(DccmDataset::num_slices)
    }

    /// Displayed slices with their renderer handles, in slice order.
    pub fn slices(&self) -> impl Iterator<Item = (&SliceVisual, PrimitiveId)> {
        self.installed
            .iter()
            .flat_map(|i| i.slots.iter().map(|s| (&s.visual, s.primitive)))
    }

    /// Start loading `key` from `location`. Returns the request's
    /// generation, or `None` once disposed.
    pub fn request(&mut self, key: DatasetKey, location: String) -> Option<u64> {
        if self.state == LifecycleState::Disposed {
            log::warn!("ignoring request for {key}: manager is disposed");
            return None;
        }
        self.generation += 1;
        let generation = self.generation;
        log::info!("loading {key} from {location} (generation {generation})");
        self.loader.submit(LoadRequest {
            generation,
            key,
            location,
        });
        self.state = LifecycleState::Loading { generation };
        Some(generation)
    }

    /// Start loading the dataset selected in the options.
    pub fn request_active(&mut self) -> Option<u64> {
        let key = self.options.data.dataset.clone();
        let location = self.options.data.active_location();
        self.request(key, location)
    }

    /// Install finished loads. Call once per frame.
    pub fn poll(
        &mut self,
        renderer: &mut impl PointCloudRenderer,
    ) -> Vec<ManagerEvent> {
        let mut events = Vec::new();
        while let Some(outcome) = self.loader.try_recv() {
            self.apply_outcome(outcome, renderer, &mut events);
        }
        events
    }

    pub(crate) fn apply_outcome(
        &mut self,
        outcome: LoadOutcome,
        renderer: &mut impl PointCloudRenderer,
        events: &mut Vec<ManagerEvent>,
    ) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        if outcome.generation != self.generation {
            log::debug!(
                "discarding stale load of {} (generation {}, current {})",
                outcome.key,
                outcome.generation,
                self.generation
            );
            return;
        }
        match outcome.result {
            Ok(dataset) => self.install(outcome.key, dataset, renderer, events),
            Err(e) => {
                log::error!("failed to load {}: {e}", outcome.key);
                self.state = if self.installed.is_some() {
                    LifecycleState::Ready
                } else {
                    LifecycleState::Empty
                };
                events.push(ManagerEvent::LoadFailed {
                    key: outcome.key,
                    message: e.to_string(),
                });
            }
        }
    }

    fn install(
        &mut self,
        key: DatasetKey,
        dataset: DccmDataset,
        renderer: &mut impl PointCloudRenderer,
        events: &mut Vec<ManagerEvent>,
    ) {
        self.remove_primitives(renderer);

        let num_slices = dataset.num_slices();
        let num_atoms = dataset.num_atoms();
        let fitted = self.options.filter.fitted_to(num_slices);
        if fitted != self.options.filter {
            log::info!(
                "slice {} does not exist in {key}; showing all slices",
                self.options.filter.selected_slice
            );
            self.options.filter = fitted;
            events.push(ManagerEvent::SelectionReset);
        }

        let mut slots = Vec::with_capacity(num_slices);
        let mut points = 0;
        for slice in 0..num_slices {
            let visual = SliceVisual::build(
                dataset.slice_matrix(slice),
                slice,
                &self.options.filter,
                &self.style,
            );
            visual.write_vertices(&mut self.scratch);
            let primitive = renderer.add_point_cloud(
                &format!("slice {slice}"),
                &self.scratch,
                visual.emphasis().point_style(&self.style.layout),
            );
            points += visual.len();
            slots.push(SliceSlot { visual, primitive });
        }
        let (min, max) = self.style.layout.bounds(num_slices, num_atoms);
        renderer.set_scene_bounds(min, max);

        log::info!(
            "{key}: {num_slices} slices x {num_atoms} residues, {points} points shown"
        );
        events.push(ManagerEvent::DatasetReady {
            key: key.clone(),
            num_slices,
            num_atoms,
        });
        self.installed = Some(Installed {
            key,
            dataset,
            slots,
        });
        self.state = LifecycleState::Ready;
    }

    /// Replace the filter and rebuild every slice in place.
    ///
    /// A selection outside the displayed dataset falls back to all slices.
    pub fn set_filter(
        &mut self,
        filter: FilterParameters,
        renderer: &mut impl PointCloudRenderer,
    ) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        self.options.filter = match self.num_slices() {
            Some(n) => filter.fitted_to(n),
            None => filter,
        };
        self.rebuild(renderer);
    }

    /// Adopt a new option set: rebuild visuals if presentation changed and
    /// request a load if the dataset selection changed.
    pub fn apply_options(
        &mut self,
        next: Options,
        renderer: &mut impl PointCloudRenderer,
    ) -> OptionsChange {
        if self.state == LifecycleState::Disposed {
            return OptionsChange::default();
        }
        let change = self.options.change_to(&next);
        self.options = next;
        if change.visuals {
            self.style = SliceStyle::from_options(&self.options);
            if let Some(n) = self.num_slices() {
                self.options.filter = self.options.filter.fitted_to(n);
            }
            self.rebuild(renderer);
        }
        if change.dataset {
            let _ = self.request_active();
        }
        change
    }

    fn rebuild(&mut self, renderer: &mut impl PointCloudRenderer) {
        let Some(installed) = self.installed.as_mut() else {
            return;
        };
        for slot in &mut installed.slots {
            slot.visual.rebuild(&self.options.filter, &self.style);
            slot.visual.write_vertices(&mut self.scratch);
            renderer.replace_vertices(slot.primitive, &self.scratch);
            renderer.set_style(
                slot.primitive,
                slot.visual.emphasis().point_style(&self.style.layout),
            );
        }
    }

    /// Tooltip for a renderer pick, or `None` to hide it.
    #[must_use]
    pub fn hover(&self, hit: Option<PickHit>, cursor: Vec2) -> Option<HoverInfo> {
        let hit = hit?;
        let installed = self.installed.as_ref()?;
        let slot = installed
            .slots
            .iter()
            .find(|s| s.primitive == hit.primitive)?;
        let point = slot.visual.point(hit.index)?;
        let name = |i| {
            installed
                .dataset
                .residue_name(i)
                .unwrap_or_default()
                .to_owned()
        };
        Some(HoverInfo {
            slice_index: slot.visual.slice_index(),
            value: point.value,
            residue_i: point.residue_i,
            residue_j: point.residue_j,
            residue_i_name: name(point.residue_i),
            residue_j_name: name(point.residue_j),
            screen_position: HoverInfo::anchor(cursor),
        })
    }

    /// Remove every primitive and stop loading. Terminal.
    pub fn dispose(&mut self, renderer: &mut impl PointCloudRenderer) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        self.remove_primitives(renderer);
        self.loader.shutdown();
        self.scratch = Vec::new();
        self.state = LifecycleState::Disposed;
        log::debug!("dataset manager disposed");
    }

    fn remove_primitives(&mut self, renderer: &mut impl PointCloudRenderer) {
        if let Some(installed) = self.installed.take() {
            for slot in installed.slots {
                renderer.remove_point_cloud(slot.primitive);
            }
        }
    }
}
