//! Scene subjects and the container that drives them.
//!
//! The set of things in the scene is closed, so it is an enum rather than
//! trait objects. Every subject answers the same three calls: per-frame
//! update, parameter change and disposal.

use glam::{Vec2, Vec3};

use crate::engine::{DatasetManager, ManagerEvent};
use crate::options::{Options, OptionsChange};
use crate::renderer::PointCloudRenderer;

/// Backdrop width per residue.
const WIDTH_PER_RESIDUE: f32 = 0.096;
/// Backdrop wall height per residue.
const HEIGHT_PER_RESIDUE: f32 = 0.093;
/// Backdrop depth per slice.
const DEPTH_PER_SLICE: f32 = 0.0985;
/// Extra depth in front of the first and behind the last slice.
const DEPTH_MARGIN: f32 = 1.8;

/// One flat backdrop panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    /// Panel center.
    pub center: Vec3,
    /// Panel extent along its two in-plane axes.
    pub size: Vec2,
    /// Unit normal facing the data.
    pub normal: Vec3,
}

/// Open box around the slice stack, sized from the dataset dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropExtent {
    /// Extent along X.
    pub width: f32,
    /// Extent along -Z.
    pub depth: f32,
    /// Extent along Y.
    pub height: f32,
}

impl BackdropExtent {
    /// Extent for a dataset of `num_atoms` residues and `num_slices` slices.
    #[must_use]
    pub fn for_dataset(num_atoms: usize, num_slices: usize) -> Self {
        Self {
            width: WIDTH_PER_RESIDUE * num_atoms as f32,
            depth: DEPTH_PER_SLICE * num_slices as f32 + DEPTH_MARGIN,
            height: HEIGHT_PER_RESIDUE * num_atoms as f32,
        }
    }

    /// Floor, ceiling, back and side walls.
    #[must_use]
    pub fn walls(&self) -> [Wall; 5] {
        let Self {
            width,
            depth,
            height,
        } = *self;
        let mid = Vec3::new(width / 2.0, height / 2.0, -depth / 2.0);
        [
            Wall {
                center: Vec3::new(mid.x, 0.0, mid.z),
                size: Vec2::new(width, depth),
                normal: Vec3::Y,
            },
            Wall {
                center: Vec3::new(mid.x, height, mid.z),
                size: Vec2::new(width, depth),
                normal: Vec3::NEG_Y,
            },
            Wall {
                center: Vec3::new(mid.x, mid.y, -depth),
                size: Vec2::new(width, height),
                normal: Vec3::Z,
            },
            Wall {
                center: Vec3::new(0.0, mid.y, mid.z),
                size: Vec2::new(depth, height),
                normal: Vec3::X,
            },
            Wall {
                center: Vec3::new(width, mid.y, mid.z),
                size: Vec2::new(depth, height),
                normal: Vec3::NEG_X,
            },
        ]
    }
}

/// Backdrop that follows the loaded dataset's dimensions. Hidden until the
/// first dataset arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Backdrop {
    extent: Option<BackdropExtent>,
}

impl Backdrop {
    /// Current extent, `None` while hidden.
    #[must_use]
    pub fn extent(&self) -> Option<BackdropExtent> {
        self.extent
    }
}

/// Everything that can live in the scene.
pub enum SceneSubject {
    /// Walls around the slice stack.
    Backdrop(Backdrop),
    /// The DCCM slices.
    Dataset(Box<DatasetManager>),
}

impl SceneSubject {
    /// Per-frame update.
    pub fn on_frame(
        &mut self,
        renderer: &mut impl PointCloudRenderer,
    ) -> Vec<ManagerEvent> {
        match self {
            Self::Backdrop(_) => Vec::new(),
            Self::Dataset(manager) => manager.poll(renderer),
        }
    }

    /// React to an edited option set.
    pub fn on_parameters_changed(
        &mut self,
        options: &Options,
        renderer: &mut impl PointCloudRenderer,
    ) -> OptionsChange {
        match self {
            Self::Backdrop(_) => OptionsChange::default(),
            Self::Dataset(manager) => {
                manager.apply_options(options.clone(), renderer)
            }
        }
    }

    /// React to a lifecycle event raised by another subject.
    pub fn on_event(&mut self, event: &ManagerEvent) {
        if let (
            Self::Backdrop(backdrop),
            ManagerEvent::DatasetReady {
                num_slices,
                num_atoms,
                ..
            },
        ) = (self, event)
        {
            backdrop.extent =
                Some(BackdropExtent::for_dataset(*num_atoms, *num_slices));
        }
    }

    /// Release renderer resources.
    pub fn dispose(&mut self, renderer: &mut impl PointCloudRenderer) {
        match self {
            Self::Backdrop(backdrop) => backdrop.extent = None,
            Self::Dataset(manager) => manager.dispose(renderer),
        }
    }
}

/// Ordered collection of subjects.
pub struct Scene {
    subjects: Vec<SceneSubject>,
}

impl Scene {
    /// Scene with a backdrop and the given dataset manager.
    #[must_use]
    pub fn new(manager: DatasetManager) -> Self {
        Self {
            subjects: vec![
                SceneSubject::Backdrop(Backdrop::default()),
                SceneSubject::Dataset(Box::new(manager)),
            ],
        }
    }

    /// Update every subject and fan lifecycle events out to all of them.
    pub fn on_frame(
        &mut self,
        renderer: &mut impl PointCloudRenderer,
    ) -> Vec<ManagerEvent> {
        let mut events = Vec::new();
        for subject in &mut self.subjects {
            events.extend(subject.on_frame(renderer));
        }
        for event in &events {
            for subject in &mut self.subjects {
                subject.on_event(event);
            }
        }
        events
    }

    /// Forward an option change to every subject.
    pub fn on_parameters_changed(
        &mut self,
        options: &Options,
        renderer: &mut impl PointCloudRenderer,
    ) -> OptionsChange {
        let mut change = OptionsChange::default();
        for subject in &mut self.subjects {
            let c = subject.on_parameters_changed(options, renderer);
            change.dataset |= c.dataset;
            change.visuals |= c.visuals;
        }
        change
    }

    /// The dataset manager.
    #[must_use]
    pub fn dataset(&self) -> Option<&DatasetManager> {
        self.subjects.iter().find_map(|s| match s {
            SceneSubject::Dataset(m) => Some(m.as_ref()),
            SceneSubject::Backdrop(_) => None,
        })
    }

    /// The dataset manager, mutably.
    pub fn dataset_mut(&mut self) -> Option<&mut DatasetManager> {
        self.subjects.iter_mut().find_map(|s| match s {
            SceneSubject::Dataset(m) => Some(m.as_mut()),
            SceneSubject::Backdrop(_) => None,
        })
    }

    /// The backdrop.
    #[must_use]
    pub fn backdrop(&self) -> Option<&Backdrop> {
        self.subjects.iter().find_map(|s| match s {
            SceneSubject::Backdrop(b) => Some(b),
            SceneSubject::Dataset(_) => None,
        })
    }

    /// Dispose every subject.
    pub fn dispose(&mut self, renderer: &mut impl PointCloudRenderer) {
        for subject in &mut self.subjects {
            subject.dispose(renderer);
        }
    }
}
