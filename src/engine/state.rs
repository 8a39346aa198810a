use crate::options::DatasetKey;

/// Where the lifecycle manager is.
///
/// `Loading` may coexist with visuals from the previous dataset; they stay
/// on screen until the new dataset replaces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing requested yet, or the first load failed.
    Empty,
    /// A load for `generation` is outstanding.
    Loading {
        /// Generation of the outstanding request.
        generation: u64,
    },
    /// A dataset is displayed and no load is outstanding.
    Ready,
    /// Terminal. All renderer primitives are gone.
    Disposed,
}

impl LifecycleState {
    /// Whether a load is outstanding.
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Notifications produced while pumping the manager.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerEvent {
    /// A dataset finished loading and is displayed.
    DatasetReady {
        /// Dataset that was loaded.
        key: DatasetKey,
        /// Number of slices, for re-bounding the slice selector.
        num_slices: usize,
        /// Number of residues per slice.
        num_atoms: usize,
    },
    /// A load failed. Whatever was displayed before is still displayed.
    LoadFailed {
        /// Dataset that failed.
        key: DatasetKey,
        /// Human-readable cause.
        message: String,
    },
    /// The selected slice did not exist in the new dataset and was reset to
    /// "all slices".
    SelectionReset,
}
