use std::path::Path;

use anyhow::Result;
use noshow_dash::{
    load_file, recompute, AppointmentDataset, FilterSpec, GenderFilter, ResultBundle,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
#[derive(Default)]
pub struct DashboardState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<AppointmentDataset>,

    /// Current control values.
    pub filter: FilterSpec,

    /// Bundle for the current `filter`, replaced on every change.
    pub bundle: Option<ResultBundle>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl DashboardState {
    /// Ingest a newly loaded dataset, reset the controls and recompute.
    pub fn set_dataset(&mut self, dataset: AppointmentDataset) {
        self.filter = FilterSpec::unfiltered(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Load a file and install it; on failure the previous dataset stays.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        match load_file(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Recompute the bundle for the current controls.
    pub fn refresh(&mut self) {
        self.bundle = self
            .dataset
            .as_ref()
            .map(|ds| recompute(ds, &self.filter));
    }

    pub fn set_neighbourhood(&mut self, neighbourhood: Option<String>) {
        if self.filter.neighbourhood != neighbourhood {
            self.filter.neighbourhood = neighbourhood;
            self.refresh();
        }
    }

    pub fn set_gender(&mut self, gender: GenderFilter) {
        if self.filter.gender != gender {
            self.filter.gender = gender;
            self.refresh();
        }
    }

    /// Move the lower handle; the upper handle is pushed along so the range
    /// never inverts.
    pub fn set_age_min(&mut self, min: i64) {
        let (_, max) = self.filter.age_range;
        self.set_age_range(min, max.max(min));
    }

    /// Move the upper handle; the lower handle is pushed along.
    pub fn set_age_max(&mut self, max: i64) {
        let (min, _) = self.filter.age_range;
        self.set_age_range(min.min(max), max);
    }

    fn set_age_range(&mut self, min: i64, max: i64) {
        if self.filter.age_range != (min, max) {
            self.filter.age_range = (min, max);
            self.refresh();
        }
    }

    /// Back to the initial control state.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filter = FilterSpec::unfiltered(ds);
            self.refresh();
        }
    }
}
