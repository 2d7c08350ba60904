use std::fmt;
use std::ops::RangeInclusive;

use super::model::{Appointment, AppointmentDataset, Gender};

// ---------------------------------------------------------------------------
// Filter specification: the current control state
// ---------------------------------------------------------------------------

/// Gender choice from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderFilter {
    #[default]
    All,
    Only(Gender),
}

impl GenderFilter {
    pub const CHOICES: [GenderFilter; 3] = [
        GenderFilter::All,
        GenderFilter::Only(Gender::Female),
        GenderFilter::Only(Gender::Male),
    ];

    /// Permissive parse: anything other than `"F"` or `"M"` means no
    /// constraint.
    pub fn parse(value: &str) -> Self {
        Gender::from_code(value.trim()).map_or(GenderFilter::All, GenderFilter::Only)
    }

    /// Value as it appears in the filter banner.
    pub fn code(self) -> &'static str {
        match self {
            GenderFilter::All => "All",
            GenderFilter::Only(g) => g.code(),
        }
    }

    /// Dropdown label.
    pub fn label(self) -> &'static str {
        match self {
            GenderFilter::All => "All Genders",
            GenderFilter::Only(Gender::Female) => "Female",
            GenderFilter::Only(Gender::Male) => "Male",
        }
    }
}

/// One recomputation request. Built fresh from the controls each time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    /// `None` or empty → all neighbourhoods.
    pub neighbourhood: Option<String>,
    pub gender: GenderFilter,
    /// Inclusive `(min, max)` age interval.
    pub age_range: (i64, i64),
}

impl FilterSpec {
    /// Initial control state: every neighbourhood, every gender, the full
    /// observed age span.
    pub fn unfiltered(dataset: &AppointmentDataset) -> Self {
        FilterSpec {
            neighbourhood: None,
            gender: GenderFilter::All,
            age_range: dataset.age_bounds().unwrap_or((0, 0)),
        }
    }

    /// Banner shown above the KPIs.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    fn active_neighbourhood(&self) -> Option<&str> {
        self.neighbourhood.as_deref().filter(|n| !n.is_empty())
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filters >> Neighborhood: {}, Age: {} - {}, Gender: {}",
            self.active_neighbourhood().unwrap_or("All"),
            self.age_range.0,
            self.age_range.1,
            self.gender.code()
        )
    }
}

// ---------------------------------------------------------------------------
// Row predicate
// ---------------------------------------------------------------------------

/// Conjunction of the active sub-predicates. An inactive field is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    neighbourhood: Option<String>,
    gender: Option<Gender>,
    age: Option<RangeInclusive<i64>>,
}

impl FilterPredicate {
    /// Build the predicate. Never fails: an empty neighbourhood or a reversed
    /// age range simply drops that constraint.
    pub fn build(spec: &FilterSpec) -> Self {
        let (lo, hi) = spec.age_range;
        FilterPredicate {
            neighbourhood: spec.active_neighbourhood().map(str::to_string),
            gender: match spec.gender {
                GenderFilter::All => None,
                GenderFilter::Only(g) => Some(g),
            },
            age: (lo <= hi).then_some(lo..=hi),
        }
    }

    /// Predicate that accepts every row.
    pub fn accept_all() -> Self {
        FilterPredicate {
            neighbourhood: None,
            gender: None,
            age: None,
        }
    }

    pub fn matches(&self, record: &Appointment) -> bool {
        if let Some(n) = &self.neighbourhood {
            if record.neighbourhood != *n {
                return false;
            }
        }
        if let Some(g) = self.gender {
            if record.gender != g {
                return false;
            }
        }
        match &self.age {
            Some(range) => range.contains(&record.age),
            None => true,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.neighbourhood.is_none() && self.gender.is_none() && self.age.is_none()
    }
}

/// Return indices of appointments that pass the predicate, in table order.
pub fn filtered_indices(dataset: &AppointmentDataset, predicate: &FilterPredicate) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| predicate.matches(r))
        .map(|(i, _)| i)
        .collect()
}
