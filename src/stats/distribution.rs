use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Appointment, CategoryValue, Covariate, Outcome};

// ---------------------------------------------------------------------------
// Outcome counts – the two-slice pie behind every covariate chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutcomeCounts {
    #[serde(rename = "Yes")]
    pub yes: usize,
    #[serde(rename = "No")]
    pub no: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Yes => self.yes += 1,
            Outcome::No => self.no += 1,
        }
    }

    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Yes => self.yes,
            Outcome::No => self.no,
        }
    }

    pub fn total(&self) -> usize {
        self.yes + self.no
    }

    /// No-show fraction in `[0, 1]`; `None` for an empty group.
    pub fn no_show_fraction(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.yes as f64 / total as f64)
    }
}

impl std::ops::AddAssign for OutcomeCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.yes += rhs.yes;
        self.no += rhs.no;
    }
}

// ---------------------------------------------------------------------------
// Neighbourhood rates
// ---------------------------------------------------------------------------

/// One bar of the neighbourhood chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighbourhoodRate {
    pub neighbourhood: String,
    /// No-show fraction in `[0, 1]`.
    pub rate: f64,
    /// Group size.
    pub appointments: usize,
}

#[derive(Debug, Default)]
pub(crate) struct NeighbourhoodAccumulator<'a> {
    groups: BTreeMap<&'a str, OutcomeCounts>,
}

impl<'a> NeighbourhoodAccumulator<'a> {
    pub(crate) fn push(&mut self, record: &'a Appointment) {
        self.groups
            .entry(record.neighbourhood.as_str())
            .or_default()
            .record(record.no_show);
    }

    /// Rows sorted by rate, highest first. The sort is stable over the
    /// ascending key order, so ties stay alphabetical.
    pub(crate) fn finish(self) -> Vec<NeighbourhoodRate> {
        let mut rows: Vec<NeighbourhoodRate> = self
            .groups
            .into_iter()
            .map(|(name, counts)| NeighbourhoodRate {
                neighbourhood: name.to_string(),
                // groups only exist once a row was pushed
                rate: counts.no_show_fraction().unwrap_or(0.0),
                appointments: counts.total(),
            })
            .collect();
        rows.sort_by(|a, b| b.rate.total_cmp(&a.rate));
        rows
    }
}

// ---------------------------------------------------------------------------
// Covariate distributions
// ---------------------------------------------------------------------------

/// Outcome counts for one covariate chart.
///
/// `outcomes` is the marginal over the whole filtered subset and is what the
/// chart shows. `levels` splits the same counts by covariate value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AttributeDistribution {
    pub outcomes: OutcomeCounts,
    pub levels: Vec<LevelCounts>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCounts {
    pub level: CategoryValue,
    pub counts: OutcomeCounts,
}

#[derive(Debug, Default)]
pub(crate) struct AttributeAccumulator {
    levels: BTreeMap<CategoryValue, OutcomeCounts>,
}

impl AttributeAccumulator {
    pub(crate) fn push(&mut self, level: &CategoryValue, outcome: Outcome) {
        match self.levels.get_mut(level) {
            Some(counts) => counts.record(outcome),
            None => {
                let mut counts = OutcomeCounts::default();
                counts.record(outcome);
                self.levels.insert(level.clone(), counts);
            }
        }
    }

    pub(crate) fn finish(self) -> AttributeDistribution {
        let mut outcomes = OutcomeCounts::default();
        let levels = self
            .levels
            .into_iter()
            .map(|(level, counts)| {
                outcomes += counts;
                LevelCounts { level, counts }
            })
            .collect();
        AttributeDistribution { outcomes, levels }
    }
}

/// One accumulator per covariate, fed from the same pass.
#[derive(Debug, Default)]
pub(crate) struct CovariateAccumulators {
    by_covariate: BTreeMap<Covariate, AttributeAccumulator>,
}

impl CovariateAccumulators {
    pub(crate) fn push(&mut self, record: &Appointment) {
        for covariate in Covariate::ALL {
            self.by_covariate
                .entry(covariate)
                .or_default()
                .push(record.covariate(covariate), record.no_show);
        }
    }

    /// Every covariate is present in the result, even for an empty subset.
    pub(crate) fn finish(mut self) -> BTreeMap<Covariate, AttributeDistribution> {
        Covariate::ALL
            .into_iter()
            .map(|c| {
                let dist = self.by_covariate.remove(&c).unwrap_or_default().finish();
                (c, dist)
            })
            .collect()
    }
}
