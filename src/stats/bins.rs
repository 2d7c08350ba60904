use serde::Serialize;

use crate::data::model::{Appointment, Outcome};

use super::distribution::OutcomeCounts;

/// Lower edges of the four day bins. The upper edge of the last bin is the
/// dataset-wide maximum plus one.
pub const BIN_EDGES: [i64; 4] = [0, 3, 7, 14];

/// Buckets of `days_until_appointment`. Membership is
/// `lower <= days < upper`, so a lag of exactly 3 days lands in `"4-7"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayBin {
    #[serde(rename = "0-3")]
    ZeroToThree,
    #[serde(rename = "4-7")]
    FourToSeven,
    #[serde(rename = "8-14")]
    EightToFourteen,
    #[serde(rename = "15+")]
    FifteenPlus,
}

impl DayBin {
    pub const ALL: [DayBin; 4] = [
        DayBin::ZeroToThree,
        DayBin::FourToSeven,
        DayBin::EightToFourteen,
        DayBin::FifteenPlus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DayBin::ZeroToThree => "0-3",
            DayBin::FourToSeven => "4-7",
            DayBin::EightToFourteen => "8-14",
            DayBin::FifteenPlus => "15+",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn lower(self) -> i64 {
        BIN_EDGES[self.index()]
    }

    /// Assign a lag to its bin. `max_days` is the maximum over the whole
    /// dataset; lags below 0 or above it belong to no bin.
    pub fn classify(days: i64, max_days: i64) -> Option<DayBin> {
        if days < 0 || days > max_days {
            return None;
        }
        DayBin::ALL
            .into_iter()
            .rev()
            .find(|bin| days >= bin.lower())
    }
}

/// One stacked bar: outcome shares within a single bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinShare {
    pub bin: DayBin,
    pub counts: OutcomeCounts,
    /// Percentage of the bin that showed up.
    #[serde(rename = "No")]
    pub no_pct: f64,
    /// Percentage of the bin that did not show up.
    #[serde(rename = "Yes")]
    pub yes_pct: f64,
}

impl BinShare {
    fn from_counts(bin: DayBin, counts: OutcomeCounts) -> Self {
        let total = counts.total();
        let pct = |n: usize| {
            if total == 0 {
                0.0
            } else {
                n as f64 / total as f64 * 100.0
            }
        };
        BinShare {
            bin,
            counts,
            no_pct: pct(counts.no),
            yes_pct: pct(counts.yes),
        }
    }

    pub fn label(&self) -> &'static str {
        self.bin.label()
    }

    pub fn pct(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::No => self.no_pct,
            Outcome::Yes => self.yes_pct,
        }
    }
}

#[derive(Debug)]
pub(crate) struct BinAccumulator {
    max_days: i64,
    counts: [OutcomeCounts; 4],
}

impl BinAccumulator {
    /// `max_days` is `None` for an empty dataset, in which case nothing is
    /// ever pushed.
    pub(crate) fn new(max_days: Option<i64>) -> Self {
        BinAccumulator {
            max_days: max_days.unwrap_or(-1),
            counts: [OutcomeCounts::default(); 4],
        }
    }

    pub(crate) fn push(&mut self, record: &Appointment) {
        if let Some(bin) = DayBin::classify(record.days_until_appointment, self.max_days) {
            self.counts[bin.index()].record(record.no_show);
        }
    }

    /// All four bins in label order, empty ones included.
    pub(crate) fn finish(self) -> Vec<BinShare> {
        DayBin::ALL
            .into_iter()
            .map(|bin| BinShare::from_counts(bin, self.counts[bin.index()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::appointment;

    #[test]
    fn lower_edge_is_inclusive_upper_exclusive() {
        let max = 200;
        assert_eq!(DayBin::classify(0, max), Some(DayBin::ZeroToThree));
        assert_eq!(DayBin::classify(2, max), Some(DayBin::ZeroToThree));
        assert_eq!(DayBin::classify(3, max), Some(DayBin::FourToSeven));
        assert_eq!(DayBin::classify(6, max), Some(DayBin::FourToSeven));
        assert_eq!(DayBin::classify(7, max), Some(DayBin::EightToFourteen));
        assert_eq!(DayBin::classify(13, max), Some(DayBin::EightToFourteen));
        assert_eq!(DayBin::classify(14, max), Some(DayBin::FifteenPlus));
        assert_eq!(DayBin::classify(200, max), Some(DayBin::FifteenPlus));
    }

    #[test]
    fn out_of_range_lags_have_no_bin() {
        assert_eq!(DayBin::classify(-1, 50), None);
        assert_eq!(DayBin::classify(51, 50), None);
    }

    #[test]
    fn small_max_leaves_last_bin_empty() {
        let mut acc = BinAccumulator::new(Some(10));
        for days in [2, 3, 4, 10] {
            let mut r = appointment("A", 30, Outcome::No);
            r.days_until_appointment = days;
            acc.push(&r);
        }
        let totals: Vec<(&str, usize)> = acc
            .finish()
            .iter()
            .map(|s| (s.label(), s.counts.total()))
            .collect();
        assert_eq!(totals, [("0-3", 1), ("4-7", 2), ("8-14", 1), ("15+", 0)]);
    }

    #[test]
    fn percentages_are_per_bin() {
        let mut acc = BinAccumulator::new(Some(30));
        for (days, outcome) in [(1, Outcome::Yes), (1, Outcome::No), (2, Outcome::No), (20, Outcome::Yes)] {
            let mut r = appointment("A", 30, outcome);
            r.days_until_appointment = days;
            acc.push(&r);
        }
        let shares = acc.finish();

        assert!((shares[0].yes_pct - 100.0 / 3.0).abs() < 1e-9);
        assert!((shares[0].no_pct + shares[0].yes_pct - 100.0).abs() < 1e-9);
        assert_eq!((shares[1].no_pct, shares[1].yes_pct), (0.0, 0.0));
        assert_eq!(shares[3].pct(Outcome::Yes), 100.0);
    }

    #[test]
    fn empty_dataset_yields_four_empty_bins() {
        let shares = BinAccumulator::new(None).finish();
        assert_eq!(shares.len(), 4);
        assert!(shares.iter().all(|s| s.no_pct == 0.0 && s.yes_pct == 0.0));
    }
}
