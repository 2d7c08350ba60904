use std::collections::BTreeMap;

use crate::data::filter::FilterPredicate;
use crate::data::model::{AppointmentDataset, Covariate};

use super::bins::{BinAccumulator, BinShare};
use super::distribution::{
    AttributeDistribution, CovariateAccumulators, NeighbourhoodAccumulator, NeighbourhoodRate,
};
use super::kpi::{KpiAccumulator, Kpis};

/// Everything computed from one filtered view, before packaging.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAggregates {
    pub kpis: Kpis,
    pub neighbourhoods: Vec<NeighbourhoodRate>,
    pub attributes: BTreeMap<Covariate, AttributeDistribution>,
    pub days_bins: Vec<BinShare>,
}

/// Apply `predicate` and compute every aggregate in a single pass over the
/// table. Never fails: an empty subset yields zero counts and `None` rates.
pub fn aggregate(dataset: &AppointmentDataset, predicate: &FilterPredicate) -> RawAggregates {
    let mut kpis = KpiAccumulator::default();
    let mut neighbourhoods = NeighbourhoodAccumulator::default();
    let mut attributes = CovariateAccumulators::default();
    let mut days_bins = BinAccumulator::new(dataset.max_days_until());

    for record in dataset.records().iter().filter(|r| predicate.matches(r)) {
        kpis.push(record);
        neighbourhoods.push(record);
        attributes.push(record);
        days_bins.push(record);
    }

    RawAggregates {
        kpis: kpis.finish(),
        neighbourhoods: neighbourhoods.finish(),
        attributes: attributes.finish(),
        days_bins: days_bins.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterSpec, GenderFilter};
    use crate::data::model::{appointment, CategoryValue, Outcome};

    fn dataset() -> AppointmentDataset {
        let mut rows = vec![
            appointment("A", 10, Outcome::No),
            appointment("A", 20, Outcome::Yes),
            appointment("B", 30, Outcome::No),
            appointment("B", 80, Outcome::Yes),
        ];
        for (r, days) in rows.iter_mut().zip([2, 3, 4, 40]) {
            r.days_until_appointment = days;
        }
        rows[3].sms_received = CategoryValue::Integer(1);
        AppointmentDataset::from_records(rows)
    }

    #[test]
    fn bins_anchor_to_dataset_max_not_subset_max() {
        let ds = dataset();
        let spec = FilterSpec {
            neighbourhood: Some("A".into()),
            gender: GenderFilter::All,
            age_range: (0, 100),
        };
        let agg = aggregate(&ds, &FilterPredicate::build(&spec));

        assert_eq!(agg.kpis.total_count, 2);
        let totals: Vec<usize> = agg.days_bins.iter().map(|b| b.counts.total()).collect();
        assert_eq!(totals, [1, 1, 0, 0]);
    }

    #[test]
    fn full_pass_over_everything() {
        let agg = aggregate(&dataset(), &FilterPredicate::accept_all());
        assert_eq!(agg.kpis.total_count, 4);
        assert_eq!(agg.kpis.no_show_rate, Some(50.0));
        assert_eq!(agg.kpis.avg_days_until, Some(12.2));
        assert_eq!(agg.neighbourhoods.len(), 2);

        let sms = &agg.attributes[&Covariate::SmsReceived];
        assert_eq!(sms.outcomes.yes, 2);
        assert_eq!(sms.outcomes.no, 2);
        assert_eq!(sms.levels.len(), 2);
        assert_eq!(agg.days_bins[3].yes_pct, 100.0);
    }

    #[test]
    fn nothing_matches() {
        let spec = FilterSpec {
            neighbourhood: Some("NOWHERE".into()),
            gender: GenderFilter::All,
            age_range: (0, 100),
        };
        let agg = aggregate(&dataset(), &FilterPredicate::build(&spec));
        assert_eq!(agg.kpis.total_count, 0);
        assert_eq!(agg.kpis.no_show_rate, None);
        assert_eq!(agg.kpis.avg_days_until, None);
        assert!(agg.neighbourhoods.is_empty());
        assert_eq!(agg.attributes.len(), 6);
        assert_eq!(agg.days_bins.len(), 4);
    }
}
