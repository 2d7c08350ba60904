use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::{FilterPredicate, FilterSpec};
use crate::data::model::{AppointmentDataset, Covariate};

use super::aggregate::aggregate;
use super::bins::BinShare;
use super::distribution::{AttributeDistribution, NeighbourhoodRate};
use super::kpi::Kpis;

/// Everything the dashboard renders for one filter state. Field names are
/// stable; the renderer and the JSON export bind to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub filter_summary: String,
    pub total_count: usize,
    pub no_show_rate: Option<f64>,
    pub avg_days_until: Option<f64>,
    pub neighbourhood_distribution: Vec<NeighbourhoodRate>,
    pub attribute_distributions: BTreeMap<Covariate, AttributeDistribution>,
    pub days_bin_distribution: Vec<BinShare>,
}

impl ResultBundle {
    pub fn attribute(&self, covariate: Covariate) -> Option<&AttributeDistribution> {
        self.attribute_distributions.get(&covariate)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing result bundle")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

/// Pure packaging, no computation.
pub fn assemble(
    kpis: Kpis,
    neighbourhood_distribution: Vec<NeighbourhoodRate>,
    attribute_distributions: BTreeMap<Covariate, AttributeDistribution>,
    days_bin_distribution: Vec<BinShare>,
    filter_summary: String,
) -> ResultBundle {
    ResultBundle {
        filter_summary,
        total_count: kpis.total_count,
        no_show_rate: kpis.no_show_rate,
        avg_days_until: kpis.avg_days_until,
        neighbourhood_distribution,
        attribute_distributions,
        days_bin_distribution,
    }
}

/// Recompute the full bundle for one filter state.
pub fn recompute(dataset: &AppointmentDataset, spec: &FilterSpec) -> ResultBundle {
    let predicate = FilterPredicate::build(spec);
    let raw = aggregate(dataset, &predicate);
    log::debug!(
        "recomputed {} of {} appointments ({})",
        raw.kpis.total_count,
        dataset.len(),
        spec
    );
    assemble(
        raw.kpis,
        raw.neighbourhoods,
        raw.attributes,
        raw.days_bins,
        spec.summary(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{appointment, Outcome};

    #[test]
    fn json_field_names_are_stable() {
        let ds = AppointmentDataset::from_records(vec![
            appointment("CENTRO", 40, Outcome::Yes),
            appointment("CENTRO", 41, Outcome::No),
        ]);
        let bundle = recompute(&ds, &FilterSpec::unfiltered(&ds));
        let json: serde_json::Value = serde_json::from_str(&bundle.to_json_pretty().unwrap()).unwrap();

        assert_eq!(json["total_count"], 2);
        assert_eq!(json["no_show_rate"], 50.0);
        assert_eq!(json["avg_days_until"], 0.0);
        assert_eq!(json["neighbourhood_distribution"][0]["neighbourhood"], "CENTRO");
        assert_eq!(json["attribute_distributions"]["sms_received"]["outcomes"]["Yes"], 1);
        assert_eq!(json["days_bin_distribution"][0]["bin"], "0-3");
        assert_eq!(json["days_bin_distribution"][0]["No"], 50.0);
        assert_eq!(
            json["filter_summary"],
            "Filters >> Neighborhood: All, Age: 40 - 41, Gender: All"
        );
    }

    #[test]
    fn empty_rate_serializes_as_null() {
        let ds = AppointmentDataset::from_records(Vec::new());
        let bundle = recompute(&ds, &FilterSpec::unfiltered(&ds));
        let json: serde_json::Value = serde_json::from_str(&bundle.to_json_pretty().unwrap()).unwrap();
        assert!(json["no_show_rate"].is_null());
        assert!(json["avg_days_until"].is_null());
    }

    #[test]
    fn write_json_to_disk() {
        let ds = AppointmentDataset::from_records(vec![appointment("CENTRO", 40, Outcome::Yes)]);
        let bundle = recompute(&ds, &FilterSpec::unfiltered(&ds));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        bundle.write_json(&path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("\"total_count\": 1"));
    }
}
