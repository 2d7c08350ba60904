use noshow_dash::data::filter::filtered_indices;
use noshow_dash::{
    recompute, Appointment, AppointmentDataset, CategoryValue, Covariate, FilterPredicate,
    FilterSpec, Gender, GenderFilter, Outcome,
};

fn row(neighbourhood: &str, age: i64, gender: Gender, no_show: Outcome, days: i64) -> Appointment {
    Appointment {
        neighbourhood: neighbourhood.to_string(),
        age,
        gender,
        no_show,
        scholarship: CategoryValue::Integer((age % 2 == 0) as i64),
        sms_received: CategoryValue::Integer((days > 3) as i64),
        handcap: CategoryValue::Integer(age % 3),
        hipertension: CategoryValue::Bool(age > 50),
        diabetes: CategoryValue::Integer(0),
        alcoholism: CategoryValue::String("No".into()),
        days_until_appointment: days,
    }
}

fn four_rows() -> AppointmentDataset {
    AppointmentDataset::from_records(vec![
        row("A", 10, Gender::Female, Outcome::No, 2),
        row("A", 20, Gender::Male, Outcome::Yes, 3),
        row("B", 30, Gender::Female, Outcome::No, 4),
        row("B", 80, Gender::Male, Outcome::Yes, 10),
    ])
}

/// A larger, deterministic table with every neighbourhood / gender / lag mix.
fn wide_dataset() -> AppointmentDataset {
    let names = ["CENTRO", "ANDORINHAS", "MARUÍPE", "BONFIM", "ILHA DE SANTA MARIA"];
    let rows = (0..400)
        .map(|i: i64| {
            let gender = if i % 3 == 0 { Gender::Male } else { Gender::Female };
            let no_show = if (i * 7 + i / 5) % 4 == 0 { Outcome::Yes } else { Outcome::No };
            row(names[(i % 5) as usize], (i * 13) % 101, gender, no_show, (i * 11) % 60)
        })
        .collect();
    AppointmentDataset::from_records(rows)
}

fn spec(neighbourhood: Option<&str>, gender: &str, age_range: (i64, i64)) -> FilterSpec {
    FilterSpec {
        neighbourhood: neighbourhood.map(str::to_string),
        gender: GenderFilter::parse(gender),
        age_range,
    }
}

fn sample_specs() -> Vec<FilterSpec> {
    let mut specs = Vec::new();
    for neighbourhood in [None, Some("CENTRO"), Some("BONFIM"), Some("NOWHERE")] {
        for gender in ["All", "F", "M"] {
            for age_range in [(0, 100), (18, 65), (40, 40), (90, 100), (70, 20)] {
                specs.push(spec(neighbourhood, gender, age_range));
            }
        }
    }
    specs
}

#[test]
fn four_row_scenario() {
    let ds = four_rows();

    let all = recompute(&ds, &spec(None, "All", (0, 100)));
    assert_eq!(all.total_count, 4);
    assert_eq!(all.no_show_rate, Some(50.0));

    let a = recompute(&ds, &spec(Some("A"), "All", (0, 100)));
    assert_eq!(a.total_count, 2);
    assert_eq!(a.no_show_rate, Some(50.0));
    assert_eq!(a.neighbourhood_distribution.len(), 1);
    assert_eq!(a.neighbourhood_distribution[0].rate, 0.5);
}

#[test]
fn day_bin_membership_scenario() {
    let bundle = recompute(&four_rows(), &spec(None, "All", (0, 100)));
    let bins: Vec<(&str, usize)> = bundle
        .days_bin_distribution
        .iter()
        .map(|b| (b.label(), b.counts.total()))
        .collect();
    assert_eq!(bins, [("0-3", 1), ("4-7", 2), ("8-14", 1), ("15+", 0)]);
}

#[test]
fn total_count_matches_independent_refilter() {
    let ds = wide_dataset();
    for spec in sample_specs() {
        let bundle = recompute(&ds, &spec);
        let expected = ds
            .records()
            .iter()
            .filter(|r| {
                let neighbourhood_ok = spec
                    .neighbourhood
                    .as_deref()
                    .map_or(true, |n| r.neighbourhood == n);
                let gender_ok = match spec.gender {
                    GenderFilter::All => true,
                    GenderFilter::Only(g) => r.gender == g,
                };
                let (lo, hi) = spec.age_range;
                let age_ok = lo > hi || (lo <= r.age && r.age <= hi);
                neighbourhood_ok && gender_ok && age_ok
            })
            .count();
        assert_eq!(bundle.total_count, expected, "{spec}");
        assert_eq!(
            filtered_indices(&ds, &FilterPredicate::build(&spec)).len(),
            expected,
            "{spec}"
        );
    }
}

#[test]
fn rate_is_a_percentage_or_none() {
    let ds = wide_dataset();
    for spec in sample_specs() {
        let bundle = recompute(&ds, &spec);
        match bundle.no_show_rate {
            Some(rate) => {
                assert!(bundle.total_count > 0, "{spec}");
                assert!((0.0..=100.0).contains(&rate), "{spec}: {rate}");
            }
            None => {
                assert_eq!(bundle.total_count, 0, "{spec}");
                assert_eq!(bundle.avg_days_until, None, "{spec}");
            }
        }
    }
}

#[test]
fn bin_percentages_sum_to_100_or_0() {
    let ds = wide_dataset();
    for spec in sample_specs() {
        let bundle = recompute(&ds, &spec);
        assert_eq!(bundle.days_bin_distribution.len(), 4);
        for bin in &bundle.days_bin_distribution {
            let sum = bin.yes_pct + bin.no_pct;
            if bin.counts.total() == 0 {
                assert_eq!(sum, 0.0, "{spec} {}", bin.label());
            } else {
                assert!((sum - 100.0).abs() < 1e-9, "{spec} {}: {sum}", bin.label());
            }
        }
    }
}

#[test]
fn neighbourhood_groups_reconstruct_totals() {
    let ds = wide_dataset();
    for gender in ["All", "F", "M"] {
        let bundle = recompute(&ds, &spec(None, gender, (0, 100)));
        let dist = &bundle.neighbourhood_distribution;

        let size: usize = dist.iter().map(|r| r.appointments).sum();
        assert_eq!(size, bundle.total_count);

        let yes: f64 = dist.iter().map(|r| r.rate * r.appointments as f64).sum();
        let expected_yes = bundle.attribute_distributions[&Covariate::Diabetes].outcomes.yes;
        assert!((yes - expected_yes as f64).abs() < 1e-6);

        assert!(dist.windows(2).all(|w| w[0].rate >= w[1].rate));
    }
}

#[test]
fn every_covariate_marginal_covers_the_subset() {
    let ds = wide_dataset();
    let bundle = recompute(&ds, &spec(Some("CENTRO"), "F", (18, 65)));
    assert_eq!(bundle.attribute_distributions.len(), Covariate::ALL.len());
    for covariate in Covariate::ALL {
        let dist = bundle.attribute(covariate).unwrap();
        assert_eq!(dist.outcomes.total(), bundle.total_count, "{covariate:?}");
        let from_levels: usize = dist.levels.iter().map(|l| l.counts.total()).sum();
        assert_eq!(from_levels, bundle.total_count, "{covariate:?}");
    }
}

#[test]
fn recompute_is_idempotent() {
    let ds = wide_dataset();
    for spec in sample_specs() {
        let first = recompute(&ds, &spec);
        let second = recompute(&ds, &spec);
        assert_eq!(first, second);
        assert_eq!(
            first.to_json_pretty().unwrap(),
            second.to_json_pretty().unwrap()
        );
    }
}

#[test]
fn narrowing_age_never_grows_the_subset() {
    let ds = wide_dataset();
    let mut previous = usize::MAX;
    for (lo, hi) in [(0, 100), (5, 95), (20, 80), (30, 60), (45, 50), (47, 47)] {
        let total = recompute(&ds, &spec(None, "All", (lo, hi))).total_count;
        assert!(total <= previous, "({lo}, {hi}) grew to {total}");
        previous = total;
    }
}

#[test]
fn empty_subset_is_renderable() {
    let bundle = recompute(&four_rows(), &spec(Some("C"), "All", (0, 100)));
    assert_eq!(bundle.total_count, 0);
    assert_eq!(bundle.no_show_rate, None);
    assert_eq!(bundle.avg_days_until, None);
    assert!(bundle.neighbourhood_distribution.is_empty());
    assert!(bundle
        .days_bin_distribution
        .iter()
        .all(|b| b.yes_pct == 0.0 && b.no_pct == 0.0));
    assert!(bundle.to_json_pretty().is_ok());
}
