use crate::data::model::{Appointment, Outcome};

/// Scalar summary of the filtered subset. Rates and means are `None` when the
/// subset is empty instead of carrying a NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kpis {
    pub total_count: usize,
    /// Percentage of no-shows, one decimal.
    pub no_show_rate: Option<f64>,
    /// Mean lag between scheduling and appointment, one decimal.
    pub avg_days_until: Option<f64>,
}

#[derive(Debug, Default)]
pub(crate) struct KpiAccumulator {
    count: usize,
    no_shows: usize,
    days_sum: i128,
}

impl KpiAccumulator {
    pub(crate) fn push(&mut self, record: &Appointment) {
        self.count += 1;
        if record.no_show == Outcome::Yes {
            self.no_shows += 1;
        }
        self.days_sum += i128::from(record.days_until_appointment);
    }

    pub(crate) fn finish(self) -> Kpis {
        let n = self.count as f64;
        Kpis {
            total_count: self.count,
            no_show_rate: (self.count > 0).then(|| round1(self.no_shows as f64 / n * 100.0)),
            avg_days_until: (self.count > 0).then(|| round1(self.days_sum as f64 / n)),
        }
    }
}

/// One decimal place via `{:.1}`, so exact ties round to even (`6.25` → `6.2`).
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// `"23.4%"`, or `"n/a"` for an empty subset.
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}%"))
}

/// `"9.8"`, or `"n/a"` for an empty subset.
pub fn format_days(days: Option<f64>) -> String {
    days.map_or_else(|| "n/a".to_string(), |d| format!("{d:.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::appointment;

    fn kpis(rows: &[(Outcome, i64)]) -> Kpis {
        let mut acc = KpiAccumulator::default();
        for &(outcome, days) in rows {
            let mut r = appointment("A", 30, outcome);
            r.days_until_appointment = days;
            acc.push(&r);
        }
        acc.finish()
    }

    #[test]
    fn rate_and_mean() {
        let k = kpis(&[(Outcome::Yes, 1), (Outcome::No, 2), (Outcome::No, 4)]);
        assert_eq!(k.total_count, 3);
        assert_eq!(k.no_show_rate, Some(33.3));
        assert_eq!(k.avg_days_until, Some(2.3));
    }

    #[test]
    fn empty_subset_has_no_rate_or_mean() {
        let k = kpis(&[]);
        assert_eq!(k, Kpis::default());
        assert_eq!(format_rate(k.no_show_rate), "n/a");
        assert_eq!(format_days(k.avg_days_until), "n/a");
    }

    #[test]
    fn single_outcome_level() {
        let k = kpis(&[(Outcome::No, 0), (Outcome::No, 0)]);
        assert_eq!(k.no_show_rate, Some(0.0));
        let k = kpis(&[(Outcome::Yes, 7)]);
        assert_eq!(k.no_show_rate, Some(100.0));
    }

    #[test]
    fn formatting() {
        assert_eq!(format_rate(Some(50.0)), "50.0%");
        assert_eq!(format_days(Some(10.26)), "10.3");
        assert_eq!(round1(2.0 / 3.0 * 100.0), 66.7);
    }

    #[test]
    fn exact_ties_round_to_even() {
        let mut rows = vec![(Outcome::No, 0); 15];
        rows.push((Outcome::Yes, 0));
        let k = kpis(&rows);
        assert_eq!(k.no_show_rate, Some(6.2));
        assert_eq!(format_rate(k.no_show_rate), "6.2%");

        let k = kpis(&[(Outcome::No, 1), (Outcome::No, 0), (Outcome::No, 0), (Outcome::No, 0)]);
        assert_eq!(k.avg_days_until, Some(0.2));
        assert_eq!(format_days(k.avg_days_until), "0.2");
    }

    #[test]
    fn extreme_lags_do_not_overflow() {
        let k = kpis(&[(Outcome::No, i64::MAX), (Outcome::No, i64::MAX)]);
        assert_eq!(k.avg_days_until, Some(i64::MAX as f64));
    }
}
