use std::path::PathBuf;

/// Environment variable naming a dataset to open at startup.
pub const DATASET_ENV: &str = "NOSHOW_DATASET";

pub const WINDOW_SIZE: [f32; 2] = [1400.0, 900.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [800.0, 500.0];

/// Startup configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Dataset opened before the first frame, if any.
    pub dataset_path: Option<PathBuf>,
}

impl DashboardConfig {
    /// First CLI argument wins over `NOSHOW_DATASET`.
    pub fn from_env() -> Self {
        Self::from_sources(std::env::args().nth(1), std::env::var(DATASET_ENV).ok())
    }

    fn from_sources(arg: Option<String>, env: Option<String>) -> Self {
        let dataset_path = arg
            .into_iter()
            .chain(env)
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
            .map(PathBuf::from);
        DashboardConfig { dataset_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_takes_precedence() {
        let cfg = DashboardConfig::from_sources(Some("a.csv".into()), Some("b.csv".into()));
        assert_eq!(cfg.dataset_path, Some(PathBuf::from("a.csv")));
    }

    #[test]
    fn falls_back_to_env() {
        let cfg = DashboardConfig::from_sources(None, Some("data/appointments.parquet".into()));
        assert_eq!(cfg.dataset_path, Some(PathBuf::from("data/appointments.parquet")));
    }

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(
            DashboardConfig::from_sources(Some("  ".into()), None),
            DashboardConfig::default()
        );
    }
}
