/// Data layer: the appointment table, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AppointmentDataset (SchemaError on bad input)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ AppointmentDataset │  Vec<Appointment>, column bounds, neighbourhoods
///   └────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → FilterPredicate → filtered indices
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::SchemaError;
