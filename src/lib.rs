//! Filtered KPIs and chart-ready distributions over a table of medical
//! appointments.
//!
//! ```text
//!  FilterSpec ──build──▶ FilterPredicate ──aggregate──▶ RawAggregates ──assemble──▶ ResultBundle
//!                               ▲
//!                     AppointmentDataset (immutable, shared)
//! ```
//!
//! [`recompute`] runs the whole pipeline for one filter state.

pub mod data;
pub mod stats;

pub use data::filter::{FilterPredicate, FilterSpec, GenderFilter};
pub use data::loader::load_file;
pub use data::model::{Appointment, AppointmentDataset, CategoryValue, Covariate, Gender, Outcome};
pub use data::SchemaError;
pub use stats::{recompute, ResultBundle};
