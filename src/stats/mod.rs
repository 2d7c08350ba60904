//! Aggregation engine and result bundle.
//!
//! One pass over the rows selected by a [`FilterPredicate`] feeds four
//! accumulators (KPIs, neighbourhood rates, covariate outcome counts, day
//! bins); [`bundle::assemble`] packages their output for the renderer.
//!
//! [`FilterPredicate`]: crate::data::filter::FilterPredicate

pub mod aggregate;
pub mod bins;
pub mod bundle;
pub mod distribution;
pub mod kpi;

pub use aggregate::{aggregate, RawAggregates};
pub use bundle::{assemble, recompute, ResultBundle};
