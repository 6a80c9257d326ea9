//! Radial brightness statistics around candidate centers.
//!
//! - [`RadialStatistics`] buckets pixels by rounded distance and answers
//!   floor-rank quantile queries per bucket.
//! - `QuantileProfile` caches the handful of quantile levels the scorer needs
//!   so each bucket is queried once per candidate.

pub(crate) mod profile;
mod statistics;

pub use statistics::RadialStatistics;
