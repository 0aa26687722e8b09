//! Core data types and the reduction pipeline for current conditions
//!
//! This crate turns the provider's raw hourly and 15-minute series into
//! one canonical weather record: normalization, selection of the sample
//! for "now", and merging of the two selected samples.

pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod select;
pub mod types;
pub mod units;

pub use merge::*;
pub use normalize::*;
pub use pipeline::*;
pub use select::*;
pub use types::*;
pub use units::*;
