//! SMART-style tf-idf term weighting.
//!
//! A [`TfIdfWeight`] is configured from a three letter normalization code,
//! declares the statistics it needs through [`StatFlags`], and once
//! initialized scores documents and reports an upper bound for pruning.

#![allow(clippy::len_without_is_empty)]

pub mod codec;
pub mod error;
pub mod normalization;
pub mod options;
pub mod query;
pub mod stats;
pub mod utils;
pub mod weight;

pub use error::{ConfigError, SerializationError, WeightError};
pub use normalization::{IdfNorm, Normalization, WdfNorm, WtNorm};
pub use options::{TfIdfOption, TuningParams};
pub use query::{DocumentVector, QueryWeights};
pub use stats::{required_stats, StatFlags, TermStatistics};
pub use weight::{TfIdfWeight, Weight};
