//! Lactation production analytics.
//!
//! Raw weighing records are normalized, rolled up per day, and turned into
//! an expected-vs-actual lactation curve, production statistics, a trend
//! series and quality statistics, then packaged for the report exporter.
//! Every step is a pure function of its input.

pub mod aggregate;
pub mod analyzer;
pub mod curve;
pub mod production;
pub mod quality;
pub mod report;
pub mod trend;
pub mod types;
pub mod utility;
