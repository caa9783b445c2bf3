//! Concrete record sources: the dairy REST API and local CSV exports.

pub mod csv_source;
pub mod dairy_api;

pub use csv_source::CsvRecordSource;
pub use dairy_api::DairyApiClient;
