mod client;

pub use client::DairyApiClient;
