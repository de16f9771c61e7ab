// Adapters layer: concrete implementations for external systems (http api, csv export).

pub mod export;
pub mod http;

pub use http::HttpBmiApi;
