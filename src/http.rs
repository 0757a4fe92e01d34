//! `reqwest` based implementation of [crate::http_client::HttpClient] and its configuration.
pub mod client;
pub mod config;
