//! Prometheus metrics exporter for the i2pd router.
//!
//! This crate scrapes the i2pd web console status page on every Prometheus
//! request and exposes the values it finds via an HTTP `/metrics` endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  i2pd console   │────>│    Collector    │────>│   HTTP Server   │
//! │  (status HTML)  │     │ (extract/write) │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Each request runs its own scrape: nothing is cached between requests.
//!
//! # Usage
//!
//! ```bash
//! i2pd-exporter --url http://127.0.0.1:7070 --listen 0.0.0.0:9101
//! ```
//!
//! # Configuration
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod collector;
pub mod config;
pub mod exposition;
pub mod extract;
pub mod http;
pub mod mapping;
pub mod scrape;

pub use collector::{SharedCollector, StatusCollector, collect, render_down};
pub use config::ExporterConfig;
pub use exposition::ExpositionWriter;
pub use extract::StatusPage;
pub use http::HttpServer;
pub use scrape::{ConsoleClient, ScrapeError};
