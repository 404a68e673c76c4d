#![deny(unused)]
//! Observability for Mealroute.
//!
//! This crate provides:
//! - Tracing subscriber setup (env filter, JSON output, OTLP export)
//! - Prometheus metrics helpers

pub mod metrics;
pub mod tracing_layer;

pub use metrics::{setup_metrics_recorder, track_request, track_restaurant_violation, track_route};
pub use tracing_layer::configure_tracing;
