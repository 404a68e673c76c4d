#![deny(unused)]
//! Model gateway for Mealroute.
//!
//! Rig-backed `LlmClient` used by the intent classifier.

pub mod rig_client;

pub use rig_client::{create_client, create_default_client, RigConfig, RigLlmClient, RigProvider};
