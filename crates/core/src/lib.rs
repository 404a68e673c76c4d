#![deny(unused)]
//! Core types, traits, and error definitions for Mealroute.
//!
//! This crate holds the building blocks shared by the routing pipeline, the
//! HTTP gateway, and the collaborator adapters (classifier, catalog, search).

pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
