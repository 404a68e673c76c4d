//! Core type definitions for Mealroute.
//!
//! Broken down into submodules, one per pipeline concept.

pub mod constraints;
pub mod intent;
pub mod request;
pub mod response;
pub mod restaurant;
pub mod route;
pub mod search;

pub use constraints::*;
pub use intent::*;
pub use request::*;
pub use response::*;
pub use restaurant::*;
pub use route::*;
pub use search::*;
