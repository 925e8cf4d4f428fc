//! ecoquiz-core: personalization, progression and achievement engine.
//!
//! This crate defines the profile data model, the question selector, the
//! achievement rule table and the profile store that every ecoquiz front-end
//! builds on.

pub mod achievements;
pub mod bank;
pub mod error;
pub mod insights;
pub mod model;
pub mod progression;
pub mod scoring;
pub mod selector;
pub mod storage;
pub mod store;
pub mod traits;
