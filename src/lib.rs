//! Leaf photo upload, one classifier pass, and a localized disease report.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod preprocess;
pub mod render;
pub mod routes;
pub mod utils;
