// src/utils/mod.rs

//! Shared utilities.

pub mod url;

pub use url::{extract_query_param, resolve};
