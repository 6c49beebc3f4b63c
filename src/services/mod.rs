// src/services/mod.rs

//! Portal-facing services: HTTP boundary, field extraction, and the two
//! enumeration stages (units, entity listings).

pub mod extract;
pub mod fetch;
pub mod listings;
pub mod units;

pub use extract::extract_fields;
pub use fetch::{FetchClient, FetchMethod, FetchRequest, FetchResponse, HttpFetchClient};
pub use listings::enumerate_entities;
pub use units::{UnitEnumeration, enumerate_units};
