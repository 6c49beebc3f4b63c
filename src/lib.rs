// src/lib.rs

//! Sigris Crawler Library
//!
//! Resumable four-stage crawler for university academic portal directories:
//! enumerate departments, enumerate faculty per department, fetch each
//! profile page, and emit merged JSONL records with checkpoint/resume.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
