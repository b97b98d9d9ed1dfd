// src/lib.rs

//! Folio Library
//!
//! Book search over Open Library with locally persisted favorites and notes.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
