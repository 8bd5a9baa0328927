//! Storage for analysis mappings and inspection data.
//!
//! [`memory`] keeps everything in process and is what tests and local runs use. [`postgres`]
//! is the durable store.

pub mod memory;
pub mod postgres;
