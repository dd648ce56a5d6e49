//! # recap-core
//!
//! Core types, traits, configuration, and error handling for the recap
//! mention-triage agent.

pub mod chunk;
pub mod config;
pub mod error;
pub mod mention;
pub mod report;
pub mod traits;
