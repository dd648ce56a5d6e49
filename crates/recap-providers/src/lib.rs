//! # recap-providers
//!
//! LLM provider implementations for recap.

pub mod anthropic;
