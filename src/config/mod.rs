//! Configuration module for research runs
//!
//! This module provides the `ResearchConfig` struct and its builder with
//! validation and the defaults the browsing pipeline was tuned against.

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::ResearchConfigBuilder;
pub use types::ResearchConfig;
