//! Taskboard Library
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod normalize;
pub mod service;
pub mod types;
