//! # hckup CLI Library
//!
//! Core library modules for the hckup command-line tool: configuration
//! loading, token persistence, and the six-stage artifact upload workflow.

pub mod cli;
pub mod config;
pub mod consts;
pub mod output;
pub mod token_store;
pub mod uploader;
