//! Terminal client for the campus records portal.
//!
//! This library provides the HTTP API client, file-backed storage, command
//! parsing and the interactive shell used by the campus_client binary.

pub mod api_client;
pub mod commands;
pub mod config;
pub mod logging;
pub mod shell;
pub mod storage;
